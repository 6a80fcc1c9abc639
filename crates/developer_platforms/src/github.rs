use async_trait::async_trait;
use jsonwebtoken::EncodingKey;
use octocrab::{models::repos::DiffEntry, Octocrab, Page};
use serde::Serialize;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::{
    errors::Error,
    models::{FilePage, PageToken, PullRequest, PullRequestFile},
    PullRequestProvider,
};

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

/// The number of changed files requested per page. GitHub caps this at 100.
pub const FILES_PER_PAGE: u8 = 100;

#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8,
    page: u32,
}

/// Authenticates with GitHub using an installation access token for a specific app installation.
///
/// This function retrieves an access token for a GitHub App installation and creates a new
/// `Octocrab` client authenticated with that token.
///
/// # Arguments
///
/// * `octocrab` - A client authenticated as the GitHub App.
/// * `installation_id` - The ID of the GitHub App installation.
/// * `repository_owner` - The owner of the repository associated with the installation.
/// * `source_repository` - The name of the repository associated with the installation.
///
/// # Errors
///
/// Returns `Error::FailedToCreateAccessToken` if GitHub refuses to mint a token for the
/// installation.
///
/// # Example
///
/// ```rust,no_run
/// use octocrab::Octocrab;
/// use donotsubmit_developer_platforms::github::authenticate_with_access_token;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let octocrab = Octocrab::builder().build()?;
///     let authenticated_client = authenticate_with_access_token(
///         &octocrab,
///         12345678,
///         "example-owner",
///         "example-repo",
///     )
///     .await?;
///
///     Ok(())
/// }
/// ```
#[instrument(skip(octocrab))]
pub async fn authenticate_with_access_token(
    octocrab: &Octocrab,
    installation_id: u64,
    repository_owner: &str,
    source_repository: &str,
) -> Result<Octocrab, Error> {
    debug!(
        repository_owner = repository_owner,
        repository = source_repository,
        installation_id,
        "Finding installation"
    );

    let (api_with_token, _) = octocrab
        .installation_and_token(installation_id.into())
        .await
        .map_err(|e| {
            log_octocrab_error("Failed to create a token for the installation", e);
            Error::FailedToCreateAccessToken(
                repository_owner.to_string(),
                source_repository.to_string(),
                installation_id,
            )
        })?;

    info!(
        repository_owner = repository_owner,
        repository = source_repository,
        installation_id,
        "Created access token for installation",
    );

    Ok(api_with_token)
}

/// Creates an `Octocrab` client authenticated as a GitHub App.
///
/// The private key is used to sign the JWTs octocrab sends on every app-level request. The
/// credentials are verified by fetching the app's own details once.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
///
/// # Errors
///
/// Returns `Error::AuthError` if the key cannot be parsed or the client cannot be built, and
/// `Error::InvalidResponse` if GitHub does not accept the app credentials.
#[instrument(skip(private_key))]
pub async fn create_app_client(app_id: u64, private_key: &str) -> Result<Octocrab, Error> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        Error::AuthError(format!(
            "Failed to translate the private key. Error was: {}",
            e
        ))
    })?;

    let octocrab = Octocrab::builder()
        .app(app_id.into(), key)
        .build()
        .map_err(|_| Error::AuthError("Failed to build a client for the GitHub app.".to_string()))?;

    let app = match octocrab.current().app().await {
        Ok(a) => a,
        Err(e) => {
            log_octocrab_error(
                "Failed to retrieve App information for the currently authenticated app",
                e,
            );
            return Err(Error::InvalidResponse);
        }
    };

    info!(app_id, app_name = app.name, "Authenticated as the GitHub app");

    Ok(octocrab)
}

/// Creates an `Octocrab` client authenticated with a personal access token.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|_| Error::AuthError("Failed to build a client for the token.".to_string()))
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = *source;
            error!(
                error_message = err.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}

/// Maps an octocrab failure to a platform error, logging the details first.
fn to_platform_error(message: &str, e: octocrab::Error, fallback: Error) -> Error {
    let rate_limited = matches!(
        &e,
        octocrab::Error::GitHub { source, .. }
            if source.message.to_ascii_lowercase().contains("rate limit")
    );

    log_octocrab_error(message, e);

    if rate_limited {
        Error::RateLimitExceeded
    } else {
        fallback
    }
}

/// Extracts the `page` query parameter from a pagination link.
fn page_from_link(link: &str) -> Option<PageToken> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
        .map(PageToken)
}

#[derive(Debug, Default)]
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Fetches the current state and labels of a pull request.
    ///
    /// Webhook events carry this information in their payload. Callers without an event, such
    /// as the command line, use this instead.
    #[instrument]
    pub async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        let route = format!("/repos/{}/{}/pulls/{}", repo_owner, repo_name, pr_number);

        let pr: PullRequest = self.client.get(route, None::<&()>).await.map_err(|e| {
            to_platform_error(
                "Failed to get pull request",
                e,
                Error::ApiError(format!(
                    "get pull request {}/{}#{}",
                    repo_owner, repo_name, pr_number
                )),
            )
        })?;

        debug!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            state = pr.state.as_str(),
            labels = pr.labels.len(),
            "Fetched pull request"
        );

        Ok(pr)
    }
}

#[async_trait]
impl PullRequestProvider for GitHubProvider {
    #[instrument]
    async fn fetch_changed_files_page(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        page: PageToken,
    ) -> Result<FilePage, Error> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/files",
            repo_owner, repo_name, pr_number
        );
        let query = PageQuery {
            per_page: FILES_PER_PAGE,
            page: page.0,
        };

        let response: Page<DiffEntry> =
            self.client.get(route, Some(&query)).await.map_err(|e| {
                to_platform_error(
                    "Failed to list the files of the pull request",
                    e,
                    Error::ApiError(format!(
                        "list files of {}/{}#{} (page {})",
                        repo_owner, repo_name, pr_number, page
                    )),
                )
            })?;

        let next_page = match &response.next {
            Some(uri) => match page_from_link(&uri.to_string()) {
                Some(token) => Some(token),
                None => {
                    error!(
                        repository_owner = repo_owner,
                        repository = repo_name,
                        pull_request = pr_number,
                        link = uri.to_string(),
                        "The next page link did not contain a page number"
                    );
                    return Err(Error::InvalidResponse);
                }
            },
            None => None,
        };

        let files: Vec<PullRequestFile> = response
            .items
            .into_iter()
            .map(|entry| PullRequestFile {
                filename: entry.filename,
                patch: entry.patch,
            })
            .collect();

        debug!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            page = page.0,
            count = files.len(),
            next_page = next_page.map(|p| p.0),
            "Fetched a page of changed files"
        );

        Ok(FilePage { files, next_page })
    }

    #[instrument]
    async fn add_labels(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        match self
            .client
            .issues(repo_owner, repo_name)
            .add_labels(pr_number, labels)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(to_platform_error(
                "Failed to add new labels",
                e,
                Error::FailedToUpdatePullRequest("Failed to add labels".to_string()),
            )),
        }
    }

    #[instrument]
    async fn remove_label(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        label: &str,
    ) -> Result<(), Error> {
        // Label names may contain '/', which must not be read as a path separator.
        let route = format!(
            "/repos/{}/{}/issues/{}/labels/{}",
            repo_owner,
            repo_name,
            pr_number,
            urlencoding::encode(label)
        );

        match self
            .client
            .delete::<Vec<octocrab::models::Label>, _, ()>(route, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(to_platform_error(
                "Failed to remove label",
                e,
                Error::FailedToUpdatePullRequest("Failed to remove label".to_string()),
            )),
        }
    }
}
