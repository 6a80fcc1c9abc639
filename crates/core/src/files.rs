//! # Changed file enumeration
//!
//! Walks the paginated listing of a pull request's changed files until the platform reports that
//! there are no more pages. The set of changed files is only complete once the walk finishes, so
//! a failure on any page discards everything fetched so far.

use donotsubmit_developer_platforms::models::{PageToken, PullRequestFile};
use donotsubmit_developer_platforms::PullRequestProvider;
use std::collections::HashSet;
use tracing::{debug, error, instrument, warn};

use crate::errors::HoldBotError;
use crate::event::PullRequestRef;

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;

/// Lists every file changed by a pull request.
///
/// Pages are requested starting at `PageToken::first()`. The walk ends when a page reports no
/// next page, or a next page equal to the page just requested. A next page that was already
/// visited also ends the walk, so a pagination cycle cannot loop forever.
///
/// # Errors
///
/// Returns `HoldBotError::FetchError` if any page cannot be fetched. No partial listing is
/// returned.
#[instrument(skip(provider, pull_request), fields(pull_request = %pull_request))]
pub async fn list_changed_files<P>(
    provider: &P,
    pull_request: &PullRequestRef,
) -> Result<Vec<PullRequestFile>, HoldBotError>
where
    P: PullRequestProvider + ?Sized,
{
    let mut files = Vec::new();
    let mut visited = HashSet::new();
    let mut page = PageToken::first();

    loop {
        visited.insert(page);

        let response = provider
            .fetch_changed_files_page(
                &pull_request.owner,
                &pull_request.repo,
                pull_request.number,
                page,
            )
            .await
            .map_err(|e| {
                error!(
                    repository_owner = pull_request.owner.as_str(),
                    repository = pull_request.repo.as_str(),
                    pull_request = pull_request.number,
                    page = page.0,
                    error = e.to_string(),
                    "Failed to fetch a page of changed files"
                );
                HoldBotError::FetchError {
                    pull_request: pull_request.to_string(),
                    source: e,
                }
            })?;

        files.extend(response.files);

        match response.next_page {
            Some(next) if next == page => break,
            Some(next) if visited.contains(&next) => {
                warn!(
                    repository_owner = pull_request.owner.as_str(),
                    repository = pull_request.repo.as_str(),
                    pull_request = pull_request.number,
                    page = page.0,
                    next_page = next.0,
                    "Pagination pointed back to a page that was already read. Stopping."
                );
                break;
            }
            Some(next) => page = next,
            None => break,
        }
    }

    debug!(
        repository_owner = pull_request.owner.as_str(),
        repository = pull_request.repo.as_str(),
        pull_request = pull_request.number,
        count = files.len(),
        pages = visited.len(),
        "Listed changed files"
    );

    Ok(files)
}
