use async_trait::async_trait;

pub mod errors;

pub mod github;

pub mod models;
use errors::Error;
use models::{FilePage, PageToken};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for interacting with developer platforms that provide pull requests (e.g., GitHub, GitLab).
///
/// This is the narrow capability the hold bot needs from a platform: read the changed files of a
/// pull request one page at a time, and add or remove labels. Pagination is expressed as a pure
/// request/response pair so that callers own the cursor and implementations stay stateless.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use donotsubmit_developer_platforms::{PullRequestProvider, errors::Error, models::{FilePage, PageToken}};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct GitLabProvider {
///     token: String,
/// }
///
/// #[async_trait]
/// impl PullRequestProvider for GitLabProvider {
///     async fn fetch_changed_files_page(
///         &self,
///         repo_owner: &str,
///         repo_name: &str,
///         pr_number: u64,
///         page: PageToken,
///     ) -> Result<FilePage, Error> {
///         // Implementation to fetch one page of merge request changes
///         // ...
///         # unimplemented!()
///     }
///
///     # async fn add_labels(&self, _: &str, _: &str, _: u64, _: &[String]) -> Result<(), Error> { unimplemented!() }
///     # async fn remove_label(&self, _: &str, _: &str, _: u64, _: &str) -> Result<(), Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    /// Fetches a single page of the files changed in a pull request.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `page` - The page to fetch. Use `PageToken::first()` to start a listing
    ///
    /// # Returns
    ///
    /// A `Result` containing the files on the requested page together with the token of the
    /// next page, if the platform reported one.
    async fn fetch_changed_files_page(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        page: PageToken,
    ) -> Result<FilePage, Error>;

    /// Adds labels to a pull request.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `labels` - The labels to add
    ///
    /// # Returns
    ///
    /// A `Result` indicating success or failure
    async fn add_labels(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        labels: &[String],
    ) -> Result<(), Error>;

    /// Removes a label from a pull request.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `label` - The label to remove
    ///
    /// # Returns
    ///
    /// A `Result` indicating success or failure
    async fn remove_label(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        label: &str,
    ) -> Result<(), Error>;
}
