#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// This enum represents all possible errors that can occur when interacting
/// with developer platforms like GitHub. Each variant provides specific
/// context about the type of failure encountered.
///
/// # Examples
///
/// ```rust
/// use donotsubmit_developer_platforms::errors::Error;
///
/// // Authentication error
/// let auth_error = Error::AuthError("Invalid token".to_string());
/// println!("{}", auth_error);
///
/// // Rate limit error
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// API request failure.
    ///
    /// An API call to the developer platform failed. The string parameter
    /// describes the request that failed.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// The provided credentials (token, app key, etc.) are invalid, expired,
    /// or insufficient for the requested operation.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Failed to create an installation access token for a repository.
    ///
    /// Parameters: repository owner, repository name, installation ID
    #[error("Failed to create an access token for repository: {0}/{1}. For installation with ID: {2}")]
    FailedToCreateAccessToken(String, String, u64),

    /// Failed to update pull request.
    ///
    /// An operation that modifies a pull request (adding or removing a label)
    /// failed. The string parameter contains details about what failed.
    #[error("Failed to update the PR: {0}")]
    FailedToUpdatePullRequest(String),

    /// Invalid response format from platform API.
    ///
    /// The response could not be interpreted, for instance because a
    /// pagination link did not carry a page number.
    #[error("Invalid response format")]
    InvalidResponse,

    /// Platform rate limit exceeded.
    ///
    /// The caller should back off; redelivery of the event is expected to
    /// retry the operation later.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
