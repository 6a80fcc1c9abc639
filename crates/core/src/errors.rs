use donotsubmit_developer_platforms::errors::Error as PlatformError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// A patch that is not well-formed unified diff text.
///
/// Line numbers are 1-based and count lines of the patch text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffParseError {
    #[error("Invalid hunk header on line {line}: '{header}'")]
    InvalidHunkHeader { line: usize, header: String },

    #[error("Unexpected line in hunk body on line {line}: '{content}'")]
    InvalidHunkLine { line: usize, content: String },

    #[error("Unexpected content before the first hunk on line {line}: '{content}'")]
    UnexpectedPreamble { line: usize, content: String },
}

#[derive(Error, Debug)]
pub enum HoldBotError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to list the changed files of {pull_request}. Issue was: '{source}'.")]
    FetchError {
        pull_request: String,
        #[source]
        source: PlatformError,
    },

    #[error("Failed to update the labels of {pull_request}. Issue was: '{source}'.")]
    ApiError {
        pull_request: String,
        #[source]
        source: PlatformError,
    },
}
