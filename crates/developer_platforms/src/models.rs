//! # Models
//!
//! This module contains the data models exchanged with developer platforms.
//!
//! They cover two directions: what the platform sends to us in webhook payloads (pull requests,
//! repositories, installations) and what we read back from its API (pages of changed files).
//! All of them are serializable so they can be decoded straight from the platform's JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub App installation, as delivered in webhook payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    /// The installation ID used to mint installation access tokens
    pub id: u64,
}

/// Represents a label on a pull request.
///
/// # Examples
///
/// ```
/// use donotsubmit_developer_platforms::models::Label;
///
/// let label = Label {
///     name: "do-not-merge/hold".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The name of the label
    pub name: String,
}

/// Opaque marker for one page of a paginated listing.
///
/// GitHub numbers its pages starting at one, so the first page is `PageToken(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageToken(pub u32);

impl PageToken {
    /// The token of the first page of any listing.
    pub fn first() -> Self {
        PageToken(1)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of changed files as returned by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilePage {
    /// The files on this page, in platform order
    pub files: Vec<PullRequestFile>,

    /// The token for the next page, or `None` when the platform reports no further pages
    pub next_page: Option<PageToken>,
}

/// Represents a pull request as delivered in a webhook payload.
///
/// # Fields
///
/// * `number` - The pull request number
/// * `state` - The lifecycle state reported by the platform (`open`, `closed`)
/// * `draft` - Whether the pull request is a draft
/// * `labels` - The labels currently applied to the pull request
///
/// # Examples
///
/// ```
/// use donotsubmit_developer_platforms::models::{Label, PullRequest};
///
/// let pr = PullRequest {
///     number: 123,
///     state: "open".to_string(),
///     draft: false,
///     labels: vec![Label { name: "bug".to_string() }],
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number
    pub number: u64,

    /// The lifecycle state of the pull request
    pub state: String,

    /// Whether the pull request is a draft
    #[serde(default)]
    pub draft: bool,

    /// The labels currently applied to the pull request
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Represents one file changed by a pull request.
///
/// `patch` is `None` when the platform provides no textual diff, for instance for binary files,
/// pure renames or patches that were too large to include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// The path of the file relative to the repository root
    pub filename: String,

    /// The unified diff hunks for the file, without the `diff --git` preamble
    #[serde(default)]
    pub patch: Option<String>,
}

/// Represents a repository, as delivered in webhook payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// The repository name, without the owner
    pub name: String,

    /// The full name of the repository, in the form `owner/name`
    pub full_name: String,

    /// The account that owns the repository
    pub owner: User,
}

/// Represents a user or app account on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier of the account
    pub id: u64,

    /// The login name of the account
    pub login: String,
}
