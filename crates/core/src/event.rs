//! # Events
//!
//! Typed view of the webhook events the bot reacts to. The ingress layer decodes the event kind
//! and payload; everything past that point works with these types only.

use donotsubmit_developer_platforms::models::{PullRequest, Repository};
use std::collections::HashSet;
use std::fmt;

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

/// The kind of an inbound webhook event, as named by the platform (`X-GitHub-Event`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A pull request was opened, updated, labelled, closed, ...
    PullRequest,

    /// The platform checking that the webhook is reachable
    Ping,

    /// Any other event. Not handled.
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "pull_request" => EventKind::PullRequest,
            "ping" => EventKind::Ping,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
    Other(String),
}

impl From<&str> for PullRequestState {
    fn from(state: &str) -> Self {
        match state {
            "open" => PullRequestState::Open,
            "closed" => PullRequestState::Closed,
            other => PullRequestState::Other(other.to_string()),
        }
    }
}

/// Identifies a pull request on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Snapshot of a pull request taken from a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub pull_request: PullRequestRef,
    pub state: PullRequestState,
    pub labels: HashSet<String>,
}

impl PullRequestEvent {
    /// Builds the event from the pull request and repository sections of a webhook payload.
    pub fn from_webhook(pr: &PullRequest, repository: &Repository) -> Self {
        Self {
            pull_request: PullRequestRef::new(
                repository.owner.login.as_str(),
                repository.name.as_str(),
                pr.number,
            ),
            state: PullRequestState::from(pr.state.as_str()),
            labels: pr.labels.iter().map(|l| l.name.clone()).collect(),
        }
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.contains(name)
    }

    pub fn is_closed(&self) -> bool {
        self.state == PullRequestState::Closed
    }
}
