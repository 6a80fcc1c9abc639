//! # DO NOT SUBMIT hold bot core
//!
//! Core business logic for holding pull requests that add a "do not submit" marker.
//!
//! For every pull request event the bot:
//! - lists all files changed by the pull request, page by page
//! - parses each file's patch into hunks and scans the added lines for the marker
//! - adds the hold label if a marker was found and the label is missing, or removes the
//!   label if no marker was found and the label is present
//!
//! Closed pull requests are left exactly as they are.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use donotsubmit_developer_platforms::PullRequestProvider;
//! use donotsubmit_core::{EventOutcome, HoldBot, event::PullRequestEvent};
//!
//! async fn handle<P: PullRequestProvider + std::fmt::Debug>(
//!     provider: P,
//!     event: PullRequestEvent,
//! ) -> Result<(), donotsubmit_core::errors::HoldBotError> {
//!     let bot = HoldBot::new(provider);
//!
//!     match bot.handle_pull_request(&event).await? {
//!         EventOutcome::Rejected => println!("Pull request is closed"),
//!         EventOutcome::Reconciled { hold_wanted, action } => {
//!             println!("Hold wanted: {}, label {}", hold_wanted, action)
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

use donotsubmit_developer_platforms::models::{Installation, PullRequest, Repository};
use donotsubmit_developer_platforms::PullRequestProvider;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

pub mod config;
use config::HoldPolicy;

pub mod diff;

pub mod errors;
use errors::HoldBotError;

pub mod event;
use event::{PullRequestEvent, PullRequestRef};

pub mod files;

pub mod hold;

pub mod labels;
use labels::LabelAction;

pub mod marker;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "test_support.rs"]
mod test_support;

/// Pull request webhook payload, as sent by the platform.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub action: String,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
    pub installation: Option<Installation>,
}

/// Result of handling one pull request event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The pull request is closed. Nothing was fetched and no labels were touched.
    Rejected,

    /// The pull request was evaluated and its hold label reconciled.
    Reconciled {
        hold_wanted: bool,
        action: LabelAction,
    },
}

/// Holds pull requests that add the "do not submit" marker.
///
/// Each event is handled on its own: the bot keeps no state between events beyond its policy.
#[derive(Debug)]
pub struct HoldBot<P: PullRequestProvider + std::fmt::Debug> {
    provider: P,
    policy: HoldPolicy,
}

impl<P: PullRequestProvider + std::fmt::Debug> HoldBot<P> {
    /// Creates a new `HoldBot` with the default policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: HoldPolicy::default(),
        }
    }

    /// Creates a new `HoldBot` with a custom policy.
    ///
    /// # Errors
    ///
    /// Returns `HoldBotError::ConfigError` if the policy fails `HoldPolicy::validate`, for
    /// instance because the marker is empty and would match every added line.
    pub fn with_policy(provider: P, policy: HoldPolicy) -> Result<Self, HoldBotError> {
        policy.validate()?;
        Ok(Self { provider, policy })
    }

    pub fn policy(&self) -> &HoldPolicy {
        &self.policy
    }

    /// Decides whether the pull request needs a hold, without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `HoldBotError::FetchError` if the changed files cannot be listed.
    #[instrument(skip(self))]
    pub async fn evaluate(&self, pull_request: &PullRequestRef) -> Result<bool, HoldBotError> {
        let files = files::list_changed_files(&self.provider, pull_request).await?;
        let hold_wanted = hold::wants_hold(&files, &self.policy.marker);

        debug!(
            repository_owner = pull_request.owner.as_str(),
            repository = pull_request.repo.as_str(),
            pull_request = pull_request.number,
            files = files.len(),
            hold_wanted,
            "Evaluated pull request"
        );

        Ok(hold_wanted)
    }

    /// Handles a pull request event.
    ///
    /// Closed pull requests are rejected without any platform call. Otherwise all changed files
    /// are listed and scanned, and the hold label is reconciled with the result.
    ///
    /// # Errors
    ///
    /// Returns `HoldBotError::FetchError` if the changed files cannot be listed, in which case no
    /// label is changed, and `HoldBotError::ApiError` if the label update fails. Neither is
    /// retried here; redelivery of the event is left to the caller.
    #[instrument(skip(self, event), fields(pull_request = %event.pull_request))]
    pub async fn handle_pull_request(
        &self,
        event: &PullRequestEvent,
    ) -> Result<EventOutcome, HoldBotError> {
        let pr = &event.pull_request;
        info!(
            repository_owner = pr.owner.as_str(),
            repository = pr.repo.as_str(),
            pull_request = pr.number,
            state = ?event.state,
            "Processing pull request",
        );

        if event.is_closed() {
            info!(
                repository_owner = pr.owner.as_str(),
                repository = pr.repo.as_str(),
                pull_request = pr.number,
                "Pull request is closed. Leaving it as is."
            );
            return Ok(EventOutcome::Rejected);
        }

        let hold_wanted = self.evaluate(pr).await.inspect_err(|e| {
            error!(
                repository_owner = pr.owner.as_str(),
                repository = pr.repo.as_str(),
                pull_request = pr.number,
                error = e.to_string(),
                "Failed to decide whether the pull request needs a hold"
            )
        })?;

        let action = labels::reconcile_hold_label(
            &self.provider,
            event,
            &self.policy.hold_label,
            hold_wanted,
        )
        .await?;

        info!(
            repository_owner = pr.owner.as_str(),
            repository = pr.repo.as_str(),
            pull_request = pr.number,
            hold_wanted,
            action = %action,
            "Processed pull request"
        );

        Ok(EventOutcome::Reconciled {
            hold_wanted,
            action,
        })
    }
}
