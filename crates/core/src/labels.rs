//! # Hold label reconciliation
//!
//! Brings the hold label on a pull request in line with the hold decision. The label is added
//! when a hold is wanted but missing, removed when it is present but no longer wanted, and left
//! alone otherwise. At most one mutating call is made per reconciliation.

use donotsubmit_developer_platforms::PullRequestProvider;
use std::fmt;
use tracing::{debug, error, info, instrument};

use crate::errors::HoldBotError;
use crate::event::PullRequestEvent;

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;

/// The change made to the labels of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    Added,
    Removed,
    Unchanged,
}

impl LabelAction {
    /// Decides the action for a wanted and an actual label state.
    ///
    /// | want  | have  | action    |
    /// |-------|-------|-----------|
    /// | true  | false | Added     |
    /// | false | true  | Removed   |
    /// | true  | true  | Unchanged |
    /// | false | false | Unchanged |
    pub fn plan(want: bool, have: bool) -> Self {
        match (want, have) {
            (true, false) => LabelAction::Added,
            (false, true) => LabelAction::Removed,
            _ => LabelAction::Unchanged,
        }
    }
}

impl fmt::Display for LabelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LabelAction::Added => "added",
            LabelAction::Removed => "removed",
            LabelAction::Unchanged => "unchanged",
        };
        write!(f, "{}", text)
    }
}

/// Adds or removes `hold_label` on the pull request so that its presence matches `want`.
///
/// # Errors
///
/// Returns `HoldBotError::ApiError` carrying the platform error if the label update fails. The
/// update is not retried.
#[instrument(skip(provider, event), fields(pull_request = %event.pull_request))]
pub async fn reconcile_hold_label<P>(
    provider: &P,
    event: &PullRequestEvent,
    hold_label: &str,
    want: bool,
) -> Result<LabelAction, HoldBotError>
where
    P: PullRequestProvider + ?Sized,
{
    let pr = &event.pull_request;
    let have = event.has_label(hold_label);
    let action = LabelAction::plan(want, have);

    let result = match action {
        LabelAction::Added => {
            provider
                .add_labels(&pr.owner, &pr.repo, pr.number, &[hold_label.to_string()])
                .await
        }
        LabelAction::Removed => {
            provider
                .remove_label(&pr.owner, &pr.repo, pr.number, hold_label)
                .await
        }
        LabelAction::Unchanged => {
            debug!(
                repository_owner = pr.owner.as_str(),
                repository = pr.repo.as_str(),
                pull_request = pr.number,
                hold_wanted = want,
                "Hold label already matches the decision"
            );
            return Ok(action);
        }
    };

    result.map_err(|e| {
        error!(
            repository_owner = pr.owner.as_str(),
            repository = pr.repo.as_str(),
            pull_request = pr.number,
            label = hold_label,
            error = e.to_string(),
            "Failed to update the hold label"
        );
        HoldBotError::ApiError {
            pull_request: pr.to_string(),
            source: e,
        }
    })?;

    info!(
        repository_owner = pr.owner.as_str(),
        repository = pr.repo.as_str(),
        pull_request = pr.number,
        label = hold_label,
        action = %action,
        "Updated the hold label"
    );

    Ok(action)
}
