use anyhow::Context;
use clap::Args;
use donotsubmit_core::{
    config::{load_hold_policy, HoldPolicy},
    event::{PullRequestEvent, PullRequestRef, PullRequestState},
    EventOutcome, HoldBot,
};
use donotsubmit_developer_platforms::github::{create_token_client, GitHubProvider};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::errors::CliError;

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;

/// Environment variable holding the GitHub token
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository, as owner/name
    #[arg(short, long)]
    pub repo: String,

    /// Pull request number
    #[arg(short, long)]
    pub pr: u64,

    /// Add or remove the hold label instead of only reporting
    #[arg(long)]
    pub apply: bool,

    /// Policy file (TOML) with the marker and hold label to use
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Result of checking one pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckReport {
    /// Only evaluated. Labels were not touched.
    Evaluated { hold_wanted: bool },

    /// Evaluated and the hold label reconciled.
    Applied(EventOutcome),
}

impl CheckReport {
    /// Whether the pull request should be held. Closed pull requests never are.
    pub fn hold_wanted(&self) -> bool {
        match self {
            CheckReport::Evaluated { hold_wanted } => *hold_wanted,
            CheckReport::Applied(EventOutcome::Reconciled { hold_wanted, .. }) => *hold_wanted,
            CheckReport::Applied(EventOutcome::Rejected) => false,
        }
    }

    /// One-line description for the terminal.
    fn summary(&self, pull_request: &PullRequestRef) -> String {
        match self {
            CheckReport::Evaluated { hold_wanted: true } => {
                format!("{}: DO NOT SUBMIT marker found, hold wanted", pull_request)
            }
            CheckReport::Evaluated { hold_wanted: false } => {
                format!("{}: no DO NOT SUBMIT marker found", pull_request)
            }
            CheckReport::Applied(EventOutcome::Rejected) => {
                format!("{}: pull request is closed, left as is", pull_request)
            }
            CheckReport::Applied(EventOutcome::Reconciled {
                hold_wanted,
                action,
            }) => format!(
                "{}: hold wanted: {}, hold label {}",
                pull_request, hold_wanted, action
            ),
        }
    }
}

/// Splits `owner/name` into its two parts.
pub fn parse_repository(repo: &str) -> Result<(String, String), CliError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(CliError::InvalidArguments(format!(
            "Expected the repository as owner/name, got '{}'",
            repo
        ))),
    }
}

/// Checks one pull request with `provider`.
///
/// Without `apply` the changed files are scanned and nothing is modified. With `apply` the
/// current state and labels of the pull request are fetched first and the full event handling
/// runs, reconciling the hold label.
#[instrument(skip(provider, policy))]
pub async fn run_check(
    provider: GitHubProvider,
    policy: HoldPolicy,
    pull_request: &PullRequestRef,
    apply: bool,
) -> Result<CheckReport, CliError> {
    if !apply {
        let bot = HoldBot::with_policy(provider, policy)?;
        let hold_wanted = bot.evaluate(pull_request).await?;
        return Ok(CheckReport::Evaluated { hold_wanted });
    }

    let pr = provider
        .get_pull_request(&pull_request.owner, &pull_request.repo, pull_request.number)
        .await
        .map_err(|e| CliError::NetworkError(e.to_string()))?;

    let event = PullRequestEvent {
        pull_request: pull_request.clone(),
        state: PullRequestState::from(pr.state.as_str()),
        labels: pr.labels.into_iter().map(|l| l.name).collect(),
    };
    debug!(state = ?event.state, labels = ?event.labels, "Fetched pull request state");

    let bot = HoldBot::with_policy(provider, policy)?;
    let outcome = bot.handle_pull_request(&event).await?;

    Ok(CheckReport::Applied(outcome))
}

/// Executes the `check` command.
///
/// # Errors
///
/// Returns `CliError::HoldWanted` when the pull request adds a marker, so the exit code can gate
/// scripts and CI jobs.
pub async fn execute(args: CheckArgs) -> Result<(), CliError> {
    let (owner, repo) = parse_repository(&args.repo)?;
    let pull_request = PullRequestRef::new(owner, repo, args.pr);

    let policy = match &args.config {
        Some(path) => load_hold_policy(path)?,
        None => HoldPolicy::default(),
    };

    let token = std::env::var(TOKEN_ENV_VAR)
        .with_context(|| format!("{} is not set", TOKEN_ENV_VAR))
        .map_err(|e| CliError::AuthError(format!("{:#}", e)))?;
    let client =
        create_token_client(&token).map_err(|e| CliError::AuthError(e.to_string()))?;

    info!(
        repository_owner = pull_request.owner.as_str(),
        repository = pull_request.repo.as_str(),
        pull_request = pull_request.number,
        apply = args.apply,
        "Checking pull request"
    );

    let report = run_check(
        GitHubProvider::new(client),
        policy,
        &pull_request,
        args.apply,
    )
    .await?;

    println!("{}", report.summary(&pull_request));

    if report.hold_wanted() {
        return Err(CliError::HoldWanted(pull_request.to_string()));
    }

    Ok(())
}
