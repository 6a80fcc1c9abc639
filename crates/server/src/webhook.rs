//! Webhook ingress: signature verification, event-kind demultiplexing and per-event dispatch.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use donotsubmit_core::{
    config::HoldPolicy,
    event::{EventKind, PullRequestEvent},
    EventOutcome, HoldBot, WebhookPayload,
};
use donotsubmit_developer_platforms::github::{authenticate_with_access_token, GitHubProvider};
use hmac::{Hmac, Mac};
use octocrab::Octocrab;
use sha2::Sha256;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, instrument, warn};

use crate::errors::ServerError;

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Immutable state shared by all requests.
pub struct AppState {
    /// Client authenticated as the GitHub App. Installation clients are derived from it per event.
    pub octocrab: Octocrab,
    pub webhook_secret: String,
    pub policy: HoldPolicy,
    pub event_timeout: Duration,
}

#[instrument]
pub async fn handle_get_request() -> StatusCode {
    info!("Received get request ...");

    StatusCode::OK
}

#[instrument(skip(state, headers, body))]
pub async fn handle_post_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, StatusCode> {
    info!("Received post request ...");

    if !verify_github_signature(&state.webhook_secret, &headers, &body) {
        warn!("Webhook did not have valid signature");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let Some(event_name) = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Webhook did not name the event kind");
        return Err(StatusCode::BAD_REQUEST);
    };

    match EventKind::from_name(event_name) {
        EventKind::PullRequest => {}
        EventKind::Ping => {
            info!("Received ping event");
            return Ok(StatusCode::OK);
        }
        EventKind::Other(name) => {
            warn!(event = name.as_str(), "Received an event that is not handled");
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        error!(
            error = e.to_string(),
            "Could not extract webhook payload from request body"
        );
        StatusCode::BAD_REQUEST
    })?;

    debug!(action = payload.action.as_str(), "Pull request action");

    let Some(installation) = payload.installation else {
        warn!("Web hook payload did not include installation information. Cannot process changes.");
        return Err(StatusCode::BAD_REQUEST);
    };

    let Some(repository) = payload.repository else {
        warn!("Web hook payload did not include repository information. Cannot process changes.");
        return Err(StatusCode::BAD_REQUEST);
    };

    let Some(pr) = payload.pull_request else {
        warn!("Web hook payload did not include pull request information. Cannot process changes.");
        return Err(StatusCode::BAD_REQUEST);
    };

    let event = PullRequestEvent::from_webhook(&pr, &repository);

    // Closed pull requests need neither a token nor any GitHub call.
    if event.is_closed() {
        info!(
            repository_owner = event.pull_request.owner.as_str(),
            repository = event.pull_request.repo.as_str(),
            pull_request = event.pull_request.number,
            "Pull request is closed. Leaving it as is."
        );
        return Ok(StatusCode::OK);
    }

    let pr_ref = event.pull_request.clone();
    let processing = process_pull_request_event(&state, installation.id, &event);
    match tokio::time::timeout(state.event_timeout, processing).await {
        Ok(Ok(outcome)) => {
            debug!(
                repository_owner = pr_ref.owner.as_str(),
                repository = pr_ref.repo.as_str(),
                pull_request = pr_ref.number,
                outcome = ?outcome,
                "Finished processing the event"
            );
            Ok(StatusCode::OK)
        }
        Ok(Err(e)) => {
            error!(
                repository_owner = pr_ref.owner.as_str(),
                repository = pr_ref.repo.as_str(),
                pull_request = pr_ref.number,
                error = e.to_string(),
                "Failed to process pull request"
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(_) => {
            error!(
                repository_owner = pr_ref.owner.as_str(),
                repository = pr_ref.repo.as_str(),
                pull_request = pr_ref.number,
                timeout_secs = state.event_timeout.as_secs(),
                "Timed out processing pull request"
            );
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn process_pull_request_event(
    state: &AppState,
    installation_id: u64,
    event: &PullRequestEvent,
) -> Result<EventOutcome, ServerError> {
    let pr = &event.pull_request;
    let client = authenticate_with_access_token(&state.octocrab, installation_id, &pr.owner, &pr.repo)
        .await
        .map_err(|e| {
            error!(
                repository_owner = pr.owner.as_str(),
                repository = pr.repo.as_str(),
                pull_request = pr.number,
                error = e.to_string(),
                "Failed to authenticate with GitHub"
            );
            ServerError::AuthError(e.to_string())
        })?;

    let bot = HoldBot::with_policy(GitHubProvider::new(client), state.policy.clone())?;
    Ok(bot.handle_pull_request(event).await?)
}

/// Checks the `X-Hub-Signature-256` header against the HMAC-SHA256 of `body`.
#[instrument(skip(secret, body))]
pub fn verify_github_signature(secret: &str, headers: &HeaderMap, body: &[u8]) -> bool {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let Some(expected) = signature
        .strip_prefix("sha256=")
        .and_then(|hex_signature| hex::decode(hex_signature).ok())
    else {
        debug!(github_signature = signature, "Signature is not a sha256 hex digest");
        return false;
    };

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}
