use axum::{routing::get, Router};
use donotsubmit_core::config::{load_hold_policy, HoldPolicy};
use donotsubmit_developer_platforms::github::create_app_client;
use octocrab::Octocrab;
use std::{env, sync::Arc};
use tracing::{debug, error, info};

mod config;
use config::ServerConfig;

mod errors;
use errors::ServerError;

mod telemetry;

mod webhook;
use webhook::{handle_get_request, handle_post_request, AppState};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

pub const WEBHOOK_ROUTE: &str = "/api/donotsubmit";

async fn create_github_app(config: &ServerConfig) -> Result<Octocrab, ServerError> {
    info!(app_id = config.app_id, "Creating GitHub app client");

    let octocrab = create_app_client(config.app_id, &config.app_private_key)
        .await
        .map_err(|e| {
            ServerError::AuthError(format!(
                "Failed to load the GitHub provider. Error was: {}",
                e
            ))
        })?;
    debug!("GitHub App client created successfully");

    Ok(octocrab)
}

fn load_policy(config: &ServerConfig) -> Result<HoldPolicy, ServerError> {
    match &config.policy_path {
        Some(path) => Ok(load_hold_policy(path)?),
        None => {
            info!("No policy file configured. Using the default policy.");
            Ok(HoldPolicy::default())
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            WEBHOOK_ROUTE,
            get(handle_get_request).post(handle_post_request),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = e.to_string(), "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = e.to_string(), "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received CTRL+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let otlp_endpoint = telemetry::otlp_endpoint_from(|key| env::var(key).ok());
    let tracer_provider = telemetry::init_telemetry(otlp_endpoint.as_deref())?;

    info!("Starting application");

    let config = ServerConfig::from_env().inspect_err(|e| {
        error!(
            error = e.to_string(),
            "Failed to load the server configuration"
        )
    })?;

    let policy = load_policy(&config)?;
    let octocrab = create_github_app(&config).await?;

    let state = Arc::new(AppState {
        octocrab,
        webhook_secret: config.webhook_secret.clone(),
        policy,
        event_timeout: config.event_timeout,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;

    info!(address = addr.as_str(), "Listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            error!(error = e.to_string(), "Failed to flush the exported spans");
        }
    }

    Ok(())
}
