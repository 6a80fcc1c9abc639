use donotsubmit_core::errors::HoldBotError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Webhook server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Telemetry could not be set up
    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    /// The pull request could not be processed
    #[error("Failed to process the pull request: {0}")]
    HoldBot(#[from] HoldBotError),

    /// The listener could not be bound or stopped unexpectedly
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
