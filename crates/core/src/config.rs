//! Configuration settings for the hold bot.
//!
//! The policy can be supplied as a TOML file:
//!
//! ```toml
//! schema_version = 1
//!
//! [policy]
//! marker = "DO NOT SUBMIT"
//! hold_label = "do-not-merge/hold"
//! ```
//!
//! Every field is optional; missing fields fall back to the defaults below.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::HoldBotError;
use crate::marker::DO_NOT_SUBMIT_MARKER;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Label that signals "do not merge" to downstream merge automation
pub const HOLD_LABEL: &str = "do-not-merge/hold";

/// The only configuration schema version currently understood
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldBotConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub policy: HoldPolicy,
}

impl Default for HoldBotConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            policy: HoldPolicy::default(),
        }
    }
}

/// What to look for and which label to manage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldPolicy {
    /// Text that holds the pull request when found on an added line
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Label added while a marker is present and removed once it is gone
    #[serde(default = "default_hold_label")]
    pub hold_label: String,
}

impl HoldPolicy {
    /// Checks that the policy can be enforced.
    ///
    /// An empty marker would match every added line, and an empty label cannot be applied.
    pub fn validate(&self) -> Result<(), HoldBotError> {
        if self.marker.is_empty() {
            return Err(HoldBotError::ConfigError(
                "The marker must not be empty".to_string(),
            ));
        }

        if self.hold_label.trim().is_empty() {
            return Err(HoldBotError::ConfigError(
                "The hold label must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            hold_label: default_hold_label(),
        }
    }
}

fn default_hold_label() -> String {
    HOLD_LABEL.to_string()
}

fn default_marker() -> String {
    DO_NOT_SUBMIT_MARKER.to_string()
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Parses and validates a configuration from TOML text.
pub fn parse_hold_bot_config(content: &str) -> Result<HoldBotConfig, HoldBotError> {
    let config: HoldBotConfig = toml::from_str(content).map_err(|e| {
        HoldBotError::ConfigError(format!("Failed to parse configuration: {}", e))
    })?;

    if config.schema_version != SCHEMA_VERSION {
        return Err(HoldBotError::ConfigError(format!(
            "Unsupported schema version {}. Expected {}",
            config.schema_version, SCHEMA_VERSION
        )));
    }

    config.policy.validate()?;
    Ok(config)
}

/// Loads the hold policy from a TOML file.
pub fn load_hold_policy(path: &Path) -> Result<HoldPolicy, HoldBotError> {
    debug!("Loading configuration from {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| {
        HoldBotError::ConfigError(format!(
            "Failed to read configuration file {:?}: {}",
            path, e
        ))
    })?;

    let config = parse_hold_bot_config(&content)?;
    info!(
        marker = config.policy.marker.as_str(),
        hold_label = config.policy.hold_label.as_str(),
        "Loaded hold policy from {:?}",
        path
    );

    Ok(config.policy)
}
