//! Server configuration, read from the environment at startup.

use std::{env, fs, path::PathBuf, time::Duration};
use tracing::{debug, error};

use crate::errors::ServerError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

pub const APP_ID_KEY: &str = "DONOTSUBMIT_APP_ID";
pub const APP_PRIVATE_KEY_KEY: &str = "DONOTSUBMIT_APP_PRIVATE_KEY";
pub const APP_PRIVATE_KEY_PATH_KEY: &str = "DONOTSUBMIT_APP_PRIVATE_KEY_PATH";
pub const WEBHOOK_SECRET_KEY: &str = "DONOTSUBMIT_WEBHOOK_SECRET";
pub const PORT_KEY: &str = "DONOTSUBMIT_PORT";
pub const EVENT_TIMEOUT_KEY: &str = "DONOTSUBMIT_EVENT_TIMEOUT_SECS";
pub const POLICY_PATH_KEY: &str = "DONOTSUBMIT_POLICY_PATH";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EVENT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub app_id: u64,
    pub app_private_key: String,
    pub webhook_secret: String,
    pub port: u16,
    pub event_timeout: Duration,
    pub policy_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of a variable if it is
    /// set. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = required(&lookup, APP_ID_KEY)?;
        let app_id = app_id.trim().parse::<u64>().map_err(|e| {
            error!(
                error = e.to_string(),
                app_id = app_id.as_str(),
                "Failed to parse the app ID"
            );
            ServerError::ConfigError(format!("{} is not a number", APP_ID_KEY))
        })?;

        let app_private_key = match lookup(APP_PRIVATE_KEY_KEY) {
            Some(key) => key,
            None => {
                let path = required(&lookup, APP_PRIVATE_KEY_PATH_KEY).map_err(|_| {
                    ServerError::ConfigError(format!(
                        "Either {} or {} must be set",
                        APP_PRIVATE_KEY_KEY, APP_PRIVATE_KEY_PATH_KEY
                    ))
                })?;
                fs::read_to_string(&path).map_err(|e| {
                    error!(
                        error = e.to_string(),
                        path = path.as_str(),
                        "Failed to read the app private key"
                    );
                    ServerError::ConfigError(format!(
                        "Failed to read the app private key from '{}'",
                        path
                    ))
                })?
            }
        };

        let webhook_secret = required(&lookup, WEBHOOK_SECRET_KEY)?;

        let port = match lookup(PORT_KEY) {
            Some(val) => val.trim().parse::<u16>().map_err(|_| {
                ServerError::ConfigError(format!("{} is not a valid port: '{}'", PORT_KEY, val))
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup(EVENT_TIMEOUT_KEY) {
            Some(val) => match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ServerError::ConfigError(format!(
                        "{} must be a positive number of seconds: '{}'",
                        EVENT_TIMEOUT_KEY, val
                    )))
                }
            },
            None => DEFAULT_EVENT_TIMEOUT_SECS,
        };

        let config = ServerConfig {
            app_id,
            app_private_key,
            webhook_secret,
            port,
            event_timeout: Duration::from_secs(timeout_secs),
            policy_path: lookup(POLICY_PATH_KEY).map(PathBuf::from),
        };

        debug!(
            app_id = config.app_id,
            port = config.port,
            event_timeout_secs = timeout_secs,
            policy_path = ?config.policy_path,
            "Loaded the server configuration"
        );

        Ok(config)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ServerError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| {
        error!(key, "Required environment variable is not set");
        ServerError::ConfigError(format!("{} is not set", key))
    })
}
