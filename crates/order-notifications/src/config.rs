//! # System Configuration
//!
//! Settings are read from the environment with fallbacks:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ORDERS_LOG_FORMAT` | `compact` | `compact` or `json` log lines |
//! | `ORDERS_LOG_FILTER` | `info` | filter used when `RUST_LOG` is unset |
//! | `ORDERS_SHUTDOWN_TIMEOUT_MS` | `5000` | how long shutdown waits for the processor |

use pipeline_framework::tracing::LogFormat;
use std::time::Duration;
use thiserror::Error;

pub const LOG_FORMAT_VAR: &str = "ORDERS_LOG_FORMAT";
pub const LOG_FILTER_VAR: &str = "ORDERS_LOG_FILTER";
pub const SHUTDOWN_TIMEOUT_VAR: &str = "ORDERS_SHUTDOWN_TIMEOUT_MS";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub log_format: LogFormat,
    pub log_filter: String,
    pub shutdown_timeout: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            log_filter: "info".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl SystemConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(LOG_FORMAT_VAR) {
            let parsed = value.parse::<LogFormat>();
            config.log_format = parsed.map_err(|reason| ConfigError::InvalidValue {
                key: LOG_FORMAT_VAR,
                value: value.clone(),
                reason,
            })?;
        }

        if let Some(value) = lookup(LOG_FILTER_VAR) {
            if !value.trim().is_empty() {
                config.log_filter = value;
            }
        }

        if let Some(value) = lookup(SHUTDOWN_TIMEOUT_VAR) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: SHUTDOWN_TIMEOUT_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            config.shutdown_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
