//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber.
//!
//! ## Configuration
//!
//! - **Filter**: `RUST_LOG` when set, otherwise the default directive passed in
//!   by the caller (e.g. `info`).
//! - **Format**: [`LogFormat::Compact`] for development, [`LogFormat::Json`] for
//!   one JSON object per line in production log shippers.
//! - Module paths are hidden (`with_target(false)`); structured fields such as
//!   `stage` and `subscriber_id` carry the context instead.
//!
//! ```bash
//! RUST_LOG=info cargo run            # processor and connection lifecycle
//! RUST_LOG=debug cargo run           # full payloads, subscriber registration
//! ```
//!
//! ## What Gets Traced
//!
//! - **Worker lifecycle**: `Worker started`, `Worker stopped` with the final report
//! - **Per item**: `Published` with the number of subscribers reached
//! - **Failures**: `Processing failed, item dropped` with the offending item
//! - **Subscribers**: registration and removal (debug)

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Installs the global subscriber.
///
/// Uses `try_init`, so a second call (another test, an embedding host that
/// already set one up) is a no-op rather than a panic.
pub fn setup_tracing(format: LogFormat, default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false); // Don't show module paths - fields carry the context

    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parses_case_insensitively() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" Compact ".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("pretty".parse::<LogFormat>().is_err());
    }
}
