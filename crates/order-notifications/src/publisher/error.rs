//! Error types for stream delivery.

use thiserror::Error;

/// Errors that end one client's stream. Other clients are unaffected.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event could not be serialized.
    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to the client failed, usually because it went away.
    #[error("Failed to write to client: {0}")]
    Write(#[from] std::io::Error),
}
