//! # Framework Errors
//!
//! This module defines the common error types used throughout the pipeline
//! framework. Domain crates wrap or map these into their own error enums.

use std::time::Duration;

/// Errors that can occur within the pipeline framework itself.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The consumer side of a queue is gone (the worker stopped).
    #[error("Queue closed")]
    QueueClosed,
    /// The worker task panicked or was aborted outside of item processing.
    #[error("Worker task failed: {0}")]
    WorkerFailed(String),
    /// The worker did not stop within the allotted shutdown window.
    #[error("Worker did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}
