//! # Stage Trait
//!
//! The `Stage` trait is the business-logic half of a pipeline worker. The
//! [`Worker`](crate::Worker) owns the loop, the cancellation and the error
//! policy; a stage only turns one input into one output.
//!
//! # Architecture Note
//! Associated types tie each stage to its input and output, so a worker built
//! for order commands cannot be fed anything else. The compiler rejects the
//! mismatch before it can happen at runtime.

use async_trait::async_trait;
use std::fmt::Debug;

/// A per-item transformation driven by a [`Worker`](crate::Worker).
#[async_trait]
pub trait Stage: Send + 'static {
    /// What the stage consumes from its queue.
    ///
    /// `Debug` is required so a failed item can be reported in the logs.
    type Input: Send + Sync + Debug + 'static;

    /// What the stage publishes downstream. Cloned once per subscriber.
    type Output: Clone + Send + Debug + 'static;

    /// The stage's error type. A failure costs one item, never the worker.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Derives the output for one item.
    ///
    /// The input is borrowed so the worker can still describe it if this call
    /// fails or panics.
    async fn process(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}
