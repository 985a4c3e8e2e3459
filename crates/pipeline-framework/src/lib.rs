//! # Pipeline Framework
//!
//! Building blocks for in-process, two-stage producer/consumer pipelines on
//! Tokio:
//!
//! ```text
//! producers ──enqueue──▶ WorkQueue ──▶ Worker<S: Stage> ──publish──▶ BroadcastHub ──▶ subscribers
//! ```
//!
//! ## Architecture Overview
//!
//! 1. **Inbound** ([`WorkQueue`]) - unbounded, many producers, exactly one consumer
//! 2. **Processing** ([`Stage`] + [`Worker`]) - your per-item logic, and the
//!    cancellable loop that runs it
//! 3. **Outbound** ([`BroadcastHub`]) - every subscriber gets its own copy of
//!    every item published while it is subscribed
//!
//! You write the transformation **once** as a `Stage`; the framework owns the
//! loop, cancellation, fan-out and the per-item failure policy.
//!
//! ## Concurrency Model
//!
//! - The worker runs in its own Tokio task and handles items **sequentially**,
//!   so arrival order is processing order.
//! - Producers never wait: both queues are unbounded.
//! - Each subscriber reads from a private buffer; a slow or departed subscriber
//!   never holds up the worker or other subscribers.
//! - Cancellation is cooperative, via [`tokio_util::sync::CancellationToken`].
//!
//! ## Testing
//!
//! [`mock::MockStage`] scripts per-item success, error and panic outcomes so
//! the worker's failure policy can be exercised without a real stage.

pub mod error;
pub mod hub;
pub mod mock;
pub mod queue;
pub mod stage;
pub mod tracing;
pub mod worker;

// Re-export core types for convenience
pub use error::PipelineError;
pub use hub::{BroadcastHub, SubscriberId, Subscription};
pub use queue::{QueueReceiver, QueueSender, WorkQueue};
pub use stage::Stage;
pub use worker::{join_worker, Worker, WorkerReport};
