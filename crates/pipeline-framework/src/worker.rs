//! # Pipeline Worker
//!
//! This module defines the `Worker`, the long-running consumer that drains a
//! [`WorkQueue`](crate::WorkQueue), runs each item through a [`Stage`] and
//! publishes the result on a [`BroadcastHub`].
//!
//! ## Lifecycle
//!
//! `Running` until either the cancellation token fires or every queue sender is
//! dropped, then `Stopped`. Items still buffered at cancellation are not
//! drained.
//!
//! ## Failure policy
//!
//! The worker is the only consumer of its queue, so it must outlive any single
//! bad item. A stage error or a panic inside `process` is logged together with
//! the item that caused it, counted in the [`WorkerReport`], and the loop moves
//! on to the next item.

use crate::error::PipelineError;
use crate::hub::BroadcastHub;
use crate::queue::{QueueReceiver, QueueSender, WorkQueue};
use crate::stage::Stage;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Counters returned when a worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Items that produced an output.
    pub processed: u64,
    /// Items lost to a stage error or panic.
    pub failed: u64,
}

/// The single consumer of a work queue.
///
/// ```rust
/// use pipeline_framework::{BroadcastHub, Stage, Worker};
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
///
/// struct Upper;
///
/// #[async_trait]
/// impl Stage for Upper {
///     type Input = String;
///     type Output = String;
///     type Error = std::convert::Infallible;
///
///     async fn process(&mut self, input: &String) -> Result<String, Self::Error> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let hub = BroadcastHub::new();
///     let mut events = hub.subscribe();
///     let (worker, queue) = Worker::new(Upper, hub);
///     let cancel = CancellationToken::new();
///     let handle = tokio::spawn(worker.run(cancel.clone()));
///
///     queue.enqueue("hi".to_string()).unwrap();
///     assert_eq!(events.recv().await.as_deref(), Some("HI"));
///
///     cancel.cancel();
///     assert_eq!(handle.await.unwrap().processed, 1);
/// }
/// ```
pub struct Worker<S: Stage> {
    stage: S,
    receiver: QueueReceiver<S::Input>,
    output: BroadcastHub<S::Output>,
}

impl<S: Stage> Worker<S> {
    /// Creates a worker and the queue that feeds it.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// 1. The `Worker`, which must be driven via `.run()`.
    /// 2. The `QueueSender`, which can be cloned and shared with producers.
    pub fn new(stage: S, output: BroadcastHub<S::Output>) -> (Self, QueueSender<S::Input>) {
        let (sender, receiver) = WorkQueue::unbounded();
        let worker = Self {
            stage,
            receiver,
            output,
        };
        (worker, sender)
    }

    /// Runs the processing loop until `cancel` fires or the queue closes.
    pub async fn run(mut self, cancel: CancellationToken) -> WorkerReport {
        let stage = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(stage, "Worker started");

        let mut report = WorkerReport::default();

        while let Some(item) = self.receiver.dequeue(&cancel).await {
            let outcome = AssertUnwindSafe(self.stage.process(&item))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(output)) => {
                    report.processed += 1;
                    debug!(stage, ?output, "Processed");
                    let delivered = self.output.publish(output);
                    info!(stage, delivered, pending = self.receiver.len(), "Published");
                }
                Ok(Err(e)) => {
                    report.failed += 1;
                    error!(stage, ?item, error = %e, "Processing failed, item dropped");
                }
                Err(panic) => {
                    report.failed += 1;
                    let reason = panic_message(panic.as_ref());
                    error!(stage, ?item, reason, "Processing panicked, item dropped");
                }
            }
        }

        if cancel.is_cancelled() {
            info!(stage, ?report, pending = self.receiver.len(), "Worker stopped");
        } else {
            info!(stage, ?report, "Worker stopped, queue closed");
        }
        report
    }
}

/// Awaits a spawned worker, turning a task failure into a [`PipelineError`].
pub async fn join_worker(
    handle: tokio::task::JoinHandle<WorkerReport>,
) -> Result<WorkerReport, PipelineError> {
    handle
        .await
        .map_err(|e| PipelineError::WorkerFailed(e.to_string()))
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
