use crate::config::SystemConfig;
use crate::intake::OrderService;
use crate::model::NotificationEvent;
use crate::processor;
use crate::publisher::NotificationPublisher;
use pipeline_framework::{join_worker, BroadcastHub, PipelineError, WorkerReport};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The running order notification pipeline.
///
/// `NotificationSystem` is responsible for:
/// - **Lifecycle Management**: starting the order processor and stopping it
/// - **Dependency Wiring**: connecting intake, processor and publisher through
///   the Order Queue and the notification hub
///
/// # Example
///
/// ```ignore
/// let system = NotificationSystem::new();
///
/// let events = system.publisher.subscribe(client_disconnect_token);
/// system.orders.create_order(request)?;
///
/// // Stop the processor and end every open stream
/// let report = system.shutdown().await?;
/// ```
pub struct NotificationSystem {
    /// Intake boundary feeding the Order Queue
    pub orders: OrderService,

    /// Source of per-client notification streams
    pub publisher: NotificationPublisher,

    hub: BroadcastHub<NotificationEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<WorkerReport>,
    shutdown_timeout: Duration,
}

impl Default for NotificationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSystem {
    /// Starts the pipeline with default settings.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(&SystemConfig::default())
    }

    /// Starts the pipeline.
    ///
    /// This method:
    /// 1. Creates the notification hub
    /// 2. Creates the order processor and its queue
    /// 3. Spawns the processor in its own Tokio task, bound to a cancellation token
    pub fn with_config(config: &SystemConfig) -> Self {
        let hub = BroadcastHub::new();
        let (worker, queue) = processor::new(hub.clone());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(worker.run(cancel.clone()));
        info!("Order processor started");

        Self {
            orders: OrderService::new(queue),
            publisher: NotificationPublisher::new(hub.clone()),
            hub,
            cancel,
            handle,
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// Stops the pipeline.
    ///
    /// This method:
    /// 1. Cancels the processor; orders still queued are not processed
    /// 2. Closes the hub, which ends every open notification stream
    /// 3. Waits up to the configured timeout for the processor task
    ///
    /// # Returns
    ///
    /// - `Ok(report)` with the processor's counters on a clean stop
    /// - `Err(PipelineError::WorkerFailed)` if the processor task panicked
    /// - `Err(PipelineError::ShutdownTimeout)` if it did not stop in time
    pub async fn shutdown(self) -> Result<WorkerReport, PipelineError> {
        info!("Shutting down order pipeline...");

        self.cancel.cancel();
        self.hub.close();

        let report = match tokio::time::timeout(self.shutdown_timeout, join_worker(self.handle))
            .await
        {
            Ok(result) => result.inspect_err(|e| error!(error = %e, "Processor task failed"))?,
            Err(_) => {
                error!(timeout = ?self.shutdown_timeout, "Processor did not stop in time");
                return Err(PipelineError::ShutdownTimeout(self.shutdown_timeout));
            }
        };

        info!(?report, "Order pipeline stopped");
        Ok(report)
    }
}
