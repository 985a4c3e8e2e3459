//! # Order Intake
//!
//! The boundary between request handling and the pipeline. Everything that
//! enters the Order Queue passes through [`OrderService`], which validates the
//! request and hands it off without waiting for processing.
//!
//! ```rust
//! use order_notifications::intake::OrderService;
//! use order_notifications::model::{AddOrderRequest, OrderLineDto};
//! use pipeline_framework::WorkQueue;
//!
//! let (queue, _receiver) = WorkQueue::unbounded();
//! let service = OrderService::new(queue);
//!
//! let request = AddOrderRequest {
//!     products: vec![OrderLineDto { name: "Widget".into(), price: "9.99".parse().unwrap(), quantity: 2 }],
//! };
//! let receipt = service.create_order(request).unwrap();
//! assert_eq!(receipt.pending, 1);
//! ```

pub mod error;

pub use error::*;

use crate::model::{AddOrderRequest, OrderCommand};
use chrono::{DateTime, Utc};
use pipeline_framework::QueueSender;
use tracing::{debug, info, instrument, warn};

/// Acknowledgement that an order has been queued.
///
/// Says nothing about downstream processing; notifications follow
/// asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderReceipt {
    pub accepted_at: DateTime<Utc>,
    /// Orders waiting for the processor, this one included.
    pub pending: usize,
}

/// Validates incoming orders and enqueues them for the processor.
#[derive(Clone)]
pub struct OrderService {
    queue: QueueSender<OrderCommand>,
}

impl OrderService {
    pub fn new(queue: QueueSender<OrderCommand>) -> Self {
        Self { queue }
    }

    /// Validates `request` and queues it.
    ///
    /// Invalid requests are rejected here and never reach the processor.
    #[instrument(skip(self, request), fields(lines = request.products.len()))]
    pub fn create_order(&self, request: AddOrderRequest) -> Result<OrderReceipt, OrderError> {
        debug!(?request, "create_order called");
        let command = OrderCommand::try_from(request).inspect_err(|e| {
            warn!(error = %e, "Order rejected");
        })?;
        self.submit(command)
    }

    /// Queues an already validated command.
    pub fn submit(&self, command: OrderCommand) -> Result<OrderReceipt, OrderError> {
        let lines = command.lines().len();
        self.queue.enqueue(command).map_err(|e| {
            warn!(error = %e, "Order dropped, processor stopped");
            OrderError::PipelineClosed
        })?;

        let receipt = OrderReceipt {
            accepted_at: Utc::now(),
            pending: self.queue.len(),
        };
        info!(lines, pending = receipt.pending, "Order accepted");
        Ok(receipt)
    }

    /// Orders waiting for the processor.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderLineDto;
    use pipeline_framework::WorkQueue;
    use tokio_util::sync::CancellationToken;

    fn line(name: &str, price: &str, quantity: i64) -> OrderLineDto {
        OrderLineDto {
            name: name.into(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_valid_order_is_enqueued() {
        let (queue, mut receiver) = WorkQueue::unbounded();
        let service = OrderService::new(queue);

        let request = AddOrderRequest {
            products: vec![line("Widget", "9.99", 2), line("Gadget", "1", 1)],
        };
        let receipt = service.create_order(request).unwrap();
        assert_eq!(receipt.pending, 1);

        let command = receiver.dequeue(&CancellationToken::new()).await.unwrap();
        assert_eq!(command.lines().len(), 2);
        assert_eq!(command.lines()[0].name(), "Widget");
    }

    #[test]
    fn test_invalid_order_never_reaches_queue() {
        let (queue, receiver) = WorkQueue::unbounded();
        let service = OrderService::new(queue);

        let empty = AddOrderRequest { products: vec![] };
        assert_eq!(service.create_order(empty), Err(OrderError::EmptyOrder));

        let bad_name = AddOrderRequest {
            products: vec![line("Widget", "1", 1), line("ab", "1", 1)],
        };
        assert!(matches!(
            service.create_order(bad_name),
            Err(OrderError::InvalidLine { index: 1, .. })
        ));

        let bad_price = AddOrderRequest {
            products: vec![line("Widget", "0", 1)],
        };
        assert!(matches!(
            service.create_order(bad_price),
            Err(OrderError::InvalidLine { index: 0, .. })
        ));

        assert!(receiver.is_empty());
        assert_eq!(service.pending(), 0);
    }

    #[test]
    fn test_submit_after_processor_stopped() {
        let (queue, receiver) = WorkQueue::unbounded();
        let service = OrderService::new(queue);
        drop(receiver);

        let request = AddOrderRequest {
            products: vec![line("Widget", "1", 1)],
        };
        assert_eq!(
            service.create_order(request),
            Err(OrderError::PipelineClosed)
        );
    }
}
