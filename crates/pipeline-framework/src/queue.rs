//! # Work Queue
//!
//! An unbounded, single-consumer asynchronous queue. It is the inbound half of a
//! pipeline: any number of producers hold a cloned [`QueueSender`], exactly one
//! task owns the [`QueueReceiver`].
//!
//! The single-reader discipline is enforced by ownership: `QueueReceiver` is not
//! `Clone`, so there is no way to hand a second reader the same buffer.

use crate::error::PipelineError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Constructor namespace for a sender/receiver pair.
pub struct WorkQueue;

impl WorkQueue {
    /// Creates a new unbounded queue.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// 1. The `QueueSender`, cheap to clone and share with every producer.
    /// 2. The `QueueReceiver`, to be moved into the single consumer task.
    pub fn unbounded<T>() -> (QueueSender<T>, QueueReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        (
            QueueSender {
                sender,
                pending: pending.clone(),
            },
            QueueReceiver { receiver, pending },
        )
    }
}

/// Producer handle. Enqueueing never waits for capacity.
pub struct QueueSender<T> {
    sender: mpsc::UnboundedSender<T>,
    pending: Arc<AtomicUsize>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            pending: self.pending.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// Hands `item` to the consumer.
    ///
    /// Returns immediately. The only failure is [`PipelineError::QueueClosed`],
    /// which means the consumer has already stopped.
    pub fn enqueue(&self, item: T) -> Result<(), PipelineError> {
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.sender.send(item).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::Relaxed);
            PipelineError::QueueClosed
        })
    }

    /// Number of items enqueued but not yet taken by the consumer.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer handle. There is exactly one per queue.
pub struct QueueReceiver<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    pending: Arc<AtomicUsize>,
}

impl<T> QueueReceiver<T> {
    /// Waits for the next item in FIFO order.
    ///
    /// Returns `None` when `cancel` fires or when every sender has been dropped
    /// and the buffer is empty. Cancellation wins over a ready item, so a
    /// stopping consumer does not pick up new work.
    pub async fn dequeue(&mut self, cancel: &CancellationToken) -> Option<T> {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = self.receiver.recv() => item,
        };
        if item.is_some() {
            self.pending.fetch_sub(1, Ordering::Relaxed);
        }
        item
    }

    /// Number of items waiting in the buffer.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
