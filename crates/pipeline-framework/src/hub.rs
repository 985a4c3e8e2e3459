//! # Broadcast Hub
//!
//! A publish/subscribe registry: one producer, any number of independent
//! subscribers, each with its own unbounded buffer.
//!
//! Every published item is cloned into every registered buffer, so subscribers
//! never compete for items and a slow subscriber never causes another one to
//! miss anything. A subscriber only sees items published after it registered.
//!
//! ```rust
//! use pipeline_framework::BroadcastHub;
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = BroadcastHub::new();
//!     let mut first = hub.subscribe();
//!     let mut second = hub.subscribe();
//!
//!     assert_eq!(hub.publish("hello"), 2);
//!     assert_eq!(first.recv().await, Some("hello"));
//!     assert_eq!(second.recv().await, Some("hello"));
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

/// Identifier handed to each subscription, unique per hub.
pub type SubscriberId = u64;

struct Registry<T> {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::UnboundedSender<T>>>,
    next_id: AtomicU64,
    // Only written and read while `subscribers` is locked.
    closed: AtomicBool,
}

impl<T> Registry<T> {
    // Critical sections never panic, so a poisoned lock still holds a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::UnboundedSender<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared handle to the registry. Cloning is cheap and every clone publishes
/// into the same set of subscribers.
pub struct BroadcastHub<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for BroadcastHub<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T> Default for BroadcastHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BroadcastHub<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                subscribers: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Registers a fresh buffer and returns the subscription reading from it.
    ///
    /// On a closed hub nothing is registered and the subscription ends at once.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let size = {
            let mut subscribers = self.registry.lock();
            if self.registry.closed.load(Ordering::Relaxed) {
                None
            } else {
                subscribers.insert(id, sender);
                Some(subscribers.len())
            }
        };
        match size {
            Some(size) => debug!(subscriber_id = id, size, "Subscriber registered"),
            None => debug!(subscriber_id = id, "Hub closed, subscription ends immediately"),
        }

        Subscription {
            id,
            receiver,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Number of subscriptions currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Drops every buffer. Open subscriptions drain what they already hold and
    /// then end; later subscriptions end immediately.
    pub fn close(&self) {
        let removed = {
            let mut subscribers = self.registry.lock();
            self.registry.closed.store(true, Ordering::Relaxed);
            let removed = subscribers.len();
            subscribers.clear();
            removed
        };
        debug!(removed, "Hub closed");
    }
}

impl<T: Clone> BroadcastHub<T> {
    /// Delivers a copy of `item` to every registered subscriber.
    ///
    /// Never blocks. Buffers whose subscription is already gone are pruned.
    /// Returns the number of subscribers that received the item; with zero
    /// subscribers the item is dropped.
    pub fn publish(&self, item: T) -> usize {
        let mut subscribers = self.registry.lock();
        let mut delivered = 0;
        subscribers.retain(|id, sender| match sender.send(item.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => {
                debug!(subscriber_id = *id, "Pruning closed subscriber");
                false
            }
        });
        delivered
    }
}

/// One subscriber's private view of the hub.
///
/// Dropping the subscription removes its buffer from the registry.
pub struct Subscription<T> {
    id: SubscriberId,
    receiver: mpsc::UnboundedReceiver<T>,
    registry: std::sync::Weak<Registry<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next item. Returns `None` once the hub has been closed or
    /// dropped and the buffer is drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Non-blocking read of an already buffered item.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let size = {
                let mut subscribers = registry.lock();
                subscribers.remove(&self.id);
                subscribers.len()
            };
            debug!(subscriber_id = self.id, size, "Subscriber removed");
        }
    }
}
