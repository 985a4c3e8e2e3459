//! # Notification Stream Publisher
//!
//! Exposes the notification hub to streaming clients.
//!
//! Each call to [`NotificationPublisher::subscribe`] opens a fresh
//! subscription, so every client sees every event published while it is
//! connected (broadcast), in publication order, and nothing from before it
//! connected. A reconnecting client simply subscribes again.
//!
//! ## Ending a stream
//!
//! | Cause | Stream | [`serve_client`] result |
//! |-------|--------|-------------------------|
//! | Client cancellation token fires | ends, no error | `Ok(StreamEnd::ClientDisconnected)` |
//! | Hub closed at shutdown | ends after draining | `Ok(StreamEnd::PipelineStopped)` |
//! | Write to the client fails | dropped | `Err(PublishError::Write)` |
//!
//! In every case the subscription is removed from the hub when the stream is
//! dropped.
//!
//! ## Usage
//!
//! ```rust
//! use futures_util::StreamExt;
//! use order_notifications::model::NotificationEvent;
//! use order_notifications::publisher::NotificationPublisher;
//! use pipeline_framework::BroadcastHub;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = BroadcastHub::new();
//!     let publisher = NotificationPublisher::new(hub.clone());
//!     let disconnect = CancellationToken::new();
//!     let mut events = publisher.subscribe(disconnect.clone());
//!
//!     hub.publish(NotificationEvent::now("hello"));
//!     assert_eq!(events.next().await.unwrap().message, "hello");
//!
//!     disconnect.cancel();
//!     assert!(events.next().await.is_none());
//! }
//! ```

pub mod error;
pub mod sse;

pub use error::*;
pub use sse::*;

use crate::model::NotificationEvent;
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use pipeline_framework::BroadcastHub;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Lazy, per-client sequence of notifications.
pub type NotificationStream = Pin<Box<dyn Stream<Item = NotificationEvent> + Send>>;

/// Why a client's stream ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The client went away (its cancellation token fired).
    ClientDisconnected,
    /// The pipeline shut down and closed the hub.
    PipelineStopped,
}

/// Hands out notification streams to connected clients.
#[derive(Clone)]
pub struct NotificationPublisher {
    hub: BroadcastHub<NotificationEvent>,
}

impl NotificationPublisher {
    pub fn new(hub: BroadcastHub<NotificationEvent>) -> Self {
        Self { hub }
    }

    /// Opens a new subscription and returns it as a stream.
    ///
    /// The subscription is registered immediately, before the stream is first
    /// polled. The stream ends when `cancel` fires or the hub is closed.
    pub fn subscribe(&self, cancel: CancellationToken) -> NotificationStream {
        let mut subscription = self.hub.subscribe();
        let subscriber_id = subscription.id();
        info!(subscriber_id, "Client connected");

        Box::pin(stream! {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!(subscriber_id, "Connection lost");
                        break;
                    }
                    next = subscription.recv() => next,
                };

                let Some(event) = next else {
                    info!(subscriber_id, "Notification hub closed");
                    break;
                };
                yield event;
            }
        })
    }

    /// Clients currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }
}

/// Streams `new-order` frames from `events` to `writer` until the client
/// disconnects or the pipeline stops.
///
/// `events` should come from [`NotificationPublisher::subscribe`] with the same
/// `cancel` token, opened before the serving task is spawned so no event
/// published in between is missed.
///
/// A failed write ends only this client. Cancellation is observed while
/// waiting for events and while a write is in flight.
#[instrument(skip_all)]
pub async fn serve_client<W>(
    mut events: NotificationStream,
    writer: &mut W,
    cancel: CancellationToken,
) -> Result<StreamEnd, PublishError>
where
    W: AsyncWrite + Unpin,
{
    let mut sent = 0u64;

    while let Some(event) = events.next().await {
        let frame = SseFrame::from_event(&event)?.to_string();

        let written = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            written = write_frame(writer, frame.as_bytes()) => written,
        };
        if let Err(e) = written {
            warn!(error = %e, sent, "Delivery failed, dropping client");
            return Err(PublishError::Write(e));
        }
        sent += 1;
        debug!(sent, "Frame delivered");
    }

    let end = if cancel.is_cancelled() {
        StreamEnd::ClientDisconnected
    } else {
        StreamEnd::PipelineStopped
    };
    info!(?end, sent, "Stream finished");
    Ok(end)
}

async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await
}
