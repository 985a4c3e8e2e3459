//! Event-stream framing.
//!
//! Every notification goes out as one server-sent event:
//!
//! ```text
//! event: new-order
//! data: {"message":"New order, Summary: Widget x 2, at 9.99","occurredAt":"2026-01-02T03:04:05Z"}
//!
//! ```
//!
//! Clients depend on this exact shape.

use crate::model::NotificationEvent;
use std::fmt;

/// Event-type tag carried by every notification frame.
pub const NEW_ORDER_EVENT: &str = "new-order";

/// A single encoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    event: &'static str,
    data: String,
}

impl SseFrame {
    /// Frames `event` as a `new-order` event with its JSON as payload.
    pub fn from_event(event: &NotificationEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event: NEW_ORDER_EVENT,
            data: serde_json::to_string(event)?,
        })
    }

    pub fn event(&self) -> &str {
        self.event
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for SseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "event: {}", self.event)?;
        // A payload line break must start a new `data:` field.
        for line in self.data.split('\n') {
            writeln!(f, "data: {line}")?;
        }
        writeln!(f)
    }
}
