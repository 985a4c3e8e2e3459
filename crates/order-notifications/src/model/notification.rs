use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification pushed to every connected stream subscriber.
///
/// Serialized as `{"message": "...", "occurredAt": "2026-01-01T00:00:00Z"}`;
/// this JSON is the payload of each `new-order` stream event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl NotificationEvent {
    /// Creates an event stamped with the current UTC time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}
