//! Wire envelope for ingestion events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One telemetry event in the ingestion batch payload.
///
/// The envelope is deliberately generic: the backend-specific payload lives
/// in `body` as raw JSON, while the envelope carries identity, kind, and
/// submission time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestionEvent {
    /// Unique event id, used by backends for deduplication
    pub id: Uuid,

    /// Event kind, e.g. `"trace-create"` or `"span-update"`
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event was created on the client
    pub timestamp: DateTime<Utc>,

    /// Backend-specific payload
    pub body: serde_json::Value,
}

impl IngestionEvent {
    /// Create an event stamped with a fresh id and the current time
    #[must_use]
    pub fn new(event_type: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            body,
        }
    }
}
