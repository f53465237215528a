//! Event types for the VitalTrace push channel

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outliers::Method;

/// VitalTrace event types
///
/// Broadcast over the SSE channel to connected clients. Ingestion and
/// classification both report here; subscribers filter by the `email`
/// field for per-user views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VtEvent {
    /// Ingestion batch progress update
    IngestProgress {
        batch_id: Uuid,
        email: String,
        percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Ingestion batch fully written
    IngestCompleted {
        batch_id: Uuid,
        email: String,
        inserted: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A classification run committed
    RunCompleted {
        email: String,
        metric: String,
        run_number: i64,
        method: Method,
        flagged: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VtEvent {
    /// Event name for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            VtEvent::IngestProgress { .. } => "IngestProgress",
            VtEvent::IngestCompleted { .. } => "IngestCompleted",
            VtEvent::RunCompleted { .. } => "RunCompleted",
        }
    }
}
