//! Sample ingestion endpoint
//!
//! Landing point for the ingestion transport: a batch of raw samples for
//! the authenticated user. Writes proceed in chunks with progress reported
//! on the push channel, so clients watching the SSE stream see the batch
//! advance.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use vt_common::events::VtEvent;

use crate::api::parse_metric;
use crate::auth::Identity;
use crate::db::samples::{self, NewSample};
use crate::error::ApiResult;
use crate::AppState;

/// Samples per write chunk; one progress event per chunk
const CHUNK_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct IngestSample {
    pub metric: String,
    pub recorded_at: DateTime<Utc>,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub batch_id: Uuid,
    pub inserted: usize,
}

/// POST /api/v1/samples
///
/// Appends a batch of samples for the current user. The whole batch is
/// validated against the metric catalog before any write; raw values are
/// stored as-is (coercion is a read-side concern).
pub async fn append_samples(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(batch): Json<Vec<IngestSample>>,
) -> ApiResult<Json<IngestResponse>> {
    let mut entries = Vec::with_capacity(batch.len());
    for sample in &batch {
        entries.push(NewSample {
            metric: parse_metric(&sample.metric)?,
            recorded_at: sample.recorded_at,
            value: sample.value.clone(),
        });
    }

    let batch_id = Uuid::new_v4();
    let total = entries.len();
    let mut inserted = 0usize;

    for chunk in entries.chunks(CHUNK_SIZE) {
        let ids = samples::append_batch(&state.db, &identity.email, chunk).await?;
        inserted += ids.len();

        let percent = if total == 0 {
            100
        } else {
            (inserted * 100 / total) as u8
        };
        state.publish(VtEvent::IngestProgress {
            batch_id,
            email: identity.email.clone(),
            percent,
            timestamp: Utc::now(),
        });
    }

    state.publish(VtEvent::IngestCompleted {
        batch_id,
        email: identity.email.clone(),
        inserted,
        timestamp: Utc::now(),
    });

    info!(batch_id = %batch_id, inserted, "Ingested sample batch");
    Ok(Json(IngestResponse { batch_id, inserted }))
}
