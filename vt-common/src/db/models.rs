//! Database row models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One raw observation for a user and metric, immutable once written
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Sample {
    pub id: i64,
    pub email: String,
    pub metric: String,
    pub recorded_at: DateTime<Utc>,
    pub value: String,
}

/// One classification run over a `(email, metric)` scope
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OutlierRun {
    pub id: i64,
    pub email: String,
    pub metric: String,
    pub run_number: i64,
    pub method: String,
    pub run_at: DateTime<Utc>,
}

/// Membership record: the sample was classified anomalous in that run
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OutlierFlag {
    pub id: i64,
    pub sample_id: i64,
    pub run_number: i64,
    pub run_at: DateTime<Utc>,
}

/// Externally computed diagnostic prediction
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub email: String,
    pub diagnosis: String,
    pub result: String,
    pub run_number: i64,
    pub run_at: DateTime<Utc>,
}
