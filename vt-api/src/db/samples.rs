//! Sample store queries
//!
//! Append-only landing point for ingestion, and the ordered per-scope read
//! every other component builds on. Duplicate timestamps are retained as
//! distinct samples; dedup is a consumer policy.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use vt_common::db::models::Sample;
use vt_common::{MetricKind, Result};

/// One sample to append, before it has an id
#[derive(Debug, Clone)]
pub struct NewSample {
    pub metric: MetricKind,
    pub recorded_at: DateTime<Utc>,
    pub value: String,
}

/// Append a batch of samples for one user, returning the inserted ids
pub async fn append_batch(
    db: &Pool<Sqlite>,
    email: &str,
    entries: &[NewSample],
) -> Result<Vec<i64>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(entries.len());

    for entry in entries {
        let result = sqlx::query(
            r#"
            INSERT INTO samples (email, metric, recorded_at, value)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(email)
        .bind(entry.metric.as_str())
        // Normalized to UTC so lexicographic text order is chronological
        .bind(entry.recorded_at.with_timezone(&Utc))
        .bind(&entry.value)
        .execute(&mut *tx)
        .await?;

        ids.push(result.last_insert_rowid());
    }

    tx.commit().await?;
    Ok(ids)
}

/// All samples for a `(user, metric)` scope, ascending by time
///
/// Ties on `recorded_at` break by insertion id, which fixes the total order
/// the X axis is built from.
pub async fn samples_for(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
) -> Result<Vec<Sample>> {
    samples_between(db, email, metric, None, None).await
}

/// Samples for a scope restricted to an optional time range, ascending
///
/// Bounds are inclusive; either side may be open.
pub async fn samples_between(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<Sample>> {
    let mut sql = String::from(
        "SELECT id, email, metric, recorded_at, value
         FROM samples
         WHERE email = ? AND metric = ?",
    );
    if from.is_some() {
        sql.push_str(" AND recorded_at >= ?");
    }
    if to.is_some() {
        sql.push_str(" AND recorded_at <= ?");
    }
    sql.push_str(" ORDER BY recorded_at, id");

    let mut query = sqlx::query_as::<_, Sample>(&sql)
        .bind(email)
        .bind(metric.as_str());
    if let Some(from) = from {
        query = query.bind(from);
    }
    if let Some(to) = to {
        query = query.bind(to);
    }

    Ok(query.fetch_all(db).await?)
}
