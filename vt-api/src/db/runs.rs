//! Iteration ledger queries
//!
//! Run numbers count per `(email, metric)` scope. A commit is all-or-nothing:
//! the run row and every flag row land in one transaction, so a partially
//! flagged run is never observable and a failed commit leaves no trace.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use std::collections::HashSet;
use vt_common::outliers::Method;
use vt_common::{MetricKind, Result};

/// Commit a classification run, returning the allocated run number
///
/// The allocation INSERT..SELECT is the first write of the transaction:
/// SQLite serializes writers, so the MAX scan runs under the write lock and
/// concurrent commits for the same scope get distinct consecutive numbers.
/// The UNIQUE constraint on `(email, metric, run_number)` backstops the
/// allocation; a violation fails the whole transaction.
pub async fn commit_run(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
    method: Method,
    flagged_sample_ids: &[i64],
    run_at: DateTime<Utc>,
) -> Result<i64> {
    let mut tx = db.begin().await?;

    let run_number: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO outlier_runs (email, metric, run_number, method, run_at)
        SELECT ?, ?, COALESCE(MAX(run_number), 0) + 1, ?, ?
        FROM outlier_runs
        WHERE email = ? AND metric = ?
        RETURNING run_number
        "#,
    )
    .bind(email)
    .bind(metric.as_str())
    .bind(method.as_str())
    .bind(run_at)
    .bind(email)
    .bind(metric.as_str())
    .fetch_one(&mut *tx)
    .await?;

    for sample_id in flagged_sample_ids {
        sqlx::query(
            r#"
            INSERT INTO outlier_flags (sample_id, run_number, run_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(sample_id)
        .bind(run_number)
        .bind(run_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(run_number)
}

/// Highest committed run number for a scope, `None` if no run ever executed
pub async fn latest_run(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
) -> Result<Option<i64>> {
    let max: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT MAX(run_number)
        FROM outlier_runs
        WHERE email = ? AND metric = ?
        "#,
    )
    .bind(email)
    .bind(metric.as_str())
    .fetch_one(db)
    .await?;

    Ok(max)
}

/// Sample ids flagged in a specific run of a scope
pub async fn flags_for_run(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
    run_number: i64,
) -> Result<HashSet<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT f.sample_id
        FROM outlier_flags f
        JOIN samples s ON s.id = f.sample_id
        WHERE s.email = ? AND s.metric = ? AND f.run_number = ?
        "#,
    )
    .bind(email)
    .bind(metric.as_str())
    .bind(run_number)
    .fetch_all(db)
    .await?;

    Ok(ids.into_iter().collect())
}

/// Method recorded for a specific run, `None` if the run does not exist
pub async fn method_for_run(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
    run_number: i64,
) -> Result<Option<Method>> {
    let method: Option<String> = sqlx::query_scalar(
        r#"
        SELECT method
        FROM outlier_runs
        WHERE email = ? AND metric = ? AND run_number = ?
        "#,
    )
    .bind(email)
    .bind(metric.as_str())
    .bind(run_number)
    .fetch_optional(db)
    .await?;

    Ok(method.as_deref().and_then(Method::from_str))
}
