//! Prediction ledger queries
//!
//! Rows are written by the external predictor; this side only reads. The
//! prediction run counter is scoped per user, independent of the outlier
//! run counters.

use sqlx::{Pool, Sqlite};
use vt_common::db::models::Prediction;
use vt_common::Result;

/// Predictions of the user's latest run, ordered by diagnosis
///
/// A user with no predictions yet gets an empty vec, not an error.
pub async fn latest_predictions(db: &Pool<Sqlite>, email: &str) -> Result<Vec<Prediction>> {
    let rows = sqlx::query_as::<_, Prediction>(
        r#"
        SELECT id, email, diagnosis, result, run_number, run_at
        FROM predictions
        WHERE email = ?
          AND run_number = (SELECT MAX(run_number) FROM predictions WHERE email = ?)
        ORDER BY diagnosis
        "#,
    )
    .bind(email)
    .bind(email)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
