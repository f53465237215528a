//! Query façade over the sample store and the iteration ledger
//!
//! Coercion happens exactly once per request, and flags are mapped back to
//! X values through the same coerced set the series is built from: a
//! flagged sample whose value failed coercion is absent from both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use tracing::debug;
use vt_common::db::models::Sample;
use vt_common::outliers::SeriesPoint;
use vt_common::{MetricKind, Result, SampleValue};

use crate::db;

/// Series plus the latest run's outlier X positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesWithOutliers {
    pub data: Vec<SeriesPoint>,
    pub outliers_x: Vec<f64>,
}

/// Coerce raw samples into plottable points, keeping sample ids
///
/// Unparseable values are skipped, never defaulted; order is preserved.
pub fn coerced_points(samples: &[Sample]) -> Vec<(i64, SeriesPoint)> {
    samples
        .iter()
        .filter_map(|sample| match SampleValue::parse(&sample.value).as_y() {
            Some(y) => Some((
                sample.id,
                SeriesPoint {
                    x: sample.recorded_at.timestamp_millis() as f64 / 1000.0,
                    y,
                },
            )),
            None => {
                debug!(
                    sample_id = sample.id,
                    metric = %sample.metric,
                    "Skipping sample with unparseable value"
                );
                None
            }
        })
        .collect()
}

/// Ordered series of a user's samples for one metric
///
/// An optional inclusive time window restricts the read; both bounds open
/// means full history.
pub async fn series(
    db: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<SeriesPoint>> {
    let samples = db::samples::samples_between(db, email, metric, from, to).await?;
    Ok(coerced_points(&samples).into_iter().map(|(_, p)| p).collect())
}

/// Series plus the flags of the latest committed run
///
/// No run yet means an empty outlier set, not an error; same for a user
/// with zero samples.
pub async fn series_with_outliers(
    pool: &Pool<Sqlite>,
    email: &str,
    metric: MetricKind,
) -> Result<SeriesWithOutliers> {
    let samples = db::samples::samples_for(pool, email, metric).await?;
    let points = coerced_points(&samples);

    let outliers_x = match db::runs::latest_run(pool, email, metric).await? {
        None => Vec::new(),
        Some(run_number) => {
            let flagged = db::runs::flags_for_run(pool, email, metric, run_number).await?;
            points
                .iter()
                .filter(|(id, _)| flagged.contains(id))
                .map(|(_, p)| p.x)
                .collect()
        }
    };

    let data = points.into_iter().map(|(_, p)| p).collect();
    Ok(SeriesWithOutliers { data, outliers_x })
}
