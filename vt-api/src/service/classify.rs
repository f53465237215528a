//! Classification run orchestration
//!
//! Read the scope's samples, coerce, classify, commit the result as the
//! next run, then announce it on the push channel. The commit is the only
//! write; everything before it is side-effect-free and abandonable.

use chrono::Utc;
use tracing::info;
use vt_common::events::VtEvent;
use vt_common::outliers::{self, Method};
use vt_common::{MetricKind, Result};

use crate::db;
use crate::service::series::coerced_points;
use crate::AppState;

/// Outcome of a committed classification run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_number: i64,
    pub flagged: usize,
    pub method: Method,
}

/// Run the classifier over a user's metric and commit a new run
pub async fn run_classification(
    state: &AppState,
    email: &str,
    metric: MetricKind,
    method: Option<Method>,
) -> Result<RunOutcome> {
    let method = method.unwrap_or(state.default_method);

    let samples = db::samples::samples_for(&state.db, email, metric).await?;
    let points = coerced_points(&samples);

    let values: Vec<f64> = points.iter().map(|(_, p)| p.y).collect();
    let flagged_ids: Vec<i64> = outliers::flagged_indices(&values, method)
        .into_iter()
        .map(|i| points[i].0)
        .collect();

    let run_at = Utc::now();
    let run_number =
        db::runs::commit_run(&state.db, email, metric, method, &flagged_ids, run_at).await?;

    info!(
        metric = metric.as_str(),
        run_number,
        flagged = flagged_ids.len(),
        method = method.as_str(),
        "Committed classification run"
    );

    state.publish(VtEvent::RunCompleted {
        email: email.to_string(),
        metric: metric.as_str().to_string(),
        run_number,
        method,
        flagged: flagged_ids.len(),
        timestamp: run_at,
    });

    Ok(RunOutcome {
        run_number,
        flagged: flagged_ids.len(),
        method,
    })
}
