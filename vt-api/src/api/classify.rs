//! Classification trigger endpoint

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use vt_common::outliers::Method;

use crate::api::parse_metric;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::service::classify;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClassifyRequest {
    /// Method override; the configured default applies when absent
    pub method: Option<Method>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub run_number: i64,
    pub flagged: usize,
    pub method: Method,
}

/// POST /api/v1/classify/:metric
///
/// Runs the outlier classifier over the user's samples of the metric and
/// commits the result as a new run. Returns the allocated run number.
pub async fn run_classification(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(metric): Path<String>,
    body: Option<Json<ClassifyRequest>>,
) -> ApiResult<Json<ClassifyResponse>> {
    let metric = parse_metric(&metric)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let outcome =
        classify::run_classification(&state, &identity.email, metric, request.method).await?;

    Ok(Json(ClassifyResponse {
        run_number: outcome.run_number,
        flagged: outcome.flagged,
        method: outcome.method,
    }))
}
