//! Series read endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use vt_common::outliers::SeriesPoint;

use crate::api::parse_metric;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::service::series::{self, SeriesWithOutliers};
use crate::AppState;

/// Optional time window, UNIX seconds, both bounds inclusive
#[derive(Debug, Default, Deserialize)]
pub struct SeriesQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

fn bound(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| Utc.timestamp_opt(s, 0).single())
}

/// GET /api/v1/series/:metric
///
/// Returns the user's series as `[{x, y}, ...]`, X ascending. Unparseable
/// sample values are skipped; a user with no history gets an empty list.
/// `?from=` / `?to=` (UNIX seconds) restrict the window.
pub async fn get_series(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(metric): Path<String>,
    Query(query): Query<SeriesQuery>,
) -> ApiResult<Json<Vec<SeriesPoint>>> {
    let metric = parse_metric(&metric)?;
    let data = series::series(
        &state.db,
        &identity.email,
        metric,
        bound(query.from),
        bound(query.to),
    )
    .await?;
    Ok(Json(data))
}

/// GET /api/v1/series/:metric/outliers
///
/// Returns the series together with the X positions flagged by the latest
/// classification run. With no run yet, `outliers_x` is empty.
pub async fn get_series_with_outliers(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(metric): Path<String>,
) -> ApiResult<Json<SeriesWithOutliers>> {
    let metric = parse_metric(&metric)?;
    let result = series::series_with_outliers(&state.db, &identity.email, metric).await?;
    Ok(Json(result))
}
