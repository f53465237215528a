//! ML prediction read-out endpoint

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::auth::Identity;
use crate::db;
use crate::error::ApiResult;
use crate::AppState;

/// Client view of one prediction
#[derive(Debug, Serialize)]
pub struct PredictionView {
    pub diagnosis: String,
    pub result: String,
}

/// GET /api/v1/predictions
///
/// Returns the user's predictions from the latest prediction run, ordered
/// by diagnosis. A user with no predictions yet gets an empty list.
pub async fn get_predictions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<PredictionView>>> {
    let rows = db::predictions::latest_predictions(&state.db, &identity.email).await?;

    let views = rows
        .into_iter()
        .map(|p| PredictionView {
            diagnosis: p.diagnosis,
            result: p.result,
        })
        .collect();

    Ok(Json(views))
}
