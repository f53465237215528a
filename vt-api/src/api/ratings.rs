//! Rating collection endpoints

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::db;
use crate::error::ApiResult;
use crate::AppState;
use vt_common::Error;

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub rating: f64,
}

/// GET /api/v1/ratings/my
///
/// Current user's rating; 404 if they never rated.
pub async fn get_my_rating(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<RatingResponse>> {
    match db::ratings::rating_for(&state.db, &identity.email).await? {
        Some(rating) => Ok(Json(RatingResponse { rating })),
        None => Err(Error::NotFound("No rating recorded for user".to_string()).into()),
    }
}

/// POST /api/v1/ratings
///
/// Saves or updates the user's rating (1 to 5 inclusive).
pub async fn submit_rating(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<RatingRequest>,
) -> ApiResult<Json<RatingResponse>> {
    if !(1.0..=5.0).contains(&request.rating) {
        return Err(Error::InvalidInput(format!(
            "Rating must be between 1 and 5, got {}",
            request.rating
        ))
        .into());
    }

    db::ratings::upsert_rating(&state.db, &identity.email, request.rating).await?;
    Ok(Json(RatingResponse {
        rating: request.rating,
    }))
}
