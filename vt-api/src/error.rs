//! HTTP error mapping for vt-api
//!
//! Wraps the common error taxonomy and maps it onto status codes:
//! unauthenticated → 401, invalid input → 400, not found → 404, storage and
//! classifier failures → 500. Empty-but-successful results never pass
//! through here; they are 200 with empty collections.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};
use vt_common::Error;

/// Handler result type
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Error wrapper carrying the HTTP mapping
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Classification(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status, self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
