//! Health check endpoint

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

/// GET /health - Health check endpoint (no auth)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "vt-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
