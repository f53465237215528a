//! vt-api library - VitalTrace HTTP service
//!
//! Serves time-series health samples, per-run outlier views, ML prediction
//! read-out, ingestion, ratings and an SSE push channel.

use axum::Router;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use vt_common::events::VtEvent;
use vt_common::outliers::Method;

pub mod api;
pub mod auth;
pub mod db;
pub mod error;
pub mod service;

pub use auth::{AuthClient, Identity};

/// Capacity of the event broadcast channel; laggards drop events rather
/// than block writers
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Identity resolver client
    pub auth: AuthClient,
    /// Push-channel broadcast sender
    pub events: broadcast::Sender<VtEvent>,
    /// Classification method used when a request does not name one
    pub default_method: Method,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, auth: AuthClient, default_method: Method) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            auth,
            events,
            default_method,
        }
    }

    /// Subscribe to the push channel
    pub fn subscribe_events(&self) -> broadcast::Receiver<VtEvent> {
        self.events.subscribe()
    }

    /// Broadcast an event, ignoring the no-subscribers case
    pub fn publish(&self, event: VtEvent) {
        let _ = self.events.send(event);
    }
}

/// Build application router
///
/// All /api/v1 routes require a resolved identity; /health is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;

    let protected = Router::new()
        .route("/api/v1/series/:metric", get(api::series::get_series))
        .route(
            "/api/v1/series/:metric/outliers",
            get(api::series::get_series_with_outliers),
        )
        .route("/api/v1/predictions", get(api::predictions::get_predictions))
        .route("/api/v1/classify/:metric", post(api::classify::run_classification))
        .route("/api/v1/samples", post(api::ingest::append_samples))
        .route("/api/v1/ratings/my", get(api::ratings::get_my_rating))
        .route("/api/v1/ratings", post(api::ratings::submit_rating))
        .route("/api/v1/events", get(api::sse::event_stream))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let public = Router::new().route("/health", get(api::health::health));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
