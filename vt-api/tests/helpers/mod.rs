//! Shared test helpers: temp-file database, app state, request driver
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use vt_api::{build_router, AppState, AuthClient};
use vt_common::outliers::Method;

/// Fresh file-backed database + app state in development-mode auth
///
/// Keep the TempDir alive for the duration of the test; dropping it removes
/// the database file.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let pool = vt_common::db::init_database(&dir.path().join("vt_test.db"))
        .await
        .expect("init database");
    let state = AppState::new(pool, AuthClient::disabled(), Method::IqrFence);
    (state, dir)
}

/// Drive one request through the router, returning status + JSON body
pub async fn send(
    state: &AppState,
    method: &str,
    path: &str,
    email: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(email) = email {
        builder = builder.header("X-User-Email", email);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = build_router(state.clone())
        .oneshot(request)
        .await
        .expect("router response");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, value)
}

/// Timestamp helper: whole seconds since the epoch
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Insert one raw sample directly, returning its id
pub async fn insert_sample(
    pool: &SqlitePool,
    email: &str,
    metric: &str,
    recorded_at: DateTime<Utc>,
    value: &str,
) -> i64 {
    sqlx::query("INSERT INTO samples (email, metric, recorded_at, value) VALUES (?, ?, ?, ?)")
        .bind(email)
        .bind(metric)
        .bind(recorded_at)
        .bind(value)
        .execute(pool)
        .await
        .expect("insert sample")
        .last_insert_rowid()
}

/// Insert one prediction row, as the external predictor would
pub async fn insert_prediction(
    pool: &SqlitePool,
    email: &str,
    diagnosis: &str,
    result: &str,
    run_number: i64,
) {
    sqlx::query(
        "INSERT INTO predictions (email, diagnosis, result, run_number, run_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(diagnosis)
    .bind(result)
    .bind(run_number)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("insert prediction");
}

/// X values of a JSON series payload `[{x, y}, ...]`
pub fn xs(series: &Value) -> Vec<f64> {
    series
        .as_array()
        .expect("series array")
        .iter()
        .map(|p| p["x"].as_f64().expect("x value"))
        .collect()
}
