//! Classification run and iteration ledger tests

mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use futures::future::join_all;
use helpers::{at, insert_sample, send, test_state};
use vt_api::db::runs;
use vt_api::service::series;
use vt_common::events::VtEvent;
use vt_common::outliers::Method;
use vt_common::MetricKind;

const USER: &str = "alice@example.org";

/// Pulse series where only the last point breaks the IQR fence
const IQR_VALUES: [&str; 10] = ["10", "12", "12", "13", "12", "11", "14", "13", "15", "102"];

async fn seed_iqr_series(state: &vt_api::AppState) -> Vec<i64> {
    let mut ids = Vec::new();
    for (i, value) in IQR_VALUES.iter().enumerate() {
        let id = insert_sample(
            &state.db,
            USER,
            "PULSE",
            at(1000 + 60 * i as i64),
            value,
        )
        .await;
        ids.push(id);
    }
    ids
}

#[tokio::test]
async fn classify_flags_iqr_extreme_end_to_end() {
    let (state, _dir) = test_state().await;
    seed_iqr_series(&state).await;

    let (status, body) = send(&state, "POST", "/api/v1/classify/PULSE", Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run_number"].as_i64(), Some(1));
    assert_eq!(body["flagged"].as_u64(), Some(1));
    assert_eq!(body["method"].as_str(), Some("IQR_FENCE"));

    let (status, body) = send(
        &state,
        "GET",
        "/api/v1/series/PULSE/outliers",
        Some(USER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The y=102 point sits at x = 1000 + 60*9
    let outliers_x: Vec<f64> = body["outliers_x"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(outliers_x, vec![1540.0]);

    // Flag/series consistency: every outlier x appears in the series
    let data_x: Vec<f64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["x"].as_f64().unwrap())
        .collect();
    for x in &outliers_x {
        assert!(data_x.contains(x));
    }
}

#[tokio::test]
async fn zscore_method_is_applied_and_recorded() {
    let (state, _dir) = test_state().await;
    for (i, value) in ["50", "52", "49", "51", "50", "300"].iter().enumerate() {
        insert_sample(&state.db, USER, "PULSE", at(1000 + i as i64), value).await;
    }

    let body = serde_json::json!({"method": "Z_SCORE"});
    let (status, response) = send(
        &state,
        "POST",
        "/api/v1/classify/PULSE",
        Some(USER),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["flagged"].as_u64(), Some(1));
    assert_eq!(response["method"].as_str(), Some("Z_SCORE"));

    let recorded = runs::method_for_run(&state.db, USER, MetricKind::Pulse, 1)
        .await
        .unwrap();
    assert_eq!(recorded, Some(Method::ZScore));
}

#[tokio::test]
async fn only_latest_run_is_visible() {
    let (state, _dir) = test_state().await;
    let a = insert_sample(&state.db, USER, "PULSE", at(1000), "70").await;
    let b = insert_sample(&state.db, USER, "PULSE", at(2000), "71").await;

    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[a], Utc::now())
        .await
        .unwrap();
    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[b], Utc::now())
        .await
        .unwrap();

    let view = series::series_with_outliers(&state.db, USER, MetricKind::Pulse)
        .await
        .unwrap();
    assert_eq!(view.outliers_x, vec![2000.0]);
}

#[tokio::test]
async fn all_clear_run_supersedes_previous_flags() {
    let (state, _dir) = test_state().await;
    let a = insert_sample(&state.db, USER, "PULSE", at(1000), "70").await;

    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[a], Utc::now())
        .await
        .unwrap();
    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[], Utc::now())
        .await
        .unwrap();

    let view = series::series_with_outliers(&state.db, USER, MetricKind::Pulse)
        .await
        .unwrap();
    assert!(view.outliers_x.is_empty());
    assert_eq!(
        runs::latest_run(&state.db, USER, MetricKind::Pulse).await.unwrap(),
        Some(2)
    );
}

#[tokio::test]
async fn flagged_but_unparseable_sample_is_absent_from_both_sets() {
    let (state, _dir) = test_state().await;
    let good = insert_sample(&state.db, USER, "PULSE", at(1000), "70").await;
    let bad = insert_sample(&state.db, USER, "PULSE", at(2000), "garbage").await;

    // A historical run that flagged the now-unparseable sample
    runs::commit_run(
        &state.db,
        USER,
        MetricKind::Pulse,
        Method::IqrFence,
        &[good, bad],
        Utc::now(),
    )
    .await
    .unwrap();

    let view = series::series_with_outliers(&state.db, USER, MetricKind::Pulse)
        .await
        .unwrap();
    assert_eq!(view.data.len(), 1);
    assert_eq!(view.outliers_x, vec![1000.0]);
}

#[tokio::test]
async fn concurrent_commits_allocate_distinct_consecutive_runs() {
    let (state, _dir) = test_state().await;
    insert_sample(&state.db, USER, "PULSE", at(1000), "70").await;

    const N: usize = 8;
    let tasks: Vec<_> = (0..N)
        .map(|_| {
            let db = state.db.clone();
            tokio::spawn(async move {
                runs::commit_run(&db, USER, MetricKind::Pulse, Method::IqrFence, &[], Utc::now())
                    .await
            })
        })
        .collect();

    let mut numbers: Vec<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("commit failed"))
        .collect();
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=N as i64).collect::<Vec<_>>());
    assert_eq!(
        runs::latest_run(&state.db, USER, MetricKind::Pulse).await.unwrap(),
        Some(N as i64)
    );
}

#[tokio::test]
async fn run_counters_are_scoped_per_metric() {
    let (state, _dir) = test_state().await;

    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[], Utc::now())
        .await
        .unwrap();
    runs::commit_run(&state.db, USER, MetricKind::Pulse, Method::IqrFence, &[], Utc::now())
        .await
        .unwrap();
    let steps_run =
        runs::commit_run(&state.db, USER, MetricKind::Steps, Method::IqrFence, &[], Utc::now())
            .await
            .unwrap();

    // An independent counter, not a continuation of the pulse scope
    assert_eq!(steps_run, 1);
    assert_eq!(
        runs::latest_run(&state.db, USER, MetricKind::Pulse).await.unwrap(),
        Some(2)
    );
}

#[tokio::test]
async fn failed_commit_leaves_no_partial_rows() {
    let (state, _dir) = test_state().await;
    let good = insert_sample(&state.db, USER, "PULSE", at(1000), "70").await;

    // Second flag violates the samples foreign key, failing the transaction
    let result = runs::commit_run(
        &state.db,
        USER,
        MetricKind::Pulse,
        Method::IqrFence,
        &[good, 999_999],
        Utc::now(),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(
        runs::latest_run(&state.db, USER, MetricKind::Pulse).await.unwrap(),
        None
    );
    let view = series::series_with_outliers(&state.db, USER, MetricKind::Pulse)
        .await
        .unwrap();
    assert!(view.outliers_x.is_empty());
}

#[tokio::test]
async fn classification_publishes_run_completed_event() {
    let (state, _dir) = test_state().await;
    seed_iqr_series(&state).await;
    let mut rx = state.subscribe_events();

    let (status, _) = send(&state, "POST", "/api/v1/classify/PULSE", Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);

    match rx.recv().await.expect("event") {
        VtEvent::RunCompleted {
            email,
            metric,
            run_number,
            flagged,
            ..
        } => {
            assert_eq!(email, USER);
            assert_eq!(metric, "PULSE");
            assert_eq!(run_number, 1);
            assert_eq!(flagged, 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
