//! Database initialization
//!
//! Schema creation is idempotent (`CREATE TABLE IF NOT EXISTS`) and runs at
//! every startup. The pool is an explicit handle constructed here and passed
//! into application state; no global connection singletons.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod models;

/// Initialize a file-backed database: connect, apply pragmas, create schema
///
/// Connect options apply to every pooled connection: foreign keys are off
/// by default in SQLite, WAL allows concurrent readers with one writer, and
/// the busy timeout makes writers queue on the lock instead of failing.
/// Run-number allocation relies on that under concurrent classification
/// requests.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes on an existing pool
///
/// Idempotent; split from [`init_database`] so tests can run the same
/// schema against their own pools.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_samples_table(pool).await?;
    create_outlier_runs_table(pool).await?;
    create_outlier_flags_table(pool).await?;
    create_predictions_table(pool).await?;
    create_ratings_table(pool).await?;

    Ok(())
}

/// Raw time-series samples, append-only
async fn create_samples_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS samples (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            metric TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_samples_scope
         ON samples (email, metric, recorded_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One row per classification run; the method used is recorded, never guessed
async fn create_outlier_runs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS outlier_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            metric TEXT NOT NULL,
            run_number INTEGER NOT NULL,
            method TEXT NOT NULL,
            run_at TEXT NOT NULL,
            UNIQUE (email, metric, run_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One row per (sample, run) classified anomalous; historical runs retained
async fn create_outlier_flags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS outlier_flags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sample_id INTEGER NOT NULL REFERENCES samples(id),
            run_number INTEGER NOT NULL,
            run_at TEXT NOT NULL,
            UNIQUE (sample_id, run_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_outlier_flags_run
         ON outlier_flags (run_number)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// ML predictions written by the external predictor; read-only here
async fn create_predictions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            diagnosis TEXT NOT NULL,
            result TEXT NOT NULL,
            run_number INTEGER NOT NULL,
            run_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_predictions_email
         ON predictions (email, run_number)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// User feedback score, one row per user
async fn create_ratings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            value REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
