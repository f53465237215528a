//! vt-api - VitalTrace HTTP service
//!
//! Ingests health/fitness time series, classifies statistical outliers per
//! detection run, and serves versioned views of data, outliers and ML
//! predictions.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use vt_api::{build_router, AppState, AuthClient};
use vt_common::config::resolve_config;

#[derive(Parser, Debug)]
#[command(name = "vt-api", about = "VitalTrace health time-series API")]
struct Cli {
    /// Database file path (overrides env and config file)
    #[arg(long)]
    database: Option<String>,

    /// Bind port (overrides env and config file)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification immediately after tracing init, before any
    // database delays
    info!(
        "Starting VitalTrace API (vt-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = resolve_config(cli.database.as_deref(), cli.port)?;
    info!("Database path: {}", config.database_path.display());

    let pool = match vt_common::db::init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let auth = AuthClient::from_config(&config);
    if auth.is_dev_mode() {
        info!("Identity resolver not configured (development mode: X-User-Email header)");
    } else {
        info!("✓ Identity resolver configured");
    }

    let state = AppState::new(pool, auth, config.default_method);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("vt-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
