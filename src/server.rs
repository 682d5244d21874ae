//! HTTP server initialization and runtime setup.
//!
//! Handles database setup, service wiring, cleanup worker spawning, and the
//! Axum server lifecycle including graceful shutdown.

use crate::application::services::{CodeGenerator, FixedWindowLimiter, ShortenService};
use crate::config::Config;
use crate::domain::cleanup_worker::run_cleanup_worker;
use crate::infrastructure::mnemonic::{HttpSlugSuggester, SlugSuggester};
use crate::infrastructure::persistence::SqliteUrlRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool (creating the database file if missing)
/// - Schema migrations
/// - Slug suggester (when mnemonic generation is enabled)
/// - Background cleanup worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the in-flight requests drain first, then the cleanup worker
/// is signalled and awaited.
pub async fn run(config: Config) -> Result<()> {
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(connect_options)
        .await
        .context("Failed to open database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let repository = Arc::new(SqliteUrlRepository::new(Arc::new(pool)));

    let suggester: Option<Arc<dyn SlugSuggester>> = if config.mnemonic_enabled {
        let endpoint = config
            .mnemonic_api_url
            .clone()
            .context("MNEMONIC_API_URL must be set")?;
        let api_key = config
            .mnemonic_api_key
            .clone()
            .context("MNEMONIC_API_KEY must be set")?;

        let suggester = HttpSlugSuggester::new(
            endpoint,
            api_key,
            Duration::from_secs(config.mnemonic_timeout_secs),
        )
        .map_err(|e| anyhow::anyhow!("Failed to build slug suggester: {e}"))?;

        tracing::info!("Mnemonic generation enabled");
        Some(Arc::new(suggester))
    } else {
        tracing::info!("Mnemonic generation disabled");
        None
    };

    let generator = CodeGenerator::new(suggester);
    let limiter = FixedWindowLimiter::new(
        chrono::Duration::seconds(config.rate_limit_cooldown_secs as i64),
        config.rate_limit_max_clients,
    );
    let shorten_service = Arc::new(ShortenService::new(repository.clone(), generator, limiter));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup_handle = tokio::spawn(run_cleanup_worker(
        repository.clone(),
        chrono::Duration::hours(config.retention_hours as i64),
        Duration::from_secs(config.cleanup_interval_secs),
        shutdown_rx,
    ));

    let state = AppState {
        shorten_service,
        repository,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // HTTP side is drained; stop the cleanup worker and let an in-flight
    // sweep finish.
    let _ = shutdown_tx.send(true);
    if let Err(e) = cleanup_handle.await {
        tracing::error!("Cleanup worker exited abnormally: {}", e);
    }

    Ok(())
}

/// Completes when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::warn!("Shutdown signal received, draining connections");
}
