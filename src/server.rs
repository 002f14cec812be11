//! HTTP server initialization and runtime setup.
//!
//! Handles the link store backend, click tracker, and Axum server lifecycle.

use crate::application::services::{AuthService, ClickTracker};
use crate::config::Config;
use crate::domain::click_event::FingerprintKey;
use crate::domain::click_sink::ClickSink;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::analytics::{NullSink, UmamiSink};
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Connects to PostgreSQL and applies embedded migrations.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match &config.database_url {
        Some(url) => {
            let pool = connect_database(config, url).await?;
            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        None => {
            tracing::warn!("No database configured, links are kept in memory only");
            Ok(Arc::new(InMemoryLinkRepository::new()))
        }
    }
}

fn build_sink(config: &Config) -> Result<Arc<dyn ClickSink>> {
    match config.umami_config() {
        Some(umami) => {
            let sink = UmamiSink::new(umami, config.tracking_timeout())
                .context("Failed to build Umami HTTP client")?;
            tracing::info!(endpoint = sink.endpoint(), "Click tracking enabled (Umami)");
            Ok(Arc::new(sink))
        }
        None => {
            tracing::info!("Click tracking disabled (NullSink)");
            Ok(Arc::new(NullSink::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Click sink and background click worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;
    let sink = build_sink(&config)?;

    let click_tracker = ClickTracker::spawn(
        sink,
        config.click_queue_capacity,
        config.click_worker_concurrency,
        config.tracking_timeout(),
    );
    tracing::info!("Click worker started");

    let auth_service = config.admin_token.as_deref().map(AuthService::new);
    if auth_service.is_none() {
        tracing::info!("ADMIN_TOKEN not set, authoring API disabled");
    }

    let mut state = AppState::new(repository, click_tracker, auth_service, config.behind_proxy);
    match config.visitor_hash_secret.as_deref() {
        Some(secret) => state = state.with_fingerprint_key(FingerprintKey::from_secret(secret)),
        None => tracing::info!("VISITOR_HASH_SECRET not set, visitor fingerprints reset on restart"),
    }
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
