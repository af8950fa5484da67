//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, migrations, state wiring, and the Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::infrastructure::Repositories;
use crate::routes::{RouterOptions, app_router};
use crate::state::{AppSettings, AppState};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Connects to PostgreSQL with the configured pool settings and applies migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &Config) -> Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Builds the storage backend selected by `STORAGE`.
pub async fn build_repositories(config: &Config) -> Result<Repositories> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;
            Ok(Repositories::postgres(Arc::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Repositories::in_memory())
        }
    }
}

/// Service settings derived from the configuration.
pub fn app_settings(config: &Config) -> AppSettings {
    AppSettings {
        session_secret: config.session_secret.clone(),
        session_ttl: chrono::Duration::hours(config.session_ttl_hours),
        banned_words: config.banned_word_set(),
        news_count_on_home_page: config.news_count_on_home_page,
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL pool + migrations, or in-memory)
/// - Services and shared state
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = build_repositories(&config).await?;
    let state = AppState::new(repositories, app_settings(&config));

    match state.auth_service.purge_expired_sessions().await {
        Ok(removed) => tracing::info!(removed, "Expired sessions purged"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
    }

    let app = app_router(
        state,
        RouterOptions {
            behind_proxy: config.behind_proxy,
            rate_limit: config.rate_limit,
        },
    );

    let addr: SocketAddr = config.listen_addr.parse()?;
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
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
