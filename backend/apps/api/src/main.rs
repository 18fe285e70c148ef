//! API Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors go through
//! `kernel::error::AppError`.

use std::net::SocketAddr;

use anyhow::Context;
use api::telemetry::init_tracing;
use api::{AppConfig, AppServices, build_app};
use auth::{AuthAppState, PgUserRepository};
use catalog::{CatalogAppState, PgProductRepository};
use platform::cache::{CacheClient, RedisSettings};
use platform::db::Database;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level, config.log_file.as_deref())?;

    let database = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("cannot connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(database.pool())
        .await?;
    tracing::info!("Migrations completed");

    let cache = match &config.redis_url {
        Some(url) => {
            let cache = CacheClient::redis(&RedisSettings::new(url.as_str()))?;
            match cache.ping().await {
                Ok(()) => tracing::info!("Connected to Redis"),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Redis unreachable, reads will fall back to the database"
                ),
            }
            cache
        }
        None => {
            tracing::info!("REDIS_URL not set, using in-process cache");
            CacheClient::memory()
        }
    };

    let auth = AuthAppState::new(
        PgUserRepository::new(database.pool().clone()),
        cache.clone(),
        config.auth.clone(),
    )?;
    let catalog = CatalogAppState::new(
        PgProductRepository::new(database.pool().clone()),
        cache.clone(),
        auth.tokens.clone(),
        config.catalog.clone(),
    );

    let app = build_app(AppServices {
        auth,
        catalog,
        cache,
        database: Some(database.clone()),
        rate_limit: config.rate_limit.clone(),
        environment: config.environment.clone(),
        cors_origins: config.cors_origins.clone(),
    });

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %config.environment, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    database.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
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
