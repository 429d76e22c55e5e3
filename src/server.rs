//! HTTP server initialization and runtime setup.
//!
//! Builds storage, cache and services from [`Config`], then runs the Axum
//! server until SIGINT/SIGTERM.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::memory::{
    InMemoryClickRepository, InMemoryLinkRepository, InMemoryUserRepository,
};
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::{AppState, StateSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use axum::http::HeaderValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// The three stores a running service needs.
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

/// Opens a PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the stores for the configured backend, applying migrations on PostgreSQL.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn build_stores(config: &Config) -> Result<Stores> {
    match (config.storage, &config.database_url) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            Ok(Stores {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                links: Arc::new(PgLinkRepository::new(pool.clone())),
                clicks: Arc::new(PgClickRepository::new(pool)),
            })
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required when STORAGE=postgres")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; all data is lost on restart");
            Ok(Stores {
                users: Arc::new(InMemoryUserRepository::new()),
                links: Arc::new(InMemoryLinkRepository::new()),
                clicks: Arc::new(InMemoryClickRepository::new()),
            })
        }
    }
}

/// Connects the redirect cache, degrading to [`NullCache`] when Redis is absent or down.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or in-memory stores)
/// - Redis cache (or NullCache fallback)
/// - Services and the click recorder
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = build_stores(&config).await?;
    let cache = build_cache(&config).await;

    let state = AppState::new(
        stores.users,
        stores.links,
        stores.clicks,
        cache,
        StateSettings {
            base_url: config.base_url.clone(),
            jwt_secret: config.jwt_secret.clone(),
            click_max_in_flight: config.click_max_in_flight,
            behind_proxy: config.behind_proxy,
        },
    );

    let cors_origin = config
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("CORS_ALLOWED_ORIGIN is not a valid header value")?;

    let app = app_router(state, cors_origin);

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

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
