//! HTTP server initialization and runtime setup.
//!
//! Handles store connections and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::KeyValueStore;
use crate::infrastructure::store::{MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Link and quota stores selected by the configuration.
pub struct Stores {
    pub links: Arc<dyn KeyValueStore>,
    pub quotas: Arc<dyn KeyValueStore>,
}

/// Connects both store namespaces.
///
/// With Redis configured, each namespace gets its own pool on its own
/// database index and must answer PING. Without Redis, both namespaces fall
/// back to separate in-memory stores.
///
/// # Errors
///
/// Returns an error if Redis is configured but unreachable.
pub async fn connect_stores(config: &Config) -> Result<Stores> {
    let Some(redis_url) = &config.redis_url else {
        tracing::warn!("Redis not configured, using in-memory stores (state is lost on restart)");
        return Ok(Stores {
            links: Arc::new(MemoryStore::new()),
            quotas: Arc::new(MemoryStore::new()),
        });
    };

    let links = RedisStore::connect(
        redis_url,
        config.redis_links_db,
        config.redis_pool_size,
        config.redis_pool_timeout(),
        "links",
    )
    .await
    .context("Failed to connect links store")?;

    let quotas = RedisStore::connect(
        redis_url,
        config.redis_quota_db,
        config.redis_pool_size,
        config.redis_pool_timeout(),
        "quota",
    )
    .await
    .context("Failed to connect quota store")?;

    Ok(Stores {
        links: Arc::new(links),
        quotas: Arc::new(quotas),
    })
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and quota stores (Redis or in-memory fallback)
/// - Services and shared state
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = connect_stores(&config).await?;

    let state = AppState::new(&config, stores.links, stores.quotas);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
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

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
