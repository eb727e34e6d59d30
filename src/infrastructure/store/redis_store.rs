//! Redis-backed key-value store.

use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, PoolError, Runtime};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError, StoreResult};

/// A [`KeyValueStore`] bound to a single Redis database index.
///
/// Connections come from a `deadpool-redis` pool. Two instances pointing at
/// different database indexes keep link records and quota counters apart.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    namespace: &'static str,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        StoreError::Timeout(message)
    } else if err.is_connection_dropped() || err.is_connection_refusal() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

fn map_pool_error(operation: &str, err: PoolError) -> StoreError {
    match err {
        PoolError::Timeout(kind) => StoreError::Timeout(format!("{operation}: {kind:?} timeout")),
        PoolError::Backend(e) => map_redis_error(operation, e),
        other => StoreError::Unavailable(format!("{operation}: {other}")),
    }
}

/// Whole seconds for `EX`/`EXPIRE`; Redis rejects zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Rewrites the path of a Redis URL to select database `db`.
fn with_database(redis_url: &str, db: u8) -> StoreResult<String> {
    let mut url = Url::parse(redis_url)
        .map_err(|e| StoreError::Unavailable(format!("invalid Redis URL: {e}")))?;
    url.set_path(&format!("/{db}"));
    Ok(url.to_string())
}

impl RedisStore {
    /// Builds a connection pool for database `db` and verifies it with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`); any
    ///   database in its path is replaced by `db`
    /// - `db` - Database index owned by this store
    /// - `pool_size` - Maximum number of pooled connections
    /// - `wait_timeout` - How long to wait for a connection before failing
    /// - `namespace` - Label used in logs (`"links"` or `"quota"`)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the URL is invalid, the pool cannot
    /// be created, or the server does not answer the PING.
    pub async fn connect(
        redis_url: &str,
        db: u8,
        pool_size: usize,
        wait_timeout: Duration,
        namespace: &'static str,
    ) -> StoreResult<Self> {
        let url = with_database(redis_url, db)?;

        let mut pool_config = PoolConfig::new(pool_size);
        pool_config.timeouts.wait = Some(wait_timeout);
        pool_config.timeouts.create = Some(wait_timeout);

        let mut config = Config::from_url(url);
        config.pool = Some(pool_config);

        let pool = config.create_pool(Some(Runtime::Tokio1)).map_err(|e| {
            StoreError::Unavailable(format!("failed to create {namespace} pool: {e}"))
        })?;

        let store = Self { pool, namespace };
        store.ping_checked().await?;

        info!(namespace, db, pool_size, "✓ Connected to Redis");
        Ok(store)
    }

    async fn conn(&self) -> StoreResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| map_pool_error("failed to get connection", e))
    }

    async fn ping_checked(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("PING failed", e))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| map_redis_error("GET failed", e))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(|e| map_redis_error("SET EX failed", e))
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("SET NX EX failed", e))?;

        let written = reply.is_some();
        if !written {
            debug!(namespace = self.namespace, key, "SET NX skipped, key exists");
        }
        Ok(written)
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn().await?;
        conn.incr::<_, _, i64>(key, 1)
            .await
            .map_err(|e| map_redis_error("INCR failed", e))
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn().await?;
        conn.decr::<_, _, i64>(key, 1)
            .await
            .map_err(|e| map_redis_error("DECR failed", e))
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        let mut conn = self.conn().await?;
        let seconds = conn
            .ttl::<_, i64>(key)
            .await
            .map_err(|e| map_redis_error("TTL failed", e))?;
        Ok(KeyTtl::from_redis_seconds(seconds))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let updated: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl_seconds(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("EXPIRE failed", e))?;
        Ok(updated == 1)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let removed = conn
            .del::<_, i64>(key)
            .await
            .map_err(|e| map_redis_error("DEL failed", e))?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> bool {
        match self.ping_checked().await {
            Ok(()) => true,
            Err(e) => {
                warn!(namespace = self.namespace, error = %e, "Redis health check failed");
                false
            }
        }
    }
}
