//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService, CachedLink, TOMBSTONE_TTL_SECONDS};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Value stored under a deleted code.
const TOMBSTONE: &str = "deleted";

/// Redis cache implementation for fast code lookups.
///
/// Entries are stored as JSON under `link:<code>`, tombstones as the bare
/// string `deleted`. Fills use `SET NX`, so they lose against a tombstone.
/// Uses `ConnectionManager` for automatic reconnection. Read errors are logged
/// and treated as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::fill_link`] is called with
    ///   `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }

    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) if raw == TOMBSTONE => {
                debug!(code, "Cache TOMBSTONE");
                Ok(None)
            }
            Ok(Some(raw)) => match serde_json::from_str::<CachedLink>(&raw) {
                Ok(link) => {
                    debug!(code, "Cache HIT");
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!(code, error = %e, "Discarding malformed cache entry");
                    let _ = conn.del::<_, i32>(&key).await;
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(code, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", code, e);
                Ok(None)
            }
        }
    }

    async fn fill_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<bool> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;

        // Nil reply: the key exists, live or tombstoned.
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::OperationError(format!("SET NX failed: {}", e)))?;

        let written = reply.is_some();
        debug!(code, ttl_seconds, written, "Cache FILL");

        Ok(written)
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        conn.set_ex::<_, _, ()>(&key, TOMBSTONE, TOMBSTONE_TTL_SECONDS)
            .await
            .map_err(|e| {
                warn!("Redis tombstone error for {}: {}", code, e);
                CacheError::OperationError(format!("Tombstone write failed: {}", e))
            })?;

        debug!(code, "Cache INVALIDATE");

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
