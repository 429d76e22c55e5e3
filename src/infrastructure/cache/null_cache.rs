//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService, CachedLink};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is unavailable or caching is explicitly disabled.
/// All operations succeed immediately without storing or retrieving data.
///
/// # Use Cases
///
/// - Development environments without Redis
/// - Testing scenarios where caching should be bypassed
/// - Fallback when Redis connection fails at startup
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _code: &str) -> CacheResult<Option<CachedLink>> {
        Ok(None)
    }

    async fn fill_link(
        &self,
        _code: &str,
        _link: &CachedLink,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<bool> {
        Ok(false)
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
