//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How long a deleted code stays tombstoned.
///
/// Must outlast any cache fill that started before the delete.
pub const TOMBSTONE_TTL_SECONDS: u64 = 300;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache serialization error: {0}")]
    SerializationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// What the redirect path needs to know about a code.
///
/// The link ID is kept alongside the URL so a cache hit can still be
/// attributed to the right link when the click is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub link_id: i64,
    pub url: String,
}

/// Trait for caching short code lookups.
///
/// Implementations must be thread-safe. Read failures degrade to storage
/// lookups; fills are best-effort.
///
/// Deleting a link leaves a tombstone under its code. A tombstoned code reads
/// as a miss and cannot be filled until the tombstone expires, so a fill
/// racing a delete never resurrects the deleted mapping.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached link for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss, tombstone, or backend error (fail-open behavior)
    async fn get_link(&self, code: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores a link only if the code has no entry, live or tombstoned.
    ///
    /// `ttl_seconds` falls back to the implementation's default when `None`.
    /// Returns whether the entry was written.
    async fn fill_link(
        &self,
        code: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<bool>;

    /// Replaces any entry for `code` with a tombstone.
    ///
    /// Called before a link is deleted. An error means the code may still
    /// resolve from the cache, so the delete must not proceed.
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_link_json_shape() {
        let cached = CachedLink {
            link_id: 42,
            url: "https://example.com/a?b=c".to_string(),
        };

        let json = serde_json::to_value(&cached).unwrap();

        assert_eq!(json["link_id"], 42);
        assert_eq!(json["url"], "https://example.com/a?b=c");
    }

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::ConnectionError("refused".to_string());
        assert_eq!(err.to_string(), "Cache connection error: refused");

        let err = CacheError::SerializationError("bad json".to_string());
        assert_eq!(err.to_string(), "Cache serialization error: bad json");
    }
}
