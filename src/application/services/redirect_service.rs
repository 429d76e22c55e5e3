//! Resolution of short codes for the public redirect endpoint.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::click_recorder::ClickRecorder;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink};
use crate::utils::code_generator::is_valid_code;

/// Request metadata attached to a click. Both fields are best effort.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Where a resolved code points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub link_id: i64,
    pub url: String,
}

impl From<CachedLink> for RedirectTarget {
    fn from(c: CachedLink) -> Self {
        Self {
            link_id: c.link_id,
            url: c.url,
        }
    }
}

/// Resolves codes through the cache, then the link store.
///
/// A successful resolution schedules exactly one click write and returns
/// without waiting for it. Unknown codes record nothing.
pub struct RedirectService<L: LinkRepository + ?Sized = dyn LinkRepository> {
    links: Arc<L>,
    cache: Arc<dyn CacheService>,
    recorder: Arc<ClickRecorder>,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(links: Arc<L>, cache: Arc<dyn CacheService>, recorder: Arc<ClickRecorder>) -> Self {
        Self {
            links,
            cache,
            recorder,
        }
    }

    /// Resolves `code` to its target URL and records the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or malformed codes.
    /// Returns [`AppError::Internal`] if the link store fails.
    pub async fn resolve(&self, code: &str, client: ClientInfo) -> Result<RedirectTarget, AppError> {
        if !is_valid_code(code) {
            return Err(not_found(code));
        }

        let target = match self.cache.get_link(code).await {
            Ok(Some(cached)) => cached.into(),
            Ok(None) => {
                let target = self.lookup(code).await?;
                self.populate_cache(code, &target);
                target
            }
            Err(e) => {
                error!(code, error = %e, "Cache error, falling back to storage");
                self.lookup(code).await?
            }
        };

        if !self
            .recorder
            .record(target.link_id, client.ip, client.user_agent)
        {
            warn!(link_id = target.link_id, "Click not recorded");
        }

        Ok(target)
    }

    async fn lookup(&self, code: &str) -> Result<RedirectTarget, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        Ok(RedirectTarget {
            link_id: link.id,
            url: link.original_url,
        })
    }

    /// Refills the cache off the request path.
    ///
    /// The fill loses against a tombstone, so a delete that lands after the
    /// storage read above still wins.
    fn populate_cache(&self, code: &str, target: &RedirectTarget) {
        let cache = self.cache.clone();
        let code = code.to_string();
        let entry = CachedLink {
            link_id: target.link_id,
            url: target.url.clone(),
        };

        tokio::spawn(async move {
            match cache.fill_link(&code, &entry, None).await {
                Ok(true) => {}
                Ok(false) => debug!(code, "Cache fill skipped, entry present"),
                Err(e) => debug!(code, error = %e, "Failed to cache link"),
            }
        });
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Click, Link};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::infrastructure::cache::{MockCacheService, NullCache};
    use chrono::Utc;
    use std::time::Duration;

    async fn wait_until_idle(recorder: &ClickRecorder) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while recorder.in_flight() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("click task did not finish");
    }

    fn link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, 1, code.to_string(), url.to_string(), Utc::now())
    }

    fn client() -> ClientInfo {
        ClientInfo {
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("curl/8.0".to_string()),
        }
    }

    #[tokio::test]
    async fn test_resolve_known_code_records_one_click() {
        let mut mock_links = MockLinkRepository::new();
        mock_links
            .expect_find_by_code()
            .withf(|code| code == "aB3xY9z")
            .times(1)
            .returning(|_| Ok(Some(link(4, "aB3xY9z", "https://example.com/x?y=1"))));

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks
            .expect_record()
            .withf(|c| c.link_id == 4 && c.ip.as_deref() == Some("203.0.113.9"))
            .times(1)
            .returning(|c| Ok(Click::new(1, c.link_id, Utc::now(), c.user_agent, c.ip)));

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 8));
        let service = RedirectService::new(
            Arc::new(mock_links),
            Arc::new(NullCache::new()),
            recorder.clone(),
        );

        let target = service.resolve("aB3xY9z", client()).await.unwrap();

        assert_eq!(target.link_id, 4);
        assert_eq!(target.url, "https://example.com/x?y=1");
        wait_until_idle(&recorder).await;
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_records_nothing() {
        let mut mock_links = MockLinkRepository::new();
        mock_links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks.expect_record().never();

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 8));
        let service = RedirectService::new(
            Arc::new(mock_links),
            Arc::new(NullCache::new()),
            recorder.clone(),
        );

        let result = service.resolve("zzzzzzz", client()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert_eq!(recorder.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_storage() {
        let mut mock_links = MockLinkRepository::new();
        mock_links.expect_find_by_code().never();

        let recorder = Arc::new(ClickRecorder::new(Arc::new(MockClickRepository::new()), 8));
        let service = RedirectService::new(
            Arc::new(mock_links),
            Arc::new(NullCache::new()),
            recorder,
        );

        for code in ["short", "toolong12", "bad-cod", "favicon.ico"] {
            let result = service.resolve(code, ClientInfo::default()).await;
            assert!(matches!(result, Err(AppError::NotFound { .. })));
        }
    }

    #[tokio::test]
    async fn test_failing_click_store_does_not_affect_redirect() {
        let mut mock_links = MockLinkRepository::new();
        mock_links
            .expect_find_by_code()
            .returning(|_| Ok(Some(link(4, "aB3xY9z", "https://example.com"))));

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks
            .expect_record()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 8));
        let service = RedirectService::new(
            Arc::new(mock_links),
            Arc::new(NullCache::new()),
            recorder.clone(),
        );

        let target = service.resolve("aB3xY9z", client()).await.unwrap();

        assert_eq!(target.url, "https://example.com");
        wait_until_idle(&recorder).await;
    }

    #[tokio::test]
    async fn test_cache_hit_skips_storage() {
        let mut mock_links = MockLinkRepository::new();
        mock_links.expect_find_by_code().never();

        let mut mock_cache = MockCacheService::new();
        mock_cache.expect_get_link().times(1).returning(|_| {
            Ok(Some(CachedLink {
                link_id: 11,
                url: "https://cached.example.com".to_string(),
            }))
        });

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks
            .expect_record()
            .withf(|c| c.link_id == 11)
            .times(1)
            .returning(|c| Ok(Click::new(1, c.link_id, Utc::now(), None, None)));

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 8));
        let service = RedirectService::new(Arc::new(mock_links), Arc::new(mock_cache), recorder.clone());

        let target = service.resolve("aB3xY9z", client()).await.unwrap();

        assert_eq!(target.link_id, 11);
        assert_eq!(target.url, "https://cached.example.com");
        wait_until_idle(&recorder).await;
    }

    #[tokio::test]
    async fn test_storage_hit_fills_cache() {
        let mut mock_links = MockLinkRepository::new();
        mock_links
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(link(4, "aB3xY9z", "https://example.com"))));

        let (filled_tx, filled_rx) = tokio::sync::oneshot::channel::<()>();
        let filled_tx = std::sync::Mutex::new(Some(filled_tx));

        let mut mock_cache = MockCacheService::new();
        mock_cache.expect_get_link().times(1).returning(|_| Ok(None));
        mock_cache
            .expect_fill_link()
            .withf(|code, entry, ttl| {
                code == "aB3xY9z" && entry.link_id == 4 && ttl.is_none()
            })
            .times(1)
            .returning(move |_, _, _| {
                if let Some(tx) = filled_tx.lock().unwrap().take() {
                    let _ = tx.send(());
                }
                Ok(true)
            });

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks
            .expect_record()
            .returning(|c| Ok(Click::new(1, c.link_id, Utc::now(), None, None)));

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 8));
        let service = RedirectService::new(Arc::new(mock_links), Arc::new(mock_cache), recorder.clone());

        service.resolve("aB3xY9z", client()).await.unwrap();

        tokio::time::timeout(Duration::from_secs(2), filled_rx)
            .await
            .expect("cache was not filled")
            .unwrap();
        wait_until_idle(&recorder).await;
    }

    #[tokio::test]
    async fn test_resolve_drops_click_when_recorder_saturated() {
        let mut mock_links = MockLinkRepository::new();
        mock_links
            .expect_find_by_code()
            .returning(|_| Ok(Some(link(4, "aB3xY9z", "https://example.com"))));

        let mut mock_clicks = MockClickRepository::new();
        mock_clicks.expect_record().never();

        let recorder = Arc::new(ClickRecorder::new(Arc::new(mock_clicks), 0));
        let service = RedirectService::new(
            Arc::new(mock_links),
            Arc::new(NullCache::new()),
            recorder,
        );

        assert!(service.resolve("aB3xY9z", client()).await.is_ok());
    }
}
