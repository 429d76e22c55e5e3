//! Link creation, listing and deletion for authenticated owners.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};

use crate::application::services::code_allocator::{CodeAllocator, MAX_ALLOCATION_ATTEMPTS};
use crate::domain::entities::{Link, LinkWithClicks, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::url_validator::validate_target_url;

/// Service for managing a user's short links.
///
/// Every operation is scoped to the calling user. A link owned by someone
/// else is reported exactly like a link that does not exist.
pub struct LinkService<
    L: LinkRepository + ?Sized = dyn LinkRepository,
    C: ClickRepository + ?Sized = dyn ClickRepository,
> {
    links: Arc<L>,
    clicks: Arc<C>,
    allocator: CodeAllocator<L>,
    cache: Arc<dyn CacheService>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> LinkService<L, C> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built from; a trailing
    /// slash is ignored.
    pub fn new(
        links: Arc<L>,
        clicks: Arc<C>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            allocator: CodeAllocator::new(links.clone()),
            links,
            clicks,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Shortens `url` on behalf of `user_id`.
    ///
    /// The URL is stored exactly as submitted. Code collisions, whether caught
    /// by the pre-check or by the store's unique constraint, are retried with
    /// a fresh code and never reach the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute
    /// HTTP(S) URL with a host.
    /// Returns [`AppError::Internal`] if no free code is found or storage fails.
    pub async fn create_link(&self, user_id: i64, url: &str) -> Result<Link, AppError> {
        validate_target_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "url": e.to_string() }))
        })?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.allocator.allocate().await?;

            let new_link = NewLink {
                user_id,
                code,
                original_url: url.to_string(),
            };

            match self.links.create(new_link).await {
                Ok(link) => {
                    info!(user_id, link_id = link.id, code = %link.code, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, "Code taken between check and insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Lists the user's links, newest first, each with its click count.
    pub async fn list_links(&self, user_id: i64) -> Result<Vec<LinkWithClicks>, AppError> {
        let links = self.links.list_by_owner(user_id).await?;

        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        let counts = self.clicks.count_by_links(&ids).await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let click_count = counts.get(&link.id).copied().unwrap_or(0);
                LinkWithClicks { link, click_count }
            })
            .collect())
    }

    /// Deletes one of the user's links.
    ///
    /// The cached mapping is tombstoned before the row is removed. If the
    /// tombstone cannot be written the link is left in place, so success
    /// always means the code no longer resolves. Recorded clicks are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs
    /// to another user.
    /// Returns [`AppError::Internal`] if the cache or storage fails; the
    /// request can be retried.
    pub async fn delete_link(&self, user_id: i64, link_id: i64) -> Result<(), AppError> {
        let link = self
            .links
            .find_by_owner_and_id(user_id, link_id)
            .await?
            .ok_or_else(|| link_not_found(link_id))?;

        self.cache.invalidate(&link.code).await.map_err(|e| {
            error!(code = %link.code, error = %e, "Failed to invalidate cached link");
            AppError::internal("Failed to delete link", json!({ "reason": "Cache unavailable" }))
        })?;

        self.links
            .delete_by_owner_and_id(user_id, link_id)
            .await?
            .ok_or_else(|| link_not_found(link_id))?;

        info!(user_id, link_id, "Link deleted");

        Ok(())
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Performs a cheap read against the link store.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.links.code_exists("0000000").await.map(|_| ())
    }
}

fn link_not_found(link_id: i64) -> AppError {
    AppError::not_found("Link not found", json!({ "id": link_id }))
}
