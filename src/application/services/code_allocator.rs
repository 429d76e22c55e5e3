//! Short code allocation.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;

/// Upper bound on candidate codes tried for one link.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 16;

/// Picks codes that are not currently taken.
///
/// The occupancy pre-check only avoids pointless inserts. Two concurrent
/// callers may still receive the same candidate; the store's unique
/// constraint decides, and [`crate::application::services::LinkService`]
/// retries on conflict.
pub struct CodeAllocator<L: LinkRepository + ?Sized = dyn LinkRepository> {
    links: Arc<L>,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    pub fn new(links: Arc<L>) -> Self {
        Self { links }
    }

    /// Returns a random code that was free at the time of the check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] after [`MAX_ALLOCATION_ATTEMPTS`]
    /// occupied candidates, or if the store fails.
    pub async fn allocate(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = generate_code();

            if !self.links.code_exists(&code).await? {
                return Ok(code);
            }

            tracing::debug!(attempt, "Generated code already taken");
        }

        tracing::error!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            "Could not find a free short code"
        );
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::is_valid_code;

    #[tokio::test]
    async fn test_allocate_returns_free_code() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_code_exists()
            .times(1)
            .returning(|_| Ok(false));

        let allocator = CodeAllocator::new(Arc::new(mock_repo));

        let code = allocator.allocate().await.unwrap();

        assert!(is_valid_code(&code));
    }

    #[tokio::test]
    async fn test_allocate_retries_on_taken_code() {
        let mut mock_repo = MockLinkRepository::new();
        let mut calls = 0;
        mock_repo.expect_code_exists().times(3).returning(move |_| {
            calls += 1;
            Ok(calls < 3)
        });

        let allocator = CodeAllocator::new(Arc::new(mock_repo));

        assert!(allocator.allocate().await.is_ok());
    }

    #[tokio::test]
    async fn test_allocate_gives_up_after_max_attempts() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_code_exists()
            .times(MAX_ALLOCATION_ATTEMPTS)
            .returning(|_| Ok(true));

        let allocator = CodeAllocator::new(Arc::new(mock_repo));

        let result = allocator.allocate().await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_allocate_propagates_storage_error() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_code_exists()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let allocator = CodeAllocator::new(Arc::new(mock_repo));

        assert!(allocator.allocate().await.is_err());
    }
}
