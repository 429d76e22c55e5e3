//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links (the link store).
///
/// Code uniqueness is a hard constraint of every implementation and does not
/// depend on callers checking [`LinkRepository::code_exists`] first.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns whether a code is currently taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists all links owned by a user, newest first.
    ///
    /// Returns an empty vector when the user has no links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Finds a link by ID, but only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Deletes a link if, and only if, it belongs to `user_id`.
    ///
    /// Returns the removed link, or `Ok(None)` when no link with that ID exists
    /// for this owner. A link owned by someone else yields `Ok(None)` as well.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_owner_and_id(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<Option<Link>, AppError>;
}
