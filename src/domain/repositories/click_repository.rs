//! Repository trait for click events.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Repository interface for the append-only click log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryClickRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click event.
    ///
    /// The referenced link is not checked; clicks are weak references.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts clicks per link for the given link IDs.
    ///
    /// Links without clicks are absent from the returned map.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_links(&self, link_ids: &[i64]) -> Result<HashMap<i64, i64>, AppError>;

    /// Counts all recorded clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_all(&self) -> Result<i64, AppError>;
}
