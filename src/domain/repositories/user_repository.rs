//! Repository trait for user accounts (the identity store).

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// Email and username uniqueness is enforced here, at the store boundary.
/// Lookups return `Ok(None)` when no user matches: a missing user is an
/// expected outcome, not a failure.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryUserRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is already taken.
    /// The `field` detail names which one.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by email (compared verbatim; callers lower-case it).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}
