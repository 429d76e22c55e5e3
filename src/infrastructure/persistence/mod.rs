//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters. Unique violations are translated into
//! [`crate::error::AppError::Conflict`] with a field-specific message.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Account storage and lookup
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgClickRepository`] - Click log and counts

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
