//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the infrastructure layer.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts and credential lookup
//! - [`LinkRepository`] - Short link storage with code uniqueness
//! - [`ClickRepository`] - Append-only click log
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests. See
//! `tests/repository_*.rs` for PostgreSQL-backed tests.

pub mod click_repository;
pub mod link_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
