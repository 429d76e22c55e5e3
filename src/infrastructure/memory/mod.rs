//! In-process repository implementations.
//!
//! Selected with `STORAGE=memory` and used by the HTTP integration tests.
//! They enforce the same uniqueness rules as the PostgreSQL schema, so
//! services behave identically on either backend. Data is lost on restart.

mod click_repository;
mod link_repository;
mod user_repository;

pub use click_repository::InMemoryClickRepository;
pub use link_repository::InMemoryLinkRepository;
pub use user_repository::InMemoryUserRepository;
