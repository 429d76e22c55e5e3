//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration and login
//! - [`services::token_service::TokenService`] - Session token signing and verification
//! - [`services::link_service::LinkService`] - Owner-scoped link management
//! - [`services::code_allocator::CodeAllocator`] - Free short code selection
//! - [`services::redirect_service::RedirectService`] - Public code resolution

pub mod services;
