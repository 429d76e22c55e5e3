//! Utility functions shared across layers.
//!
//! - [`client_ip`] - Client address extraction (proxy aware)
//! - [`code_generator`] - Short code generation and shape checks
//! - [`db_error`] - Database error inspection
//! - [`password`] - Argon2id password hashing
//! - [`url_validator`] - Target URL validation

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod password;
pub mod url_validator;
