//! User entity representing an account that owns links.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `password_hash` is an Argon2id PHC string. The entity deliberately has no
/// `Serialize` impl; API responses go through DTOs that omit the digest.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance.
    pub fn new(
        id: i64,
        email: String,
        username: Option<String>,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password_hash,
            created_at,
        }
    }
}

/// Input data for creating a new user.
///
/// `email` is expected to be lower-cased already; the store compares it verbatim.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
}
