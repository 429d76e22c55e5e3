//! Account registration and login.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::token_service::{IssuedToken, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Argon2id digest (default parameters) checked when the email is unknown.
/// No password matches it.
const UNKNOWN_USER_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Service for creating accounts and exchanging credentials for tokens.
///
/// Emails are trimmed and lower-cased before they reach the store, so
/// `Alice@Example.com` and `alice@example.com` are the same account.
pub struct AuthService<U: UserRepository + ?Sized = dyn UserRepository> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    pub fn new(users: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Registers a new account.
    ///
    /// Input shape (email syntax, password length) is validated by the
    /// request DTO; this method normalizes and stores.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email or username is taken.
    /// Returns [`AppError::Internal`] if hashing or storage fails.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Failed to register user", json!({}))
        })?;

        let user = self
            .users
            .create(NewUser {
                email,
                username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with the same message whether the
    /// email is unknown or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedToken), AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            // Same Argon2 cost as a real check, so response time does not
            // reveal whether the email is registered.
            let _ = verify_password(password, UNKNOWN_USER_DIGEST);
            return Err(invalid_credentials());
        };

        let matches = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "Stored password digest is unusable");
            invalid_credentials()
        })?;

        if !matches {
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id)?;

        Ok((user, token))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}
