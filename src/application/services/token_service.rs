//! Session token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;

/// Lifetime of an issued token.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies stateless session tokens.
///
/// Tokens are never stored. A token is valid while its signature checks out
/// under the configured secret and `now < exp`. Only HS256 is accepted;
/// tokens declaring any other algorithm are rejected before signature checks.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against an explicit clock, without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `user_id`, valid for [`TOKEN_VALIDITY_DAYS`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let expires_at = now + Duration::days(TOKEN_VALIDITY_DAYS);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to sign token");
                AppError::internal("Failed to issue token", json!({}))
            })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies a token and returns the user ID it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, signed
    /// with another key or algorithm, carries a non-numeric subject, or has
    /// expired.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token against an explicit clock.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            invalid_token("Invalid token")
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(invalid_token("Token expired"));
        }

        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| invalid_token("Invalid token subject"))
    }
}

fn invalid_token(reason: &str) -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": reason }))
}
