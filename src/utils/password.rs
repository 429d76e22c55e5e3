//! Password hashing with Argon2id.
//!
//! The rest of the crate treats this as an opaque `hash`/`verify` pair.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors from the hashing backend.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Stored password digest is malformed: {0}")]
    MalformedDigest(String),
}

/// Hashes a password into a PHC-format Argon2id digest with a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a password against a stored digest.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the digest cannot be parsed.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(digest).map_err(|e| PasswordError::MalformedDigest(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("password123").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("password123", &digest).unwrap());
        assert!(!verify_password("password124", &digest).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_digest_is_error() {
        let result = verify_password("password123", "not-a-digest");
        assert!(matches!(result, Err(PasswordError::MalformedDigest(_))));
    }
}
