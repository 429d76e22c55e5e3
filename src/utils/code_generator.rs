//! Short code generation and validation utilities.
//!
//! Codes are 7 characters drawn uniformly from `[A-Za-z0-9]`, which gives
//! 62^7 (about 3.5 × 10^12) possible values.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of characters in a short code.
pub const CODE_LENGTH: usize = 7;

/// The 62-character alphabet codes are drawn from.
pub const CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random short code.
///
/// Uses the thread-local CSPRNG (ChaCha-based, seeded from the OS), so codes
/// cannot be predicted from previously issued ones.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns whether `code` has the shape of a generated code.
///
/// Used to reject obviously invalid codes before touching storage.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
