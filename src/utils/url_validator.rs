//! Target URL validation.
//!
//! Submitted URLs are checked but stored exactly as given, so a redirect
//! returns the same string the owner submitted.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates that `input` is an absolute HTTP(S) URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_target_url("http://example.com").is_ok());
        assert!(validate_target_url("https://example.org/path?q=1#frag").is_ok());
        assert!(validate_target_url("https://EXAMPLE.COM:8443/Path").is_ok());
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_target_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url("/relative/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_target_url(""),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        assert_eq!(
            validate_target_url("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_target_url("data:text/html,hi"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_target_url("ftp://example.com/file"),
            Err(UrlValidationError::UnsupportedProtocol)
        );
    }
}
