//! Target URL validation.
//!
//! Only absolute `http`/`https` URLs with a host are redirectable. ASCII URLs
//! are stored as supplied (trimmed) so that what the author typed is exactly
//! what ends up in the `Location` header. Non-ASCII URLs are stored in their
//! serialized form (punycode host, percent-encoded path and query), since a
//! `Location` header must be ASCII.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters")]
    ControlCharacters,
}

/// Validates a redirect target and returns the form to store.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-HTTP schemes, and
/// any raw control characters that could split a `Location` header.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_target_url(" https://example.com/x ").unwrap(), "https://example.com/x");
/// assert!(validate_target_url("not a url").is_err());
/// assert_eq!(validate_target_url("https://example.com/ü").unwrap(), "https://example.com/%C3%BC");
/// assert!(validate_target_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if trimmed.is_ascii() {
        Ok(trimmed.to_string())
    } else {
        Ok(url.into())
    }
}

/// Returns true if `input` can be emitted as a `Location` header as-is.
pub fn is_redirectable(input: &str) -> bool {
    input.is_ascii() && validate_target_url(input).is_ok_and(|valid| valid == input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_simple_https() {
        assert_eq!(
            validate_target_url("https://example.com/x").unwrap(),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_validate_keeps_query_and_case() {
        let url = "https://Example.com/Path?utm_source=News&x=1#frag";
        assert_eq!(validate_target_url(url).unwrap(), url);
    }

    #[test]
    fn test_validate_trims_whitespace() {
        assert_eq!(
            validate_target_url("  http://example.com  ").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_validate_rejects_plain_text() {
        let result = validate_target_url("not a url");
        assert!(matches!(result, Err(UrlValidationError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_rejects_relative() {
        assert!(validate_target_url("/go/elsewhere").is_err());
    }

    #[test]
    fn test_validate_rejects_dangerous_schemes() {
        for url in [
            "javascript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "file:///etc/passwd",
            "ftp://example.com/file",
        ] {
            assert_eq!(
                validate_target_url(url),
                Err(UrlValidationError::UnsupportedProtocol),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_header_injection() {
        let result = validate_target_url("https://example.com/\r\nSet-Cookie: a=b");
        assert_eq!(result, Err(UrlValidationError::ControlCharacters));
    }

    #[test]
    fn test_validate_encodes_non_ascii() {
        assert_eq!(
            validate_target_url("https://example.com/ü?q=café").unwrap(),
            "https://example.com/%C3%BC?q=caf%C3%A9"
        );
        assert_eq!(
            validate_target_url("https://bücher.example/").unwrap(),
            "https://xn--bcher-kva.example/"
        );
    }

    #[test]
    fn test_stored_form_is_redirectable() {
        for input in [
            "https://example.com/x",
            "https://Example.com/Path?utm_source=News#frag",
            "https://example.com/ü",
            "https://bücher.example/straße",
        ] {
            let stored = validate_target_url(input).unwrap();
            assert!(is_redirectable(&stored), "{input} -> {stored}");
        }
    }

    #[test]
    fn test_is_redirectable() {
        assert!(is_redirectable("https://example.com/x"));
        assert!(!is_redirectable("https://example.com/ü"));
        assert!(!is_redirectable(" https://example.com/x"));
        assert!(!is_redirectable("not a url"));
        assert!(!is_redirectable(""));
    }
}
