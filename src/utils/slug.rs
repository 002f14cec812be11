//! Slug validation.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::errors::ValidationError;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 64;

/// Slugs that would collide with service routes.
const RESERVED_SLUGS: &[&str] = &["api", "health", "go", "admin", "static"];

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug pattern is valid"));

/// Validates an authoring-supplied slug and returns its trimmed form.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-`, `_`
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`ValidationError::InvalidSlug`] naming the violated rule.
pub fn validate_slug(input: &str) -> Result<String, ValidationError> {
    let slug = input.trim();
    let invalid = |reason| ValidationError::InvalidSlug {
        slug: slug.to_string(),
        reason,
    };

    if slug.is_empty() {
        return Err(invalid("slug must not be empty"));
    }

    if slug.len() > MAX_SLUG_LEN {
        return Err(invalid("slug must be at most 64 characters"));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(invalid(
            "slug can only contain letters, digits, hyphens and underscores",
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(invalid("slug cannot start or end with a hyphen"));
    }

    if RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
    {
        return Err(invalid("slug is reserved"));
    }

    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_common_slugs() {
        for slug in ["promo", "Black-Friday_2025", "a", "x1"] {
            assert_eq!(validate_slug(slug).unwrap(), slug);
        }
    }

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate_slug("  promo ").unwrap(), "promo");
    }

    #[test]
    fn test_validate_empty() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("   ").is_err());
    }

    #[test]
    fn test_validate_too_long() {
        let slug = "a".repeat(MAX_SLUG_LEN + 1);
        assert!(validate_slug(&slug).is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN)).is_ok());
    }

    #[test]
    fn test_validate_rejects_unsafe_characters() {
        for slug in ["with space", "a/b", "a?b", "ümlaut", "a.b"] {
            assert!(validate_slug(slug).is_err(), "{slug} should be rejected");
        }
    }

    #[test]
    fn test_validate_hyphen_edges() {
        let err = validate_slug("-promo").unwrap_err();
        assert!(err.to_string().contains("cannot start or end"));
        assert!(validate_slug("promo-").is_err());
    }

    #[test]
    fn test_validate_reserved_slugs() {
        for &reserved in RESERVED_SLUGS {
            assert!(validate_slug(reserved).is_err());
        }
        assert!(validate_slug("API").is_err());
    }
}
