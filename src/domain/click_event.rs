//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Secret that keys visitor fingerprints.
///
/// Without it an IPv4 + User-Agent hash could be reversed by enumeration.
/// A random key changes fingerprints on every restart; set
/// `VISITOR_HASH_SECRET` to keep them stable.
#[derive(Clone)]
pub struct FingerprintKey([u8; 32]);

impl FingerprintKey {
    pub fn random() -> Self {
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_secret(secret: &str) -> Self {
        Self(Sha256::digest(secret.as_bytes()).into())
    }
}

impl std::fmt::Debug for FingerprintKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FingerprintKey(***)")
    }
}

/// Request metadata describing who followed a link.
///
/// All fields are optional to handle missing headers gracefully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub language: Option<String>,
}

impl VisitorContext {
    /// Opaque visitor identifier used only for unique-visitor counting.
    ///
    /// Hex-encoded HMAC-SHA256 over IP and User-Agent under `key`.
    pub fn fingerprint(&self, key: &FingerprintKey) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&key.0).expect("HMAC accepts any key length");
        mac.update(self.ip.as_deref().unwrap_or_default().as_bytes());
        mac.update(b"\n");
        mac.update(self.user_agent.as_deref().unwrap_or_default().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// An in-memory representation of a click for async delivery.
///
/// Passed from the redirect handler to the background worker via a channel,
/// so the redirect response never waits on the analytics sink. Once handed to
/// a sink the event is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub slug: String,
    pub resolved_target: String,
    pub timestamp: DateTime<Utc>,
    pub visitor_fingerprint: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub language: Option<String>,
}

impl ClickEvent {
    /// Creates a click event for a successful resolution.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     7,
    ///     "promo".to_string(),
    ///     "https://example.com/x".to_string(),
    ///     Utc::now(),
    ///     visitor,
    ///     &key,
    /// );
    /// ```
    pub fn new(
        link_id: i64,
        slug: String,
        resolved_target: String,
        timestamp: DateTime<Utc>,
        visitor: VisitorContext,
        key: &FingerprintKey,
    ) -> Self {
        let visitor_fingerprint = visitor.fingerprint(key);
        Self {
            link_id,
            slug,
            resolved_target,
            timestamp,
            visitor_fingerprint,
            referrer: visitor.referrer,
            user_agent: visitor.user_agent,
            language: visitor.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(ip: &str, ua: &str) -> VisitorContext {
        VisitorContext {
            ip: Some(ip.to_string()),
            user_agent: Some(ua.to_string()),
            referrer: Some("https://google.com".to_string()),
            language: Some("en-US".to_string()),
        }
    }

    #[test]
    fn test_click_event_creation_full() {
        let now = Utc::now();
        let event = ClickEvent::new(
            7,
            "promo".to_string(),
            "https://example.com/x".to_string(),
            now,
            visitor("192.168.1.1", "Mozilla/5.0"),
            &FingerprintKey::random(),
        );

        assert_eq!(event.link_id, 7);
        assert_eq!(event.slug, "promo");
        assert_eq!(event.resolved_target, "https://example.com/x");
        assert_eq!(event.timestamp, now);
        assert_eq!(event.referrer.as_deref(), Some("https://google.com"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.language.as_deref(), Some("en-US"));
        assert_eq!(event.visitor_fingerprint.len(), 64);
    }

    #[test]
    fn test_click_event_creation_minimal() {
        let event = ClickEvent::new(
            1,
            "x".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            VisitorContext::default(),
            &FingerprintKey::random(),
        );

        assert!(event.referrer.is_none());
        assert!(event.user_agent.is_none());
        assert!(!event.visitor_fingerprint.is_empty());
    }

    #[test]
    fn test_fingerprint_is_stable_per_visitor() {
        let key = FingerprintKey::from_secret("secret");
        let a = visitor("10.0.0.1", "Chrome/120").fingerprint(&key);
        let b = visitor("10.0.0.1", "Chrome/120").fingerprint(&key);
        let c = visitor("10.0.0.2", "Chrome/120").fingerprint(&key);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.contains("10.0.0.1"));
    }

    #[test]
    fn test_fingerprint_is_keyed() {
        let v = visitor("10.0.0.1", "Chrome/120");

        let keyed = v.fingerprint(&FingerprintKey::from_secret("secret"));
        let other = v.fingerprint(&FingerprintKey::from_secret("other"));
        assert_ne!(keyed, other);
        assert_ne!(v.fingerprint(&FingerprintKey::random()), keyed);

        let mut plain = Sha256::new();
        plain.update(b"10.0.0.1\nChrome/120");
        assert_ne!(keyed, hex::encode(plain.finalize()));
    }

    #[test]
    fn test_fingerprint_key_debug_is_redacted() {
        let key = FingerprintKey::from_secret("secret");
        assert_eq!(format!("{key:?}"), "FingerprintKey(***)");
    }
}
