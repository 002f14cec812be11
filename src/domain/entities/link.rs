//! Link entity representing a short link and its redirect configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP redirect flavour used when a link is followed.
///
/// Parsed from either the kebab-case name or the numeric status code,
/// so `"temporary-strict"` and `"307"` are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectKind {
    /// 301 Moved Permanently
    Permanent,
    /// 302 Found
    Temporary,
    /// 307 Temporary Redirect
    #[default]
    TemporaryStrict,
    /// 308 Permanent Redirect
    PermanentStrict,
}

impl RedirectKind {
    /// Returns the HTTP status code for this redirect kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Permanent => 301,
            Self::Temporary => 302,
            Self::TemporaryStrict => 307,
            Self::PermanentStrict => 308,
        }
    }

    /// Maps a stored status code back to a redirect kind.
    pub fn from_status_code(code: u16) -> Option<Self> {
        match code {
            301 => Some(Self::Permanent),
            302 => Some(Self::Temporary),
            307 => Some(Self::TemporaryStrict),
            308 => Some(Self::PermanentStrict),
            _ => None,
        }
    }

    pub fn is_permanent(self) -> bool {
        matches!(self, Self::Permanent | Self::PermanentStrict)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
            Self::TemporaryStrict => "temporary-strict",
            Self::PermanentStrict => "permanent-strict",
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a redirect kind string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown redirect kind '{0}', expected permanent, temporary, temporary-strict, permanent-strict or 301/302/307/308")]
pub struct UnknownRedirectKind(pub String);

impl FromStr for RedirectKind {
    type Err = UnknownRedirectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "permanent" | "301" => Ok(Self::Permanent),
            "temporary" | "302" => Ok(Self::Temporary),
            "temporary-strict" | "307" => Ok(Self::TemporaryStrict),
            "permanent-strict" | "308" => Ok(Self::PermanentStrict),
            other => Err(UnknownRedirectKind(other.to_string())),
        }
    }
}

/// One weighted destination in a rotation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationVariant {
    pub url: String,
    pub weight: u32,
}

/// Where a link sends its visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Always redirect to the same URL.
    Single(String),
    /// Pick one variant per request, proportionally to its weight.
    /// Variant order is significant and preserved by the store.
    Rotation(Vec<RotationVariant>),
}

impl Target {
    /// Every URL this target can redirect to, in stored order.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            Self::Single(url) => vec![url.as_str()],
            Self::Rotation(variants) => variants.iter().map(|v| v.url.as_str()).collect(),
        }
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self, Self::Rotation(_))
    }
}

/// Per-link flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkAttributes {
    pub no_follow: bool,
    pub sponsored: bool,
    pub track_enabled: bool,
}

impl Default for LinkAttributes {
    fn default() -> Self {
        Self {
            no_follow: false,
            sponsored: false,
            track_enabled: true,
        }
    }
}

/// A stored short link.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub title: Option<String>,
    pub target: Target,
    pub redirect_kind: RedirectKind,
    pub attributes: LinkAttributes,
    pub categories: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the link is past its expiry at `now`.
    ///
    /// The expiry instant itself already counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}

/// Validated input for creating a link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub slug: String,
    pub title: Option<String>,
    pub target: Target,
    pub redirect_kind: RedirectKind,
    pub attributes: LinkAttributes,
    pub categories: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLink {
    /// Materialises a stored record with store-assigned id and timestamps.
    pub fn into_link(self, id: i64, now: DateTime<Utc>) -> Link {
        Link {
            id,
            slug: self.slug,
            title: self.title,
            target: self.target,
            redirect_kind: self.redirect_kind,
            attributes: self.attributes,
            categories: self.categories,
            expires_at: self.expires_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Validated partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub slug: Option<String>,
    pub title: Option<Option<String>>,
    pub target: Option<Target>,
    pub redirect_kind: Option<RedirectKind>,
    pub no_follow: Option<bool>,
    pub sponsored: Option<bool>,
    pub track_enabled: Option<bool>,
    pub categories: Option<Vec<String>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl LinkPatch {
    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply(self, link: &mut Link, now: DateTime<Utc>) {
        if let Some(slug) = self.slug {
            link.slug = slug;
        }
        if let Some(title) = self.title {
            link.title = title;
        }
        if let Some(target) = self.target {
            link.target = target;
        }
        if let Some(kind) = self.redirect_kind {
            link.redirect_kind = kind;
        }
        if let Some(v) = self.no_follow {
            link.attributes.no_follow = v;
        }
        if let Some(v) = self.sponsored {
            link.attributes.sponsored = v;
        }
        if let Some(v) = self.track_enabled {
            link.attributes.track_enabled = v;
        }
        if let Some(categories) = self.categories {
            link.categories = categories;
        }
        if let Some(expires_at) = self.expires_at {
            link.expires_at = expires_at;
        }
        link.updated_at = now;
    }
}

/// Raw weighted variant as supplied by an authoring client.
///
/// The weight is signed so that non-positive values can be reported
/// instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariantFields {
    pub url: String,
    pub weight: i64,
}

/// Raw authoring input for a new link, validated by
/// [`crate::application::services::LinkService`].
#[derive(Debug, Clone, Default)]
pub struct LinkFields {
    pub slug: String,
    pub title: Option<String>,
    pub target_url: Option<String>,
    pub rotation: Option<Vec<VariantFields>>,
    pub redirect_kind: Option<RedirectKind>,
    pub no_follow: bool,
    pub sponsored: bool,
    pub track_enabled: Option<bool>,
    pub categories: Vec<String>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` (UTC). Empty means no expiry.
    pub expires_at: Option<String>,
}

/// Raw authoring input for a partial update.
///
/// `rotation: Some(None)` switches rotation off and requires `target_url`.
#[derive(Debug, Clone, Default)]
pub struct LinkFieldsPatch {
    pub slug: Option<String>,
    pub title: Option<Option<String>>,
    pub target_url: Option<String>,
    pub rotation: Option<Option<Vec<VariantFields>>>,
    pub redirect_kind: Option<RedirectKind>,
    pub no_follow: Option<bool>,
    pub sponsored: Option<bool>,
    pub track_enabled: Option<bool>,
    pub categories: Option<Vec<String>>,
    pub expires_at: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_link(expires_at: Option<DateTime<Utc>>) -> Link {
        NewLink {
            slug: "promo".to_string(),
            title: None,
            target: Target::Single("https://example.com/x".to_string()),
            redirect_kind: RedirectKind::default(),
            attributes: LinkAttributes::default(),
            categories: vec![],
            expires_at,
        }
        .into_link(1, Utc::now())
    }

    #[test]
    fn test_redirect_kind_status_codes() {
        assert_eq!(RedirectKind::Permanent.status_code(), 301);
        assert_eq!(RedirectKind::Temporary.status_code(), 302);
        assert_eq!(RedirectKind::TemporaryStrict.status_code(), 307);
        assert_eq!(RedirectKind::PermanentStrict.status_code(), 308);
        assert_eq!(RedirectKind::default(), RedirectKind::TemporaryStrict);
    }

    #[test]
    fn test_redirect_kind_parses_names_and_codes() {
        assert_eq!("permanent".parse::<RedirectKind>(), Ok(RedirectKind::Permanent));
        assert_eq!("308".parse::<RedirectKind>(), Ok(RedirectKind::PermanentStrict));
        assert_eq!(" 302 ".parse::<RedirectKind>(), Ok(RedirectKind::Temporary));
        assert!("303".parse::<RedirectKind>().is_err());
        assert_eq!(RedirectKind::from_status_code(404), None);
    }

    #[test]
    fn test_default_attributes_track_clicks() {
        let attrs = LinkAttributes::default();
        assert!(attrs.track_enabled);
        assert!(!attrs.no_follow);
        assert!(!attrs.sponsored);
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = sample_link(None);
        assert!(!link.is_expired_at(Utc::now() + Duration::days(36_500)));
    }

    #[test]
    fn test_link_expires_at_boundary() {
        let t = Utc::now();
        let link = sample_link(Some(t));

        assert!(!link.is_expired_at(t - Duration::milliseconds(1)));
        assert!(link.is_expired_at(t));
        assert!(link.is_expired_at(t + Duration::seconds(1)));
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut link = sample_link(Some(Utc::now()));
        let before = link.clone();
        let later = before.updated_at + Duration::seconds(5);

        LinkPatch {
            redirect_kind: Some(RedirectKind::Permanent),
            expires_at: Some(None),
            ..Default::default()
        }
        .apply(&mut link, later);

        assert_eq!(link.redirect_kind, RedirectKind::Permanent);
        assert!(link.expires_at.is_none());
        assert_eq!(link.slug, before.slug);
        assert_eq!(link.target, before.target);
        assert_eq!(link.created_at, before.created_at);
        assert_eq!(link.updated_at, later);
    }

    #[test]
    fn test_target_urls_preserve_order() {
        let target = Target::Rotation(vec![
            RotationVariant {
                url: "https://a.example".to_string(),
                weight: 3,
            },
            RotationVariant {
                url: "https://b.example".to_string(),
                weight: 1,
            },
        ]);

        assert!(target.is_rotation());
        assert_eq!(target.urls(), vec!["https://a.example", "https://b.example"]);
    }
}
