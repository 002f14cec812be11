//! DTOs for the link authoring endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{
    Link, LinkFields, LinkFieldsPatch, RedirectKind, RotationVariant, Target, VariantFields,
};

/// Request body for `POST /api/links`.
///
/// Exactly one of `target_url` and `rotation` must be set. Slug, URL and
/// weight rules are enforced by the link service; the checks here only
/// bound sizes.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 64))]
    pub slug: String,

    #[validate(length(max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2048))]
    pub target_url: Option<String>,

    #[validate(length(max = 100))]
    pub rotation: Option<Vec<VariantFields>>,

    /// `permanent`, `temporary`, `temporary-strict`, `permanent-strict`, or
    /// the status code as a string. Defaults to `temporary-strict`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub redirect_type: Option<RedirectKind>,

    #[serde(default)]
    pub no_follow: bool,

    #[serde(default)]
    pub sponsored: bool,

    /// Defaults to true.
    pub track_enabled: Option<bool>,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub categories: Vec<String>,

    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` (UTC).
    pub expires_at: Option<String>,
}

impl From<CreateLinkRequest> for LinkFields {
    fn from(req: CreateLinkRequest) -> Self {
        LinkFields {
            slug: req.slug,
            title: req.title,
            target_url: req.target_url,
            rotation: req.rotation,
            redirect_kind: req.redirect_type,
            no_follow: req.no_follow,
            sponsored: req.sponsored,
            track_enabled: req.track_enabled,
            categories: req.categories,
            expires_at: req.expires_at,
        }
    }
}

/// Request body for `PATCH /api/links/{id}`.
///
/// All fields are optional, only provided fields are changed.
///
/// # Nullable fields
///
/// `title`, `rotation` and `expires_at` distinguish absent from `null`:
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear (rotation off requires `target_url`; no expiry)
/// - **Value** → set
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 64))]
    pub slug: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,

    #[validate(length(max = 2048))]
    pub target_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub rotation: Option<Option<Vec<VariantFields>>>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub redirect_type: Option<RedirectKind>,

    pub no_follow: Option<bool>,
    pub sponsored: Option<bool>,
    pub track_enabled: Option<bool>,

    #[validate(length(max = 32))]
    pub categories: Option<Vec<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<String>>,
}

impl From<UpdateLinkRequest> for LinkFieldsPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkFieldsPatch {
            slug: req.slug,
            title: req.title,
            target_url: req.target_url,
            rotation: req.rotation,
            redirect_kind: req.redirect_type,
            no_follow: req.no_follow,
            sponsored: req.sponsored,
            track_enabled: req.track_enabled,
            categories: req.categories,
            expires_at: req.expires_at,
        }
    }
}

/// A stored link as returned by the authoring API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    /// Public redirect path, e.g. `/go/promo`.
    pub path: String,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec<RotationVariant>>,
    pub redirect_type: &'static str,
    pub redirect_status: u16,
    pub no_follow: bool,
    pub sponsored: bool,
    pub track_enabled: bool,
    pub categories: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, now: DateTime<Utc>) -> Self {
        let expired = link.is_expired_at(now);
        let (target_url, rotation) = match link.target {
            Target::Single(url) => (Some(url), None),
            Target::Rotation(variants) => (None, Some(variants)),
        };

        Self {
            id: link.id,
            path: format!("/go/{}", link.slug),
            slug: link.slug,
            title: link.title,
            target_url,
            rotation,
            redirect_type: link.redirect_kind.as_str(),
            redirect_status: link.redirect_kind.status_code(),
            no_follow: link.attributes.no_follow,
            sponsored: link.attributes.sponsored,
            track_enabled: link.attributes.track_enabled,
            categories: link.categories,
            expires_at: link.expires_at,
            expired,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Paginated list of links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}
