//! Link store service: validated CRUD over a [`LinkRepository`].

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{
    Link, LinkAttributes, LinkFields, LinkFieldsPatch, LinkPatch, NewLink, RotationVariant,
    Target, VariantFields,
};
use crate::domain::errors::{StoreError, ValidationError};
use crate::domain::repositories::LinkRepository;
use crate::utils::slug::validate_slug;
use crate::utils::timestamp::parse_expiry;
use crate::utils::url_validator::validate_target_url;

/// Largest accepted rotation weight.
pub const MAX_WEIGHT: i64 = 1_000_000;

/// Service for creating, reading, updating and deleting links.
///
/// All authoring input passes through here: raw [`LinkFields`] are turned into
/// a typed [`NewLink`] / [`LinkPatch`] before any repository call, so
/// repositories only ever see valid records.
pub struct LinkService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if:
    /// - the slug is malformed, reserved, or already used by an active link
    /// - the target URL (or any rotation URL) is not an absolute http(s) URL
    /// - a rotation weight is not positive, or rotation is empty
    /// - the expiry timestamp cannot be parsed
    pub async fn create(&self, fields: LinkFields) -> Result<Link, StoreError> {
        let new_link = build_new_link(fields)?;

        if self
            .repository
            .find_by_slug(&new_link.slug)
            .await?
            .is_some()
        {
            return Err(ValidationError::DuplicateSlug(new_link.slug).into());
        }

        let link = self.repository.create(new_link).await?;
        info!(link_id = link.id, slug = %link.slug, "Link created");
        Ok(link)
    }

    /// Retrieves an active link by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no active link has this id.
    pub async fn get(&self, id: i64) -> Result<Link, StoreError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Retrieves an active link by slug, including expired ones.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no active link has this slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Link, StoreError> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Validates and applies a partial update.
    ///
    /// # Errors
    ///
    /// Same validation rules as [`Self::create`] for the fields present, plus
    /// [`StoreError::NotFound`] if the link does not exist.
    pub async fn update(&self, id: i64, fields: LinkFieldsPatch) -> Result<Link, StoreError> {
        let patch = build_patch(fields)?;

        if let Some(slug) = &patch.slug
            && let Some(existing) = self.repository.find_by_slug(slug).await?
            && existing.id != id
        {
            return Err(ValidationError::DuplicateSlug(slug.clone()).into());
        }

        let link = self.repository.update(id, patch).await?;
        info!(link_id = link.id, slug = %link.slug, "Link updated");
        Ok(link)
    }

    /// Soft-deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the link does not exist or is
    /// already deleted.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        if !self.repository.delete(id).await? {
            return Err(StoreError::NotFound);
        }

        info!(link_id = id, "Link deleted");
        Ok(())
    }

    /// Lists active links newest first, returning the page and the total count.
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        category: Option<String>,
    ) -> Result<(Vec<Link>, i64), StoreError> {
        let items = self
            .repository
            .list(page, page_size, category.clone())
            .await?;
        let total = self.repository.count(category).await?;
        Ok((items, total))
    }

    /// Reports whether the underlying store is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.repository.health_check().await
    }
}

/// Turns raw authoring input into a validated [`NewLink`].
pub fn build_new_link(fields: LinkFields) -> Result<NewLink, ValidationError> {
    let defaults = LinkAttributes::default();

    Ok(NewLink {
        slug: validate_slug(&fields.slug)?,
        title: normalize_title(fields.title),
        target: build_target(fields.target_url, fields.rotation)?,
        redirect_kind: fields.redirect_kind.unwrap_or_default(),
        attributes: LinkAttributes {
            no_follow: fields.no_follow,
            sponsored: fields.sponsored,
            track_enabled: fields.track_enabled.unwrap_or(defaults.track_enabled),
        },
        categories: normalize_categories(fields.categories),
        expires_at: match fields.expires_at {
            Some(raw) => parse_expiry(&raw)?,
            None => None,
        },
    })
}

/// Turns a raw partial update into a validated [`LinkPatch`].
pub fn build_patch(fields: LinkFieldsPatch) -> Result<LinkPatch, ValidationError> {
    let target = match (fields.target_url, fields.rotation) {
        (Some(_), Some(Some(_))) => return Err(ValidationError::AmbiguousTarget),
        (None, Some(Some(variants))) => Some(build_rotation(variants)?),
        (Some(url), _) => Some(Target::Single(validate_url(&url)?)),
        (None, Some(None)) => return Err(ValidationError::MissingTarget),
        (None, None) => None,
    };

    Ok(LinkPatch {
        slug: fields.slug.as_deref().map(validate_slug).transpose()?,
        title: fields.title.map(normalize_title),
        target,
        redirect_kind: fields.redirect_kind,
        no_follow: fields.no_follow,
        sponsored: fields.sponsored,
        track_enabled: fields.track_enabled,
        categories: fields.categories.map(normalize_categories),
        expires_at: match fields.expires_at {
            Some(Some(raw)) => Some(parse_expiry(&raw)?),
            Some(None) => Some(None),
            None => None,
        },
    })
}

fn build_target(
    target_url: Option<String>,
    rotation: Option<Vec<VariantFields>>,
) -> Result<Target, ValidationError> {
    match (target_url, rotation) {
        (Some(_), Some(_)) => Err(ValidationError::AmbiguousTarget),
        (Some(url), None) => Ok(Target::Single(validate_url(&url)?)),
        (None, Some(variants)) => build_rotation(variants),
        (None, None) => Err(ValidationError::MissingTarget),
    }
}

fn build_rotation(variants: Vec<VariantFields>) -> Result<Target, ValidationError> {
    if variants.is_empty() {
        return Err(ValidationError::EmptyRotation);
    }

    variants
        .into_iter()
        .map(|v| {
            if v.weight <= 0 {
                return Err(ValidationError::NonPositiveWeight {
                    url: v.url,
                    weight: v.weight,
                });
            }
            if v.weight > MAX_WEIGHT {
                return Err(ValidationError::WeightTooLarge {
                    url: v.url,
                    weight: v.weight,
                });
            }
            Ok(RotationVariant {
                url: validate_url(&v.url)?,
                weight: v.weight as u32,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Target::Rotation)
}

fn validate_url(url: &str) -> Result<String, ValidationError> {
    validate_target_url(url).map_err(|e| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn normalize_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Trims names, drops empty ones and removes duplicates, keeping first-seen order.
fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(categories.len());
    for name in categories {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|c| c == name) {
            out.push(name.to_string());
        }
    }
    out
}
