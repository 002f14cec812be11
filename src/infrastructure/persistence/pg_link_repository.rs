//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use std::sync::Arc;

use crate::domain::entities::{
    Link, LinkAttributes, LinkPatch, NewLink, RedirectKind, RotationVariant, Target,
};
use crate::domain::errors::{StoreError, ValidationError};
use crate::domain::repositories::LinkRepository;

const LINK_COLUMNS: &str = "id, slug, title, target_url, rotation, redirect_status, \
     no_follow, sponsored, track_enabled, categories, expires_at, \
     created_at, updated_at, deleted_at";

/// Row shape of the `links` table.
#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    slug: String,
    title: Option<String>,
    target_url: Option<String>,
    rotation: Option<Json<Vec<RotationVariant>>>,
    redirect_status: i16,
    no_follow: bool,
    sponsored: bool,
    track_enabled: bool,
    categories: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<LinkRow> for Link {
    type Error = StoreError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let redirect_kind = u16::try_from(row.redirect_status)
            .ok()
            .and_then(RedirectKind::from_status_code)
            .ok_or_else(|| {
                StoreError::Backend(format!(
                    "link {} has unsupported redirect status {}",
                    row.id, row.redirect_status
                ))
            })?;

        // Rotation wins over target_url, mirroring how rows are written.
        let target = match (row.rotation, row.target_url) {
            (Some(Json(variants)), _) => Target::Rotation(variants),
            (None, Some(url)) => Target::Single(url),
            (None, None) => {
                return Err(StoreError::Backend(format!(
                    "link {} has no target",
                    row.id
                )));
            }
        };

        Ok(Link {
            id: row.id,
            slug: row.slug,
            title: row.title,
            target,
            redirect_kind,
            attributes: LinkAttributes {
                no_follow: row.no_follow,
                sponsored: row.sponsored,
                track_enabled: row.track_enabled,
            },
            categories: row.categories,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn target_columns(target: &Target) -> (Option<String>, Option<Json<Vec<RotationVariant>>>) {
    match target {
        Target::Single(url) => (Some(url.clone()), None),
        Target::Rotation(variants) => (None, Some(Json(variants.clone()))),
    }
}

/// Translates a write failure, turning the active-slug index violation into
/// a `DuplicateSlug` validation error.
fn map_write_error(e: sqlx::Error, slug: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return ValidationError::DuplicateSlug(slug.to_string()).into();
    }
    e.into()
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Slug uniqueness is enforced by a partial unique index over rows with
/// `deleted_at IS NULL`, so soft-deleted links free their slug.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let (target_url, rotation) = target_columns(&new_link.target);
        let sql = format!(
            "INSERT INTO links (slug, title, target_url, rotation, redirect_status, \
             no_follow, sponsored, track_enabled, categories, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.slug)
            .bind(&new_link.title)
            .bind(target_url)
            .bind(rotation)
            .bind(new_link.redirect_kind.status_code() as i16)
            .bind(new_link.attributes.no_follow)
            .bind(new_link.attributes.sponsored)
            .bind(new_link.attributes.track_enabled)
            .bind(&new_link.categories)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_write_error(e, &new_link.slug))?;

        row.try_into()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError> {
        let sql =
            format!("SELECT {LINK_COLUMNS} FROM links WHERE slug = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Link::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Link::try_from)
            .transpose()
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        let mut link: Link = sqlx::query_as::<_, LinkRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?
            .try_into()?;

        patch.apply(&mut link, Utc::now());
        let (target_url, rotation) = target_columns(&link.target);

        let update = format!(
            "UPDATE links SET slug = $2, title = $3, target_url = $4, rotation = $5, \
             redirect_status = $6, no_follow = $7, sponsored = $8, track_enabled = $9, \
             categories = $10, expires_at = $11, updated_at = $12 \
             WHERE id = $1 RETURNING {LINK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, LinkRow>(&update)
            .bind(id)
            .bind(&link.slug)
            .bind(&link.title)
            .bind(target_url)
            .bind(rotation)
            .bind(link.redirect_kind.status_code() as i16)
            .bind(link.attributes.no_follow)
            .bind(link.attributes.sponsored)
            .bind(link.attributes.track_enabled)
            .bind(&link.categories)
            .bind(link.expires_at)
            .bind(link.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &link.slug))?;

        tx.commit().await?;
        row.try_into()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE links SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        page: i64,
        page_size: i64,
        category: Option<String>,
    ) -> Result<Vec<Link>, StoreError> {
        let offset = (page.max(1) - 1) * page_size;
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR $1 = ANY(categories)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );

        sqlx::query_as::<_, LinkRow>(&sql)
            .bind(category)
            .bind(page_size)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(Link::try_from)
            .collect()
    }

    async fn count(&self, category: Option<String>) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR $1 = ANY(categories))",
        )
        .bind(category)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> LinkRow {
        let now = Utc::now();
        LinkRow {
            id: 3,
            slug: "promo".to_string(),
            title: None,
            target_url: Some("https://example.com/x".to_string()),
            rotation: None,
            redirect_status: 301,
            no_follow: true,
            sponsored: false,
            track_enabled: true,
            categories: vec!["spring".to_string()],
            expires_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_row_conversion_single_target() {
        let link = Link::try_from(row()).unwrap();

        assert_eq!(link.target, Target::Single("https://example.com/x".into()));
        assert_eq!(link.redirect_kind, RedirectKind::Permanent);
        assert!(link.attributes.no_follow);
        assert_eq!(link.categories, vec!["spring".to_string()]);
    }

    #[test]
    fn test_row_conversion_prefers_rotation() {
        let mut r = row();
        r.rotation = Some(Json(vec![RotationVariant {
            url: "https://a.example".into(),
            weight: 2,
        }]));

        let link = Link::try_from(r).unwrap();
        assert!(link.target.is_rotation());
    }

    #[test]
    fn test_row_conversion_rejects_unknown_status() {
        let mut r = row();
        r.redirect_status = 303;
        assert!(matches!(Link::try_from(r), Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_row_conversion_rejects_missing_target() {
        let mut r = row();
        r.target_url = None;
        assert!(matches!(Link::try_from(r), Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_target_columns() {
        let (url, rotation) = target_columns(&Target::Single("https://a.example".into()));
        assert_eq!(url.as_deref(), Some("https://a.example"));
        assert!(rotation.is_none());
    }
}
