//! Process-local link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::errors::{StoreError, ValidationError};
use crate::domain::repositories::LinkRepository;

#[derive(Default)]
struct Inner {
    links: HashMap<i64, Link>,
    /// Active slug index. Deleted links are removed from it.
    slugs: HashMap<String, i64>,
    next_id: i64,
}

impl Inner {
    fn active(&self, id: i64) -> Option<&Link> {
        self.links.get(&id).filter(|l| !l.is_deleted())
    }
}

/// In-memory repository used when no database is configured, and by tests.
///
/// Reads share a `tokio::sync::RwLock`; writes are serialized, which makes
/// the slug check and insert atomic.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a stored link as-is, skipping all validation.
    ///
    /// Lets tests simulate records corrupted outside the authoring path.
    pub async fn put_raw(&self, link: Link) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(link.id);
        let old_slug = inner.links.get(&link.id).map(|old| old.slug.clone());
        if let Some(old_slug) = old_slug
            && inner.slugs.get(&old_slug) == Some(&link.id)
        {
            inner.slugs.remove(&old_slug);
        }
        if !link.is_deleted() {
            inner.slugs.insert(link.slug.clone(), link.id);
        }
        inner.links.insert(link.id, link);
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.slugs.contains_key(&new_link.slug) {
            return Err(ValidationError::DuplicateSlug(new_link.slug).into());
        }

        inner.next_id += 1;
        let link = new_link.into_link(inner.next_id, Utc::now());
        inner.slugs.insert(link.slug.clone(), link.id);
        inner.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .slugs
            .get(slug)
            .and_then(|id| inner.active(*id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.active(id).cloned())
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, StoreError> {
        let mut inner = self.inner.write().await;

        let mut link = inner.active(id).cloned().ok_or(StoreError::NotFound)?;
        let old_slug = link.slug.clone();

        if let Some(slug) = &patch.slug
            && *slug != old_slug
            && inner.slugs.contains_key(slug)
        {
            return Err(ValidationError::DuplicateSlug(slug.clone()).into());
        }

        patch.apply(&mut link, Utc::now());

        if link.slug != old_slug {
            inner.slugs.remove(&old_slug);
            inner.slugs.insert(link.slug.clone(), id);
        }
        inner.links.insert(id, link.clone());

        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(link) = inner.links.get_mut(&id).filter(|l| !l.is_deleted()) else {
            return Ok(false);
        };

        let now = Utc::now();
        link.deleted_at = Some(now);
        link.updated_at = now;
        let slug = link.slug.clone();
        inner.slugs.remove(&slug);

        Ok(true)
    }

    async fn list(
        &self,
        page: i64,
        page_size: i64,
        category: Option<String>,
    ) -> Result<Vec<Link>, StoreError> {
        let inner = self.inner.read().await;

        let mut links: Vec<&Link> = inner
            .links
            .values()
            .filter(|l| !l.is_deleted())
            .filter(|l| category.as_ref().is_none_or(|c| l.categories.contains(c)))
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from((page.max(1) - 1) * page_size).unwrap_or(0);
        let limit = usize::try_from(page_size).unwrap_or(0);

        Ok(links
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, category: Option<String>) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        let count = inner
            .links
            .values()
            .filter(|l| !l.is_deleted())
            .filter(|l| category.as_ref().is_none_or(|c| l.categories.contains(c)))
            .count();
        Ok(count as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
