//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Storage interface for short links.
///
/// Implementations receive already-validated input and are responsible for
/// the one invariant that needs the whole data set: slug uniqueness across
/// non-deleted links. Reads never return soft-deleted links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Stores a new link, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] with `DuplicateSlug` if an active link
    /// already uses the slug. Returns [`StoreError::Backend`] on storage failures.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds an active link by slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError>;

    /// Finds an active link by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError>;

    /// Partially updates an active link and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no active link has this id.
    /// Returns `DuplicateSlug` if the patch renames onto a slug in use; the
    /// stored link is left unchanged in that case.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, StoreError>;

    /// Soft-deletes a link, freeing its slug.
    ///
    /// Returns `Ok(false)` if no active link has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Lists active links, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    /// - `category` - Optional category filter
    async fn list(
        &self,
        page: i64,
        page_size: i64,
        category: Option<String>,
    ) -> Result<Vec<Link>, StoreError>;

    /// Counts active links, optionally filtered by category.
    async fn count(&self, category: Option<String>) -> Result<i64, StoreError>;

    /// Returns false if the backend cannot currently serve requests.
    async fn health_check(&self) -> bool;
}
