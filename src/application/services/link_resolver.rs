//! Slug resolution: expiry, weighted rotation and target validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, error, warn};

use crate::domain::entities::{Link, RedirectKind, RotationVariant, Target};
use crate::domain::repositories::LinkRepository;
use crate::utils::url_validator::is_redirectable;

/// A link that is allowed to redirect right now, with its target chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link_id: i64,
    pub slug: String,
    pub target: String,
    pub redirect_kind: RedirectKind,
    pub track_enabled: bool,
    pub no_follow: bool,
    pub sponsored: bool,
}

/// Why a slug cannot be redirected.
///
/// Carries no link data so it can be mapped to a response without leaking
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("link not found")]
    NotFound,

    #[error("link has expired")]
    Expired,

    #[error("link target is invalid")]
    Invalid,

    #[error("link store unavailable")]
    Unavailable,
}

/// Resolves slugs to redirect targets.
///
/// The random source used for rotation is passed per call, so the resolver
/// holds no mutable state and tests can use a seeded generator.
pub struct LinkResolver<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> LinkResolver<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Looks up `slug` and decides whether it may redirect at `now`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] - no active link with this slug
    /// - [`ResolveError::Expired`] - `now >= expires_at`
    /// - [`ResolveError::Invalid`] - the chosen target fails URL validation
    /// - [`ResolveError::Unavailable`] - the store failed; details are logged
    pub async fn resolve<G>(
        &self,
        slug: &str,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> Result<ResolvedLink, ResolveError>
    where
        G: Rng + Send,
    {
        let link = match self.repository.find_by_slug(slug).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                debug!(slug, "Slug not found");
                return Err(ResolveError::NotFound);
            }
            Err(e) => {
                error!(slug, error = %e, "Link lookup failed");
                return Err(ResolveError::Unavailable);
            }
        };

        evaluate(&link, now, rng)
    }
}

/// Applies expiry, rotation and validation rules to an already-loaded link.
pub fn evaluate<G>(
    link: &Link,
    now: DateTime<Utc>,
    rng: &mut G,
) -> Result<ResolvedLink, ResolveError>
where
    G: Rng,
{
    if link.is_expired_at(now) {
        debug!(link_id = link.id, "Link expired");
        return Err(ResolveError::Expired);
    }

    let target = match &link.target {
        Target::Single(url) => url.as_str(),
        Target::Rotation(variants) => match select_variant(variants, rng) {
            Some(variant) => variant.url.as_str(),
            None => {
                warn!(link_id = link.id, "Rotation has no selectable variant");
                return Err(ResolveError::Invalid);
            }
        },
    };

    if !is_redirectable(target) {
        warn!(link_id = link.id, "Stored target failed validation");
        return Err(ResolveError::Invalid);
    }

    Ok(ResolvedLink {
        link_id: link.id,
        slug: link.slug.clone(),
        target: target.to_string(),
        redirect_kind: link.redirect_kind,
        track_enabled: link.attributes.track_enabled,
        no_follow: link.attributes.no_follow,
        sponsored: link.attributes.sponsored,
    })
}

/// Weighted draw over `variants` in their stored order.
///
/// Draws `r` uniformly in `[0, total_weight)` and returns the first variant
/// whose cumulative weight exceeds `r`, so each variant is picked with
/// probability `weight / total_weight`. Returns `None` if the set is empty or
/// every weight is zero.
pub fn select_variant<'a, G>(
    variants: &'a [RotationVariant],
    rng: &mut G,
) -> Option<&'a RotationVariant>
where
    G: Rng,
{
    let total: u64 = variants.iter().map(|v| u64::from(v.weight)).sum();
    if total == 0 {
        return None;
    }

    let r = rng.random_range(0..total);
    let mut cumulative = 0u64;

    variants.iter().find(|v| {
        cumulative += u64::from(v.weight);
        cumulative > r
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkAttributes, NewLink};
    use crate::domain::errors::StoreError;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn link(target: Target, expires_at: Option<DateTime<Utc>>) -> Link {
        NewLink {
            slug: "promo".to_string(),
            title: None,
            target,
            redirect_kind: RedirectKind::TemporaryStrict,
            attributes: LinkAttributes::default(),
            categories: vec![],
            expires_at,
        }
        .into_link(7, Utc::now())
    }

    fn single(url: &str) -> Target {
        Target::Single(url.to_string())
    }

    fn rotation(pairs: &[(&str, u32)]) -> Target {
        Target::Rotation(
            pairs
                .iter()
                .map(|(url, weight)| RotationVariant {
                    url: url.to_string(),
                    weight: *weight,
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_resolve_round_trip() {
        let mut repo = MockLinkRepository::new();
        let stored = link(single("https://example.com/x"), None);
        repo.expect_find_by_slug()
            .withf(|slug| slug == "promo")
            .returning(move |_| Ok(Some(stored.clone())));

        let resolver = LinkResolver::new(Arc::new(repo));
        let mut rng = StdRng::seed_from_u64(1);
        let resolved = resolver
            .resolve("promo", Utc::now(), &mut rng)
            .await
            .unwrap();

        assert_eq!(resolved.target, "https://example.com/x");
        assert_eq!(resolved.link_id, 7);
        assert_eq!(resolved.slug, "promo");
        assert_eq!(resolved.redirect_kind, RedirectKind::TemporaryStrict);
        assert!(resolved.track_enabled);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug().returning(|_| Ok(None));

        let resolver = LinkResolver::new(Arc::new(repo));
        let result = resolver
            .resolve("missing", Utc::now(), &mut StdRng::seed_from_u64(1))
            .await;

        assert_eq!(result, Err(ResolveError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_unavailable() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug()
            .returning(|_| Err(StoreError::Backend("connection reset".to_string())));

        let resolver = LinkResolver::new(Arc::new(repo));
        let result = resolver
            .resolve("promo", Utc::now(), &mut StdRng::seed_from_u64(1))
            .await;

        assert_eq!(result, Err(ResolveError::Unavailable));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let l = link(single("https://example.com"), None);
        let mut rng = StdRng::seed_from_u64(1);

        for days in [0, 1, 365, 36_500] {
            let now = Utc::now() + Duration::days(days);
            assert!(evaluate(&l, now, &mut rng).is_ok());
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let t = Utc::now();
        let l = link(single("https://example.com"), Some(t));
        let mut rng = StdRng::seed_from_u64(1);

        assert!(evaluate(&l, t - Duration::seconds(1), &mut rng).is_ok());
        assert_eq!(evaluate(&l, t, &mut rng), Err(ResolveError::Expired));
        assert_eq!(
            evaluate(&l, t + Duration::hours(1), &mut rng),
            Err(ResolveError::Expired)
        );
    }

    #[test]
    fn test_invalid_stored_target() {
        let l = link(single("not a url"), None);
        let result = evaluate(&l, Utc::now(), &mut StdRng::seed_from_u64(1));

        assert_eq!(result, Err(ResolveError::Invalid));
    }

    #[test]
    fn test_rotation_even_split() {
        let l = link(rotation(&[("https://a.example", 1), ("https://b.example", 1)]), None);
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();

        let a = (0..10_000)
            .filter(|_| evaluate(&l, now, &mut rng).unwrap().target == "https://a.example")
            .count();

        assert!((4_700..=5_300).contains(&a), "a was chosen {a} times");
    }

    #[test]
    fn test_rotation_respects_weights() {
        let variants = vec![
            RotationVariant {
                url: "https://a.example".to_string(),
                weight: 3,
            },
            RotationVariant {
                url: "https://b.example".to_string(),
                weight: 1,
            },
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let a = (0..20_000)
            .filter(|_| select_variant(&variants, &mut rng).unwrap().url == "https://a.example")
            .count();

        assert!((14_500..=15_500).contains(&a), "a was chosen {a} times");
    }

    #[test]
    fn test_rotation_is_deterministic_for_seed() {
        let l = link(
            rotation(&[
                ("https://a.example", 2),
                ("https://b.example", 5),
                ("https://c.example", 1),
            ]),
            None,
        );
        let now = Utc::now();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| evaluate(&l, now, &mut rng).unwrap().target)
                .collect::<Vec<_>>()
        };

        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn test_rotation_single_variant_always_chosen() {
        let variants = vec![RotationVariant {
            url: "https://only.example".to_string(),
            weight: 5,
        }];
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            assert_eq!(
                select_variant(&variants, &mut rng).unwrap().url,
                "https://only.example"
            );
        }
    }

    #[test]
    fn test_rotation_without_weight_is_invalid() {
        assert!(select_variant(&[], &mut StdRng::seed_from_u64(1)).is_none());

        let l = link(rotation(&[("https://a.example", 0)]), None);
        let result = evaluate(&l, Utc::now(), &mut StdRng::seed_from_u64(1));
        assert_eq!(result, Err(ResolveError::Invalid));
    }

    #[test]
    fn test_rotation_checks_selected_url() {
        let l = link(rotation(&[("javascript:alert(1)", 1)]), None);
        let result = evaluate(&l, Utc::now(), &mut StdRng::seed_from_u64(1));

        assert_eq!(result, Err(ResolveError::Invalid));
    }
}
