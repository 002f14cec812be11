//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, ClickTracker, LinkResolver, LinkService};
use crate::domain::click_event::FingerprintKey;
use crate::domain::repositories::LinkRepository;

/// Explicitly constructed services shared across requests.
///
/// Cloning is cheap: every field is an `Arc` or a channel sender.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub resolver: Arc<LinkResolver<dyn LinkRepository>>,
    pub click_tracker: ClickTracker,
    /// `None` when no admin token is configured; the authoring API is then
    /// not mounted.
    pub auth_service: Option<Arc<AuthService>>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the visitor IP.
    pub behind_proxy: bool,
    pub fingerprint_key: Arc<FingerprintKey>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        click_tracker: ClickTracker,
        auth_service: Option<AuthService>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone())),
            resolver: Arc::new(LinkResolver::new(repository)),
            click_tracker,
            auth_service: auth_service.map(Arc::new),
            behind_proxy,
            fingerprint_key: Arc::new(FingerprintKey::random()),
        }
    }

    /// Replaces the per-process random fingerprint key.
    pub fn with_fingerprint_key(mut self, key: FingerprintKey) -> Self {
        self.fingerprint_key = Arc::new(key);
        self
    }
}
