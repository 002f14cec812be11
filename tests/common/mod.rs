#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use linkhop::application::services::{AuthService, ClickTracker};
use linkhop::domain::click_event::ClickEvent;
use linkhop::domain::entities::{Link, LinkFields, LinkPatch, NewLink, VariantFields};
use linkhop::domain::errors::StoreError;
use linkhop::domain::repositories::LinkRepository;
use linkhop::infrastructure::persistence::InMemoryLinkRepository;
use linkhop::routes::build_router;
use linkhop::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";

/// Everything a handler test needs: the state, the store behind it and the
/// receiving end of the click queue.
pub struct TestContext {
    pub state: AppState,
    pub repo: Arc<InMemoryLinkRepository>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_context() -> TestContext {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (tx, clicks) = mpsc::channel(100);

    let state = AppState::new(
        repo.clone(),
        ClickTracker::new(tx),
        Some(AuthService::new(ADMIN_TOKEN)),
        false,
    );

    TestContext { state, repo, clicks }
}

pub fn test_server(state: AppState) -> TestServer {
    let app = build_router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

pub fn link_fields(slug: &str, url: &str) -> LinkFields {
    LinkFields {
        slug: slug.to_string(),
        target_url: Some(url.to_string()),
        ..Default::default()
    }
}

pub fn rotation_fields(slug: &str, variants: &[(&str, i64)]) -> LinkFields {
    LinkFields {
        slug: slug.to_string(),
        rotation: Some(
            variants
                .iter()
                .map(|(url, weight)| VariantFields {
                    url: url.to_string(),
                    weight: *weight,
                })
                .collect(),
        ),
        ..Default::default()
    }
}

pub async fn create_link(state: &AppState, fields: LinkFields) -> Link {
    state.link_service.create(fields).await.unwrap()
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A store whose backend is down.
pub struct FailingRepository;

#[async_trait]
impl LinkRepository for FailingRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Link>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Link>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn update(&self, _id: i64, _patch: LinkPatch) -> Result<Link, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn list(
        &self,
        _page: i64,
        _page_size: i64,
        _category: Option<String>,
    ) -> Result<Vec<Link>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn count(&self, _category: Option<String>) -> Result<i64, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}
