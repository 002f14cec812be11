//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /go/{slug}` - Short link redirect (public)
//! - `GET  /health`    - Health check: link store, click queue (public)
//! - `/api/*`          - Authoring API (Bearer token, mounted only when an
//!   admin token is configured)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash trimmed, so `/go/{slug}/` works

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and middleware without path normalization.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/go/{slug}", get(redirect_handler))
        .route("/health", get(health_handler));

    if state.auth_service.is_some() {
        let api_router = api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
        router = router.nest("/api", api_router);
    }

    router.with_state(state).layer(tracing::layer())
}

/// Constructs the application service with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
