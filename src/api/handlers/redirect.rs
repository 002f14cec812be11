//! Handler for short link redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    response::Response,
};
use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use std::net::SocketAddr;

use crate::api::dispatch::{dispatch, ensure_redirectable};
use crate::domain::click_event::ClickEvent;
use crate::state::AppState;
use crate::utils::client_info::visitor_context;

/// Redirects a slug to its target.
///
/// # Endpoint
///
/// `GET /go/{slug}`
///
/// # Request Flow
///
/// 1. Resolve the slug (expiry, rotation, target validation)
/// 2. Re-check the target right before responding
/// 3. If tracking is enabled for the link, hand a click event to the tracker
/// 4. Return the redirect with the link's status code
///
/// # Click Tracking
///
/// The tracker call never waits. If the queue is full the click is dropped;
/// the redirect is never affected.
///
/// # Errors
///
/// - 404 `Invalid link.` for unknown, deleted or invalid links
/// - 410 `This link has expired.`
/// - 503 `Service temporarily unavailable.` when the store fails
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let now = Utc::now();
    let mut rng = StdRng::from_rng(&mut rand::rng());

    let result = ensure_redirectable(state.resolver.resolve(&slug, now, &mut rng).await);

    if let Ok(link) = &result
        && link.track_enabled
    {
        let visitor = visitor_context(&headers, addr, state.behind_proxy);
        state.click_tracker.track(ClickEvent::new(
            link.link_id,
            link.slug.clone(),
            link.target.clone(),
            now,
            visitor,
            &state.fingerprint_key,
        ));
    }

    dispatch(result)
}
