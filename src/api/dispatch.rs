//! Converts resolution results into HTTP responses.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::services::{ResolveError, ResolvedLink};
use crate::utils::url_validator::is_redirectable;

pub const INVALID_LINK_BODY: &str = "Invalid link.";
pub const EXPIRED_LINK_BODY: &str = "This link has expired.";
pub const UNAVAILABLE_BODY: &str = "Service temporarily unavailable.";

/// Final check before emitting a redirect: the target must still be a valid
/// http(s) URL and a legal `Location` header value.
///
/// Failures become [`ResolveError::Invalid`]. Run this before tracking so
/// that a click is only recorded for redirects that are actually sent.
pub fn ensure_redirectable(
    result: Result<ResolvedLink, ResolveError>,
) -> Result<ResolvedLink, ResolveError> {
    let link = result?;
    if !is_redirectable(&link.target) || HeaderValue::from_str(&link.target).is_err() {
        return Err(ResolveError::Invalid);
    }
    Ok(link)
}

/// Builds the response for a resolution result.
///
/// Error bodies are fixed strings and never contain link data.
pub fn dispatch(result: Result<ResolvedLink, ResolveError>) -> Response {
    match ensure_redirectable(result) {
        Ok(link) => redirect_response(&link),
        Err(e) => error_response(e),
    }
}

fn redirect_response(link: &ResolvedLink) -> Response {
    let (Ok(status), Ok(location)) = (
        StatusCode::from_u16(link.redirect_kind.status_code()),
        HeaderValue::from_str(&link.target),
    ) else {
        return error_response(ResolveError::Invalid);
    };

    let mut response = status.into_response();
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, location);
    // Sponsored links carry the same robots hint as no-follow ones.
    if link.no_follow || link.sponsored {
        headers.insert(
            "x-robots-tag",
            HeaderValue::from_static("noindex, nofollow"),
        );
    }
    if !link.redirect_kind.is_permanent() {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
    response
}

fn error_response(error: ResolveError) -> Response {
    let (status, body) = match error {
        ResolveError::NotFound | ResolveError::Invalid => {
            (StatusCode::NOT_FOUND, INVALID_LINK_BODY)
        }
        ResolveError::Expired => (StatusCode::GONE, EXPIRED_LINK_BODY),
        ResolveError::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY),
    };
    (status, body).into_response()
}
