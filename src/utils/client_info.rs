//! Visitor metadata extraction from HTTP request headers.

use axum::http::{HeaderMap, header};
use std::net::SocketAddr;

use crate::domain::click_event::VisitorContext;

/// Reads a header as UTF-8, ignoring empty or non-text values.
pub fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Determines the client IP address.
///
/// When `behind_proxy` is true the first `X-Forwarded-For` entry (or
/// `X-Real-IP`) wins; otherwise only the socket peer address is trusted.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        }) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Collects the visitor context attached to a click event.
pub fn visitor_context(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> VisitorContext {
    VisitorContext {
        ip: Some(client_ip(headers, peer, behind_proxy)),
        user_agent: header_str(headers, header::USER_AGENT).map(str::to_string),
        referrer: header_str(headers, header::REFERER).map(str::to_string),
        language: header_str(headers, header::ACCEPT_LANGUAGE)
            .and_then(|v| v.split([',', ';']).next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
    }
}
