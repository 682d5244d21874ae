//! Client identity extraction for rate limiting.
//!
//! The rate limiter treats the client identity as an opaque string; this
//! module decides what that string is for an incoming HTTP request.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the client identity for a request.
///
/// By default this is the peer socket address. When `behind_proxy` is set the
/// `X-Forwarded-For` (first hop) and `X-Real-IP` headers take precedence, in
/// that order. Enable `behind_proxy` only when the service runs behind a
/// trusted reverse proxy, otherwise the headers are client-controlled.
pub fn client_identity(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        if let Some(real_ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return real_ip.to_string();
        }
    }

    peer.ip().to_string()
}
