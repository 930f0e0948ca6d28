//! Client identification utilities
//!
//! Resolves the caller's IP for rate limiting from proxy headers, falling back
//! to the socket peer address.

use std::convert::Infallible;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Identity used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted in order; `x-forwarded-for` contributes its first entry.
const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolve the client IP string
///
/// Order: `cf-connecting-ip`, `x-real-ip`, first entry of `x-forwarded-for`,
/// the direct peer address, then [`UNKNOWN_CLIENT`]. Header values are used
/// verbatim (trimmed); they are only ever a rate-limit key.
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header_value(CF_CONNECTING_IP)
        .or_else(|| header_value(X_REAL_IP))
        .or_else(|| {
            header_value(X_FORWARDED_FOR)
                .and_then(|xff| xff.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Extractor yielding the resolved client IP
///
/// Reads `ConnectInfo<SocketAddr>` when the server was started with
/// `into_make_service_with_connect_info`; works without it too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientIp(extract_client_ip(&parts.headers, peer)))
    }
}
