//! Client address extraction.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Determines the client IP for a request.
///
/// With `behind_proxy`, the first address of `X-Forwarded-For` wins, then
/// `X-Real-IP`, then the socket peer. Without it, forwarding headers are
/// ignored since any client can set them.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> Option<String> {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}
