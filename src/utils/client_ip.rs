//! Client identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Derives the rate-limit key of a request.
///
/// Uses the peer socket address unless `behind_proxy` is set, in which case
/// the first address of `X-Forwarded-For` (or `X-Real-IP`) wins. Header values
/// that are not IP addresses are ignored so a client cannot pick an arbitrary
/// key.
///
/// # Examples
///
/// ```ignore
/// let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
/// assert_eq!(extract_client_key(&HeaderMap::new(), peer, false), "10.0.0.1");
/// ```
pub fn extract_client_key(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header_ip(headers, X_FORWARDED_FOR).or_else(|| header_ip(headers, X_REAL_IP))
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .and_then(|candidate| candidate.parse().ok())
}
