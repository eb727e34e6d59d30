//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest expiry a caller may request: one year.
pub const MAX_EXPIRY_HOURS: u64 = 8760;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// Target URL; a missing scheme is filled in with `http://`.
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Optional custom short code. Empty means "generate one".
    #[serde(default)]
    pub custom_short: Option<String>,

    /// Expiry in hours. Absent or 0 means the server default.
    #[serde(default)]
    #[validate(range(max = 8760, message = "expiry must be at most 8760 hours"))]
    pub expiry: Option<u64>,
}

/// Created short link plus the caller's quota state.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    /// Full short URL (`<domain>/<code>`).
    pub url: String,
    /// The short code, custom or generated.
    pub custom_short: String,
    /// Effective expiry in hours.
    pub expiry: u64,
    pub rate_limit_remaining: i64,
    /// Instant at which the caller's quota window resets.
    pub x_rate_limit_reset: DateTime<Utc>,
}
