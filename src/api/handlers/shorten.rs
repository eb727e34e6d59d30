//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};
use chrono::{TimeDelta, Utc};
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::extract_client_key;

/// Creates a short link, charged against the caller's quota.
///
/// # Endpoint
///
/// `POST /api/v1/shortener`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "example.com/page",
///   "customShort": "promo",  // optional
///   "expiry": 48             // optional, hours
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "short.ly/promo",
///   "customShort": "promo",
///   "expiry": 48,
///   "rateLimitRemaining": 9,
///   "xRateLimitReset": "2026-01-01T12:30:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for an unparsable body, invalid URL or malformed custom code
/// - 403 if the custom code is already in use
/// - 503 with `rateLimitReset` (minutes) and `Retry-After` when the quota is spent
/// - 500 on store failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let client_key = extract_client_key(&headers, addr, state.behind_proxy);

    let outcome = state
        .shorten_service
        .shorten(
            &client_key,
            &payload.url,
            payload.custom_short.as_deref(),
            payload.expiry,
        )
        .await?;

    let reset_in = TimeDelta::from_std(outcome.quota.reset_after).unwrap_or(TimeDelta::zero());

    Ok(Json(ShortenResponse {
        url: state.shorten_service.short_url(&outcome.link.code),
        custom_short: outcome.link.code,
        expiry: outcome.link.ttl_hours,
        rate_limit_remaining: outcome.quota.remaining,
        x_rate_limit_reset: Utc::now() + reset_in,
    }))
}
