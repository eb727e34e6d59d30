//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Versioned API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /v1/shortener` - Create a short link (metered per client)
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/v1/shortener", post(shorten_handler))
}
