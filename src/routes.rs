//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`           - Short link redirect (unmetered)
//! - `GET  /health`           - Health check of both store namespaces
//! - `POST /api/v1/shortener` - Create a short link (metered per client)
//!
//! # Middleware
//!
//! - **Deadline** - Per-request timeout, 504 on expiry
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{deadline, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without path normalization.
///
/// Integration tests mount this directly so they can add their own
/// connect-info layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), deadline::layer))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Client identity for the quota is resolved per request from
/// `state.behind_proxy`, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
