//! Per-request deadline middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Bounds the whole request by the configured deadline.
///
/// When the deadline elapses the in-flight handler future is dropped and
/// `504 Gateway Timeout` is returned. Store writes already issued keep their
/// TTL, so nothing orphaned outlives its expiry.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), deadline::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match tokio::time::timeout(st.request_timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                %method,
                path,
                timeout_secs = st.request_timeout.as_secs(),
                "Request deadline exceeded"
            );
            AppError::Timeout.into_response()
        }
    }
}
