//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use url::Url;

use crate::domain::repositories::StoreError;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Unmetered. A hit bumps the global redirect counter (best-effort).
///
/// # Errors
///
/// - 404 if the code is unknown or expired
/// - 500 if the store cannot be reached
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.resolve_service.resolve(&code).await?;
    let location = location_header(&target)?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}

/// Builds a `Location` value, percent-encoding targets that are not plain ASCII.
fn location_header(target: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(target) {
        return Ok(value);
    }

    Url::parse(target)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            StoreError::InvalidData(format!("stored target is not a valid location: {target}"))
                .into()
        })
}
