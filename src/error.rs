use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(rename = "rateLimitReset", skip_serializing_if = "Option::is_none")]
    rate_limit_reset: Option<u64>,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed request body or custom code.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Target URL is malformed or points back at this service.
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("custom short already in use")]
    CodeInUse { code: String },

    #[error("rate limit exceeded")]
    QuotaExceeded { reset_after: Duration },

    #[error("short url not found")]
    NotFound { code: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("request deadline exceeded")]
    Timeout,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeInUse { .. } => StatusCode::FORBIDDEN,
            AppError::QuotaExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// Whole minutes until a window resets, rounded up so a client is never told "0".
fn reset_minutes(reset_after: Duration) -> u64 {
    reset_after.as_secs().div_ceil(60)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (body, retry_after) = match self {
            AppError::Validation { message, details } => (
                ErrorBody {
                    error: message,
                    details: Some(details),
                    rate_limit_reset: None,
                },
                None,
            ),
            AppError::InvalidUrl { reason } => (
                ErrorBody {
                    error: "Invalid URL".to_string(),
                    details: Some(json!({ "reason": reason })),
                    rate_limit_reset: None,
                },
                None,
            ),
            AppError::QuotaExceeded { reset_after } => (
                ErrorBody {
                    error: "rate limit exceeded".to_string(),
                    details: None,
                    rate_limit_reset: Some(reset_minutes(reset_after)),
                },
                Some(reset_after.as_secs().max(1)),
            ),
            AppError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Store failure while handling request");
                (
                    ErrorBody {
                        error: "unable to process request".to_string(),
                        details: None,
                        rate_limit_reset: None,
                    },
                    None,
                )
            }
            other => (
                ErrorBody {
                    error: other.to_string(),
                    details: None,
                    rate_limit_reset: None,
                },
                None,
            ),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(seconds) = retry_after
            && let Ok(value) = HeaderValue::from_str(&seconds.to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        AppError::bad_request("Invalid request body", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "cannot parse JSON",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_url("empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CodeInUse {
                code: "abc".to_string()
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::QuotaExceeded {
                reset_after: Duration::from_secs(60)
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::not_found("nope").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::Unavailable("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_reset_minutes_rounds_up() {
        assert_eq!(reset_minutes(Duration::from_secs(0)), 0);
        assert_eq!(reset_minutes(Duration::from_secs(1)), 1);
        assert_eq!(reset_minutes(Duration::from_secs(60)), 1);
        assert_eq!(reset_minutes(Duration::from_secs(1799)), 30);
    }

    #[test]
    fn test_quota_exceeded_sets_retry_after() {
        let response = AppError::QuotaExceeded {
            reset_after: Duration::from_secs(120),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "120");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AppError::CodeInUse {
                code: "x".to_string()
            }
            .to_string(),
            "custom short already in use"
        );
        assert_eq!(AppError::not_found("x").to_string(), "short url not found");
    }
}
