//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::http::header::{RETRY_AFTER, WWW_AUTHENTICATE};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },

    /// The secret source could not be reached. Reported to the caller as a
    /// plain 401 so nothing about the backend leaks.
    #[error("external dependency failure")]
    ExternalDependency(#[source] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::ExternalDependency(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (status, Json(json!({ "error": "internal server error" }))).into_response()
            }
            AppError::ExternalDependency(e) => {
                tracing::warn!(error = %e, "external dependency failure");
                AppError::Unauthorized.into_response()
            }
            AppError::Unauthorized => (
                status,
                [(WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response(),
            AppError::RateLimited { retry_after } => (
                status,
                [(RETRY_AFTER, retry_after.to_string())],
                Json(json!({ "error": "Rate limit exceeded", "retry_after": retry_after })),
            )
                .into_response(),
            AppError::NotFound => (status, Json(json!({ "error": "not found" }))).into_response(),
        }
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
