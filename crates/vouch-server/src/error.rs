//! HTTP mapping for the workspace error taxonomy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vouch_core::error::VouchError;

/// Newtype so the core error can carry an `IntoResponse` impl.
#[derive(Debug)]
pub struct ApiError(pub VouchError);

impl From<VouchError> for ApiError {
    fn from(err: VouchError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn unauthorized(reason: &str) -> Self {
        ApiError(VouchError::AuthenticationFailed {
            reason: reason.into(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            VouchError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "VALIDATION", message.clone())
            }
            VouchError::InvalidOtp => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_OTP",
                self.0.to_string(),
            ),
            VouchError::OtpExpired => (StatusCode::GONE, "OTP_EXPIRED", self.0.to_string()),
            VouchError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                self.0.to_string(),
            ),
            VouchError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", self.0.to_string())
            }
            VouchError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", self.0.to_string()),
            VouchError::AuthenticationFailed { reason } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", reason.clone())
            }
            VouchError::Forbidden { reason } => (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone()),
            VouchError::Conflict { message } => (StatusCode::CONFLICT, "CONFLICT", message.clone()),
            VouchError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "internal server error".into(),
                )
            }
            VouchError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "code": code, "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
