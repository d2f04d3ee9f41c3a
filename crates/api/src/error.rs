//! API error taxonomy
//!
//! Every lifecycle transition returns a typed `ApiError`; the `IntoResponse`
//! impl is the single place where errors become HTTP status codes and JSON
//! bodies. Storage errors are logged with full detail but always collapse to
//! a generic 500 body so internals never leak to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, rejected before reaching the lifecycle core
    #[error("{0}")]
    Validation(String),

    /// Email already registered
    #[error("User already exists")]
    DuplicateIdentity,

    /// Verification or reset token absent, consumed, or past its window
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Password mismatch
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No account with that email
    #[error("Account not found")]
    AccountNotFound,

    /// Login attempted before email verification
    #[error("Please verify your email before logging in.")]
    NotVerified,

    /// Requester lacks the role this operation requires
    #[error("Only admins can create lecturers")]
    Forbidden,

    /// Missing or invalid session credential
    #[error("Authentication required")]
    Unauthorized,

    /// Too many requests against a throttled endpoint
    #[error("Too many requests, please try again later")]
    RateLimited,

    /// Notification channel failed on a synchronous send
    #[error("Failed to send email")]
    Delivery(#[source] crate::email::MailerError),

    /// Durable storage unavailable or query failed
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::DuplicateIdentity
            | ApiError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AccountNotFound => StatusCode::NOT_FOUND,
            ApiError::NotVerified | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Delivery(_) | ApiError::Database(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            // Never leak storage internals to the boundary
            ApiError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Server error".to_string()
            }
            ApiError::Internal => "Server error".to_string(),
            ApiError::Delivery(e) => {
                tracing::error!(error = %e, "Email delivery failed");
                self.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_and_token_errors_are_400() {
        assert_eq!(
            status_of(ApiError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::DuplicateIdentity),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::InvalidOrExpiredToken),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn login_failures_map_to_distinct_statuses() {
        assert_eq!(status_of(ApiError::AccountNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::NotVerified), StatusCode::FORBIDDEN);
    }

    #[test]
    fn forbidden_and_unauthorized_are_separate() {
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn rate_limited_is_429() {
        assert_eq!(
            status_of(ApiError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn storage_errors_collapse_to_generic_500() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
