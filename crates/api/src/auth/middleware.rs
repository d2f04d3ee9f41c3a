//! Bearer authentication middleware for Axum
//!
//! Verifies the session credential presented on protected routes and
//! exposes the decoded identity to downstream handlers as an `AuthUser`
//! request extension. Role checks themselves live in the lifecycle
//! manager, not here.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::accounts::Role;
use crate::error::ApiError;

use super::jwt::JwtManager;

/// Authenticated identity decoded from a session credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub role: Role,
}

/// State needed for authentication
#[derive(Clone)]
pub struct AuthState {
    pub jwt_manager: JwtManager,
}

/// Extract a bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(String::from)
}

/// Middleware that requires a valid session credential
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(token) = extract_bearer_token(&request) else {
        tracing::warn!(path = %path, "require_auth: missing bearer token");
        return ApiError::Unauthorized.into_response();
    };

    match auth_state.jwt_manager.verify(&token) {
        Ok(claims) => {
            let auth_user = AuthUser {
                account_id: claims.sub,
                role: claims.role,
            };
            tracing::debug!(
                path = %path,
                account_id = %auth_user.account_id,
                role = %auth_user.role,
                "require_auth: authentication successful"
            );
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %path, "require_auth: invalid session credential");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request {
        Request::builder()
            .uri("/api/v1/lecturers")
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let request = request_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&request), Some("abc.def.ghi".into()));
    }

    #[test]
    fn rejects_non_bearer_schemes() {
        let request = request_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&request), None);
    }

    #[test]
    fn missing_header_yields_none() {
        let request = Request::builder()
            .uri("/api/v1/lecturers")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_bearer_token(&request), None);
    }
}
