//! Auth flow handlers
//!
//! Handlers are thin: boundary validation, one lifecycle call, response
//! shaping. Status codes come from the `ApiError` taxonomy.

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::accounts::{PublicProfile, Role};
use crate::auth::{AuthUser, MIN_PASSWORD_LEN};
use crate::error::{ApiError, ApiResult};
use crate::lifecycle::{LecturerProvisioning, Registration};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Ops utility body; fields are optional so absence maps to 400, not a
/// framework-level rejection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub role: Role,
}

// =============================================================================
// Boundary validation
// =============================================================================

fn validate_email(email: &str) -> ApiResult<()> {
    let well_formed = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.contains(char::is_whitespace);
    if !well_formed {
        return Err(ApiError::Validation("A valid email is required".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_non_empty(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_registration(reg: &Registration) -> ApiResult<()> {
    validate_non_empty(reg.full_name(), "fullName")?;
    validate_email(reg.email())?;
    validate_password(reg.password())?;
    match reg {
        Registration::Student {
            student_id,
            department,
            ..
        } => {
            validate_non_empty(student_id, "studentId")?;
            validate_non_empty(department, "department")?;
        }
        Registration::Lecturer {
            lecturer_id,
            department,
            specialization,
            ..
        } => {
            validate_non_empty(lecturer_id, "lecturerId")?;
            validate_non_empty(department, "department")?;
            validate_non_empty(specialization, "specialization")?;
        }
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    validate_registration(&registration)?;

    state.lifecycle.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful. Please check your email to verify."
        })),
    ))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> ApiResult<Json<SessionResponse>> {
    let (_profile, token) = state.lifecycle.verify_email(&query.token).await?;

    Ok(Json(SessionResponse {
        message: "Email verified successfully".to_string(),
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validate_email(&body.email)?;
    validate_non_empty(&body.password, "password")?;

    let (user, token) = state.lifecycle.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_email(&body.email)?;

    state.lifecycle.forgot_password(&body.email).await?;

    // Identical body whether or not the account exists
    Ok(Json(json!({
        "message": "If an account exists with that email, you will receive a reset link shortly."
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_non_empty(&body.token, "token")?;
    validate_password(&body.password)?;

    state
        .lifecycle
        .reset_password(&body.token, &body.password)
        .await?;

    Ok(Json(json!({
        "message": "Password has been reset successfully. You can now log in with your new password."
    })))
}

pub async fn create_lecturer(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(fields): Json<LecturerProvisioning>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    validate_non_empty(&fields.full_name, "fullName")?;
    validate_email(&fields.email)?;
    validate_password(&fields.password)?;
    validate_non_empty(&fields.lecturer_id, "lecturerId")?;
    validate_non_empty(&fields.department, "department")?;
    validate_non_empty(&fields.specialization, "specialization")?;

    let user = state
        .lifecycle
        .create_lecturer(auth_user.role, fields)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Lecturer created successfully",
            "user": user,
        })),
    ))
}

/// Ops utility: synchronous send with its own delivery verdict
pub async fn send_email(
    State(state): State<AppState>,
    Json(body): Json<SendEmailRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let (Some(to), Some(subject), Some(html)) = (body.to, body.subject, body.html_content) else {
        return Err(ApiError::Validation(
            "Missing required fields: to, subject, htmlContent".into(),
        ));
    };

    state
        .mailer
        .send(&to, &subject, &html)
        .await
        .map_err(ApiError::Delivery)?;

    Ok(Json(json!({
        "success": true,
        "message": "Email queued for delivery",
    })))
}

/// Identity echo for authenticated callers
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.account_id,
        role: auth_user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@uni.edu").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn registration_validation_covers_role_fields() {
        let reg: Registration = serde_json::from_str(
            r#"{
                "role": "student",
                "fullName": "Ada Lovelace",
                "email": "a@x.com",
                "password": "secret123",
                "studentId": "  ",
                "department": "CS"
            }"#,
        )
        .unwrap();
        assert!(validate_registration(&reg).is_err());
    }

    #[test]
    fn send_email_body_accepts_partial_json() {
        let body: SendEmailRequest =
            serde_json::from_str(r#"{"to": "a@x.com", "subject": "Hi"}"#).unwrap();
        assert!(body.html_content.is_none());
    }
}
