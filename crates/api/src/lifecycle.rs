//! Credential lifecycle manager
//!
//! Orchestrates the per-account state machine
//! `Unregistered -> PendingVerification -> Verified` and the orthogonal
//! reset sub-flow, composing the account store, the secret hashers, the
//! token issuers, and the notification channel. Authorization decisions
//! (admin-only lecturer provisioning) are made here, not in routing.
//!
//! Every state mutation commits before its email is dispatched; delivery
//! failure is reported on the mailer's own channel and never rolls a
//! transition back.

use std::time::Duration as StdDuration;

use serde::Deserialize;
use time::OffsetDateTime;

use campushare_shared::RateLimiter;

use crate::accounts::{AccountStore, NewAccount, PublicProfile, Role};
use crate::auth::{
    generate_opaque_token, hash_password, hash_token, verify_password, JwtManager,
    RESET_TOKEN_TTL, VERIFICATION_TOKEN_TTL,
};
use crate::email::{reset_email, verification_email, Mailer};
use crate::error::{ApiError, ApiResult};

/// Forgot-password throttle: per email, regardless of account existence
const FORGOT_PASSWORD_MAX_REQUESTS: usize = 3;
const FORGOT_PASSWORD_WINDOW: StdDuration = StdDuration::from_secs(15 * 60);

/// Registration fields, tagged by role
///
/// Conditionally required fields are structural: a student registration
/// cannot carry a lecturer id at all, and a lecturer registration without
/// a specialization fails deserialization before reaching the core.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Registration {
    #[serde(rename_all = "camelCase")]
    Student {
        full_name: String,
        email: String,
        password: String,
        student_id: String,
        department: String,
    },
    #[serde(rename_all = "camelCase")]
    Lecturer {
        full_name: String,
        email: String,
        password: String,
        lecturer_id: String,
        department: String,
        specialization: String,
    },
}

impl Registration {
    pub fn email(&self) -> &str {
        match self {
            Registration::Student { email, .. } | Registration::Lecturer { email, .. } => email,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Registration::Student { full_name, .. }
            | Registration::Lecturer { full_name, .. } => full_name,
        }
    }

    pub fn password(&self) -> &str {
        match self {
            Registration::Student { password, .. }
            | Registration::Lecturer { password, .. } => password,
        }
    }
}

/// Fields for admin-driven lecturer provisioning
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerProvisioning {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub lecturer_id: String,
    pub department: String,
    pub specialization: String,
}

#[derive(Clone)]
pub struct LifecycleManager {
    store: AccountStore,
    jwt: JwtManager,
    mailer: Mailer,
    forgot_password_limiter: RateLimiter,
    client_url: String,
}

impl LifecycleManager {
    pub fn new(store: AccountStore, jwt: JwtManager, mailer: Mailer, client_url: String) -> Self {
        Self {
            store,
            jwt,
            mailer,
            forgot_password_limiter: RateLimiter::new(
                FORGOT_PASSWORD_MAX_REQUESTS,
                FORGOT_PASSWORD_WINDOW,
            ),
            client_url,
        }
    }

    /// Register: create an unverified account and email a verification link
    ///
    /// Fails with `DuplicateIdentity` when the email already exists; no
    /// account is created or mutated in that case.
    pub async fn register(&self, registration: Registration) -> ApiResult<()> {
        let password_hash = hash_password(registration.password())?;
        let raw_token = generate_opaque_token();
        let expires_at = OffsetDateTime::now_utc() + VERIFICATION_TOKEN_TTL;

        let new = match &registration {
            Registration::Student {
                full_name,
                email,
                student_id,
                department,
                ..
            } => NewAccount {
                email: email.clone(),
                full_name: full_name.clone(),
                role: Role::Student,
                student_id: Some(student_id.clone()),
                lecturer_id: None,
                department: department.clone(),
                specialization: None,
                password_hash,
                is_verified: false,
                verification_token: Some(raw_token.clone()),
                verification_expires_at: Some(expires_at),
            },
            Registration::Lecturer {
                full_name,
                email,
                lecturer_id,
                department,
                specialization,
                ..
            } => NewAccount {
                email: email.clone(),
                full_name: full_name.clone(),
                role: Role::Lecturer,
                student_id: None,
                lecturer_id: Some(lecturer_id.clone()),
                department: department.clone(),
                specialization: Some(specialization.clone()),
                password_hash,
                is_verified: false,
                verification_token: Some(raw_token.clone()),
                verification_expires_at: Some(expires_at),
            },
        };

        let account = self.store.create(new).await?;
        tracing::info!(account_id = %account.id, email = %account.email, "Account registered, pending verification");

        let (subject, html) = verification_email(&self.client_url, &raw_token);
        self.mailer.dispatch(account.email, subject, html);

        Ok(())
    }

    /// Consume a verification token and auto-login the verified account
    ///
    /// Consumption is atomic in the store; a token already consumed by a
    /// concurrent request fails here exactly like an unknown one.
    pub async fn verify_email(&self, raw_token: &str) -> ApiResult<(PublicProfile, String)> {
        let account = self
            .store
            .consume_verification_token(raw_token)
            .await?
            .ok_or(ApiError::InvalidOrExpiredToken)?;

        tracing::info!(account_id = %account.id, "Email verified");

        let session = self.jwt.issue(account.id, account.role)?;
        Ok((account.public_profile(), session))
    }

    /// Login: each failure is distinct and reported separately
    ///
    /// Order matters: unknown email (404), then password mismatch (401),
    /// then unverified state (403). Success mutates nothing.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<(PublicProfile, String)> {
        let account = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(ApiError::AccountNotFound)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::warn!(email = %email, "Login failed: password mismatch");
            return Err(ApiError::InvalidCredentials);
        }

        if !account.is_verified {
            tracing::warn!(account_id = %account.id, "Login rejected: email not verified");
            return Err(ApiError::NotVerified);
        }

        let session = self.jwt.issue(account.id, account.role)?;
        tracing::info!(account_id = %account.id, role = %account.role, "Login successful");
        Ok((account.public_profile(), session))
    }

    /// Admin-only lecturer provisioning; the account starts verified
    ///
    /// No freshness check is made on the requesting admin's credential
    /// beyond normal bearer verification (given behavior).
    pub async fn create_lecturer(
        &self,
        requester_role: Role,
        fields: LecturerProvisioning,
    ) -> ApiResult<PublicProfile> {
        if requester_role != Role::Admin {
            tracing::warn!(role = %requester_role, "Lecturer creation denied: requester is not admin");
            return Err(ApiError::Forbidden);
        }

        let password_hash = hash_password(&fields.password)?;
        let account = self
            .store
            .create(NewAccount {
                email: fields.email,
                full_name: fields.full_name,
                role: Role::Lecturer,
                student_id: None,
                lecturer_id: Some(fields.lecturer_id),
                department: fields.department,
                specialization: Some(fields.specialization),
                password_hash,
                is_verified: true,
                verification_token: None,
                verification_expires_at: None,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Lecturer provisioned by admin");
        Ok(account.public_profile())
    }

    /// Open a reset window, replying identically whether or not the
    /// account exists
    ///
    /// Only the digest of the raw token is persisted; the raw token goes
    /// out in the emailed link. An unknown email performs no state change
    /// and sends nothing, but the caller sees the same success.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        if !self
            .forgot_password_limiter
            .check(&email.to_lowercase())
            .is_allowed()
        {
            tracing::warn!(email = %email, "Forgot-password rate limit hit");
            return Err(ApiError::RateLimited);
        }

        let raw_token = generate_opaque_token();
        let digest = hash_token(&raw_token);
        let expires_at = OffsetDateTime::now_utc() + RESET_TOKEN_TTL;

        match self
            .store
            .begin_password_reset(email, &digest, expires_at)
            .await?
        {
            Some(account) => {
                tracing::info!(account_id = %account.id, "Password reset window opened");
                let (subject, html) = reset_email(&self.client_url, &raw_token);
                self.mailer.dispatch(account.email, subject, html);
            }
            None => {
                // Same outward response as the existing-account case
                tracing::debug!("Forgot-password for unknown email, no state change");
            }
        }

        Ok(())
    }

    /// Consume a reset token and replace the password hash
    ///
    /// The store matches by digest under an open window in one atomic
    /// update; of two concurrent calls with the same token, exactly one
    /// succeeds and the other gets `InvalidOrExpiredToken`.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> ApiResult<()> {
        let digest = hash_token(raw_token);
        let new_hash = hash_password(new_password)?;

        let account = self
            .store
            .consume_reset_token(&digest, &new_hash)
            .await?
            .ok_or(ApiError::InvalidOrExpiredToken)?;

        tracing::info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }
}
