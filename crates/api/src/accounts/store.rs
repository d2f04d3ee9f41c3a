//! Durable account store over Postgres
//!
//! Token consumption fuses the lookup and the mutation into a single
//! conditional UPDATE keyed on the token and an open expiry window. Two
//! concurrent consumers of the same token therefore race on one row
//! update; the loser matches zero rows and observes the same `None` as an
//! absent or expired token. Callers never learn whether a miss was
//! "expired" or "never existed".

use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};

use super::{Account, NewAccount};

#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account; a duplicate email maps to `DuplicateIdentity`
    pub async fn create(&self, new: NewAccount) -> ApiResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                email, full_name, role, student_id, lecturer_id,
                department, specialization, password_hash, is_verified,
                verification_token, verification_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.full_name)
        .bind(new.role)
        .bind(&new.student_id)
        .bind(&new.lecturer_id)
        .bind(&new.department)
        .bind(&new.specialization)
        .bind(&new.password_hash)
        .bind(new.is_verified)
        .bind(&new.verification_token)
        .bind(new.verification_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateIdentity,
            _ => ApiError::Database(e),
        })
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    /// Atomically consume an unexpired verification token
    ///
    /// Marks the account verified and clears the token pair in the same
    /// statement that matches it. `None` means absent, already consumed,
    /// or expired; exactly one of two concurrent consumers can win.
    pub async fn consume_verification_token(&self, raw_token: &str) -> ApiResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET is_verified = TRUE,
                verification_token = NULL,
                verification_expires_at = NULL,
                updated_at = NOW()
            WHERE verification_token = $1
              AND verification_expires_at > NOW()
            RETURNING *
            "#,
        )
        .bind(raw_token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// Open a reset window on the account with this email
    ///
    /// Stores only the token digest. Returns `None` when the email is
    /// unknown so the caller can collapse that case into a generic reply.
    /// A repeated request replaces any previous window.
    pub async fn begin_password_reset(
        &self,
        email: &str,
        token_digest: &str,
        expires_at: OffsetDateTime,
    ) -> ApiResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET reset_token_hash = $2,
                reset_expires_at = $3,
                updated_at = NOW()
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(token_digest)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// Atomically consume an unexpired reset token, matched by digest
    ///
    /// Replaces the password hash and clears the reset pair in one
    /// statement. Same `None` semantics as verification consumption.
    pub async fn consume_reset_token(
        &self,
        token_digest: &str,
        new_password_hash: &str,
    ) -> ApiResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET password_hash = $2,
                reset_token_hash = NULL,
                reset_expires_at = NULL,
                updated_at = NOW()
            WHERE reset_token_hash = $1
              AND reset_expires_at > NOW()
            RETURNING *
            "#,
        )
        .bind(token_digest)
        .bind(new_password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }
}
