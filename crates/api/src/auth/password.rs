//! Password hashing with Argon2id
//!
//! Hashes are PHC strings carrying their own random salt, so the same
//! password produces a different stored hash on every call while
//! verification still succeeds.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ApiError, ApiResult};

/// Minimum accepted password length, mirrored by boundary validation
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a raw password into a PHC-format Argon2id string
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::Internal
        })?;
    Ok(hash.to_string())
}

/// Verify a raw password against a stored PHC string
pub fn verify_password(password: &str, stored_hash: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is malformed");
        ApiError::Internal
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
