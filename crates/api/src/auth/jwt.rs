//! Session credentials (JWT)
//!
//! A session credential is a signed, self-contained token binding account
//! identity and role, verifiable without a store lookup. HS256 with a
//! deployment-supplied secret; validity is fixed at issue time.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::Role;
use crate::error::{ApiError, ApiResult};

/// Claims carried by a session credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub role: Role,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issues and verifies session credentials
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Issue a signed session credential for an authenticated account
    pub fn issue(&self, account_id: Uuid, role: Role) -> ApiResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: account_id,
            role,
            iat: now,
            exp: now + self.expiry_hours * 3600,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session credential");
            ApiError::Internal
        })
    }

    /// Verify signature and validity window, returning the decoded claims
    ///
    /// Tampered and expired credentials both surface as `Unauthorized`;
    /// callers get no distinction between the two.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret", 24)
    }

    #[test]
    fn issue_then_verify_round_trips_identity_and_role() {
        let m = manager();
        let id = Uuid::new_v4();
        let token = m.issue(id, Role::Student).unwrap();

        let claims = m.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Student);
    }

    #[test]
    fn validity_window_matches_configured_hours() {
        let m = manager();
        let token = m.issue(Uuid::new_v4(), Role::Admin).unwrap();
        let claims = m.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let m = manager();
        let token = m.issue(Uuid::new_v4(), Role::Student).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(m.verify(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtManager::new("other-secret", 24)
            .issue(Uuid::new_v4(), Role::Lecturer)
            .unwrap();
        assert!(manager().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Student,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(manager().verify(&token).is_err());
    }
}
