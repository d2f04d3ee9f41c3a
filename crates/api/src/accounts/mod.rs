//! Account model and durable store

pub mod store;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub use store::AccountStore;

/// Account role; role-specific identifier fields must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Lecturer => write!(f, "lecturer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// One row per person
///
/// `verification_token`/`verification_expires_at` and
/// `reset_token_hash`/`reset_expires_at` are present-together or
/// absent-together; the migration enforces the pairing with CHECK
/// constraints. Only the digest of a reset token is ever stored.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub student_id: Option<String>,
    pub lecturer_id: Option<String>,
    pub department: String,
    pub specialization: Option<String>,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<OffsetDateTime>,
    pub reset_token_hash: Option<String>,
    pub reset_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Account {
    /// Client-facing view; never carries the password hash or any token
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The subset of an account returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Fields for inserting a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub student_id: Option<String>,
    pub lecturer_id: Option<String>,
    pub department: String,
    pub specialization: Option<String>,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let now = OffsetDateTime::now_utc();
        Account {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            full_name: "Ada Lovelace".into(),
            role: Role::Student,
            student_id: Some("S1".into()),
            lecturer_id: None,
            department: "CS".into(),
            specialization: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$salt$hash".into(),
            is_verified: false,
            verification_token: None,
            verification_expires_at: None,
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn public_profile_omits_secret_material() {
        let json = serde_json::to_value(account().public_profile()).unwrap();
        let body = json.to_string();
        assert!(body.contains("fullName"));
        assert!(!body.contains("password"));
        assert!(!body.contains("token"));
        assert!(!body.contains("argon2"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!(
            serde_json::to_string(&Role::Lecturer).unwrap(),
            "\"lecturer\""
        );
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
