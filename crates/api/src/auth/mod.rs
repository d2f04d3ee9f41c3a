//! Authentication primitives for CampuShare

#[cfg(test)]
mod edge_case_tests;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use jwt::{Claims, JwtManager};
pub use middleware::{require_auth, AuthState, AuthUser};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use tokens::{
    generate_opaque_token, hash_token, RESET_TOKEN_TTL, VERIFICATION_TOKEN_TTL,
};
