// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! CampuShare Auth API Library
//!
//! Credential and token lifecycle for the academic resource-sharing
//! platform: registration, email verification, login, password reset,
//! and admin-driven lecturer provisioning.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use lifecycle::LifecycleManager;
pub use state::AppState;
