// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! CampuShare Shared Infrastructure
//!
//! Components used by the API server and any future binaries:
//! database pool construction, embedded migrations, and the
//! in-memory rate limiter.

pub mod db;
pub mod rate_limit;

pub use db::{create_pool, run_migrations};
pub use rate_limit::RateLimiter;
