//! Application configuration
//!
//! All environment-sourced values are read once at startup into an explicit
//! struct and injected into state at construction. Nothing reads the
//! environment mid-request.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string
    pub database_url: String,
    /// Address the HTTP server binds to, e.g. "0.0.0.0:8080"
    pub bind_address: String,
    /// Secret for signing session credentials (HS256)
    pub jwt_secret: String,
    /// Session credential validity in hours
    pub jwt_expiry_hours: i64,
    /// Frontend base URL used when constructing emailed links
    pub client_url: String,
    /// Resend API key; empty disables outbound email
    pub resend_api_key: String,
    /// From address for outbound email
    pub email_from: String,
    /// Comma-separated CORS origin allowlist
    pub allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address: optional("BIND_ADDRESS", "0.0.0.0:8080"),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiry_hours: optional("JWT_EXPIRY_HOURS", "24")
                .parse()
                .context("JWT_EXPIRY_HOURS must be an integer")?,
            client_url: optional("CLIENT_URL", "http://localhost:3000"),
            resend_api_key: optional("RESEND_API_KEY", ""),
            email_from: optional("EMAIL_FROM", "CampuShare No-Reply <onboarding@resend.dev>"),
            allowed_origins: optional(
                "ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:3000",
            ),
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
