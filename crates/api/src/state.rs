//! Application state

use sqlx::PgPool;

use crate::{
    accounts::AccountStore,
    auth::{AuthState, JwtManager},
    config::Config,
    email::Mailer,
    lifecycle::LifecycleManager,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub jwt_manager: JwtManager,
    pub mailer: Mailer,
    pub lifecycle: LifecycleManager,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_expiry_hours);

        let mailer = Mailer::new(&config.resend_api_key, &config.email_from);
        if mailer.is_enabled() {
            tracing::info!("Email notifications enabled");
        } else {
            tracing::warn!("Email notifications not configured (missing RESEND_API_KEY)");
        }

        let lifecycle = LifecycleManager::new(
            AccountStore::new(pool.clone()),
            jwt_manager.clone(),
            mailer.clone(),
            config.client_url.clone(),
        );

        Self {
            pool,
            config,
            jwt_manager,
            mailer,
            lifecycle,
        }
    }

    /// Get auth state for middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt_manager: self.jwt_manager.clone(),
        }
    }
}
