//! Route table
//!
//! Public auth flows under `/api/v1/auth`; lecturer provisioning and the
//! identity echo sit behind the bearer middleware. All handlers live in
//! `auth.rs`.

use axum::{middleware, routing::get, routing::post, Json, Router};
use serde_json::json;

use crate::auth::require_auth;
use crate::state::AppState;

pub mod auth;

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/verify-email", get(auth::verify_email))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/send-email", post(auth::send_email))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route_layer(middleware::from_fn_with_state(
                    state.auth_state(),
                    require_auth,
                )),
        );

    let v1 = Router::new().nest("/auth", auth_routes).merge(
        Router::new()
            .route("/lecturers", post(auth::create_lecturer))
            .route_layer(middleware::from_fn_with_state(
                state.auth_state(),
                require_auth,
            )),
    );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state)
}

async fn root() -> &'static str {
    "CampuShare auth API is running"
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
