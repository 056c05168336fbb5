pub mod health;
pub mod logs;
pub mod response;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApiConfig {
    pub webhook_secret: Option<String>,
}

impl ApiConfig {
    // Absent or empty WEBHOOK_SECRET disables the ingestion check entirely.
    pub fn from_env() -> Self {
        Self {
            webhook_secret: std::env::var("WEBHOOK_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
}

pub fn build_router(pool: PgPool, config: ApiConfig) -> Router {
    let state = AppState { pool, config };

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/webhook",
            post(webhook::receive_webhook).get(webhook::receive_webhook),
        )
        .route(
            "/api/logs",
            get(logs::list_logs).delete(logs::delete_logs),
        )
        .with_state(state)
}
