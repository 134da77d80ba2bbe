//! Route definitions for the web server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::gateway;
use crate::state::AppState;

use super::api;

/// Create the full app router.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth
        .route("/register", post(api::register))
        .route("/login", post(api::login))
        // Per-user relay settings
        .route("/saveInstructions", post(api::save_instructions))
        .route("/saveToggles", post(api::save_toggles))
        // Session logout
        .route("/logoutWhatsApp", post(api::logout_whatsapp))
        // Notification gateway
        .route("/ws", get(gateway::ws_handler))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
