//! Session logout endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::state::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub username: String,
}

/// `POST /logoutWhatsApp` — tear down the session and purge its on-disk
/// state so the next init runs a fresh pairing flow.
pub async fn logout_whatsapp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LogoutRequest>,
) -> Json<ApiResponse> {
    if state.sessions.destroy(&payload.username, true).await {
        Json(ApiResponse::ok())
    } else {
        Json(ApiResponse::fail("No active session"))
    }
}
