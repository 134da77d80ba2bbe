//! Per-user relay settings endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::state::AppState;
use crate::store::Toggles;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct SaveInstructionsRequest {
    pub username: String,
    pub instructions: String,
}

#[derive(Deserialize)]
pub struct SaveTogglesRequest {
    pub username: String,
    pub toggles: Toggles,
}

/// `POST /saveInstructions`.
pub async fn save_instructions(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveInstructionsRequest>,
) -> Json<ApiResponse> {
    match state
        .users
        .set_instructions(&payload.username, &payload.instructions)
    {
        Ok(true) => Json(ApiResponse::ok()),
        Ok(false) => Json(ApiResponse::failed()),
        Err(e) => {
            tracing::error!("Saving instructions failed for {}: {}", payload.username, e);
            Json(ApiResponse::failed())
        }
    }
}

/// `POST /saveToggles`.
pub async fn save_toggles(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveTogglesRequest>,
) -> Json<ApiResponse> {
    match state.users.set_toggles(&payload.username, payload.toggles) {
        Ok(true) => Json(ApiResponse::ok()),
        Ok(false) => Json(ApiResponse::failed()),
        Err(e) => {
            tracing::error!("Saving toggles failed for {}: {}", payload.username, e);
            Json(ApiResponse::failed())
        }
    }
}
