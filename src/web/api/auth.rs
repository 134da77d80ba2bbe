//! Registration and login endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::state::AppState;
use crate::store::StoreError;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub secret: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /register` — gated by the provisioning secret.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Json<ApiResponse> {
    match state
        .users
        .register(&payload.username, &payload.password, &payload.secret)
    {
        Ok(()) => Json(ApiResponse::ok()),
        Err(e @ (StoreError::InvalidSecret | StoreError::UserExists)) => {
            Json(ApiResponse::fail(e.to_string()))
        }
        Err(e) => {
            tracing::error!("Registration failed for {}: {}", payload.username, e);
            Json(ApiResponse::fail("Internal error"))
        }
    }
}

/// `POST /login`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Json<ApiResponse> {
    match state.users.authenticate(&payload.username, &payload.password) {
        Ok(true) => Json(ApiResponse::ok_user(payload.username)),
        Ok(false) => Json(ApiResponse::fail("Invalid credentials")),
        Err(e) => {
            tracing::error!("Login failed for {}: {}", payload.username, e);
            Json(ApiResponse::fail("Internal error"))
        }
    }
}
