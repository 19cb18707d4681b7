//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub mode: &'static str,
    pub storage: String,
}

/// Liveness plus the active generation mode and storage backend.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok",
        mode: state.generation_mode().as_str(),
        storage: state.storage.backend_type().to_string(),
    })
}
