//! Health and model metadata handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_kind: String,
    pub features: usize,
    pub classes: usize,
    pub trained_at: String,
}

/// GET /api/health - Service liveness plus loaded-model metadata
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_kind: state.model.kind.to_string(),
        features: state.model.feature_names().len(),
        classes: state.model.classes.len(),
        trained_at: state.model.trained_at.to_rfc3339(),
    })
}
