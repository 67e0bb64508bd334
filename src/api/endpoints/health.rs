//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::screening::ModelKind;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: ModelKind,
    pub version: &'static str,
    pub active_sessions: usize,
    pub started_at: String,
}

/// `GET /api/health`: liveness plus the serving model variant.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        model: ctx.core.model().kind(),
        version: crate::config::APP_VERSION,
        active_sessions: ctx.core.active_sessions(),
        started_at: ctx.core.started_at.to_rfc3339(),
    }))
}
