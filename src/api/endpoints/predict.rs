//! Screening endpoints.
//!
//! - `POST /api/predict`: run the questionnaire through the model
//! - `GET /api/result`: last prediction of this session

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::screening::{PredictionResult, RawAnswers};

/// `POST /api/predict`: body is the answers object keyed by field name.
pub async fn predict(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
    body: Result<Json<RawAnswers>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(raw) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let result = ctx.core.assess(&raw)?;
    ctx.core
        .record_prediction(&session.token_hash, result.clone())?;

    tracing::info!(
        session_id = %session.session_id,
        label = result.label,
        "Prediction recorded"
    );

    Ok(Json(result))
}

/// `GET /api/result`: the result page after a prediction.
pub async fn last(
    Extension(session): Extension<SessionContext>,
) -> Result<Json<PredictionResult>, ApiError> {
    session
        .last_prediction
        .map(Json)
        .ok_or(ApiError::NoResult)
}
