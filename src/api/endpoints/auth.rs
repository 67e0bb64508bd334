//! Login and logout.
//!
//! `POST /api/auth/login`: Unprotected: opens a session
//! `POST /api/auth/logout`: Protected: ends the caller's session
//!
//! Login performs no credential check. Any non-empty username/password
//! pair is accepted, whitespace included; the password is discarded
//! immediately.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub username: String,
}

/// `POST /api/auth/login`: start a screening session.
pub async fn login(
    State(ctx): State<ApiContext>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::MissingCredentials);
    }

    // Surrounding whitespace is dropped for display unless it is all there is.
    let username = match request.username.trim() {
        "" => request.username.as_str(),
        trimmed => trimmed,
    };

    let issued = ctx.core.open_session(username)?;

    if !ctx.login_delay.is_zero() {
        tokio::time::sleep(ctx.login_delay).await;
    }

    Ok(Json(LoginResponse {
        session_token: issued.token,
        username: username.to_string(),
    }))
}

/// `POST /api/auth/logout`: clear the session and its stored result.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<StatusCode, ApiError> {
    ctx.core.close_session(&session.token_hash)?;
    Ok(StatusCode::NO_CONTENT)
}
