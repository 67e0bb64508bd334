//! Bearer session middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it against the
//! session store (refreshing its idle timer), and injects
//! `SessionContext` into request extensions for downstream handlers.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require a live session.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
/// On success: injects `SessionContext` and marks the response `no-store`.
pub async fn require_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = bearer_token(&req).ok_or(ApiError::Unauthorized)?;

    // RwLockWriteGuard is dropped inside resolve_session, before any .await
    let session = ctx
        .core
        .resolve_session(&token)?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(session);

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));
    Ok(response)
}

fn bearer_token(req: &Request<axum::body::Body>) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
