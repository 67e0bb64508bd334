//! Access logging middleware.
//!
//! Logs every API request with method, path, response status, latency
//! and the session user when one is attached. Runs innermost on
//! protected routes (after auth has injected `SessionContext`).

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::SessionContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user = req
        .extensions()
        .get::<SessionContext>()
        .map(|s| s.username.clone());
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match user {
        Some(user) => {
            tracing::info!(%method, %path, status, elapsed_ms, user = %user, "API access")
        }
        None => tracing::info!(%method, %path, status, elapsed_ms, "API access"),
    }

    response
}
