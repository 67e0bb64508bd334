//! Screening API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack on protected routes (outermost → innermost):
//! 1. Session validator → 2. Access logger

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the screening API router with no login delay and no CORS.
pub fn screening_api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core), None)
}

/// Build the router from server configuration.
pub fn configured_router(
    core: Arc<CoreState>,
    login_delay: Duration,
    allow_origin: Option<&str>,
) -> Router {
    let ctx = ApiContext::new(core).with_login_delay(login_delay);
    let cors = allow_origin.and_then(|origin| match HeaderValue::from_str(origin) {
        Ok(value) => Some(
            CorsLayer::new()
                .allow_origin(value)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        ),
        Err(_) => {
            tracing::warn!(origin, "Ignoring invalid CORS origin");
            None
        }
    });
    build_router(ctx, cors)
}

fn build_router(ctx: ApiContext, cors: Option<CorsLayer>) -> Router {
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → Session → Access log (innermost) → Handler
    //
    // Extension must be outermost so all middleware can access ApiContext.
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/questionnaire", get(endpoints::questionnaire::form))
        .route("/predict", post(endpoints::predict::predict))
        .route("/result", get(endpoints::predict::last))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_session))
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes (no session required)
    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::Extension(ctx));

    let router = Router::new().nest("/api", protected.merge(unprotected));

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}
