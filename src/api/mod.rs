//! Screening HTTP API.
//!
//! Exposes the questionnaire flow as JSON endpoints. Routes are nested
//! under `/api/`; everything except health and login sits behind the
//! session middleware.
//!
//! The router is composable: `screening_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::{configured_router, screening_api_router};
pub use server::{start_server, HttpOptions, ScreeningServer, ServerError, ServerInfo};
pub use types::ApiContext;
