//! Screening API server lifecycle: starts/stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::configured_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Metadata for a running server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub instance_id: String,
    pub addr: SocketAddr,
    pub started_at: String,
}

/// Per-server HTTP options that are not part of `CoreState`.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub login_delay: Duration,
    pub allow_origin: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to read bound address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running screening server.
pub struct ScreeningServer {
    pub info: ServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ScreeningServer {
    /// Signal a graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Screening server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Screening server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` and serve the screening API in a background task.
///
/// Port 0 binds an ephemeral port; the real address is in `info.addr`.
pub async fn start_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
    options: HttpOptions,
) -> Result<ScreeningServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = configured_router(core, options.login_delay, options.allow_origin.as_deref());

    let info = ServerInfo {
        instance_id: Uuid::new_v4().to_string(),
        addr,
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Screening server received shutdown signal");
        };

        tracing::info!(%addr, "Screening server listening");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Screening server error: {e}");
        }

        tracing::info!("Screening server stopped");
    });

    Ok(ScreeningServer {
        info,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
