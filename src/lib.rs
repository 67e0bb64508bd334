pub mod api; // Screening HTTP API
pub mod cli;
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod screening; // Encoder, models, result mapping
pub mod session_store;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::api::{start_server, HttpOptions};
use crate::cli::Args;
use crate::config::{ConfigError, ServerConfig};
use crate::core_state::CoreState;
use crate::screening::ModelUnavailableError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Risk model unavailable: {0}")]
    Model(#[from] ModelUnavailableError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Resolve configuration, build the risk model, and serve until Ctrl-C.
///
/// A model that cannot be built is fatal: the server never starts
/// without a working predictor.
pub async fn run(args: Args) -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_args(&args)?;

    let model = screening::build_model(config.model, config.dataset.as_deref(), &config.training)
        .inspect_err(|e| tracing::error!("Cannot build risk model: {e}"))?;
    tracing::info!(model = %model.kind(), "Risk model ready");

    let core = Arc::new(CoreState::new(model, config.session_idle_timeout));

    let server = start_server(
        core,
        config.bind,
        HttpOptions {
            login_delay: config.login_delay,
            allow_origin: config.allow_origin.clone(),
        },
    )
    .await?;

    tracing::info!(
        addr = %server.info.addr,
        "Questionnaire API available at http://{}/api",
        server.info.addr
    );

    let signal = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down");
    server.stop().await;

    signal.map_err(StartupError::Signal)
}
