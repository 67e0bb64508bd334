use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use crate::screening::{ModelKind, TrainingConfig};

/// Application-level constants
pub const APP_NAME: &str = "LungScreen";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dataset file name looked up in the data directory when none is given.
pub const DEFAULT_DATASET_FILE: &str = "survey_lung_cancer.csv";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "lungscreen=info,lungscreen_lib=info,tower_http=warn"
}

/// Get the application data directory (~/LungScreen/), if a home exists.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Default dataset location: ~/LungScreen/data/survey_lung_cancer.csv
pub fn default_dataset_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("data").join(DEFAULT_DATASET_FILE))
}

// ═══════════════════════════════════════════════════════════
// ServerConfig: resolved startup configuration
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub model: ModelKind,
    /// Only read for the logistic model.
    pub dataset: Option<PathBuf>,
    pub training: TrainingConfig,
    pub session_idle_timeout: Duration,
    /// Cosmetic pause after a successful login.
    pub login_delay: Duration,
    /// Browser origin allowed to call the API, if any.
    pub allow_origin: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {0:?}")]
    InvalidBind(String),
    #[error("Session idle timeout must be at least one second")]
    ZeroIdleTimeout,
}

impl ServerConfig {
    /// Resolve CLI/env arguments into a config.
    ///
    /// The logistic model falls back to the default dataset location
    /// when no path is given; the stub never reads a dataset.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let bind = args
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBind(args.bind.clone()))?;

        if args.session_idle_secs == 0 {
            return Err(ConfigError::ZeroIdleTimeout);
        }

        let dataset = match args.model {
            ModelKind::Stub => None,
            ModelKind::Logistic => args.dataset.clone().or_else(default_dataset_path),
        };

        Ok(Self {
            bind,
            model: args.model,
            dataset,
            training: TrainingConfig {
                iterations: args.train_iterations,
                learning_rate: args.learning_rate,
                c: args.regularization_c,
            },
            session_idle_timeout: Duration::from_secs(args.session_idle_secs),
            login_delay: Duration::from_millis(args.login_delay_ms),
            allow_origin: args.allow_origin.clone(),
        })
    }
}
