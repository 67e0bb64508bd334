//! Command-line arguments.
//!
//! Every flag can also come from a `LUNGSCREEN_*` environment variable.

use std::path::PathBuf;

use clap::Parser;

use crate::screening::ModelKind;

/// LungScreen - questionnaire-based lung cancer risk screening service
#[derive(Parser, Debug)]
#[command(name = "lungscreen")]
#[command(version)]
#[command(about = "Serve the lung cancer risk questionnaire API", long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LUNGSCREEN_BIND", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// Risk model to serve
    #[arg(long, env = "LUNGSCREEN_MODEL", value_enum, default_value_t = ModelKind::Stub)]
    pub model: ModelKind,

    /// Training dataset (CSV) for the logistic model
    #[arg(long, env = "LUNGSCREEN_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Gradient descent iterations for the logistic model
    #[arg(long, env = "LUNGSCREEN_TRAIN_ITERATIONS", default_value_t = 2000)]
    pub train_iterations: usize,

    /// Gradient descent learning rate for the logistic model
    #[arg(long, env = "LUNGSCREEN_LEARNING_RATE", default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Inverse L2 regularization strength for the logistic model
    #[arg(long = "regularization-c", env = "LUNGSCREEN_REGULARIZATION_C", default_value_t = 1.0)]
    pub regularization_c: f64,

    /// Seconds of inactivity before a session expires
    #[arg(long, env = "LUNGSCREEN_SESSION_IDLE_SECS", default_value_t = 900)]
    pub session_idle_secs: u64,

    /// Pause after a successful login, in milliseconds
    #[arg(long, env = "LUNGSCREEN_LOGIN_DELAY_MS", default_value_t = 1000)]
    pub login_delay_ms: u64,

    /// Browser origin allowed to call the API (CORS)
    #[arg(long, env = "LUNGSCREEN_ALLOW_ORIGIN")]
    pub allow_origin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["lungscreen"]).unwrap();
        assert_eq!(args.bind, "127.0.0.1:5000");
        assert_eq!(args.model, ModelKind::Stub);
        assert_eq!(args.login_delay_ms, 1000);
        assert!(args.dataset.is_none());
    }

    #[test]
    fn parses_model_choice() {
        let args = Args::try_parse_from(["lungscreen", "--model", "logistic"]).unwrap();
        assert_eq!(args.model, ModelKind::Logistic);
    }

    #[test]
    fn rejects_unknown_model() {
        assert!(Args::try_parse_from(["lungscreen", "--model", "forest"]).is_err());
    }

    #[test]
    fn parses_training_flags() {
        let args = Args::try_parse_from([
            "lungscreen",
            "--train-iterations",
            "500",
            "--learning-rate",
            "0.05",
            "--regularization-c",
            "10",
        ])
        .unwrap();
        assert_eq!(args.train_iterations, 500);
        assert_eq!(args.learning_rate, 0.05);
        assert_eq!(args.regularization_c, 10.0);
    }
}
