//! Risk model contract and its two implementations.
//!
//! The model is built once at startup (`build_model`) and shared
//! read-only as `Arc<dyn RiskModel>` for the life of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::dataset::{self, TrainingSet};
use super::features::{Feature, FeatureVector};
use super::logistic::{LogisticRegression, TrainingConfig};
use super::result::RiskLabel;

/// Startup failure: no model can serve predictions.
#[derive(Debug, thiserror::Error)]
pub enum ModelUnavailableError {
    #[error("Failed to read dataset {}: {source}", .path.display())]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset has no data rows")]
    EmptyDataset,
    #[error("Dataset is missing column {0}")]
    MissingColumn(String),
    #[error("Dataset line {line}: {message}")]
    BadRow { line: usize, message: String },
    #[error("Dataset has {rows} rows but {labels} labels")]
    LabelMismatch { rows: usize, labels: usize },
    #[error("Training data contains a single class; cannot fit a classifier")]
    SingleClass,
    #[error("Model fit produced non-finite parameters")]
    Diverged,
    #[error("Invalid training configuration: {0}")]
    InvalidTraining(String),
    #[error("The logistic model needs a dataset path")]
    DatasetNotConfigured,
}

/// Which model variant is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Placeholder rule: high risk iff the patient smokes.
    Stub,
    /// Logistic regression fit on the startup dataset.
    Logistic,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Stub => write!(f, "stub"),
            ModelKind::Logistic => write!(f, "logistic"),
        }
    }
}

/// Binary risk classifier.
///
/// Implementations hold no mutable state: identical inputs always give
/// identical labels, and a single instance is shared across sessions.
pub trait RiskModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> RiskLabel;

    fn kind(&self) -> ModelKind;
}

// ═══════════════════════════════════════════════════════════
// Stub: constant rule
// ═══════════════════════════════════════════════════════════

/// Placeholder classifier: returns high risk iff `SMOKING == 1`.
/// Not a real model; no other feature influences the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmokingRuleModel;

impl RiskModel for SmokingRuleModel {
    fn predict(&self, features: &FeatureVector) -> RiskLabel {
        RiskLabel::from_bool(features.get(Feature::Smoking) == 1)
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Stub
    }
}

// ═══════════════════════════════════════════════════════════
// Trained: logistic regression
// ═══════════════════════════════════════════════════════════

/// Logistic regression fit once over the startup dataset.
#[derive(Debug, Clone)]
pub struct LogisticRiskModel {
    regression: LogisticRegression,
}

impl LogisticRiskModel {
    pub fn fit(set: &TrainingSet, config: &TrainingConfig) -> Result<Self, ModelUnavailableError> {
        let (x, y) = set.design_matrix();
        let regression = LogisticRegression::fit(&x, &y, config)?;
        tracing::info!(
            rows = set.len(),
            training_accuracy = regression.accuracy(&x, &y),
            "Logistic risk model fitted"
        );
        Ok(Self { regression })
    }
}

impl RiskModel for LogisticRiskModel {
    fn predict(&self, features: &FeatureVector) -> RiskLabel {
        RiskLabel::from_bool(self.regression.predict(&features.to_f64()))
    }

    fn kind(&self) -> ModelKind {
        ModelKind::Logistic
    }
}

/// Construct the configured model. Any failure is fatal for the service.
pub fn build_model(
    kind: ModelKind,
    dataset_path: Option<&Path>,
    training: &TrainingConfig,
) -> Result<Arc<dyn RiskModel>, ModelUnavailableError> {
    match kind {
        ModelKind::Stub => {
            tracing::warn!("Serving the placeholder smoking-rule model; not a clinical classifier");
            Ok(Arc::new(SmokingRuleModel))
        }
        ModelKind::Logistic => {
            let path = dataset_path.ok_or(ModelUnavailableError::DatasetNotConfigured)?;
            let set = dataset::load_dataset(path)?;
            Ok(Arc::new(LogisticRiskModel::fit(&set, training)?))
        }
    }
}
