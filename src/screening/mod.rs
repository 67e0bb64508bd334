//! Screening pipeline: encode → predict → map.
//!
//! - `features`: fixed column order shared by every stage
//! - `encoder`: form answers → validated record → feature vector
//! - `model`: `RiskModel` contract, stub and logistic variants
//! - `logistic`: gradient-descent logistic regression
//! - `dataset`: startup CSV loader
//! - `result`: label → message

pub mod dataset;
pub mod encoder;
pub mod features;
pub mod logistic;
pub mod model;
pub mod result;

pub use encoder::{encode, PatientRecord, RawAnswer, RawAnswers, ValidationError};
pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use logistic::TrainingConfig;
pub use model::{build_model, ModelKind, ModelUnavailableError, RiskModel};
pub use result::{to_message, PredictionResult, RiskLabel};

/// Run one submission through the full pipeline.
pub fn assess(
    model: &dyn RiskModel,
    raw: &RawAnswers,
) -> Result<PredictionResult, ValidationError> {
    let features = encode(raw)?;
    let label = model.predict(&features);
    tracing::debug!(model = %model.kind(), label = label.as_u8(), "Screening assessed");
    Ok(PredictionResult::new(label))
}
