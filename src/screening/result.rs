//! Result mapping: classifier label → message shown to the patient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_MESSAGE: &str = "High risk of lung cancer detected";
pub const NO_RISK_MESSAGE: &str = "No lung cancer risk detected";

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    NoRisk,
    HighRisk,
}

impl RiskLabel {
    /// 0 = no risk, 1 = high risk.
    pub fn as_u8(self) -> u8 {
        match self {
            RiskLabel::NoRisk => 0,
            RiskLabel::HighRisk => 1,
        }
    }

    pub fn from_bool(high_risk: bool) -> Self {
        if high_risk {
            RiskLabel::HighRisk
        } else {
            RiskLabel::NoRisk
        }
    }
}

/// Map a label to its message. Total over both labels.
pub fn to_message(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::HighRisk => HIGH_RISK_MESSAGE,
        RiskLabel::NoRisk => NO_RISK_MESSAGE,
    }
}

/// Outcome of one screening, kept in the session until the next
/// prediction or logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    /// 0 or 1.
    pub label: u8,
    pub message: &'static str,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn new(label: RiskLabel) -> Self {
        Self {
            label: label.as_u8(),
            message: to_message(label),
            predicted_at: Utc::now(),
        }
    }

    pub fn risk(&self) -> RiskLabel {
        RiskLabel::from_bool(self.label == 1)
    }
}
