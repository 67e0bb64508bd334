//! Questionnaire feature layout.
//!
//! `Feature::ALL` is the one place the column order is defined. The
//! encoder, the dataset loader and both risk models index through it,
//! so a submission, a training row and a model weight always line up.

use serde::Serialize;

/// Number of features in an encoded questionnaire.
pub const FEATURE_COUNT: usize = 15;

/// Canonical answer for a positive yes/no question.
pub const YES: &str = "Yes";
/// Canonical answer for a negative yes/no question.
pub const NO: &str = "No";
/// Canonical gender answers, in encoding order (index = encoded value).
pub const GENDER_OPTIONS: [&str; 2] = ["Male", "Female"];
/// Yes/no answers as offered to the form.
pub const YES_NO_OPTIONS: [&str; 2] = [YES, NO];

/// Youngest age accepted by the encoder.
pub const MIN_AGE: u32 = 1;
/// Oldest age accepted by the encoder.
pub const MAX_AGE: u32 = 120;

// ═══════════════════════════════════════════════════════════
// Feature: one questionnaire column
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    Gender,
    Age,
    Smoking,
    YellowFingers,
    Anxiety,
    PeerPressure,
    ChronicDisease,
    Fatigue,
    Allergy,
    Wheezing,
    AlcoholConsuming,
    Coughing,
    ShortnessOfBreath,
    SwallowingDifficulty,
    ChestPain,
}

/// How a feature is answered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// "Male" / "Female" → 0 / 1.
    Gender,
    /// Integer years, passed through.
    Age,
    /// "Yes" / "No" → 1 / 0.
    YesNo,
}

impl Feature {
    /// Every feature, in encoding order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Gender,
        Feature::Age,
        Feature::Smoking,
        Feature::YellowFingers,
        Feature::Anxiety,
        Feature::PeerPressure,
        Feature::ChronicDisease,
        Feature::Fatigue,
        Feature::Allergy,
        Feature::Wheezing,
        Feature::AlcoholConsuming,
        Feature::Coughing,
        Feature::ShortnessOfBreath,
        Feature::SwallowingDifficulty,
        Feature::ChestPain,
    ];

    /// Position of this feature in an encoded vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire/column name, e.g. `SHORTNESS_OF_BREATH`.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Gender => "GENDER",
            Feature::Age => "AGE",
            Feature::Smoking => "SMOKING",
            Feature::YellowFingers => "YELLOW_FINGERS",
            Feature::Anxiety => "ANXIETY",
            Feature::PeerPressure => "PEER_PRESSURE",
            Feature::ChronicDisease => "CHRONIC_DISEASE",
            Feature::Fatigue => "FATIGUE",
            Feature::Allergy => "ALLERGY",
            Feature::Wheezing => "WHEEZING",
            Feature::AlcoholConsuming => "ALCOHOL_CONSUMING",
            Feature::Coughing => "COUGHING",
            Feature::ShortnessOfBreath => "SHORTNESS_OF_BREATH",
            Feature::SwallowingDifficulty => "SWALLOWING_DIFFICULTY",
            Feature::ChestPain => "CHEST_PAIN",
        }
    }

    /// Question text shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Gender => "Gender",
            Feature::Age => "Age",
            Feature::Smoking => "Do you smoke?",
            Feature::YellowFingers => "Do you have yellow fingers?",
            Feature::Anxiety => "Do you suffer from anxiety?",
            Feature::PeerPressure => "Are you under peer pressure?",
            Feature::ChronicDisease => "Do you have a chronic disease?",
            Feature::Fatigue => "Do you experience fatigue?",
            Feature::Allergy => "Do you have allergies?",
            Feature::Wheezing => "Do you experience wheezing?",
            Feature::AlcoholConsuming => "Do you consume alcohol?",
            Feature::Coughing => "Do you cough frequently?",
            Feature::ShortnessOfBreath => "Do you experience shortness of breath?",
            Feature::SwallowingDifficulty => "Do you have difficulty swallowing?",
            Feature::ChestPain => "Do you experience chest pain?",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Feature::Gender => FieldKind::Gender,
            Feature::Age => FieldKind::Age,
            _ => FieldKind::YesNo,
        }
    }

    /// Allowed answers for enumerated fields; empty for free-form ones.
    pub fn options(self) -> &'static [&'static str] {
        match self.kind() {
            FieldKind::Gender => &GENDER_OPTIONS,
            FieldKind::YesNo => &YES_NO_OPTIONS,
            FieldKind::Age => &[],
        }
    }

    /// Look up a feature by its wire name.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════
// FeatureVector: encoded questionnaire
// ═══════════════════════════════════════════════════════════

/// Fixed-order numeric encoding of one questionnaire.
///
/// Every element is 0 or 1 except `AGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureVector([u32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [u32; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, feature: Feature) -> u32 {
        self.0[feature.index()]
    }

    pub fn values(&self) -> &[u32; FEATURE_COUNT] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Values widened to `f64` for numeric models.
    pub fn to_f64(&self) -> [f64; FEATURE_COUNT] {
        self.0.map(f64::from)
    }
}
