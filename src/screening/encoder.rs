//! Feature encoder: raw form answers → `PatientRecord` → `FeatureVector`.
//!
//! Canonical form encoding is the string pair `"Yes"` / `"No"` for every
//! symptom question and `"Male"` / `"Female"` for gender. Matching is
//! exact after trimming surrounding whitespace. Survey-style 1/2 codes
//! are only understood by the dataset loader, never by the form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::features::{
    Feature, FeatureVector, FieldKind, FEATURE_COUNT, GENDER_OPTIONS, MAX_AGE, MIN_AGE, NO, YES,
    YES_NO_OPTIONS,
};

// ═══════════════════════════════════════════════════════════
// Raw answers: as submitted by the form
// ═══════════════════════════════════════════════════════════

/// One submitted form value: a string, an integer, or something else
/// that will be rejected during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Text(String),
    Integer(i64),
    Other(serde_json::Value),
}

impl From<&str> for RawAnswer {
    fn from(value: &str) -> Self {
        RawAnswer::Text(value.to_string())
    }
}

impl From<i64> for RawAnswer {
    fn from(value: i64) -> Self {
        RawAnswer::Integer(value)
    }
}

impl std::fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawAnswer::Text(s) => write!(f, "{s:?}"),
            RawAnswer::Integer(n) => write!(f, "{n}"),
            RawAnswer::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Submitted answers keyed by feature wire name (`"SMOKING"`, ...).
/// Unknown keys are ignored.
pub type RawAnswers = BTreeMap<String, RawAnswer>;

// ═══════════════════════════════════════════════════════════
// Validation errors
// ═══════════════════════════════════════════════════════════

/// What is wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldProblem {
    #[error("This field is required")]
    Missing,
    #[error("Expected one of {}, got {got}", .expected.join(", "))]
    UnexpectedValue {
        got: String,
        expected: &'static [&'static str],
    },
    #[error("Expected a whole number of years, got {0}")]
    NotAnInteger(String),
    #[error("Age must be between {min} and {max}, got {0}", min = MIN_AGE, max = MAX_AGE)]
    AgeOutOfRange(i64),
}

/// A problem attached to the feature it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub feature: Feature,
    pub problem: FieldProblem,
}

/// Submitted answers failed validation. Carries every offending field
/// so a form can show all inline messages at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid questionnaire answers: {}", summarize(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Whether `feature` has at least one recorded problem.
    pub fn concerns(&self, feature: Feature) -> bool {
        self.issues.iter().any(|i| i.feature == feature)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.feature, i.problem))
        .collect::<Vec<_>>()
        .join("; ")
}

// ═══════════════════════════════════════════════════════════
// PatientRecord: one validated submission
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Male → 0, Female → 1.
    pub fn code(self) -> u32 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }
}

/// A validated questionnaire submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub gender: Gender,
    pub age: u32,
    pub smoking: bool,
    pub yellow_fingers: bool,
    pub anxiety: bool,
    pub peer_pressure: bool,
    pub chronic_disease: bool,
    pub fatigue: bool,
    pub allergy: bool,
    pub wheezing: bool,
    pub alcohol_consuming: bool,
    pub coughing: bool,
    pub shortness_of_breath: bool,
    pub swallowing_difficulty: bool,
    pub chest_pain: bool,
}

impl PatientRecord {
    /// Validate raw answers, collecting a problem for every bad field.
    pub fn from_answers(raw: &RawAnswers) -> Result<Self, ValidationError> {
        let mut codes = [0u32; FEATURE_COUNT];
        let mut issues = Vec::new();

        for feature in Feature::ALL {
            match parse_field(feature, raw.get(feature.name())) {
                Ok(code) => codes[feature.index()] = code,
                Err(problem) => issues.push(FieldIssue { feature, problem }),
            }
        }

        if !issues.is_empty() {
            tracing::debug!(count = issues.len(), "Questionnaire validation failed");
            return Err(ValidationError { issues });
        }

        let flag = |f: Feature| codes[f.index()] == 1;
        Ok(Self {
            gender: if codes[Feature::Gender.index()] == 0 {
                Gender::Male
            } else {
                Gender::Female
            },
            age: codes[Feature::Age.index()],
            smoking: flag(Feature::Smoking),
            yellow_fingers: flag(Feature::YellowFingers),
            anxiety: flag(Feature::Anxiety),
            peer_pressure: flag(Feature::PeerPressure),
            chronic_disease: flag(Feature::ChronicDisease),
            fatigue: flag(Feature::Fatigue),
            allergy: flag(Feature::Allergy),
            wheezing: flag(Feature::Wheezing),
            alcohol_consuming: flag(Feature::AlcoholConsuming),
            coughing: flag(Feature::Coughing),
            shortness_of_breath: flag(Feature::ShortnessOfBreath),
            swallowing_difficulty: flag(Feature::SwallowingDifficulty),
            chest_pain: flag(Feature::ChestPain),
        })
    }

    /// Encoded value of one feature.
    pub fn value(&self, feature: Feature) -> u32 {
        let yes_no = |b: bool| u32::from(b);
        match feature {
            Feature::Gender => self.gender.code(),
            Feature::Age => self.age,
            Feature::Smoking => yes_no(self.smoking),
            Feature::YellowFingers => yes_no(self.yellow_fingers),
            Feature::Anxiety => yes_no(self.anxiety),
            Feature::PeerPressure => yes_no(self.peer_pressure),
            Feature::ChronicDisease => yes_no(self.chronic_disease),
            Feature::Fatigue => yes_no(self.fatigue),
            Feature::Allergy => yes_no(self.allergy),
            Feature::Wheezing => yes_no(self.wheezing),
            Feature::AlcoholConsuming => yes_no(self.alcohol_consuming),
            Feature::Coughing => yes_no(self.coughing),
            Feature::ShortnessOfBreath => yes_no(self.shortness_of_breath),
            Feature::SwallowingDifficulty => yes_no(self.swallowing_difficulty),
            Feature::ChestPain => yes_no(self.chest_pain),
        }
    }

    pub fn to_features(&self) -> FeatureVector {
        FeatureVector::new(Feature::ALL.map(|f| self.value(f)))
    }
}

/// Encode raw form answers into the fixed-order feature vector.
pub fn encode(raw: &RawAnswers) -> Result<FeatureVector, ValidationError> {
    PatientRecord::from_answers(raw).map(|record| record.to_features())
}

fn parse_field(feature: Feature, answer: Option<&RawAnswer>) -> Result<u32, FieldProblem> {
    let answer = answer.ok_or(FieldProblem::Missing)?;
    match feature.kind() {
        FieldKind::Gender => {
            let text = expect_text(answer, &GENDER_OPTIONS)?;
            GENDER_OPTIONS
                .iter()
                .position(|g| *g == text)
                .map(|i| i as u32)
                .ok_or_else(|| unexpected(answer, &GENDER_OPTIONS))
        }
        FieldKind::YesNo => match expect_text(answer, &YES_NO_OPTIONS)? {
            YES => Ok(1),
            NO => Ok(0),
            _ => Err(unexpected(answer, &YES_NO_OPTIONS)),
        },
        FieldKind::Age => parse_age(answer),
    }
}

fn expect_text<'a>(
    answer: &'a RawAnswer,
    expected: &'static [&'static str],
) -> Result<&'a str, FieldProblem> {
    match answer {
        RawAnswer::Text(s) => Ok(s.trim()),
        other => Err(unexpected(other, expected)),
    }
}

fn unexpected(answer: &RawAnswer, expected: &'static [&'static str]) -> FieldProblem {
    FieldProblem::UnexpectedValue {
        got: answer.to_string(),
        expected,
    }
}

fn parse_age(answer: &RawAnswer) -> Result<u32, FieldProblem> {
    let years = match answer {
        RawAnswer::Integer(n) => *n,
        RawAnswer::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| FieldProblem::NotAnInteger(answer.to_string()))?,
        RawAnswer::Other(_) => return Err(FieldProblem::NotAnInteger(answer.to_string())),
    };

    u32::try_from(years)
        .ok()
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
        .ok_or(FieldProblem::AgeOutOfRange(years))
}
