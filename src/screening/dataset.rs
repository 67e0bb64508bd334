//! Startup training dataset loader.
//!
//! Reads the survey CSV once at startup. Header names are trimmed,
//! upper-cased and have inner spaces replaced by underscores, so the
//! survey's `"CHRONIC DISEASE"` or `"FATIGUE "` match the feature names.
//!
//! Re-coding on load:
//! - gender `M`/`F` (or `Male`/`Female`) → 0 / 1
//! - label `YES`/`NO` (or `1`/`0`) → high risk / no risk
//! - symptom columns: survey coding `2`/`1` → 1 / 0 when any symptom
//!   cell in the file is `2`, otherwise already-binary `1`/`0`;
//!   `YES`/`NO` → 1 / 0

use std::path::Path;

use ndarray::{Array1, Array2};

use super::features::{Feature, FeatureVector, FieldKind, FEATURE_COUNT};
use super::model::ModelUnavailableError;
use super::result::RiskLabel;

/// Target column in the survey dataset.
pub const LABEL_COLUMN: &str = "LUNG_CANCER";

/// Labeled rows ready for fitting.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    rows: Vec<FeatureVector>,
    labels: Vec<RiskLabel>,
}

impl TrainingSet {
    pub fn new(
        rows: Vec<FeatureVector>,
        labels: Vec<RiskLabel>,
    ) -> Result<Self, ModelUnavailableError> {
        if rows.len() != labels.len() {
            return Err(ModelUnavailableError::LabelMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { rows, labels })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn labels(&self) -> &[RiskLabel] {
        &self.labels
    }

    /// Number of high-risk rows.
    pub fn positives(&self) -> usize {
        self.labels
            .iter()
            .filter(|l| **l == RiskLabel::HighRisk)
            .count()
    }

    /// Design matrix (rows × 15) and 0/1 target vector.
    pub fn design_matrix(&self) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((self.rows.len(), FEATURE_COUNT), |(i, j)| {
            f64::from(self.rows[i].values()[j])
        });
        let y = self
            .labels
            .iter()
            .map(|l| f64::from(l.as_u8()))
            .collect::<Array1<f64>>();
        (x, y)
    }
}

/// Read and parse the dataset file at `path`.
pub fn load_dataset(path: &Path) -> Result<TrainingSet, ModelUnavailableError> {
    let text = std::fs::read_to_string(path).map_err(|source| ModelUnavailableError::DatasetIo {
        path: path.to_path_buf(),
        source,
    })?;
    let set = parse_dataset(&text)?;
    tracing::info!(
        path = %path.display(),
        rows = set.len(),
        positives = set.positives(),
        "Training dataset loaded"
    );
    Ok(set)
}

/// Parse CSV text into a training set.
pub fn parse_dataset(text: &str) -> Result<TrainingSet, ModelUnavailableError> {
    // (1-based line number, cells) for every non-blank line
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, split_cells(line)));

    let (_, header) = lines.next().ok_or(ModelUnavailableError::EmptyDataset)?;
    let header: Vec<String> = header.iter().map(|h| normalize_column(h)).collect();

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ModelUnavailableError::MissingColumn(name.to_string()))
    };
    let mut feature_columns = [0usize; FEATURE_COUNT];
    for feature in Feature::ALL {
        feature_columns[feature.index()] = column(feature.name())?;
    }
    let label_column = column(LABEL_COLUMN)?;

    let records: Vec<(usize, Vec<String>)> = lines.collect();
    if records.is_empty() {
        return Err(ModelUnavailableError::EmptyDataset);
    }
    for (line, cells) in &records {
        if cells.len() != header.len() {
            return Err(ModelUnavailableError::BadRow {
                line: *line,
                message: format!("expected {} cells, found {}", header.len(), cells.len()),
            });
        }
    }

    // Survey coding is decided once for the file: a `2` in any yes/no column
    // means 2 = yes, 1 = no everywhere, so an all-`1` column still reads as no.
    let survey_coded = Feature::ALL
        .iter()
        .filter(|feature| feature.kind() == FieldKind::YesNo)
        .any(|feature| {
            records
                .iter()
                .any(|(_, cells)| cells[feature_columns[feature.index()]] == "2")
        });

    let mut rows = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    for (line, cells) in &records {
        let bad_row = |message: String| ModelUnavailableError::BadRow {
            line: *line,
            message,
        };

        let mut values = [0u32; FEATURE_COUNT];
        for feature in Feature::ALL {
            let cell = cells[feature_columns[feature.index()]].as_str();
            values[feature.index()] = match feature.kind() {
                FieldKind::Gender => parse_gender(cell),
                FieldKind::Age => cell.parse::<u32>().ok(),
                FieldKind::YesNo => parse_flag(cell, survey_coded),
            }
            .ok_or_else(|| bad_row(format!("{feature}: unrecognized value {cell:?}")))?;
        }
        let label_cell = cells[label_column].as_str();
        let label = parse_label(label_cell)
            .ok_or_else(|| bad_row(format!("{LABEL_COLUMN}: unrecognized value {label_cell:?}")))?;

        rows.push(FeatureVector::new(values));
        labels.push(label);
    }

    TrainingSet::new(rows, labels)
}

/// `" CHRONIC DISEASE "` → `"CHRONIC_DISEASE"`.
pub fn normalize_column(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').trim().to_string())
        .collect()
}

fn parse_gender(cell: &str) -> Option<u32> {
    match cell.to_ascii_uppercase().as_str() {
        "M" | "MALE" | "0" => Some(0),
        "F" | "FEMALE" | "1" => Some(1),
        _ => None,
    }
}

fn parse_flag(cell: &str, survey_coded: bool) -> Option<u32> {
    match (cell.to_ascii_uppercase().as_str(), survey_coded) {
        ("YES", _) => Some(1),
        ("NO", _) => Some(0),
        ("2", true) => Some(1),
        ("1", true) => Some(0),
        ("1", false) => Some(1),
        ("0", false) => Some(0),
        _ => None,
    }
}

fn parse_label(cell: &str) -> Option<RiskLabel> {
    match cell.to_ascii_uppercase().as_str() {
        "YES" | "1" => Some(RiskLabel::HighRisk),
        "NO" | "0" => Some(RiskLabel::NoRisk),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Header in the survey's own spelling, trailing spaces included.
    pub(crate) const SURVEY_HEADER: &str = "GENDER,AGE,SMOKING,YELLOW_FINGERS,ANXIETY,PEER_PRESSURE,CHRONIC DISEASE,FATIGUE ,ALLERGY ,WHEEZING,ALCOHOL CONSUMING,COUGHING,SHORTNESS OF BREATH,SWALLOWING DIFFICULTY,CHEST PAIN,LUNG_CANCER";

    #[test]
    fn normalizes_survey_headers() {
        assert_eq!(normalize_column("CHRONIC DISEASE"), "CHRONIC_DISEASE");
        assert_eq!(normalize_column("FATIGUE "), "FATIGUE");
        assert_eq!(normalize_column("  shortness of  breath"), "SHORTNESS_OF_BREATH");
    }

    #[test]
    fn parses_survey_coding() {
        let text = format!(
            "{SURVEY_HEADER}\n\
             M,69,1,2,2,1,1,2,1,2,2,2,2,2,2,YES\n\
             F,59,2,1,1,1,1,2,1,2,1,2,2,1,2,NO\n"
        );
        let set = parse_dataset(&text).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.positives(), 1);

        let first = set.rows()[0];
        assert_eq!(first.get(Feature::Gender), 0);
        assert_eq!(first.get(Feature::Age), 69);
        assert_eq!(first.get(Feature::Smoking), 0);
        assert_eq!(first.get(Feature::YellowFingers), 1);
        assert_eq!(first.get(Feature::ChestPain), 1);

        let second = set.rows()[1];
        assert_eq!(second.get(Feature::Gender), 1);
        assert_eq!(second.get(Feature::Smoking), 1);
        assert_eq!(set.labels()[1], RiskLabel::NoRisk);
    }

    #[test]
    fn binary_columns_pass_through() {
        let text = format!(
            "{SURVEY_HEADER}\n\
             Female,40,1,0,0,0,0,0,0,0,0,0,0,0,0,1\n\
             Male,41,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n"
        );
        let set = parse_dataset(&text).unwrap();
        assert_eq!(set.rows()[0].get(Feature::Smoking), 1);
        assert_eq!(set.rows()[1].get(Feature::Smoking), 0);
        assert_eq!(set.labels()[0], RiskLabel::HighRisk);
    }

    #[test]
    fn survey_coding_applies_to_whole_file() {
        // Nobody answered yes to ANXIETY, so that column holds only `1`s.
        let text = format!(
            "{SURVEY_HEADER}\n\
             M,69,2,2,1,1,1,2,1,2,2,2,2,2,2,YES\n\
             F,59,1,1,1,1,1,2,1,2,1,2,2,1,2,NO\n"
        );
        let set = parse_dataset(&text).unwrap();
        assert_eq!(set.rows()[0].get(Feature::Anxiety), 0);
        assert_eq!(set.rows()[1].get(Feature::Anxiety), 0);
        assert_eq!(set.rows()[0].get(Feature::Smoking), 1);
        assert_eq!(set.rows()[1].get(Feature::Smoking), 0);
    }

    #[test]
    fn mixed_binary_and_survey_codes_are_rejected() {
        let text = format!(
            "{SURVEY_HEADER}\n\
             M,69,2,0,1,1,1,2,1,2,2,2,2,2,2,YES\n"
        );
        assert!(matches!(
            parse_dataset(&text).unwrap_err(),
            ModelUnavailableError::BadRow { line: 2, .. }
        ));
    }

    #[test]
    fn columns_may_be_reordered() {
        let text = "LUNG_CANCER,AGE,GENDER,SMOKING,YELLOW_FINGERS,ANXIETY,PEER_PRESSURE,CHRONIC_DISEASE,FATIGUE,ALLERGY,WHEEZING,ALCOHOL_CONSUMING,COUGHING,SHORTNESS_OF_BREATH,SWALLOWING_DIFFICULTY,CHEST_PAIN\n\
                    YES,70,F,YES,NO,NO,NO,NO,NO,NO,NO,NO,NO,NO,NO,NO\n";
        let set = parse_dataset(text).unwrap();
        assert_eq!(set.rows()[0].get(Feature::Age), 70);
        assert_eq!(set.rows()[0].get(Feature::Gender), 1);
        assert_eq!(set.rows()[0].get(Feature::Smoking), 1);
    }

    #[test]
    fn missing_column_is_reported() {
        let header = SURVEY_HEADER.replace(",CHEST PAIN", "");
        let text = format!("{header}\nM,1,1,1,1,1,1,1,1,1,1,1,1,1,YES\n");
        let err = parse_dataset(&text).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::MissingColumn(c) if c == "CHEST_PAIN"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            parse_dataset("").unwrap_err(),
            ModelUnavailableError::EmptyDataset
        ));
        assert!(matches!(
            parse_dataset(&format!("{SURVEY_HEADER}\n\n")).unwrap_err(),
            ModelUnavailableError::EmptyDataset
        ));
    }

    #[test]
    fn bad_cells_name_their_line() {
        let text = format!(
            "{SURVEY_HEADER}\n\
             M,69,1,2,2,1,1,2,1,2,2,2,2,2,2,YES\n\
             X,59,2,1,1,1,1,2,1,2,1,2,2,1,2,NO\n"
        );
        match parse_dataset(&text).unwrap_err() {
            ModelUnavailableError::BadRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("GENDER"));
            }
            other => panic!("Expected BadRow, got: {other}"),
        }

        let short = format!("{SURVEY_HEADER}\nM,69,1\n");
        assert!(matches!(
            parse_dataset(&short).unwrap_err(),
            ModelUnavailableError::BadRow { line: 2, .. }
        ));
    }

    #[test]
    fn design_matrix_shape() {
        let text = format!(
            "{SURVEY_HEADER}\n\
             M,69,1,2,2,1,1,2,1,2,2,2,2,2,2,YES\n\
             F,59,2,1,1,1,1,2,1,2,1,2,2,1,2,NO\n"
        );
        let (x, y) = parse_dataset(&text).unwrap().design_matrix();
        assert_eq!(x.dim(), (2, FEATURE_COUNT));
        assert_eq!(x[[0, 1]], 69.0);
        assert_eq!(y.to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/survey.csv")).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::DatasetIo { .. }));
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("survey.csv");
        std::fs::write(
            &path,
            format!("{SURVEY_HEADER}\nM,69,1,2,2,1,1,2,1,2,2,2,2,2,2,YES\n"),
        )
        .unwrap();
        assert_eq!(load_dataset(&path).unwrap().len(), 1);
    }
}
