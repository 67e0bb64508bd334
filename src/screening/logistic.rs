//! Binary logistic regression fit by full-batch gradient descent.
//!
//! Features are standardized with the training mean/std before fitting
//! (zero-variance columns keep a scale of 1). The penalty is L2 with
//! inverse strength `c`, applied to the weights only, matching the usual
//! `C = 1.0` library default.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::model::ModelUnavailableError;

/// Decision threshold on P(high risk).
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Hyper-parameters for `LogisticRegression::fit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub iterations: usize,
    pub learning_rate: f64,
    /// Inverse regularization strength; larger = weaker penalty.
    pub c: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: 2000,
            learning_rate: 0.1,
            c: 1.0,
        }
    }
}

impl TrainingConfig {
    fn validate(&self) -> Result<(), ModelUnavailableError> {
        if self.iterations == 0 {
            return Err(ModelUnavailableError::InvalidTraining(
                "iterations must be positive".into(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ModelUnavailableError::InvalidTraining(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ModelUnavailableError::InvalidTraining(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        Ok(())
    }
}

/// Fitted parameters, in the standardized feature space.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
    means: Array1<f64>,
    scales: Array1<f64>,
}

impl LogisticRegression {
    /// Fit on `x` (rows × features) against 0/1 targets `y`.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        config: &TrainingConfig,
    ) -> Result<Self, ModelUnavailableError> {
        config.validate()?;
        if x.nrows() == 0 {
            return Err(ModelUnavailableError::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(ModelUnavailableError::LabelMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        let positives = y.iter().filter(|v| **v >= 0.5).count();
        if positives == 0 || positives == y.len() {
            return Err(ModelUnavailableError::SingleClass);
        }

        let means = x
            .mean_axis(Axis(0))
            .ok_or(ModelUnavailableError::EmptyDataset)?;
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 1e-12 { s } else { 1.0 });
        let xs = (x - &means) / &scales;

        let n = x.nrows() as f64;
        let penalty = 1.0 / (config.c * n);
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..config.iterations {
            let p = (xs.dot(&weights) + bias).mapv(sigmoid);
            let err = &p - y;
            let grad_w = xs.t().dot(&err) / n + &weights * penalty;
            let grad_b = err.sum() / n;

            weights.scaled_add(-config.learning_rate, &grad_w);
            bias -= config.learning_rate * grad_b;
        }

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelUnavailableError::Diverged);
        }

        tracing::debug!(
            iterations = config.iterations,
            bias,
            "Logistic regression converged"
        );

        Ok(Self {
            weights,
            bias,
            means,
            scales,
        })
    }

    /// P(class 1) for one raw (unscaled) feature row.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let row = ArrayView1::from(row);
        let z = ((&row - &self.means) / &self.scales).dot(&self.weights) + self.bias;
        sigmoid(z)
    }

    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) >= DECISION_THRESHOLD
    }

    /// Fraction of rows in `x` whose prediction matches `y`.
    pub fn accuracy(&self, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
        if x.nrows() == 0 {
            return 0.0;
        }
        let correct = x
            .outer_iter()
            .zip(y.iter())
            .filter(|(row, target)| {
                let predicted = row
                    .as_slice()
                    .map(|r| self.predict(r))
                    .unwrap_or_else(|| self.predict(&row.to_vec()));
                predicted == (**target >= 0.5)
            })
            .count();
        correct as f64 / x.nrows() as f64
    }

    /// Weights in the standardized space, in feature order.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        // Column 0 decides the class; column 1 is noise; column 2 is constant.
        let x = array![
            [1.0, 30.0, 1.0],
            [1.0, 62.0, 1.0],
            [1.0, 45.0, 1.0],
            [1.0, 51.0, 1.0],
            [0.0, 33.0, 1.0],
            [0.0, 64.0, 1.0],
            [0.0, 47.0, 1.0],
            [0.0, 50.0, 1.0],
        ];
        let y = array![1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        (x, y)
    }

    #[test]
    fn learns_separable_data() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap();

        assert!(model.predict(&[1.0, 40.0, 1.0]));
        assert!(!model.predict(&[0.0, 40.0, 1.0]));
        assert_eq!(model.accuracy(&x, &y), 1.0);
        assert!(model.weights()[0] > model.weights()[1].abs());
    }

    #[test]
    fn constant_column_gets_no_weight() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap();
        assert_eq!(model.weights()[2], 0.0);
    }

    #[test]
    fn probabilities_are_in_unit_interval() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap();
        for age in [1.0, 60.0, 120.0] {
            let p = model.predict_proba(&[1.0, age, 1.0]);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn prediction_is_deterministic() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap();
        let row = [1.0, 55.0, 1.0];
        assert_eq!(model.predict_proba(&row), model.predict_proba(&row));
    }

    #[test]
    fn rejects_single_class() {
        let (x, _) = separable();
        let y = Array1::<f64>::ones(x.nrows());
        let err = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::SingleClass));
    }

    #[test]
    fn rejects_empty_input() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        let err = LogisticRegression::fit(&x, &y, &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, ModelUnavailableError::EmptyDataset));
    }

    #[test]
    fn rejects_bad_config() {
        let (x, y) = separable();
        let config = TrainingConfig {
            iterations: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            LogisticRegression::fit(&x, &y, &config).unwrap_err(),
            ModelUnavailableError::InvalidTraining(_)
        ));

        let config = TrainingConfig {
            c: -1.0,
            ..TrainingConfig::default()
        };
        assert!(LogisticRegression::fit(&x, &y, &config).is_err());
    }

    #[test]
    fn sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999);
        assert!(sigmoid(-40.0) < 0.001);
    }
}
