//! RBF-kernel support vector machine.
//!
//! Multiclass classification via one-vs-rest: one soft-margin binary
//! machine per class, each trained with a simplified SMO solver over a
//! precomputed kernel matrix. The gamma follows the `scale` heuristic,
//! 1 / (n_features · variance of the training matrix). Prediction is
//! the argmax of per-class decision values; [`SvmClassifier::decision_scores`]
//! exposes a softmax over those values for probability-style output.

use crate::error::{LearningError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Solver parameters for the SVM.
#[derive(Debug, Clone, Copy)]
pub struct SvmParams {
    /// Soft-margin penalty.
    pub c: f64,
    /// KKT violation tolerance.
    pub tol: f64,
    /// Consecutive no-progress passes before the solver stops.
    pub max_passes: usize,
    /// Seed for the SMO working-set selection.
    pub seed: u64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-3,
            max_passes: 10,
            seed: 42,
        }
    }
}

/// One binary machine of the one-vs-rest ensemble.
#[derive(Debug, Clone)]
struct BinarySvm {
    support_rows: Vec<Vec<f64>>,
    /// alpha_i * y_i per support row.
    coefficients: Vec<f64>,
    bias: f64,
}

impl BinarySvm {
    fn decision(&self, row: &[f64], gamma: f64) -> f64 {
        let kernel_sum: f64 = self
            .support_rows
            .iter()
            .zip(&self.coefficients)
            .map(|(sv, coef)| coef * rbf_kernel(sv, row, gamma))
            .sum();
        kernel_sum + self.bias
    }
}

fn rbf_kernel(a: &[f64], b: &[f64], gamma: f64) -> f64 {
    let squared: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    (-gamma * squared).exp()
}

/// One-vs-rest RBF-kernel SVM classifier.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    params: SvmParams,
    gamma: f64,
    machines: Vec<BinarySvm>,
    fitted: bool,
}

impl SvmClassifier {
    pub fn new(params: SvmParams) -> Self {
        Self {
            params,
            gamma: 1.0,
            machines: Vec::new(),
            fitted: false,
        }
    }

    /// Train one binary machine per label code in `0..n_classes`.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize], n_classes: usize) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(LearningError::ShapeMismatch(format!(
                "{} feature rows vs {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 || n_classes == 0 {
            return Err(LearningError::ShapeMismatch(
                "cannot fit on zero rows or zero classes".to_string(),
            ));
        }

        let rows: Vec<Vec<f64>> = x.outer_iter().map(|row| row.to_vec()).collect();
        self.gamma = scale_gamma(x);

        // Kernel entries depend only on the rows, so one matrix serves
        // every binary machine.
        let n = rows.len();
        let mut kernel = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let value = rbf_kernel(&rows[i], &rows[j], self.gamma);
                kernel[i][j] = value;
                kernel[j][i] = value;
            }
        }

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.machines = (0..n_classes)
            .map(|class| {
                let signs: Vec<f64> = y
                    .iter()
                    .map(|&label| if label == class { 1.0 } else { -1.0 })
                    .collect();
                self.train_binary(&rows, &signs, &kernel, &mut rng)
            })
            .collect();
        self.fitted = true;
        debug!(
            "SVM fitted: {} classes, gamma {:.6}",
            self.machines.len(),
            self.gamma
        );
        Ok(())
    }

    /// Simplified SMO over the precomputed kernel.
    fn train_binary(
        &self,
        rows: &[Vec<f64>],
        signs: &[f64],
        kernel: &[Vec<f64>],
        rng: &mut StdRng,
    ) -> BinarySvm {
        let n = rows.len();
        let c = self.params.c;
        if n < 2 {
            return BinarySvm {
                support_rows: Vec::new(),
                coefficients: Vec::new(),
                bias: signs.first().copied().unwrap_or(0.0),
            };
        }

        let mut alphas = vec![0.0f64; n];
        let mut bias = 0.0f64;

        let decision = |alphas: &[f64], bias: f64, i: usize| -> f64 {
            let sum: f64 = (0..n)
                .map(|j| alphas[j] * signs[j] * kernel[i][j])
                .sum();
            sum + bias
        };

        let mut passes = 0usize;
        while passes < self.params.max_passes {
            let mut num_changed = 0usize;

            for i in 0..n {
                let error_i = decision(&alphas, bias, i) - signs[i];
                let violates_kkt = (signs[i] * error_i < -self.params.tol && alphas[i] < c)
                    || (signs[i] * error_i > self.params.tol && alphas[i] > 0.0);
                if !violates_kkt {
                    continue;
                }

                let mut j = rng.gen_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                let error_j = decision(&alphas, bias, j) - signs[j];

                let alpha_i_old = alphas[i];
                let alpha_j_old = alphas[j];

                let (low, high) = if signs[i] != signs[j] {
                    (
                        (alpha_j_old - alpha_i_old).max(0.0),
                        (c + alpha_j_old - alpha_i_old).min(c),
                    )
                } else {
                    (
                        (alpha_i_old + alpha_j_old - c).max(0.0),
                        (alpha_i_old + alpha_j_old).min(c),
                    )
                };
                if low >= high {
                    continue;
                }

                let eta = 2.0 * kernel[i][j] - kernel[i][i] - kernel[j][j];
                if eta >= 0.0 {
                    continue;
                }

                let alpha_j = (alpha_j_old - signs[j] * (error_i - error_j) / eta)
                    .clamp(low, high);
                if (alpha_j - alpha_j_old).abs() < 1e-5 {
                    continue;
                }
                let alpha_i = alpha_i_old + signs[i] * signs[j] * (alpha_j_old - alpha_j);

                alphas[i] = alpha_i;
                alphas[j] = alpha_j;

                let b1 = bias
                    - error_i
                    - signs[i] * (alpha_i - alpha_i_old) * kernel[i][i]
                    - signs[j] * (alpha_j - alpha_j_old) * kernel[i][j];
                let b2 = bias
                    - error_j
                    - signs[i] * (alpha_i - alpha_i_old) * kernel[i][j]
                    - signs[j] * (alpha_j - alpha_j_old) * kernel[j][j];
                bias = if alpha_i > 0.0 && alpha_i < c {
                    b1
                } else if alpha_j > 0.0 && alpha_j < c {
                    b2
                } else {
                    (b1 + b2) / 2.0
                };

                num_changed += 1;
            }

            if num_changed == 0 {
                passes += 1;
            } else {
                passes = 0;
            }
        }

        // Only rows with non-zero alpha matter at prediction time.
        let mut support_rows = Vec::new();
        let mut coefficients = Vec::new();
        for i in 0..n {
            if alphas[i] > 1e-8 {
                support_rows.push(rows[i].clone());
                coefficients.push(alphas[i] * signs[i]);
            }
        }

        BinarySvm {
            support_rows,
            coefficients,
            bias,
        }
    }

    /// Predict the label code for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if !self.fitted {
            return Err(LearningError::NotFitted);
        }

        let predictions = x
            .outer_iter()
            .map(|row| {
                let row = row.to_vec();
                let mut best = 0usize;
                let mut best_value = f64::NEG_INFINITY;
                for (class, machine) in self.machines.iter().enumerate() {
                    let value = machine.decision(&row, self.gamma);
                    if value > best_value {
                        best = class;
                        best_value = value;
                    }
                }
                best
            })
            .collect();
        Ok(predictions)
    }

    /// Probability-style scores: softmax over per-class decision values.
    pub fn decision_scores(&self, x: &Array2<f64>) -> Result<Vec<Vec<f64>>> {
        if !self.fitted {
            return Err(LearningError::NotFitted);
        }

        let scores = x
            .outer_iter()
            .map(|row| {
                let row = row.to_vec();
                let decisions: Vec<f64> = self
                    .machines
                    .iter()
                    .map(|machine| machine.decision(&row, self.gamma))
                    .collect();
                softmax(&decisions)
            })
            .collect();
        Ok(scores)
    }
}

/// sklearn's `scale` heuristic: 1 / (n_features * Var(X)).
fn scale_gamma(x: &Array2<f64>) -> f64 {
    let n_features = x.ncols().max(1) as f64;
    let n_values = (x.nrows() * x.ncols()).max(1) as f64;
    let mean = x.iter().sum::<f64>() / n_values;
    let variance = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_values;
    if variance > 1e-12 {
        1.0 / (n_features * variance)
    } else {
        1.0 / n_features
    }
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    fn two_clusters() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [0.3, 0.2],
            [4.0, 4.0],
            [4.2, 3.9],
            [3.9, 4.1],
            [4.1, 4.2],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = SvmClassifier::new(SvmParams::default());
        assert!(matches!(
            model.predict(&array![[0.0, 0.0]]).unwrap_err(),
            LearningError::NotFitted
        ));
    }

    #[test]
    fn test_binary_separable_clusters() {
        let (x, y) = two_clusters();
        let mut model = SvmClassifier::new(SvmParams::default());
        model.fit(&x, &y, 2).unwrap();

        let predictions = model.predict(&array![[0.1, 0.1], [4.0, 4.1]]).unwrap();
        assert_eq!(predictions, vec![0, 1]);
    }

    #[test]
    fn test_training_points_are_recovered() {
        let (x, y) = two_clusters();
        let mut model = SvmClassifier::new(SvmParams::default());
        model.fit(&x, &y, 2).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_three_class_one_vs_rest() {
        let x = array![
            [0.0, 0.0],
            [0.2, 0.2],
            [6.0, 0.0],
            [6.2, 0.1],
            [0.0, 6.0],
            [0.1, 6.2],
        ];
        let y = vec![0, 0, 1, 1, 2, 2];
        let mut model = SvmClassifier::new(SvmParams::default());
        model.fit(&x, &y, 3).unwrap();

        let predictions = model
            .predict(&array![[0.1, 0.1], [6.1, 0.0], [0.0, 6.1]])
            .unwrap();
        assert_eq!(predictions, vec![0, 1, 2]);
    }

    #[test]
    fn test_decision_scores_are_a_distribution() {
        let (x, y) = two_clusters();
        let mut model = SvmClassifier::new(SvmParams::default());
        model.fit(&x, &y, 2).unwrap();

        let scores = model.decision_scores(&array![[0.1, 0.1]]).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].len(), 2);
        let total: f64 = scores[0].iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(scores[0][0] > scores[0][1]);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = two_clusters();
        let mut a = SvmClassifier::new(SvmParams::default());
        let mut b = SvmClassifier::new(SvmParams::default());
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();

        let probe = array![[2.0, 2.0], [0.5, 0.4]];
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let mut model = SvmClassifier::new(SvmParams::default());
        let err = model.fit(&array![[0.0]], &[0, 1], 2).unwrap_err();
        assert!(matches!(err, LearningError::ShapeMismatch(_)));
    }
}
