//! K-nearest-neighbors classifier.
//!
//! Lazy learner: `fit` stores the encoded training rows, `predict` votes
//! among the k nearest under the configured [`DistanceMetric`].

use crate::distance::DistanceMetric;
use crate::error::{LearningError, Result};
use ndarray::Array2;
use std::collections::BTreeMap;

/// K-nearest-neighbors classifier over dense feature rows.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    metric: DistanceMetric,
    train_rows: Vec<Vec<f64>>,
    train_labels: Vec<usize>,
    fitted: bool,
}

impl KnnClassifier {
    /// Create a classifier with `k` neighbors under `metric`.
    pub fn new(k: usize, metric: DistanceMetric) -> Result<Self> {
        if k == 0 {
            return Err(LearningError::InvalidConfig(
                "k must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            k,
            metric,
            train_rows: Vec::new(),
            train_labels: Vec::new(),
            fitted: false,
        })
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Store the training data.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(LearningError::ShapeMismatch(format!(
                "{} feature rows vs {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(LearningError::ShapeMismatch(
                "cannot fit on zero rows".to_string(),
            ));
        }

        self.train_rows = x.outer_iter().map(|row| row.to_vec()).collect();
        self.train_labels = y.to_vec();
        self.fitted = true;
        Ok(())
    }

    /// Predict a label for every row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if !self.fitted {
            return Err(LearningError::NotFitted);
        }

        let predictions = x
            .outer_iter()
            .map(|row| self.predict_one(&row.to_vec()))
            .collect();
        Ok(predictions)
    }

    fn predict_one(&self, row: &[f64]) -> usize {
        let mut neighbors: Vec<(f64, usize)> = self
            .train_rows
            .iter()
            .zip(&self.train_labels)
            .map(|(train_row, &label)| (self.metric.distance(row, train_row), label))
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
        for (_, label) in neighbors.iter().take(self.k) {
            *votes.entry(*label).or_insert(0) += 1;
        }

        // Majority vote; on equal counts the lower label code wins
        // because BTreeMap iterates in ascending key order.
        let mut best_label = 0usize;
        let mut best_count = 0usize;
        for (label, count) in votes {
            if count > best_count {
                best_label = label;
                best_count = count;
            }
        }
        best_label
    }
}
