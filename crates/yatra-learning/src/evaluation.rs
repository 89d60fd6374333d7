//! The five-metric, two-model evaluation harness.
//!
//! One stratified 80/20 split is drawn up front and reused across every
//! metric and both classifiers, so score differences reflect the metric
//! and model, not split variance. Cross-validation runs on the training
//! partition only, and each fold fits its own [`FeatureEncoder`] on the
//! fold-train rows — fold-validation rows never influence imputation
//! means, scaling, or one-hot vocabularies.

use crate::config::EvalConfig;
use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::features::{FeatureEncoder, FeaturePlan, RawFeatures};
use crate::knn::KnnClassifier;
use crate::metrics::{accuracy, weighted_f1};
use crate::split::{StratifiedKFold, stratified_train_test_split};
use crate::svm::{SvmClassifier, SvmParams};
use ndarray::Array2;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;
use yatra_processing::ModelFrame;

/// Map target labels to integer codes in sorted-label order.
///
/// Returns the code per row plus the class names, where
/// `classes[code]` recovers the original label.
pub fn encode_labels(target: &[String]) -> (Vec<usize>, Vec<String>) {
    let classes: Vec<String> = target
        .iter()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let codes = target
        .iter()
        .map(|label| {
            classes
                .binary_search(label)
                .unwrap_or_default()
        })
        .collect();
    (codes, classes)
}

/// The six scores recorded for one distance metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricScores {
    pub metric: String,
    pub knn_cv_accuracy: f64,
    pub knn_accuracy: f64,
    pub knn_weighted_f1: f64,
    pub svm_cv_accuracy: f64,
    pub svm_accuracy: f64,
    pub svm_weighted_f1: f64,
}

/// Full evaluation output, one entry per metric in iteration order.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub n_train: usize,
    pub n_test: usize,
    pub classes: Vec<String>,
    pub scores: Vec<MetricScores>,
}

impl std::fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(
            f,
            "MODEL EVALUATION ({} train rows, {} test rows, {} classes)",
            self.n_train,
            self.n_test,
            self.classes.len()
        )?;
        writeln!(f, "{}", "=".repeat(80))?;

        for entry in &self.scores {
            writeln!(f)?;
            writeln!(f, "--- {} ---", entry.metric)?;
            writeln!(
                f,
                "  KNN   CV accuracy: {:.4} | test accuracy: {:.4} | weighted F1: {:.4}",
                entry.knn_cv_accuracy, entry.knn_accuracy, entry.knn_weighted_f1
            )?;
            writeln!(
                f,
                "  SVM   CV accuracy: {:.4} | test accuracy: {:.4} | weighted F1: {:.4}",
                entry.svm_cv_accuracy, entry.svm_accuracy, entry.svm_weighted_f1
            )?;
        }
        Ok(())
    }
}

enum ModelKind {
    Knn(DistanceMetric),
    Svm,
}

/// Runs the evaluation stage over a model frame.
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Evaluate both classifiers under every distance metric.
    pub fn evaluate(&self, frame: &ModelFrame) -> Result<EvaluationReport> {
        self.config.validate()?;

        let plan = FeaturePlan::from_schema();
        let raw = RawFeatures::from_frame(&frame.features, &plan)?;
        let (y, classes) = encode_labels(&frame.target);
        let n_classes = classes.len();

        let (train_idx, test_idx) =
            stratified_train_test_split(&y, self.config.test_fraction, self.config.seed)?;
        let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
        let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

        // Held-out encoding is fitted once on the full training
        // partition; the recipe is identical for every metric.
        let encoder = FeatureEncoder::fit(&raw, &train_idx)?;
        let x_train = encoder.transform(&raw, &train_idx);
        let x_test = encoder.transform(&raw, &test_idx);

        let mut scores = Vec::with_capacity(DistanceMetric::EVALUATION_ORDER.len());
        for metric in DistanceMetric::EVALUATION_ORDER {
            info!("Evaluating distance metric '{}'", metric);

            let knn = ModelKind::Knn(metric);
            let knn_cv_accuracy =
                self.cross_validate(&raw, &y, &train_idx, &knn, n_classes)?;
            let knn_pred = self.fit_predict(&knn, &x_train, &y_train, &x_test, n_classes)?;

            let svm = ModelKind::Svm;
            let svm_cv_accuracy =
                self.cross_validate(&raw, &y, &train_idx, &svm, n_classes)?;
            let svm_pred = self.fit_predict(&svm, &x_train, &y_train, &x_test, n_classes)?;

            scores.push(MetricScores {
                metric: metric.name().to_string(),
                knn_cv_accuracy,
                knn_accuracy: accuracy(&y_test, &knn_pred),
                knn_weighted_f1: weighted_f1(&y_test, &knn_pred, n_classes),
                svm_cv_accuracy,
                svm_accuracy: accuracy(&y_test, &svm_pred),
                svm_weighted_f1: weighted_f1(&y_test, &svm_pred, n_classes),
            });
        }

        Ok(EvaluationReport {
            n_train: train_idx.len(),
            n_test: test_idx.len(),
            classes,
            scores,
        })
    }

    /// Mean CV accuracy over stratified shuffled folds of the training
    /// partition. Folds that end up empty on either side are skipped.
    fn cross_validate(
        &self,
        raw: &RawFeatures,
        y: &[usize],
        train_idx: &[usize],
        kind: &ModelKind,
        n_classes: usize,
    ) -> Result<f64> {
        let fold_labels: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
        let kfold = StratifiedKFold::new(self.config.cv_folds, self.config.seed);

        let mut fold_scores = Vec::with_capacity(self.config.cv_folds);
        for (train_pos, val_pos) in kfold.split(&fold_labels) {
            if train_pos.is_empty() || val_pos.is_empty() {
                continue;
            }
            let fold_train: Vec<usize> = train_pos.iter().map(|&p| train_idx[p]).collect();
            let fold_val: Vec<usize> = val_pos.iter().map(|&p| train_idx[p]).collect();

            let encoder = FeatureEncoder::fit(raw, &fold_train)?;
            let x_train = encoder.transform(raw, &fold_train);
            let x_val = encoder.transform(raw, &fold_val);
            let y_fold_train: Vec<usize> = fold_train.iter().map(|&i| y[i]).collect();
            let y_fold_val: Vec<usize> = fold_val.iter().map(|&i| y[i]).collect();

            let predictions =
                self.fit_predict(kind, &x_train, &y_fold_train, &x_val, n_classes)?;
            fold_scores.push(accuracy(&y_fold_val, &predictions));
        }

        if fold_scores.is_empty() {
            return Ok(f64::NAN);
        }
        Ok(fold_scores.iter().sum::<f64>() / fold_scores.len() as f64)
    }

    fn fit_predict(
        &self,
        kind: &ModelKind,
        x_train: &Array2<f64>,
        y_train: &[usize],
        x_eval: &Array2<f64>,
        n_classes: usize,
    ) -> Result<Vec<usize>> {
        match kind {
            ModelKind::Knn(metric) => {
                let mut model = KnnClassifier::new(self.config.n_neighbors, *metric)?;
                model.fit(x_train, y_train)?;
                model.predict(x_eval)
            }
            ModelKind::Svm => {
                let mut model = SvmClassifier::new(SvmParams {
                    c: self.config.svm_c,
                    tol: self.config.svm_tol,
                    max_passes: self.config.svm_max_passes,
                    seed: self.config.seed,
                });
                model.fit(x_train, y_train, n_classes)?;
                model.predict(x_eval)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;
    use yatra_processing::schema;

    /// Two well-separated classes over the real schema columns.
    fn fixture() -> ModelFrame {
        let n = 12usize;
        let (mut year, mut dur, mut rating, mut fee, mut reviews) =
            (vec![], vec![], vec![], vec![], vec![]);
        let (mut airport, mut dslr) = (vec![], vec![]);
        let (mut zone, mut state, mut city, mut off, mut sig, mut best) =
            (vec![], vec![], vec![], vec![], vec![], vec![]);
        let mut target = Vec::new();

        for i in 0..n {
            let temple = i % 2 == 0;
            let jitter = (i / 2) as f64 * 0.01;
            if temple {
                year.push(Some(1200.0 + jitter));
                dur.push(1.0 + jitter);
                rating.push(4.8 - jitter);
                fee.push(0.0);
                reviews.push(5.0 + jitter);
                airport.push(Some(1));
                dslr.push(Some(0));
                zone.push("Southern");
                state.push("Tamil Nadu");
                city.push("Madurai");
                off.push("None");
                sig.push("Religious");
                best.push("Morning");
                target.push("Temple".to_string());
            } else {
                year.push(Some(1900.0 + jitter));
                dur.push(3.0 + jitter);
                rating.push(4.0 - jitter);
                fee.push(200.0 + jitter);
                reviews.push(0.5 + jitter);
                airport.push(Some(0));
                dslr.push(Some(1));
                zone.push("Northern");
                state.push("Delhi");
                city.push("Delhi");
                off.push("Monday");
                sig.push("Scientific");
                best.push("Evening");
                target.push("Museum".to_string());
            }
        }

        let features = df![
            schema::ZONE => zone,
            schema::STATE => state,
            schema::CITY => city,
            schema::ESTABLISHMENT_YEAR => year,
            schema::VISIT_DURATION_HRS => dur,
            schema::REVIEW_RATING => rating,
            schema::ENTRANCE_FEE => fee,
            schema::AIRPORT_NEARBY => airport,
            schema::WEEKLY_OFF => off,
            schema::SIGNIFICANCE => sig,
            schema::DSLR_ALLOWED => dslr,
            schema::REVIEW_COUNT_LAKHS => reviews,
            schema::BEST_TIME => best,
        ]
        .unwrap();

        ModelFrame { features, target }
    }

    #[test]
    fn test_encode_labels_sorted_order() {
        let target = vec![
            "Temple".to_string(),
            "Fort".to_string(),
            "Temple".to_string(),
        ];
        let (codes, classes) = encode_labels(&target);
        assert_eq!(classes, vec!["Fort", "Temple"]);
        assert_eq!(codes, vec![1, 0, 1]);
    }

    #[test]
    fn test_report_covers_all_metrics_in_order() {
        let config = EvalConfig::builder().cv_folds(2).build().unwrap();
        let report = Evaluator::new(config).evaluate(&fixture()).unwrap();

        let names: Vec<&str> = report.scores.iter().map(|s| s.metric.as_str()).collect();
        assert_eq!(
            names,
            vec!["euclidean", "manhattan", "cosine", "chebyshev", "minkowski"]
        );
        assert_eq!(report.n_train + report.n_test, 12);
    }

    #[test]
    fn test_separable_fixture_scores_perfectly() {
        let config = EvalConfig::builder()
            .cv_folds(2)
            .n_neighbors(3)
            .build()
            .unwrap();
        let report = Evaluator::new(config).evaluate(&fixture()).unwrap();

        for entry in &report.scores {
            assert_eq!(entry.knn_accuracy, 1.0, "knn under {}", entry.metric);
            assert_eq!(entry.svm_accuracy, 1.0, "svm under {}", entry.metric);
            assert_eq!(entry.knn_weighted_f1, 1.0);
            assert_eq!(entry.svm_weighted_f1, 1.0);
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let config = EvalConfig::builder().cv_folds(2).build().unwrap();
        let a = Evaluator::new(config.clone()).evaluate(&fixture()).unwrap();
        let b = Evaluator::new(config).evaluate(&fixture()).unwrap();

        for (x, y) in a.scores.iter().zip(b.scores.iter()) {
            assert_eq!(x.knn_cv_accuracy, y.knn_cv_accuracy);
            assert_eq!(x.svm_cv_accuracy, y.svm_cv_accuracy);
            assert_eq!(x.knn_accuracy, y.knn_accuracy);
            assert_eq!(x.svm_accuracy, y.svm_accuracy);
        }
    }

    #[test]
    fn test_display_renders_one_block_per_metric() {
        let config = EvalConfig::builder().cv_folds(2).build().unwrap();
        let report = Evaluator::new(config).evaluate(&fixture()).unwrap();
        let rendered = report.to_string();

        assert!(rendered.contains("MODEL EVALUATION"));
        let euclidean = rendered.find("--- euclidean ---").unwrap();
        let minkowski = rendered.find("--- minkowski ---").unwrap();
        assert!(euclidean < minkowski);
        assert_eq!(rendered.matches("KNN ").count(), 5);
        assert_eq!(rendered.matches("SVM ").count(), 5);
    }
}
