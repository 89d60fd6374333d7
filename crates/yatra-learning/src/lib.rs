//! Classifier Training & Evaluation Library
//!
//! Native Rust implementations of the two classifiers the pipeline
//! compares — a k-nearest-neighbors model evaluated under five distance
//! metrics, and a one-vs-rest RBF-kernel SVM — together with the shared
//! feature-encoding recipe, stratified splitting, and the evaluation
//! harness that produces the summary report.
//!
//! # Overview
//!
//! - [`features`]: mean-impute/scale and sentinel-impute/one-hot
//!   branches, fitted on training rows only, dense `ndarray` output
//! - [`distance`]: the five metrics in their fixed evaluation order
//! - [`knn`] / [`svm`]: the classifiers
//! - [`split`]: seeded stratified 80/20 split and K-fold
//! - [`evaluation`]: the metric × model loop and [`EvaluationReport`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yatra_learning::{EvalConfig, Evaluator};
//!
//! let config = EvalConfig::builder().seed(42).build()?;
//! let report = Evaluator::new(config).evaluate(&model_frame)?;
//! println!("{report}");
//! ```
//!
//! The single seed in [`EvalConfig`] drives the split, the CV
//! shuffling, and the SVM working-set selection, so a run is
//! reproducible end to end.

pub mod config;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod knn;
pub mod metrics;
pub mod split;
pub mod svm;

// Re-exports for convenient access
pub use config::{EvalConfig, EvalConfigBuilder};
pub use distance::DistanceMetric;
pub use error::{LearningError, Result as LearningResult};
pub use evaluation::{EvaluationReport, Evaluator, MetricScores, encode_labels};
pub use features::{FeatureEncoder, FeaturePlan, RawFeatures};
pub use knn::KnnClassifier;
pub use svm::{SvmClassifier, SvmParams};
