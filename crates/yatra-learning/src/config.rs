//! Configuration for the evaluation run.
//!
//! A single [`EvalConfig`] carries the fixed random seed and every
//! tunable the evaluation uses, so the split, the cross-validation
//! shuffling, and the SVM initialization all draw from one explicit
//! value instead of ambient global state.
//!
//! # Example
//!
//! ```rust,ignore
//! use yatra_learning::EvalConfig;
//!
//! let config = EvalConfig::builder()
//!     .seed(42)
//!     .test_fraction(0.2)
//!     .cv_folds(5)
//!     .build()?;
//! ```

use crate::error::{LearningError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the model evaluation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Seed for the train/test split, CV shuffling, and SVM working-set
    /// selection. Default: 42
    pub seed: u64,

    /// Fraction of rows held out for testing (0.0 - 1.0 exclusive).
    /// Default: 0.2
    pub test_fraction: f64,

    /// Number of stratified cross-validation folds. Default: 5
    pub cv_folds: usize,

    /// Neighbors considered by the distance-based classifier. Default: 5
    pub n_neighbors: usize,

    /// SVM soft-margin penalty. Default: 1.0
    pub svm_c: f64,

    /// SVM KKT violation tolerance. Default: 1e-3
    pub svm_tol: f64,

    /// SMO passes without progress before the solver stops. Default: 10
    pub svm_max_passes: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            cv_folds: 5,
            n_neighbors: 5,
            svm_c: 1.0,
            svm_tol: 1e-3,
            svm_max_passes: 10,
        }
    }
}

impl EvalConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }

    /// Validate the configuration and return an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(LearningError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.cv_folds < 2 {
            return Err(LearningError::InvalidConfig(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.n_neighbors == 0 {
            return Err(LearningError::InvalidConfig(
                "n_neighbors must be at least 1".to_string(),
            ));
        }
        if self.svm_c <= 0.0 {
            return Err(LearningError::InvalidConfig(format!(
                "svm_c must be positive, got {}",
                self.svm_c
            )));
        }
        Ok(())
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Clone, Default)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
}

impl EvalConfigBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.config.test_fraction = fraction;
        self
    }

    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.config.cv_folds = folds;
        self
    }

    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.config.n_neighbors = k;
        self
    }

    pub fn svm_c(mut self, c: f64) -> Self {
        self.config.svm_c = c;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<EvalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
