//! Error types for the yatra-learning crate.
//!
//! All public API functions return `Result<T, LearningError>`. Dataset
//! problems detected upstream arrive wrapped via `From<ProcessingError>`,
//! so the binary handles one error type at its boundary.

use thiserror::Error;
use yatra_processing::ProcessingError;

/// The main error type for training and evaluation operations.
#[derive(Error, Debug)]
pub enum LearningError {
    /// A model method was called before `fit`.
    #[error("Model has not been fitted yet")]
    NotFitted,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Feature matrix and target vector disagree on shape.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A target class is too small to stratify.
    ///
    /// The rare-class filter upstream makes this unreachable for the
    /// 80/20 split; it guards direct library use with unfiltered labels.
    #[error("Class {0} has fewer than two members; cannot stratify")]
    ClassTooSmall(usize),

    /// Upstream dataset processing error.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;
