//! Error types for dataset loading, cleaning, and recommendation.
//!
//! The crate uses a single [`ProcessingError`] hierarchy built with
//! `thiserror`. Malformed *values* never surface as errors — they are
//! converted to nulls during cleaning — so the variants here cover
//! structural problems only: unreadable files, absent columns, and
//! datasets too degenerate to work with.

use thiserror::Error;

/// The main error type for dataset processing operations.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The input file could not be opened or parsed.
    #[error("Failed to read dataset from '{path}': {reason}")]
    DatasetUnreadable { path: String, reason: String },

    /// A column required by the schema was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The dataset holds no rows after cleaning.
    #[error("Dataset is empty after cleaning")]
    EmptyDataset,

    /// No target class survived the rare-class filter.
    #[error("No target class has at least two members; cannot build a model frame")]
    NoUsableClasses,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}
