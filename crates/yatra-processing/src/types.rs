//! Result types produced by the cleaning stage.

use polars::prelude::*;
use serde::Serialize;

/// Model-ready data: the feature frame and the raw target labels.
///
/// Produced by [`DataCleaner::build_model_frame`](crate::cleaner::DataCleaner::build_model_frame)
/// after the rare-class filter, so every label in `target` occurs at least
/// twice. `features` excludes the identifier and target columns.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    /// Feature columns only — no `Name`, no `Type`.
    pub features: DataFrame,
    /// Target label per row, parallel to `features`.
    pub target: Vec<String>,
}

impl ModelFrame {
    /// Number of rows available for training and evaluation.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// What the cleaner did, for transparency in logs and the CLI summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    /// Target classes excluded by the rare-class filter, sorted by name.
    pub excluded_classes: Vec<String>,
    /// Human-readable action log, in execution order.
    pub actions: Vec<String>,
}
