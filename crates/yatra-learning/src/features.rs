//! Feature encoding: the shared preprocessing recipe for both models.
//!
//! [`RawFeatures`] pulls the declared columns out of the cleaned polars
//! frame once; [`FeatureEncoder`] is then fitted on a training subset of
//! rows and applied unchanged to any other subset, so test statistics
//! never leak into the fit. The output is a dense row-major matrix —
//! several of the distance metrics need dense input.
//!
//! Branches:
//! - numerical + binary columns: mean imputation, then zero-mean /
//!   unit-variance scaling
//! - categorical columns: nulls become a sentinel category, then one-hot
//!   indicators over the categories observed in training; an unseen
//!   value at transform time encodes as an all-zero block

use crate::error::{LearningError, Result};
use ndarray::Array2;
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;
use yatra_processing::schema;

/// Sentinel category standing in for a missing categorical value.
pub const MISSING_CATEGORY: &str = "missing";

/// Which columns feed which preprocessing branch.
#[derive(Debug, Clone)]
pub struct FeaturePlan {
    /// Numeric and binary columns, in matrix order.
    pub numeric: Vec<String>,
    /// Categorical columns, in matrix order after the numeric block.
    pub categorical: Vec<String>,
}

impl FeaturePlan {
    /// The plan declared by the dataset schema.
    pub fn from_schema() -> Self {
        let numeric = schema::NUMERICAL_FEATURES
            .iter()
            .chain(schema::BINARY_FEATURES.iter())
            .map(|s| s.to_string())
            .collect();
        let categorical = schema::CATEGORICAL_FEATURES
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            numeric,
            categorical,
        }
    }
}

/// Column-major snapshot of the feature frame, decoded once.
#[derive(Debug, Clone)]
pub struct RawFeatures {
    numeric: Vec<Vec<Option<f64>>>,
    categorical: Vec<Vec<Option<String>>>,
    n_rows: usize,
}

impl RawFeatures {
    /// Extract the planned columns from the cleaned feature frame.
    pub fn from_frame(df: &DataFrame, plan: &FeaturePlan) -> Result<Self> {
        let mut numeric = Vec::with_capacity(plan.numeric.len());
        for name in &plan.numeric {
            let casted = df
                .column(name.as_str())?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = casted.f64()?.into_iter().collect();
            numeric.push(values);
        }

        let mut categorical = Vec::with_capacity(plan.categorical.len());
        for name in &plan.categorical {
            let casted = df
                .column(name.as_str())?
                .as_materialized_series()
                .cast(&DataType::String)?;
            let values: Vec<Option<String>> = casted
                .str()?
                .into_iter()
                .map(|opt| opt.map(|v| v.to_string()))
                .collect();
            categorical.push(values);
        }

        Ok(Self {
            numeric,
            categorical,
            n_rows: df.height(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

/// Per-column statistics learned from a training subset.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    /// (mean, scale) per numeric column; scale is 1 for constant columns.
    numeric_stats: Vec<(f64, f64)>,
    /// Sorted categories observed in training, per categorical column.
    categories: Vec<Vec<String>>,
}

impl FeatureEncoder {
    /// Fit imputation means, scaling factors, and category vocabularies
    /// on the given training rows only.
    pub fn fit(raw: &RawFeatures, rows: &[usize]) -> Result<Self> {
        if rows.is_empty() {
            return Err(LearningError::ShapeMismatch(
                "cannot fit encoder on zero rows".to_string(),
            ));
        }

        let mut numeric_stats = Vec::with_capacity(raw.numeric.len());
        for column in &raw.numeric {
            let observed: Vec<f64> = rows.iter().filter_map(|&r| column[r]).collect();
            let mean = if observed.is_empty() {
                0.0
            } else {
                observed.iter().sum::<f64>() / observed.len() as f64
            };
            let variance = if observed.is_empty() {
                0.0
            } else {
                observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / observed.len() as f64
            };
            let scale = if variance > 0.0 { variance.sqrt() } else { 1.0 };
            numeric_stats.push((mean, scale));
        }

        let mut categories = Vec::with_capacity(raw.categorical.len());
        for column in &raw.categorical {
            let observed: BTreeSet<String> = rows
                .iter()
                .map(|&r| {
                    column[r]
                        .clone()
                        .unwrap_or_else(|| MISSING_CATEGORY.to_string())
                })
                .collect();
            categories.push(observed.into_iter().collect());
        }

        let encoder = Self {
            numeric_stats,
            categories,
        };
        debug!(
            "Encoder fitted on {} rows -> {} output features",
            rows.len(),
            encoder.n_output_features()
        );
        Ok(encoder)
    }

    /// Width of the encoded matrix.
    pub fn n_output_features(&self) -> usize {
        self.numeric_stats.len() + self.categories.iter().map(|c| c.len()).sum::<usize>()
    }

    /// Encode the selected rows into a dense matrix.
    ///
    /// Missing numerics take the training mean; categorical values not
    /// in the training vocabulary leave their indicator block all zero.
    pub fn transform(&self, raw: &RawFeatures, rows: &[usize]) -> Array2<f64> {
        let width = self.n_output_features();
        let mut matrix = Array2::zeros((rows.len(), width));

        for (out_row, &row) in rows.iter().enumerate() {
            let mut col = 0usize;

            for (feature, &(mean, scale)) in raw.numeric.iter().zip(&self.numeric_stats) {
                let value = feature[row].unwrap_or(mean);
                matrix[[out_row, col]] = (value - mean) / scale;
                col += 1;
            }

            for (feature, vocabulary) in raw.categorical.iter().zip(&self.categories) {
                let value = feature[row].as_deref().unwrap_or(MISSING_CATEGORY);
                if let Ok(position) = vocabulary.binary_search_by(|v| v.as_str().cmp(value)) {
                    matrix[[out_row, col + position]] = 1.0;
                }
                col += vocabulary.len();
            }
        }

        matrix
    }
}
