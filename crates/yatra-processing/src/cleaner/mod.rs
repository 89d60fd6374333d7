//! Data cleaning for the destination dataset.
//!
//! The cleaner runs a fixed sequence over the loaded frame:
//! 1. Remove exact duplicate rows
//! 2. Map the yes/no columns to {1, 0, null}
//! 3. Normalize the establishment-year column
//! 4. Coerce every declared numerical feature to Float64
//!
//! A second step, [`DataCleaner::build_model_frame`], applies the
//! rare-class filter and splits features from the target. The full
//! cleaned frame (before that filter) is what the recommender sees.

mod converters;

use crate::error::{ProcessingError, Result};
use crate::schema;
use crate::types::{CleaningReport, ModelFrame};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Cleans the destination dataset in place-order, reporting every action.
pub struct DataCleaner;

impl DataCleaner {
    /// Run the cleaning sequence and return the cleaned frame plus a report.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        let mut report = CleaningReport {
            rows_before: df.height(),
            ..CleaningReport::default()
        };

        info!("Cleaning dataset ({} rows)...", df.height());

        // 1. Exact duplicate rows
        let before = df.height();
        let mut df = df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?;
        report.duplicates_removed = before - df.height();
        if report.duplicates_removed > 0 {
            report.actions.push(format!(
                "Removed {} duplicate rows",
                report.duplicates_removed
            ));
            debug!("Removed {} duplicate rows", report.duplicates_removed);
        } else {
            report.actions.push("No duplicate rows found".to_string());
        }

        // 2. Yes/no columns to {1, 0, null}
        for col_name in schema::BINARY_FEATURES {
            let converted = {
                let series = df.column(col_name)?.as_materialized_series();
                converters::yes_no_to_indicator(series)?
            };
            let nulled = converted.null_count();
            df.replace(col_name, converted)?;
            report
                .actions
                .push(format!("Mapped '{col_name}' to 1/0 ({nulled} unrecognized)"));
        }

        // 3 & 4. Establishment year, then the remaining numeric coercions
        for col_name in schema::NUMERICAL_FEATURES {
            let converted = {
                let series = df.column(col_name)?.as_materialized_series();
                if col_name == schema::ESTABLISHMENT_YEAR {
                    converters::clean_establishment_year(series)?
                } else {
                    converters::coerce_numeric(series)?
                }
            };
            df.replace(col_name, converted)?;
        }
        report
            .actions
            .push("Coerced numerical features to Float64".to_string());

        if df.height() == 0 {
            return Err(ProcessingError::EmptyDataset);
        }

        report.rows_after = df.height();
        info!(
            "Cleaning complete: {} -> {} rows",
            report.rows_before, report.rows_after
        );
        Ok((df, report))
    }

    /// Apply the rare-class filter and split features from the target.
    ///
    /// Target classes with exactly one member cannot appear on both sides
    /// of a stratified split, so their rows are removed here; the excluded
    /// class names are recorded in the report and logged — never silently
    /// skipped. Rows with a missing target are dropped as well.
    pub fn build_model_frame(
        &self,
        df: &DataFrame,
        report: &mut CleaningReport,
    ) -> Result<ModelFrame> {
        let target = df
            .column(schema::TYPE)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let labels = target.str()?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut missing_target = 0usize;
        for opt in labels.into_iter() {
            match opt {
                Some(label) => *counts.entry(label).or_insert(0) += 1,
                None => missing_target += 1,
            }
        }

        let mut excluded: Vec<String> = counts
            .iter()
            .filter(|&(_, &count)| count == 1)
            .map(|(label, _)| label.to_string())
            .collect();
        excluded.sort();

        if !excluded.is_empty() {
            warn!(
                "Excluding {} single-member target classes: {:?}",
                excluded.len(),
                excluded
            );
            report.actions.push(format!(
                "Excluded single-member classes before split: {excluded:?}"
            ));
        }
        if missing_target > 0 {
            warn!("Dropping {} rows with missing target", missing_target);
            report
                .actions
                .push(format!("Dropped {missing_target} rows with missing target"));
        }

        let keep: Vec<bool> = labels
            .into_iter()
            .map(|opt| match opt {
                Some(label) => !excluded.iter().any(|e| e == label),
                None => false,
            })
            .collect();
        let mask = BooleanChunked::from_slice(PlSmallStr::EMPTY, &keep);
        let filtered = df.filter(&mask)?;

        if filtered.height() == 0 {
            return Err(ProcessingError::NoUsableClasses);
        }

        let target: Vec<String> = filtered
            .column(schema::TYPE)?
            .as_materialized_series()
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|opt| opt.unwrap_or_default().to_string())
            .collect();

        let drop_cols: Vec<PlSmallStr> = [schema::NAME, schema::TYPE]
            .iter()
            .map(|s| (*s).into())
            .collect();
        let features = filtered.drop_many(drop_cols);

        report.excluded_classes = excluded;
        debug!(
            "Model frame: {} rows x {} features, {} classes",
            features.height(),
            features.width(),
            counts.len() - report.excluded_classes.len()
        );

        Ok(ModelFrame { features, target })
    }
}
