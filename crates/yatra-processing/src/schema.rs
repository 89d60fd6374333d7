//! Column contract for the travel-destination dataset.
//!
//! Column names are exact, including case and spacing — they match the
//! headers of the source CSV byte for byte. Feature-group membership is
//! declared here once and consumed by both the cleaner and the learning
//! crate, so the two can never disagree about which columns are numeric,
//! binary, or categorical.

use crate::error::{ProcessingError, Result};
use polars::prelude::*;

/// Destination name; informally unique, excluded from the feature matrix.
pub const NAME: &str = "Name";
/// Geographic zone, e.g. "Northern".
pub const ZONE: &str = "Zone";
pub const STATE: &str = "State";
pub const CITY: &str = "City";
/// Destination category — the prediction target.
pub const TYPE: &str = "Type";
pub const ESTABLISHMENT_YEAR: &str = "Establishment Year";
pub const VISIT_DURATION_HRS: &str = "time needed to visit in hrs";
pub const REVIEW_RATING: &str = "Google review rating";
pub const ENTRANCE_FEE: &str = "Entrance Fee in INR";
pub const AIRPORT_NEARBY: &str = "Airport with 50km Radius";
pub const WEEKLY_OFF: &str = "Weekly Off";
pub const SIGNIFICANCE: &str = "Significance";
pub const DSLR_ALLOWED: &str = "DSLR Allowed";
pub const REVIEW_COUNT_LAKHS: &str = "Number of google review in lakhs";
pub const BEST_TIME: &str = "Best Time to visit";

/// Header pandas writes for a serialized index column.
pub const PANDAS_INDEX_PLACEHOLDER: &str = "Unnamed: 0";

/// Features coerced to numeric and fed through the impute/scale branch.
pub const NUMERICAL_FEATURES: [&str; 5] = [
    ESTABLISHMENT_YEAR,
    VISIT_DURATION_HRS,
    REVIEW_RATING,
    ENTRANCE_FEE,
    REVIEW_COUNT_LAKHS,
];

/// Yes/no columns mapped to {1, 0, null}; scaled with the numeric branch.
pub const BINARY_FEATURES: [&str; 2] = [AIRPORT_NEARBY, DSLR_ALLOWED];

/// Features expanded into one-hot indicators.
pub const CATEGORICAL_FEATURES: [&str; 6] =
    [ZONE, STATE, CITY, WEEKLY_OFF, SIGNIFICANCE, BEST_TIME];

/// Every column the pipeline expects to find after the index-column drop.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    NAME,
    ZONE,
    STATE,
    CITY,
    TYPE,
    ESTABLISHMENT_YEAR,
    VISIT_DURATION_HRS,
    REVIEW_RATING,
    ENTRANCE_FEE,
    AIRPORT_NEARBY,
    WEEKLY_OFF,
    SIGNIFICANCE,
    DSLR_ALLOWED,
    REVIEW_COUNT_LAKHS,
    BEST_TIME,
];

/// Check that every required column is present.
///
/// This is an ad-hoc presence check, not schema inference: dtypes are
/// corrected later by the cleaner, only names matter here.
pub fn validate(df: &DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|n| n == required) {
            return Err(ProcessingError::ColumnNotFound(required.to_string()));
        }
    }
    Ok(())
}
