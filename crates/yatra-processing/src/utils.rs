//! Shared parsing helpers used by the cleaner and the recommender.

use polars::prelude::*;

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 3] = [',', '₹', ' '];

/// Markers that mean "value not recorded" in this dataset.
///
/// The establishment-year column uses the literal `Unknown`; the other
/// spellings show up in hand-edited copies of the CSV.
pub const MISSING_MARKERS: [&str; 5] = ["unknown", "n/a", "na", "none", "-"];

/// Check if a string is a missing-value marker.
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Try to parse a string as a numeric value, stripping common formatting.
///
/// Returns `None` for missing-value markers and anything that still fails
/// to parse after cleanup — the caller turns that into a null, never an
/// error.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || is_missing_marker(trimmed) {
        return None;
    }
    let mut cleaned = trimmed.to_string();
    for c in NUMERIC_FORMAT_CHARS {
        cleaned = cleaned.replace(c, "");
    }
    cleaned.parse::<f64>().ok()
}

/// Distinct non-null string values of a series, sorted for stable output.
pub fn distinct_strings(series: &Series) -> crate::error::Result<Vec<String>> {
    let casted = series.cast(&DataType::String)?;
    let chunked = casted.str()?;

    let mut values: Vec<String> = chunked
        .into_iter()
        .flatten()
        .map(|v| v.to_string())
        .collect();
    values.sort();
    values.dedup();
    Ok(values)
}
