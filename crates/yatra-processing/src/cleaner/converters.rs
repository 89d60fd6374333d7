//! Series-level conversions used by the cleaner.
//!
//! Every converter here is total: values it cannot interpret become
//! nulls, never errors. Imputation downstream decides what a null means.

use crate::error::Result;
use crate::utils::parse_numeric_string;
use polars::prelude::*;

/// Map a yes/no column to {1, 0, null}.
///
/// Only the exact (trimmed) tokens `Yes` and `No` are recognized; any
/// other value, including different casing, becomes null.
pub(crate) fn yes_no_to_indicator(series: &Series) -> Result<Series> {
    match series.dtype() {
        DataType::String => {
            let chunked = series.str()?;
            let mapped: Vec<Option<i32>> = chunked
                .into_iter()
                .map(|opt| {
                    opt.and_then(|v| match v.trim() {
                        "Yes" => Some(1),
                        "No" => Some(0),
                        _ => None,
                    })
                })
                .collect();
            Ok(Series::new(series.name().clone(), mapped))
        }
        DataType::Boolean => Ok(series.cast(&DataType::Int32)?),
        _ => {
            // Already numeric: keep exact 0/1, null out anything else.
            let casted = series.cast(&DataType::Float64)?;
            let chunked = casted.f64()?;
            let mapped: Vec<Option<i32>> = chunked
                .into_iter()
                .map(|opt| {
                    opt.and_then(|v| {
                        if v == 0.0 {
                            Some(0)
                        } else if v == 1.0 {
                            Some(1)
                        } else {
                            None
                        }
                    })
                })
                .collect();
            Ok(Series::new(series.name().clone(), mapped))
        }
    }
}

/// Coerce a column to Float64, turning unparsable values into nulls.
pub(crate) fn coerce_numeric(series: &Series) -> Result<Series> {
    if series.dtype() == &DataType::String {
        let chunked = series.str()?;
        let parsed: Vec<Option<f64>> = chunked
            .into_iter()
            .map(|opt| opt.and_then(parse_numeric_string))
            .collect();
        Ok(Series::new(series.name().clone(), parsed))
    } else {
        Ok(series.cast(&DataType::Float64)?)
    }
}

/// Normalize the establishment-year column.
///
/// The literal `Unknown` and anything else non-numeric become null via
/// [`coerce_numeric`]; negative years are data-entry errors, not BCE
/// dates, and become null as well.
pub(crate) fn clean_establishment_year(series: &Series) -> Result<Series> {
    let numeric = coerce_numeric(series)?;
    let chunked = numeric.f64()?;
    let mapped: Vec<Option<f64>> = chunked
        .into_iter()
        .map(|opt| opt.filter(|v| *v >= 0.0))
        .collect();
    Ok(Series::new(series.name().clone(), mapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn col(df: &DataFrame, name: &str) -> Series {
        df.column(name).unwrap().as_materialized_series().clone()
    }

    #[test]
    fn test_yes_no_mapping_is_total() {
        let df = df!["flag" => [Some("Yes"), Some("No"), Some("maybe"), Some("YES"), None]]
            .unwrap();
        let mapped = yes_no_to_indicator(&col(&df, "flag")).unwrap();
        let values = mapped.i32().unwrap();

        assert_eq!(values.get(0), Some(1));
        assert_eq!(values.get(1), Some(0));
        assert_eq!(values.get(2), None);
        assert_eq!(values.get(3), None); // casing is exact
        assert_eq!(values.get(4), None);
    }

    #[test]
    fn test_yes_no_trims_whitespace() {
        let df = df!["flag" => [" Yes ", "No "]].unwrap();
        let mapped = yes_no_to_indicator(&col(&df, "flag")).unwrap();
        let values = mapped.i32().unwrap();
        assert_eq!(values.get(0), Some(1));
        assert_eq!(values.get(1), Some(0));
    }

    #[test]
    fn test_year_unknown_becomes_null() {
        let df = df!["year" => ["1653", "Unknown", "not a year"]].unwrap();
        let cleaned = clean_establishment_year(&col(&df, "year")).unwrap();
        let values = cleaned.f64().unwrap();
        assert_eq!(values.get(0), Some(1653.0));
        assert_eq!(values.get(1), None);
        assert_eq!(values.get(2), None);
    }

    #[test]
    fn test_year_negative_becomes_null() {
        let df = df!["year" => [Some(-300.0), Some(0.0), Some(1900.0), None]].unwrap();
        let cleaned = clean_establishment_year(&col(&df, "year")).unwrap();
        let values = cleaned.f64().unwrap();
        assert_eq!(values.get(0), None);
        assert_eq!(values.get(1), Some(0.0));
        assert_eq!(values.get(2), Some(1900.0));
        assert_eq!(values.get(3), None);
    }

    #[test]
    fn test_coerce_numeric_from_strings() {
        let df = df!["fee" => ["50", "free", "1,200"]].unwrap();
        let coerced = coerce_numeric(&col(&df, "fee")).unwrap();
        let values = coerced.f64().unwrap();
        assert_eq!(values.get(0), Some(50.0));
        assert_eq!(values.get(1), None);
        assert_eq!(values.get(2), Some(1200.0));
    }

    #[test]
    fn test_coerce_numeric_passes_through_numbers() {
        let df = df!["fee" => [10i64, 20, 30]].unwrap();
        let coerced = coerce_numeric(&col(&df, "fee")).unwrap();
        assert_eq!(coerced.dtype(), &DataType::Float64);
        assert_eq!(coerced.f64().unwrap().get(1), Some(20.0));
    }
}
