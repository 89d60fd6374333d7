//! Dataset loading.

use crate::error::{ProcessingError, Result};
use crate::schema;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load the destination CSV.
///
/// A file that cannot be opened or parsed is reported as
/// [`ProcessingError::DatasetUnreadable`] so the binary can print a
/// diagnostic and exit instead of surfacing a raw I/O error.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .map_err(|e| unreadable(path, e))?
        .finish()
        .map_err(|e| unreadable(path, e))?;

    info!("Dataset loaded from {}: {:?}", path.display(), df.shape());
    Ok(drop_unnamed_index(df))
}

fn unreadable(path: &Path, e: polars::error::PolarsError) -> ProcessingError {
    ProcessingError::DatasetUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Drop a leading serialized-index column if present.
///
/// pandas writes its index under an empty header, which later tooling
/// re-reads as `Unnamed: 0`. Only the *first* column is considered.
pub fn drop_unnamed_index(df: DataFrame) -> DataFrame {
    let first = match df.get_column_names().first() {
        Some(name) => name.to_string(),
        None => return df,
    };

    if first.is_empty() || first == schema::PANDAS_INDEX_PLACEHOLDER {
        debug!("Dropping serialized index column '{}'", first);
        let mut df = df;
        let _ = df.drop_in_place(&first);
        df
    } else {
        df
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_missing_file_is_reported_not_raw() {
        let err = load_dataset(Path::new("/no/such/final.csv")).unwrap_err();
        match err {
            ProcessingError::DatasetUnreadable { path, .. } => {
                assert!(path.contains("final.csv"));
            }
            other => panic!("expected DatasetUnreadable, got {other}"),
        }
    }

    #[test]
    fn test_drop_unnamed_index_removes_placeholder() {
        let df = df![
            "Unnamed: 0" => [0, 1],
            "Name" => ["A", "B"],
        ]
        .unwrap();
        let dropped = drop_unnamed_index(df);
        assert_eq!(dropped.width(), 1);
        assert!(dropped.column("Name").is_ok());
    }

    #[test]
    fn test_drop_unnamed_index_keeps_real_first_column() {
        let df = df![
            "Name" => ["A", "B"],
            "Zone" => ["N", "S"],
        ]
        .unwrap();
        let kept = drop_unnamed_index(df);
        assert_eq!(kept.width(), 2);
    }

    #[test]
    fn test_drop_unnamed_index_only_checks_first_position() {
        // A placeholder that is not leading is left alone.
        let df = df![
            "Name" => ["A"],
            "Unnamed: 0" => [7],
        ]
        .unwrap();
        let kept = drop_unnamed_index(df);
        assert_eq!(kept.width(), 2);
    }
}
