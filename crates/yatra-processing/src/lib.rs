//! Destination Dataset Processing Library
//!
//! Loading, cleaning, and interactive recommendation for the Indian
//! travel-destination dataset.
//!
//! # Overview
//!
//! This crate owns the first and last stages of the pipeline:
//!
//! - **Loading**: CSV ingestion with a stray-index-column drop and a
//!   diagnostic (not a panic) when the file is absent
//! - **Cleaning**: duplicate removal, yes/no indicator mapping,
//!   establishment-year normalization, numeric coercion
//! - **Model frame**: rare-class filtering and feature/target split for
//!   the learning crate
//! - **Recommendation**: zone/significance filtering with a
//!   rating-then-review-volume ranking, plus the interactive loop
//!
//! Model training and evaluation live in `yatra-learning`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use yatra_processing::{DataCleaner, Recommender, RecommendOptions, dataset, schema};
//! use std::path::Path;
//!
//! let df = dataset::load_dataset(Path::new("final.csv"))?;
//! schema::validate(&df)?;
//!
//! let (cleaned, mut report) = DataCleaner.clean(df)?;
//! let frame = DataCleaner.build_model_frame(&cleaned, &mut report)?;
//!
//! let recommender = Recommender::new(cleaned)?;
//! let stdin = std::io::stdin();
//! yatra_processing::recommend::run_interactive(
//!     &recommender,
//!     stdin.lock(),
//!     std::io::stdout(),
//!     &RecommendOptions::default(),
//! )?;
//! ```

pub mod cleaner;
pub mod dataset;
pub mod error;
pub mod recommend;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DataCleaner;
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use recommend::{RecommendOptions, RecommendQuery, Recommender, run_interactive};
pub use types::{CleaningReport, ModelFrame};
