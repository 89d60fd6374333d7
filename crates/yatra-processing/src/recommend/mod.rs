//! Destination filtering and ranking.
//!
//! The recommender works over the *full* cleaned dataset — including
//! rows whose target class was excluded from training — and never
//! consults the trained models. Ranking happens in a local lazy view:
//! the source frame's rating and review-volume values are never
//! mutated, even when the view fills their nulls with zero.

mod interactive;

pub use interactive::run_interactive;

use crate::error::Result;
use crate::schema;
use crate::utils::distinct_strings;
use polars::prelude::*;
use tracing::debug;

/// A zone/significance preference pair read from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendQuery {
    pub zone: String,
    pub significance: String,
}

/// Knobs for the ranking step.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    /// Maximum number of rows returned.
    pub top_n: usize,
    /// Optional entrance-fee ceiling in INR.
    pub max_fee: Option<f64>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            max_fee: None,
        }
    }
}

// Rank keys live in the local view only.
const RATING_KEY: &str = "__rating_rank";
const REVIEWS_KEY: &str = "__reviews_rank";

/// Filters and ranks destinations by user preferences.
pub struct Recommender {
    df: DataFrame,
    zones: Vec<String>,
    significances: Vec<String>,
}

impl Recommender {
    /// Build a recommender over the full cleaned dataset.
    ///
    /// The distinct zone and significance values observed here are the
    /// validation sets for interactive input.
    pub fn new(df: DataFrame) -> Result<Self> {
        let zones = distinct_strings(df.column(schema::ZONE)?.as_materialized_series())?;
        let significances =
            distinct_strings(df.column(schema::SIGNIFICANCE)?.as_materialized_series())?;
        debug!(
            "Recommender over {} rows, {} zones, {} significance values",
            df.height(),
            zones.len(),
            significances.len()
        );
        Ok(Self {
            df,
            zones,
            significances,
        })
    }

    /// Distinct zones observed in the dataset, sorted.
    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    /// Distinct significance values observed in the dataset, sorted.
    pub fn significances(&self) -> &[String] {
        &self.significances
    }

    pub fn is_known_zone(&self, value: &str) -> bool {
        self.zones.iter().any(|z| z == value)
    }

    pub fn is_known_significance(&self, value: &str) -> bool {
        self.significances.iter().any(|s| s == value)
    }

    /// Rank destinations matching the query.
    ///
    /// Matching is exact equality on both fields. For ranking purposes
    /// only, rating and review volume are viewed as Float64 with nulls
    /// as zero; the ordering is rating descending, ties broken by
    /// review volume descending. The underlying frame is left untouched.
    pub fn rank(&self, query: &RecommendQuery, opts: &RecommendOptions) -> Result<DataFrame> {
        let mut view = self
            .df
            .clone()
            .lazy()
            .filter(
                col(schema::ZONE)
                    .eq(lit(query.zone.clone()))
                    .and(col(schema::SIGNIFICANCE).eq(lit(query.significance.clone()))),
            )
            .with_columns([
                col(schema::REVIEW_RATING)
                    .cast(DataType::Float64)
                    .fill_null(lit(0.0))
                    .alias(RATING_KEY),
                col(schema::REVIEW_COUNT_LAKHS)
                    .cast(DataType::Float64)
                    .fill_null(lit(0.0))
                    .alias(REVIEWS_KEY),
            ]);

        if let Some(fee) = opts.max_fee {
            view = view.filter(
                col(schema::ENTRANCE_FEE)
                    .cast(DataType::Float64)
                    .fill_null(lit(0.0))
                    .lt_eq(lit(fee)),
            );
        }

        let ranked = view
            .sort_by_exprs(
                vec![col(RATING_KEY), col(REVIEWS_KEY)],
                SortMultipleOptions::default().with_order_descending_multi([true, true]),
            )
            .limit(opts.top_n as u32)
            .select([
                col(schema::NAME),
                col(schema::CITY),
                col(schema::STATE),
                col(schema::TYPE),
                col(schema::REVIEW_RATING),
                col(schema::REVIEW_COUNT_LAKHS),
                col(schema::ENTRANCE_FEE),
                col(schema::VISIT_DURATION_HRS),
            ])
            .collect()?;

        Ok(ranked)
    }

    /// Other destinations in the same city, for "while you are there" hints.
    pub fn nearby_in_city(&self, name: &str, city: &str, limit: usize) -> Result<DataFrame> {
        let nearby = self
            .df
            .clone()
            .lazy()
            .filter(
                col(schema::CITY)
                    .eq(lit(city.to_string()))
                    .and(col(schema::NAME).neq(lit(name.to_string()))),
            )
            .limit(limit as u32)
            .select([
                col(schema::NAME),
                col(schema::TYPE),
                col(schema::REVIEW_RATING),
            ])
            .collect()?;
        Ok(nearby)
    }
}
