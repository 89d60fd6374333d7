//! The interactive read-filter-print loop.
//!
//! The loop is written against `BufRead`/`Write` rather than the live
//! terminal so tests can drive it with injected input sequences. All
//! user-facing text goes through the writer with `writeln!`; the tracing
//! logger is reserved for diagnostics.

use crate::error::Result;
use crate::recommend::{RecommendOptions, RecommendQuery, Recommender};
use crate::schema;
use std::io::{BufRead, Write};
use tracing::debug;

/// The only token that keeps the loop going at the continue prompt.
const AFFIRMATIVE: &str = "yes";

/// Run the recommendation loop until the user declines to continue.
///
/// Invalid zone or significance input re-prompts both questions; an
/// empty result set is reported as "no matches" rather than an error.
/// End of input is treated like a decline so a closed stdin cannot spin
/// the loop forever.
pub fn run_interactive<R: BufRead, W: Write>(
    recommender: &Recommender,
    mut input: R,
    mut output: W,
    opts: &RecommendOptions,
) -> Result<()> {
    loop {
        let Some(zone) = prompt(&mut input, &mut output, "Enter your preferred zone: ")? else {
            break;
        };
        let Some(significance) =
            prompt(&mut input, &mut output, "Enter your preferred significance: ")?
        else {
            break;
        };

        if !recommender.is_known_zone(&zone) {
            writeln!(
                output,
                "'{}' is not a zone in this dataset. Known zones: {}",
                zone,
                recommender.zones().join(", ")
            )?;
            continue;
        }
        if !recommender.is_known_significance(&significance) {
            writeln!(
                output,
                "'{}' is not a significance in this dataset. Known values: {}",
                significance,
                recommender.significances().join(", ")
            )?;
            continue;
        }

        let query = RecommendQuery { zone, significance };
        debug!("Recommendation query: {:?}", query);
        let ranked = recommender.rank(&query, opts)?;

        if ranked.height() == 0 {
            writeln!(
                output,
                "No matching destinations found. Try a different combination."
            )?;
        } else {
            writeln!(
                output,
                "\nTop destinations for {} / {}:",
                query.zone, query.significance
            )?;
            writeln!(output, "{ranked}")?;
            print_nearby(recommender, &ranked, &mut output)?;
        }

        let answer = prompt(
            &mut input,
            &mut output,
            "Would you like another recommendation? (yes/no): ",
        )?;
        match answer {
            Some(a) if a.eq_ignore_ascii_case(AFFIRMATIVE) => continue,
            _ => break,
        }
    }

    writeln!(output, "Happy travels!")?;
    Ok(())
}

/// List other destinations in the top match's city, if any.
fn print_nearby<W: Write>(
    recommender: &Recommender,
    ranked: &polars::prelude::DataFrame,
    output: &mut W,
) -> Result<()> {
    let names = ranked
        .column(schema::NAME)?
        .as_materialized_series()
        .str()?
        .clone();
    let cities = ranked
        .column(schema::CITY)?
        .as_materialized_series()
        .str()?
        .clone();

    if let (Some(name), Some(city)) = (names.get(0), cities.get(0)) {
        let nearby = recommender.nearby_in_city(name, city, 3)?;
        if nearby.height() > 0 {
            writeln!(output, "Other places to see in {city}:")?;
            writeln!(output, "{nearby}")?;
        }
    }
    Ok(())
}

/// Print a prompt and read one trimmed line; `None` means end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;

    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
