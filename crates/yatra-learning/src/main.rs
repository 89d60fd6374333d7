//! CLI entry point for the travel-destination pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::io;
use std::path::Path;
use tracing::info;
use yatra_learning::{EvalConfig, Evaluator};
use yatra_processing::{DataCleaner, RecommendOptions, Recommender, dataset, recommend, schema};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Travel-destination classification and recommendation",
    long_about = "Cleans the destination dataset, evaluates a KNN classifier under five\n\
                  distance metrics alongside an RBF-kernel SVM, and then answers\n\
                  interactive zone/significance recommendation queries.\n\n\
                  EXAMPLES:\n  \
                  # Full run on the default dataset\n  \
                  yatra\n\n  \
                  # Custom dataset, straight to recommendations\n  \
                  yatra -i places.csv --skip-eval\n\n  \
                  # Machine-readable evaluation only\n  \
                  yatra --json | jq '.evaluation.scores'"
)]
struct Args {
    /// Path to the destination CSV file
    #[arg(short, long, default_value = "final.csv")]
    input: String,

    /// Random seed for the split, CV shuffling, and SVM initialization
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Held-out test fraction (0.0 - 1.0)
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Number of stratified cross-validation folds
    #[arg(long, default_value = "5")]
    folds: usize,

    /// Neighbors considered by the distance-based classifier
    #[arg(short = 'k', long, default_value = "5")]
    neighbors: usize,

    /// Rows shown per recommendation
    #[arg(long, default_value = "10")]
    top: usize,

    /// Entrance-fee ceiling in INR for recommendations
    #[arg(long)]
    max_fee: Option<f64>,

    /// Skip model evaluation and go straight to recommendations
    #[arg(long)]
    skip_eval: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and results)
    #[arg(short, long)]
    quiet: bool,

    /// Print cleaning and evaluation results as JSON to stdout, then exit
    ///
    /// Disables all logging and the interactive loop; only JSON is written.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    // A missing input file is a diagnostic, not a stack trace.
    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let df = dataset::load_dataset(Path::new(&args.input))?;
    schema::validate(&df)?;

    let (cleaned, mut cleaning) = DataCleaner.clean(df)?;
    for action in &cleaning.actions {
        info!("{action}");
    }

    if !args.skip_eval || args.json {
        let frame = DataCleaner.build_model_frame(&cleaned, &mut cleaning)?;
        info!(
            "Model frame ready: {} rows, {} excluded classes",
            frame.len(),
            cleaning.excluded_classes.len()
        );

        let config = EvalConfig::builder()
            .seed(args.seed)
            .test_fraction(args.test_fraction)
            .cv_folds(args.folds)
            .n_neighbors(args.neighbors)
            .build()?;
        let report = Evaluator::new(config).evaluate(&frame)?;

        if args.json {
            let payload = serde_json::json!({
                "cleaning": cleaning,
                "evaluation": report,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        println!("{report}");
    }

    let opts = RecommendOptions {
        top_n: args.top,
        max_fee: args.max_fee,
    };
    let recommender = Recommender::new(cleaned)?;
    let stdin = io::stdin();
    recommend::run_interactive(&recommender, stdin.lock(), io::stdout(), &opts)?;

    Ok(())
}
