//! `pathforest` - mine the most frequent decision paths of a random forest.
//!
//! **Usage:**
//! ```text
//! pathforest --forest forest.json [--categories categories.json] [--out pathways.csv]
//! ```
//!
//! Prints the ranked paths per class to stdout and writes the pathway table
//! to `--out` (CSV, or JSON when the extension is `.json` or `--format json`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pathforest::persist::{load_category_map, Model};
use pathforest::{
    analyze_paths, explainability::compute_forest_importance, AnalysisConfig, ArtifactFormat,
    CategoryMap, ImportanceType, ReportEmitter, Verbosity,
};

/// Number of features listed under `--importance`.
const IMPORTANCE_TOP: usize = 10;

/// Rank the most frequent decision paths per predicted class.
#[derive(Parser, Debug)]
#[command(name = "pathforest", version, about)]
struct Args {
    /// Exported forest (JSON).
    #[arg(long)]
    forest: PathBuf,

    /// Category map for label-encoded features (JSON).
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Pathway table to write.
    #[arg(long, default_value = "pathways.csv")]
    out: PathBuf,

    /// Table format: csv or json. Inferred from `--out` when omitted.
    #[arg(long)]
    format: Option<ArtifactFormat>,

    /// Paths reported per class.
    #[arg(long, default_value_t = pathforest::config::DEFAULT_TOP_K)]
    top_k: usize,

    /// Separator between rendered conditions.
    #[arg(long, default_value = pathforest::config::DEFAULT_DELIMITER)]
    delimiter: String,

    /// Worker threads: 1 = sequential, 0 = all cores.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Also print feature importance (split, gain or cover).
    #[arg(long)]
    importance: Option<ImportanceType>,

    /// More progress output on stderr (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No progress output.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let verbosity = if args.quiet {
        Verbosity::Silent
    } else {
        Verbosity::from_count(args.verbose)
    };
    let format = args
        .format
        .unwrap_or_else(|| ArtifactFormat::from_path(&args.out));
    let config = AnalysisConfig::builder()
        .top_k(args.top_k)
        .delimiter(args.delimiter)
        .n_threads(args.threads)
        .format(format)
        .verbosity(verbosity)
        .build()
        .context("invalid configuration")?;

    let model = Model::load_json(&args.forest)
        .with_context(|| format!("failed to load forest from {}", args.forest.display()))?;
    let categories = match &args.categories {
        Some(path) => load_category_map(path)
            .with_context(|| format!("failed to load categories from {}", path.display()))?,
        None => CategoryMap::default(),
    };

    let report = analyze_paths(&model.forest, &model.feature_names, &config)?;
    // Computed before any output so a failure leaves stdout empty.
    let importance = args
        .importance
        .map(|importance_type| {
            compute_forest_importance(
                &model.forest,
                model.n_features(),
                importance_type,
                Some(model.feature_names.clone()),
            )
        })
        .transpose()?;

    let emitter = ReportEmitter::new(&categories, &config.delimiter);
    print!("{}", emitter.render_text(&report));

    if let Some(importance) = importance {
        let shares = importance.normalized();
        println!("=== Feature importance ({}) ===", importance.importance_type());
        for (idx, name, score) in importance.top_k(IMPORTANCE_TOP) {
            println!(
                "  {:<24} {score:>12.4}  ({:.2}%)",
                name.unwrap_or("?"),
                100.0 * shares[idx]
            );
        }
    }

    emitter.write(&report, &args.out, config.format)?;
    if verbosity >= Verbosity::Info {
        eprintln!("[pathforest] wrote {}", args.out.display());
    }

    Ok(())
}
