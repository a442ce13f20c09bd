// ABOUTME: Batch CLI running the full pipeline: load, validate, derive, analyze, report
// ABOUTME: Writes one summary table per analysis plus a JSON results file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Batch entry point.
//!
//! Usage:
//! ```bash
//! # Run the four analyses over both datasets
//! cargo run --bin fitlife-batch -- --public-csv data/fitlife.csv \
//!     --wearable-json data/runs.json --out-dir out
//!
//! # Restrict to smokers recorded in March 2024, JSON output
//! cargo run --bin fitlife-batch -- --public-csv data/fitlife.csv \
//!     --smokers-only --start-date 2024-03-01 --end-date 2024-03-31 \
//!     --format json --out-dir out
//!
//! # Also train the heart-rate prediction model
//! cargo run --bin fitlife-batch -- --public-csv data/fitlife.csv \
//!     --train-model --out-dir out
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::info;

use fitlife_core::models::{FilterSelection, SmokerFilter};
use fitlife_core::AnalysisConfig;
use fitlife_insights::ingest::{load_public_csv, load_wearable_json, RawRecord};
use fitlife_insights::logging::LoggingConfig;
use fitlife_insights::modeling::{train_and_evaluate, GbmConfig, ModelTarget};
use fitlife_insights::validation::validate_records;
use fitlife_intelligence::{derive_all, run_all_analyses, AnalysisSuite, SummaryTable};

#[derive(Parser)]
#[command(
    name = "fitlife-batch",
    about = "FitLife Insights batch pipeline",
    long_about = "Load the public and wearable fitness datasets, validate them, derive features, run the four standard comparisons, and write summary tables."
)]
struct BatchArgs {
    /// Path to the public dataset CSV
    #[arg(long)]
    public_csv: Option<PathBuf>,

    /// Path to the wearable dataset JSON
    #[arg(long)]
    wearable_json: Option<PathBuf>,

    /// Directory the result files are written into
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Output format for the summary tables
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Restrict the analyses to smokers
    #[arg(long, conflicts_with = "non_smokers_only")]
    smokers_only: bool,

    /// Restrict the analyses to non-smokers
    #[arg(long)]
    non_smokers_only: bool,

    /// Keep only sessions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Keep only sessions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Train the gradient-boosting heart-rate model after the analyses
    #[arg(long)]
    train_model: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated tables
    Csv,
    /// One JSON document per analysis
    Json,
}

fn main() -> Result<()> {
    let args = BatchArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    if args.public_csv.is_none() && args.wearable_json.is_none() {
        bail!("at least one of --public-csv and --wearable-json is required");
    }

    let mut raw: Vec<RawRecord> = Vec::new();
    if let Some(path) = &args.public_csv {
        raw.extend(load_public_csv(path).with_context(|| format!("loading {}", path.display()))?);
    }
    if let Some(path) = &args.wearable_json {
        raw.extend(
            load_wearable_json(path).with_context(|| format!("loading {}", path.display()))?,
        );
    }

    let (records, report) = validate_records(raw);
    info!(
        valid = report.n_valid,
        rejected = report.n_rejected(),
        "validated input rows"
    );
    if records.is_empty() {
        bail!("no valid records after validation");
    }

    let config = AnalysisConfig::default();
    let derived = derive_all(&records, &config);

    let filter = FilterSelection {
        age_brackets: None,
        smoker: if args.smokers_only {
            SmokerFilter::SmokersOnly
        } else if args.non_smokers_only {
            SmokerFilter::NonSmokersOnly
        } else {
            SmokerFilter::All
        },
        start_date: args.start_date,
        end_date: args.end_date,
    };
    let selected = if filter.is_empty() {
        derived
    } else {
        filter.apply(&derived)
    };
    if selected.is_empty() {
        bail!("the active filters matched no records");
    }

    let suite = run_all_analyses(&selected, &config)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_outputs(&args, &suite, &report)?;

    if args.train_model {
        let (_, metrics) = train_and_evaluate(&selected, ModelTarget::Bpm, &GbmConfig::default())?;
        let path = args.out_dir.join("model_metrics.json");
        fs::write(&path, serde_json::to_string_pretty(&metrics)?)?;
        info!(path = %path.display(), mae = metrics.mae, r2 = metrics.r2, "wrote model metrics");
    }

    info!(out_dir = %args.out_dir.display(), "pipeline finished");
    Ok(())
}

fn write_outputs(
    args: &BatchArgs,
    suite: &AnalysisSuite,
    report: &fitlife_insights::validation::ValidationReport,
) -> Result<()> {
    let tables = [
        (
            "smokers_summary",
            SummaryTable::from_group_summaries(
                "Smokers vs non-smokers (sport sessions)",
                &suite.smokers.comparison.summaries,
            ),
        ),
        (
            "smokers_tests",
            SummaryTable::from_test_results(
                "Smokers vs non-smokers: tests",
                &suite.smokers.comparison.tests,
            ),
        ),
        (
            "runners_summary",
            SummaryTable::from_group_summaries(
                "Runners vs non-runners",
                &suite.runners.comparison.summaries,
            ),
        ),
        (
            "runners_tests",
            SummaryTable::from_test_results(
                "Runners vs non-runners: tests",
                &suite.runners.comparison.tests,
            ),
        ),
        (
            "practice_by_age",
            SummaryTable::from_practice_rows("Practice by age bracket", &suite.practice_by_age),
        ),
        (
            "bpm_practitioners_summary",
            SummaryTable::from_group_summaries(
                "Heart rate: practitioners vs non-practitioners",
                &suite.bpm_practitioners.global.summaries,
            ),
        ),
    ];

    match args.format {
        OutputFormat::Csv => {
            for (name, table) in &tables {
                let path = args.out_dir.join(format!("{name}.csv"));
                fs::write(&path, table.to_csv_string())
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "wrote table");
            }
        }
        OutputFormat::Json => {
            for (name, table) in &tables {
                let path = args.out_dir.join(format!("{name}.json"));
                fs::write(&path, serde_json::to_string_pretty(table)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "wrote table");
            }
        }
    }

    // Full machine-readable result set alongside the tables.
    let results_path = args.out_dir.join("analysis_suite.json");
    fs::write(&results_path, serde_json::to_string_pretty(suite)?)?;
    let report_path = args.out_dir.join("validation_report.json");
    fs::write(&report_path, serde_json::to_string_pretty(report)?)?;

    Ok(())
}
