use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;

use wellbeing_lens::config::PipelineConfig;
use wellbeing_lens::diagnosis::diagnose_country;
use wellbeing_lens::pipeline::{self, Composite};
use wellbeing_lens::projection::{Deltas, estimate_outcome, project, simulate_policy};
use wellbeing_lens::ranking::{RankBy, top_performers};
use wellbeing_lens::report::{render_metadata, validate_table, write_metadata};
use wellbeing_lens::utils::stage_spinner;
use wellbeing_lens::writer::{read_profiles, write_profiles};
use wellbeing_lens::{Dimension, ProfileTable};

#[derive(Parser, Debug)]
#[command(name = "wellbeing-lens")]
#[command(about = "Normalize, project and diagnose OECD wellbeing country profiles", long_about = None)]
#[command(version)]
struct Cli {
    /// Pipeline configuration (JSON); defaults reproduce the published artifact
    #[arg(long, global = true, env = "WELLBEING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the country profile artifact from raw long-format records
    Normalize {
        /// Raw records (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Profile artifact to write (.csv or .parquet)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional metadata summary to write alongside
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Two strongest and two weakest dimensions of a country
    Diagnose {
        /// Profile artifact
        #[arg(short, long)]
        profiles: PathBuf,

        /// Country name or ISO code
        #[arg(short, long)]
        country: String,
    },

    /// Project a country's profile under per-dimension deltas
    Project {
        /// Profile artifact
        #[arg(short, long)]
        profiles: PathBuf,

        /// Country name or ISO code
        #[arg(short, long)]
        country: String,

        /// Delta as dimension=+x (repeatable)
        #[arg(short, long = "delta")]
        deltas: Vec<String>,

        /// Number of top performers to compare against
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Apply percentage boosts to every country and model life satisfaction
    Simulate {
        /// Profile artifact
        #[arg(short, long)]
        profiles: PathBuf,

        /// Boost as dimension=+percent (repeatable)
        #[arg(short, long = "boost")]
        boosts: Vec<String>,
    },

    /// Top performers by composite index or by one dimension
    Rank {
        /// Profile artifact
        #[arg(short, long)]
        profiles: PathBuf,

        /// Dimension to rank by (composite index when omitted)
        #[arg(short, long)]
        dimension: Option<String>,

        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!("{config}");

    match cli.command {
        Commands::Normalize {
            input,
            output,
            metadata,
        } => run_normalize(&config, &input, &output, metadata.as_deref()),
        Commands::Diagnose { profiles, country } => {
            let table = load_profiles(&profiles, &config)?;
            let diagnosis = diagnose_country(&table, &country)?;
            print_json(&diagnosis)
        }
        Commands::Project {
            profiles,
            country,
            deltas,
            top,
        } => {
            let table = load_profiles(&profiles, &config)?;
            run_project(&table, &config, &country, &deltas, top)
        }
        Commands::Simulate { profiles, boosts } => {
            let table = load_profiles(&profiles, &config)?;
            let boosts = Deltas::from_assignments(boosts.iter().map(String::as_str))?;
            let outcomes = simulate_policy(&table, &boosts, &config.policy_model);
            info!(
                "Simulated {} boosts across {} countries",
                boosts.iter().count(),
                outcomes.len()
            );
            print_json(&json!({
                "boosts": boosts,
                "outcomes": outcomes,
            }))
        }
        Commands::Rank {
            profiles,
            dimension,
            top,
        } => {
            let table = load_profiles(&profiles, &config)?;
            let by = match dimension {
                Some(name) => RankBy::Dimension(name.parse::<Dimension>()?),
                None => RankBy::Composite,
            };
            print_json(&json!({
                "by": by.to_string(),
                "top": top_performers(&table, by, top),
            }))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            let mut config = PipelineConfig::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }
}

fn load_profiles(path: &Path, config: &PipelineConfig) -> Result<ProfileTable> {
    read_profiles(path, config.batch_size)
        .with_context(|| format!("Failed to read profiles from {}", path.display()))
}

fn run_normalize(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    metadata: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let pb = stage_spinner(3);

    pb.set_message("Reading and normalizing raw records");
    let (normalized, stats) = pipeline::run(input, config)
        .with_context(|| format!("Failed to normalize {}", input.display()))?;
    info!(
        "Read {} rows ({} breakdown rows, {} incomplete rows dropped)",
        stats.rows_read, stats.rows_not_total, stats.rows_incomplete
    );
    pb.inc(1);

    pb.set_message("Writing profile artifact");
    write_profiles(&normalized.table, output)
        .with_context(|| format!("Failed to write profiles to {}", output.display()))?;
    pb.inc(1);

    pb.set_message("Validating");
    let validation = validate_table(&normalized.table, config);
    if let Some(path) = metadata {
        let text = render_metadata(
            &normalized.table,
            config,
            Some(&normalized.report),
            chrono::Utc::now(),
        );
        write_metadata(path, &text)
            .with_context(|| format!("Failed to write metadata to {}", path.display()))?;
    }
    pb.inc(1);
    pb.finish_with_message("Done");

    eprint!("{validation}");
    if !validation.passed() {
        warn!("Some validation checks failed. Review the artifact before publishing it.");
    }
    info!(
        "Normalized {} countries into {} in {:?}",
        normalized.table.len(),
        output.display(),
        start.elapsed()
    );

    print_json(&json!({
        "countries": normalized.table.len(),
        "report": normalized.report,
        "validation": validation,
    }))
}

fn run_project(
    table: &ProfileTable,
    config: &PipelineConfig,
    country: &str,
    assignments: &[String],
    top: usize,
) -> Result<()> {
    let deltas = Deltas::from_assignments(assignments.iter().map(String::as_str))?;
    let baseline = table.profile(country)?;
    let projection = project(baseline, &deltas, &Composite::from_config(config));

    let outcomes: Vec<_> = deltas
        .iter()
        .filter(|(dim, _)| *dim != Dimension::LifeSatisfaction)
        .map(|(dim, delta)| estimate_outcome(table, baseline, dim, delta, config.outcome_scale))
        .collect();
    let comparators: Vec<_> = deltas
        .iter()
        .map(|(dim, _)| {
            json!({
                "dimension": dim,
                "top": top_performers(table, RankBy::Dimension(dim), top),
            })
        })
        .collect();

    print_json(&json!({
        "projection": projection,
        "projected_gaps": projection.projected_gaps(table.average()),
        "outcomes": outcomes,
        "top_composite": top_performers(table, RankBy::Composite, top),
        "top_by_dimension": comparators,
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
    println!("{text}");
    Ok(())
}
