//! A Rust library for normalizing the OECD wellbeing dataset into comparable
//! country profiles, projecting "what-if" scenarios and diagnosing gaps to
//! the OECD average.

pub mod config;
pub mod diagnosis;
pub mod dimension;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod ranking;
pub mod reader;
pub mod report;
pub mod utils;
pub mod writer;

// Re-export the most common types for easier use
// Core types
pub use config::{CompositeMethod, GranularityConfig, IndicatorSpec, MissingDataPolicy, PipelineConfig};
pub use dimension::{DIMENSION_COUNT, Dimension, Polarity};
pub use error::{Result, WellbeingError};
pub use models::{CountryProfile, DimensionScores, OecdAverage, ProfileTable, RawRecord};

// The three runtime operations
pub use diagnosis::{Diagnosis, RankedGap, diagnose, diagnose_country};
pub use pipeline::{Composite, NormalizationOutput, NormalizationReport, normalize, normalize_with_report};
pub use projection::{
    Deltas, OutcomeEstimate, PolicyOutcome, ProjectedProfile, estimate_outcome, project,
    simulate_policy,
};

// Comparators and reports
pub use ranking::{RankBy, RankedCountry, top_performers};
pub use report::{ValidationReport, render_metadata, validate_table};

// Artifact I/O
pub use reader::{RawDataset, read_raw_records};
pub use writer::{read_profiles, write_profiles};
