//! Configuration for the normalization pipeline.
//!
//! `PipelineConfig::default()` reproduces the published OECD wellbeing
//! artifact. A JSON file can override any field; missing fields keep their
//! defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dimension::{DIMENSION_COUNT, Dimension, Polarity};
use crate::error::util::safe_read_to_string;
use crate::error::{Result, WellbeingError};
use crate::projection::default_policy_model;

/// Default batch size for CSV and Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Environment variable overriding the reader batch size
pub const BATCH_SIZE_ENV: &str = "WELLBEING_BATCH_SIZE";

/// Maps one raw measure onto a dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    /// Measure name as it appears in the raw data
    pub measure: String,
    /// Dimension the measure feeds
    pub dimension: Dimension,
    /// Whether higher or lower raw values are better
    pub polarity: Polarity,
}

impl IndicatorSpec {
    /// The default indicator of a dimension
    #[must_use]
    pub fn for_dimension(dimension: Dimension) -> Self {
        Self {
            measure: dimension.default_measure().to_string(),
            dimension,
            polarity: dimension.default_polarity(),
        }
    }
}

/// What to do with a country that lacks a value for a required indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// Drop the country from the output
    Exclude,
    /// Keep the dimension as explicitly missing
    Flag,
}

/// How the composite index combines the dimension scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CompositeMethod {
    /// Arithmetic mean of the present scores
    Mean,
    /// Weighted mean of the present scores; unlisted dimensions weigh zero
    Weighted { weights: BTreeMap<Dimension, f64> },
}

/// Which rows count as country-level observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GranularityConfig {
    /// Breakdown columns that must hold `total_label` when present
    pub breakdown_columns: Vec<String>,
    /// Label of the non-broken-down category
    pub total_label: String,
    /// Country names or codes that denote aggregates rather than countries
    pub aggregate_areas: Vec<String>,
    /// Drop rows whose code is not three uppercase letters
    pub require_iso3_codes: bool,
}

impl Default for GranularityConfig {
    fn default() -> Self {
        Self {
            breakdown_columns: vec!["Age".into(), "Sex".into(), "Education".into()],
            total_label: "Total".into(),
            aggregate_areas: vec![
                "OECD".into(),
                "OECD average".into(),
                "OECD - Total".into(),
                "EU27_2020".into(),
                "European Union".into(),
            ],
            require_iso3_codes: true,
        }
    }
}

/// Configuration for the normalization pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// One indicator per dimension
    pub indicators: Vec<IndicatorSpec>,
    /// Country-level row selection
    pub granularity: GranularityConfig,
    /// Handling of missing indicator values
    pub missing_data: MissingDataPolicy,
    /// Under `Flag`, countries missing more than this share of dimensions are dropped
    pub max_missing_fraction: f64,
    /// Score given to every country for a zero-variance indicator
    pub neutral_score: f64,
    /// Decimals kept in scores, composite and gaps; `None` keeps full precision
    pub decimals: Option<u32>,
    /// Composite index combination
    pub composite: CompositeMethod,
    /// Reader batch size
    pub batch_size: usize,
    /// Factor converting correlated improvement into life satisfaction points
    pub outcome_scale: f64,
    /// Minimum number of countries the validation report expects
    pub min_countries: usize,
    /// Life-satisfaction model used by the policy simulation
    pub policy_model: CompositeMethod,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            indicators: Dimension::ALL
                .into_iter()
                .map(IndicatorSpec::for_dimension)
                .collect(),
            granularity: GranularityConfig::default(),
            missing_data: MissingDataPolicy::Flag,
            max_missing_fraction: 0.5,
            neutral_score: 50.0,
            decimals: Some(1),
            composite: CompositeMethod::Mean,
            batch_size: DEFAULT_BATCH_SIZE,
            outcome_scale: 0.3,
            min_countries: 25,
            policy_model: default_policy_model(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file, then apply environment overrides
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "loading pipeline configuration")?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `WELLBEING_BATCH_SIZE` when it holds a positive integer
    pub fn apply_env_overrides(&mut self) {
        if let Some(size) = std::env::var(BATCH_SIZE_ENV)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|s| *s > 0)
        {
            self.batch_size = size;
        }
    }

    /// The indicator feeding `dimension`
    #[must_use]
    pub fn indicator_for(&self, dimension: Dimension) -> Option<&IndicatorSpec> {
        self.indicators.iter().find(|s| s.dimension == dimension)
    }

    /// The indicator whose measure is `measure`
    #[must_use]
    pub fn indicator_by_measure(&self, measure: &str) -> Option<&IndicatorSpec> {
        self.indicators.iter().find(|s| s.measure == measure)
    }

    /// Check the configuration for structural problems
    pub fn validate(&self) -> Result<()> {
        let mut seen = [false; DIMENSION_COUNT];
        for spec in &self.indicators {
            if spec.measure.trim().is_empty() {
                return Err(WellbeingError::config(format!(
                    "indicator for '{}' has an empty measure name",
                    spec.dimension
                )));
            }
            if std::mem::replace(&mut seen[spec.dimension.index()], true) {
                return Err(WellbeingError::config(format!(
                    "dimension '{}' is mapped more than once",
                    spec.dimension
                )));
            }
            if self
                .indicators
                .iter()
                .filter(|other| other.measure == spec.measure)
                .count()
                > 1
            {
                return Err(WellbeingError::config(format!(
                    "measure '{}' feeds more than one dimension",
                    spec.measure
                )));
            }
        }
        if let Some(dim) = Dimension::ALL.into_iter().find(|d| !seen[d.index()]) {
            return Err(WellbeingError::config(format!(
                "dimension '{dim}' has no indicator"
            )));
        }

        if !(0.0..=1.0).contains(&self.max_missing_fraction) {
            return Err(WellbeingError::config(format!(
                "max_missing_fraction must lie in [0, 1], got {}",
                self.max_missing_fraction
            )));
        }
        if !(0.0..=100.0).contains(&self.neutral_score) {
            return Err(WellbeingError::config(format!(
                "neutral_score must lie in [0, 100], got {}",
                self.neutral_score
            )));
        }
        if self.decimals.is_some_and(|d| d > 10) {
            return Err(WellbeingError::config("decimals must be at most 10"));
        }
        if self.batch_size == 0 {
            return Err(WellbeingError::config("batch_size must be positive"));
        }
        if !self.outcome_scale.is_finite() {
            return Err(WellbeingError::config("outcome_scale must be finite"));
        }

        validate_weights("composite", &self.composite)?;
        validate_weights("policy_model", &self.policy_model)?;

        Ok(())
    }
}

fn validate_weights(name: &str, method: &CompositeMethod) -> Result<()> {
    if let CompositeMethod::Weighted { weights } = method {
        if let Some((dim, w)) = weights.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(WellbeingError::config(format!(
                "{name} weight for '{dim}' must be a non-negative number, got {w}"
            )));
        }
        if weights.values().sum::<f64>() <= 0.0 {
            return Err(WellbeingError::config(format!(
                "{name} weights must not all be zero"
            )));
        }
    }
    Ok(())
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Indicators: {}", self.indicators.len())?;
        writeln!(f, "  Missing Data Policy: {:?}", self.missing_data)?;
        if self.missing_data == MissingDataPolicy::Flag {
            writeln!(
                f,
                "  Max Missing Fraction: {:.0}%",
                self.max_missing_fraction * 100.0
            )?;
        }
        writeln!(f, "  Neutral Score: {}", self.neutral_score)?;
        match self.decimals {
            Some(d) => writeln!(f, "  Decimals: {d}")?,
            None => writeln!(f, "  Decimals: full precision")?,
        }
        match &self.composite {
            CompositeMethod::Mean => writeln!(f, "  Composite: mean")?,
            CompositeMethod::Weighted { weights } => {
                writeln!(f, "  Composite: weighted ({} weights)", weights.len())?;
            }
        }
        Ok(())
    }
}
