//! The normalization pipeline.
//!
//! Raw long-format records go through five stages:
//!
//! 1. selection: country-level rows of the configured indicators, most
//!    recent year per country and indicator, pivoted to one row per country;
//! 2. missing data: the configured policy excludes or flags incomplete rows;
//! 3. scaling: each indicator onto 0-100 (min-max, or percentile-rank
//!    inversion for lower-is-better indicators);
//! 4. composite: the configured combination of the scaled scores;
//! 5. gaps: each score minus the cross-country mean of its dimension.
//!
//! The run is deterministic: the same records and configuration always
//! produce a bit-identical table.

pub mod composite;
pub mod missing;
pub mod scale;
pub mod select;

use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::dimension::Dimension;
use crate::error::{Result, WellbeingError};
use crate::models::{CountryProfile, DimensionScores, OecdAverage, ProfileTable, RawRecord};
use crate::reader::{ReadStats, read_raw_records};
use crate::utils::round_to;

pub use composite::Composite;
pub use missing::{ExcludedCountry, ExclusionReason, FlaggedCell};
pub use scale::{ScaledColumn, percentile_ranks, scale_column};
pub use select::{Selection, WideRow, select_latest};

/// What the pipeline dropped, replaced or fell back on
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// Records handed to the pipeline
    pub input_records: usize,
    /// Aggregate or sub-national records
    pub non_country_records: usize,
    /// Records of measures outside the indicator set
    pub unused_records: usize,
    /// Records replaced by a more recent observation
    pub superseded_records: usize,
    /// Countries left out of the table
    pub excluded: Vec<ExcludedCountry>,
    /// Cells kept as explicitly missing
    pub flagged: Vec<FlaggedCell>,
    /// Indicators with zero variance that received the neutral score
    pub degenerate: Vec<Dimension>,
}

/// Profile table together with the report of the run that built it
#[derive(Debug, Clone)]
pub struct NormalizationOutput {
    pub table: ProfileTable,
    pub report: NormalizationReport,
}

/// Normalize raw records into the profile table
pub fn normalize(records: &[RawRecord], config: &PipelineConfig) -> Result<ProfileTable> {
    normalize_with_report(records, config).map(|output| output.table)
}

/// Normalize raw records, keeping the run report
pub fn normalize_with_report(
    records: &[RawRecord],
    config: &PipelineConfig,
) -> Result<NormalizationOutput> {
    config.validate()?;
    if records.is_empty() {
        return Err(WellbeingError::EmptyDataset(
            "no raw records to normalize".to_string(),
        ));
    }

    let start = Instant::now();
    let composite = Composite::from_config(config);

    let selection = select_latest(records, config);
    info!(
        "Selected {} countries from {} records ({} superseded, {} non-country, {} unused)",
        selection.rows.len(),
        records.len(),
        selection.superseded,
        selection.non_country,
        selection.unused_indicator
    );
    if selection.rows.is_empty() {
        return Err(WellbeingError::EmptyDataset(
            "no country-level records of the configured indicators".to_string(),
        ));
    }
    ensure_every_indicator_observed(
        config,
        Dimension::ALL
            .into_iter()
            .filter(|d| selection.observations[d.index()] == 0),
    )?;

    let outcome = missing::apply_missing_policy(selection.rows, config, &composite);
    if outcome.rows.is_empty() {
        return Err(WellbeingError::EmptyDataset(format!(
            "all {} countries were excluded by the missing-data policy",
            outcome.excluded.len()
        )));
    }
    ensure_every_indicator_observed(
        config,
        Dimension::ALL
            .into_iter()
            .filter(|d| outcome.rows.iter().all(|r| r.values.get(*d).is_none())),
    )?;

    let rows = outcome.rows;
    let specs = Dimension::ALL
        .into_iter()
        .map(|dim| {
            config
                .indicator_for(dim)
                .map(|spec| (dim, spec.polarity))
                .ok_or_else(|| WellbeingError::config(format!("dimension '{dim}' has no indicator")))
        })
        .collect::<Result<Vec<_>>>()?;

    let columns: Vec<(Dimension, ScaledColumn)> = specs
        .par_iter()
        .map(|&(dim, polarity)| {
            let raw: Vec<Option<f64>> = rows.iter().map(|r| r.values.get(dim)).collect();
            let scaled = scale_column(&raw, polarity, config.neutral_score);
            debug!(
                "Scaled {dim} ({polarity:?}) over {} countries",
                raw.iter().flatten().count()
            );
            (dim, scaled)
        })
        .collect();

    let degenerate: Vec<Dimension> = columns
        .iter()
        .filter(|(_, c)| c.degenerate)
        .map(|(d, _)| *d)
        .collect();
    for dim in &degenerate {
        warn!(
            "Indicator for {dim} has zero variance; every country gets the neutral score {}",
            config.neutral_score
        );
    }

    let scores: Vec<DimensionScores> = (0..rows.len())
        .map(|i| {
            DimensionScores::from_fn(|dim| {
                columns[dim.index()].1.scores[i].map(|s| round_to(s, config.decimals))
            })
        })
        .collect();
    let average = OecdAverage::from_score_vectors(scores.iter());

    let mut profiles = Vec::with_capacity(rows.len());
    for (row, scores) in rows.into_iter().zip(scores) {
        let composite_index = composite.combine(&scores).ok_or_else(|| {
            WellbeingError::config(format!("{} has no dimension to combine", row.country))
        })?;
        let gaps = average.gaps_for(&scores).map(|_, g| round_to(g, config.decimals));
        profiles.push(CountryProfile {
            country: row.country,
            country_code: row.country_code,
            scores,
            composite_index,
            gaps,
        });
    }
    profiles.sort_by(|a, b| {
        b.composite_index
            .total_cmp(&a.composite_index)
            .then_with(|| a.country.cmp(&b.country))
    });

    let report = NormalizationReport {
        input_records: records.len(),
        non_country_records: selection.non_country,
        unused_records: selection.unused_indicator,
        superseded_records: selection.superseded,
        excluded: outcome.excluded,
        flagged: outcome.flagged,
        degenerate,
    };

    info!(
        "Normalized {} countries in {:?} ({} excluded, {} flagged cells)",
        profiles.len(),
        start.elapsed(),
        report.excluded.len(),
        report.flagged.len()
    );

    Ok(NormalizationOutput {
        table: ProfileTable::new(profiles),
        report,
    })
}

/// Read raw records from `path` and normalize them
pub fn run(path: &Path, config: &PipelineConfig) -> Result<(NormalizationOutput, ReadStats)> {
    let dataset = read_raw_records(path, config)?;
    let output = normalize_with_report(&dataset.records, config)?;
    Ok((output, dataset.stats))
}

fn ensure_every_indicator_observed(
    config: &PipelineConfig,
    mut unobserved: impl Iterator<Item = Dimension>,
) -> Result<()> {
    match unobserved.next() {
        None => Ok(()),
        Some(dim) => Err(WellbeingError::MissingIndicator {
            measure: config
                .indicator_for(dim)
                .map_or_else(|| dim.default_measure().to_string(), |s| s.measure.clone()),
            dimension: dim.to_string(),
        }),
    }
}
