//! Strengths and weaknesses of a country relative to the OECD average.
//!
//! Only the selection is computed here; turning it into prose is left to the
//! presentation layer.

use std::cmp::Ordering;

use serde::Serialize;
use smallvec::SmallVec;

use crate::dimension::Dimension;
use crate::error::Result;
use crate::models::{CountryProfile, OecdAverage, ProfileTable};
use crate::ranking::{RankedCountry, top_composite_performer};

/// Gaps with a smaller magnitude count as zero
pub const GAP_EPSILON: f64 = 1e-9;

/// Number of strengths and of weaknesses reported
pub const HIGHLIGHT_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedGap {
    pub dimension: Dimension,
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub country: String,
    /// Largest positive gaps, largest first
    pub strengths: SmallVec<[RankedGap; HIGHLIGHT_COUNT]>,
    /// Largest negative gaps, most negative first
    pub weaknesses: SmallVec<[RankedGap; HIGHLIGHT_COUNT]>,
    /// Best composite performer of the table, for comparison
    pub top_performer: Option<RankedCountry>,
}

impl Diagnosis {
    /// No dimension differs notably from the average
    #[must_use]
    pub fn is_unremarkable(&self) -> bool {
        self.strengths.is_empty() && self.weaknesses.is_empty()
    }
}

/// Select the two strongest and two weakest dimensions of `profile`.
///
/// Gaps are recomputed as `score - average`. Missing dimensions are skipped,
/// and exact ties are ordered by dimension name.
#[must_use]
pub fn diagnose(profile: &CountryProfile, average: &OecdAverage) -> Diagnosis {
    let gaps: Vec<RankedGap> = average
        .gaps_for(&profile.scores)
        .present()
        .filter(|(_, gap)| gap.abs() >= GAP_EPSILON)
        .map(|(dimension, gap)| RankedGap { dimension, gap })
        .collect();

    let by_name = |a: &RankedGap, b: &RankedGap| a.dimension.name().cmp(b.dimension.name());

    let mut strengths: Vec<RankedGap> = gaps.iter().copied().filter(|g| g.gap > 0.0).collect();
    strengths.sort_by(|a, b| b.gap.total_cmp(&a.gap).then_with(|| by_name(a, b)));

    let mut weaknesses: Vec<RankedGap> = gaps.iter().copied().filter(|g| g.gap < 0.0).collect();
    weaknesses.sort_by(|a, b| match a.gap.total_cmp(&b.gap) {
        Ordering::Equal => by_name(a, b),
        other => other,
    });

    Diagnosis {
        country: profile.country.clone(),
        strengths: strengths.into_iter().take(HIGHLIGHT_COUNT).collect(),
        weaknesses: weaknesses.into_iter().take(HIGHLIGHT_COUNT).collect(),
        top_performer: None,
    }
}

/// Diagnose `country` against the table average, naming the top performer
pub fn diagnose_country(table: &ProfileTable, country: &str) -> Result<Diagnosis> {
    let profile = table.profile(country)?;
    let mut diagnosis = diagnose(profile, table.average());
    diagnosis.top_performer = top_composite_performer(table);
    Ok(diagnosis)
}
