//! Country profiles and the cross-country average they are compared against.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::models::scores::DimensionScores;

/// One row of the wide profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    /// Country name, the identifier used for lookups and tie-breaks
    pub country: String,
    /// ISO 3-letter code used by the map view
    pub country_code: Option<String>,
    /// Normalized 0-100 score per dimension
    pub scores: DimensionScores,
    /// Combination of the present scores
    pub composite_index: f64,
    /// Score minus the OECD average, per dimension
    pub gaps: DimensionScores,
}

impl CountryProfile {
    #[must_use]
    pub const fn score(&self, dim: Dimension) -> Option<f64> {
        self.scores.get(dim)
    }

    #[must_use]
    pub const fn gap(&self, dim: Dimension) -> Option<f64> {
        self.gaps.get(dim)
    }
}

/// Mean score per dimension across a profile set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OecdAverage(DimensionScores);

impl OecdAverage {
    /// Average the present scores of every dimension.
    ///
    /// Values are summed in ascending order so the result does not depend on
    /// the order of `profiles`. A dimension no profile has stays `None`.
    #[must_use]
    pub fn from_profiles(profiles: &[CountryProfile]) -> Self {
        Self::from_score_vectors(profiles.iter().map(|p| &p.scores))
    }

    /// Average an arbitrary collection of score vectors
    pub fn from_score_vectors<'a>(vectors: impl Iterator<Item = &'a DimensionScores>) -> Self {
        let vectors: Vec<&DimensionScores> = vectors.collect();
        Self(DimensionScores::from_fn(|dim| {
            let values: Vec<f64> = vectors.iter().filter_map(|s| s.get(dim)).collect();
            order_independent_mean(values)
        }))
    }

    /// Build directly from known per-dimension averages
    #[must_use]
    pub const fn from_scores(scores: DimensionScores) -> Self {
        Self(scores)
    }

    #[must_use]
    pub const fn get(&self, dim: Dimension) -> Option<f64> {
        self.0.get(dim)
    }

    #[must_use]
    pub const fn scores(&self) -> &DimensionScores {
        &self.0
    }

    /// `score - average` for every dimension where both are present
    #[must_use]
    pub fn gaps_for(&self, scores: &DimensionScores) -> DimensionScores {
        DimensionScores::from_fn(|dim| Some(scores.get(dim)? - self.get(dim)?))
    }
}

/// Mean of `values` summed in ascending order
pub(crate) fn order_independent_mean(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}
