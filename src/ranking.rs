//! Top-N comparators over the profile table.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::dimension::Dimension;
use crate::models::{CountryProfile, ProfileTable};

/// What to rank countries by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Composite,
    Dimension(Dimension),
}

impl RankBy {
    /// The ranked value of `profile`, `None` when it has no such score
    #[must_use]
    pub const fn value(self, profile: &CountryProfile) -> Option<f64> {
        match self {
            Self::Composite => Some(profile.composite_index),
            Self::Dimension(dim) => profile.score(dim),
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite => f.write_str("composite_index"),
            Self::Dimension(dim) => write!(f, "{dim}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCountry {
    pub rank: usize,
    pub country: String,
    pub country_code: Option<String>,
    pub value: f64,
}

/// The `n` best countries by `by`, highest first.
///
/// Exact ties are broken by country name ascending. Countries without the
/// ranked score are skipped.
#[must_use]
pub fn top_performers(table: &ProfileTable, by: RankBy, n: usize) -> Vec<RankedCountry> {
    table
        .iter()
        .filter_map(|p| by.value(p).map(|v| (p, v)))
        .sorted_by(|(a, va), (b, vb)| vb.total_cmp(va).then_with(|| a.country.cmp(&b.country)))
        .take(n)
        .enumerate()
        .map(|(i, (p, value))| RankedCountry {
            rank: i + 1,
            country: p.country.clone(),
            country_code: p.country_code.clone(),
            value,
        })
        .collect()
}

/// The single best country by composite index
#[must_use]
pub fn top_composite_performer(table: &ProfileTable) -> Option<RankedCountry> {
    top_performers(table, RankBy::Composite, 1).into_iter().next()
}
