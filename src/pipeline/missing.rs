//! Missing-data policy.
//!
//! Applied uniformly to every country before scaling, so the set of countries
//! that defines each indicator's range is the set that ends up in the output.

use serde::Serialize;

use crate::config::{MissingDataPolicy, PipelineConfig};
use crate::dimension::{DIMENSION_COUNT, Dimension};
use crate::pipeline::composite::Composite;
use crate::pipeline::select::WideRow;

/// Why a country was left out of the profile table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// `Exclude` policy: at least one indicator is missing
    MissingIndicators { dimensions: Vec<Dimension> },
    /// `Flag` policy: more indicators missing than `max_missing_fraction` allows
    TooSparse { missing: usize },
    /// None of the present dimensions carries composite weight
    NoCompositeDimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedCountry {
    pub country: String,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// A dimension kept as explicitly missing for a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedCell {
    pub country: String,
    pub dimension: Dimension,
}

/// Rows surviving the policy, with what was excluded or flagged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingDataOutcome {
    pub rows: Vec<WideRow>,
    pub excluded: Vec<ExcludedCountry>,
    pub flagged: Vec<FlaggedCell>,
}

/// Apply the configured missing-data policy to `rows`
#[must_use]
pub fn apply_missing_policy(
    rows: Vec<WideRow>,
    config: &PipelineConfig,
    composite: &Composite,
) -> MissingDataOutcome {
    let mut outcome = MissingDataOutcome::default();

    for row in rows {
        let missing = row.values.missing();

        let exclusion = if missing.is_empty() {
            None
        } else {
            match config.missing_data {
                MissingDataPolicy::Exclude => Some(ExclusionReason::MissingIndicators {
                    dimensions: missing.clone(),
                }),
                MissingDataPolicy::Flag
                    if missing.len() as f64 / DIMENSION_COUNT as f64
                        > config.max_missing_fraction =>
                {
                    Some(ExclusionReason::TooSparse {
                        missing: missing.len(),
                    })
                }
                MissingDataPolicy::Flag => None,
            }
        };
        let exclusion = exclusion.or_else(|| {
            (!composite.covers(&row.values)).then_some(ExclusionReason::NoCompositeDimension)
        });

        match exclusion {
            Some(reason) => {
                log::info!("Excluding {}: {:?}", row.country, reason);
                outcome.excluded.push(ExcludedCountry {
                    country: row.country,
                    reason,
                });
            }
            None => {
                outcome
                    .flagged
                    .extend(missing.into_iter().map(|dimension| FlaggedCell {
                        country: row.country.clone(),
                        dimension,
                    }));
                outcome.rows.push(row);
            }
        }
    }

    outcome
}
