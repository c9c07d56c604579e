//! Record selection and pivoting.
//!
//! Keeps country-level rows of the configured indicators, resolves multiple
//! reported years with a most-recent-wins policy, and reshapes the result to
//! one row per country. Years are not aligned across indicators.

use std::collections::BTreeMap;

use log::warn;
use rustc_hash::FxHashMap;

use crate::config::{IndicatorSpec, PipelineConfig};
use crate::dimension::DIMENSION_COUNT;
use crate::filter::is_country_level;
use crate::models::{DimensionScores, RawRecord};

/// The raw observations of one country, one slot per dimension
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub country: String,
    pub country_code: Option<String>,
    /// Raw (unscaled) indicator values
    pub values: DimensionScores,
}

/// Outcome of the selection stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// One row per country, ordered by country name
    pub rows: Vec<WideRow>,
    /// Aggregate or sub-national records that were dropped
    pub non_country: usize,
    /// Records of measures outside the indicator set
    pub unused_indicator: usize,
    /// Older (or earlier-listed same-year) records replaced by a newer one
    pub superseded: usize,
    /// Number of country-level records seen per dimension
    pub observations: [usize; DIMENSION_COUNT],
    /// Records whose country code disagrees with the first code seen for the country
    pub conflicting_codes: usize,
}

#[derive(Default)]
struct Pending {
    country_code: Option<String>,
    latest: [Option<(i32, f64)>; DIMENSION_COUNT],
}

/// Select the most recent observation per country and indicator and pivot.
///
/// Among records sharing the latest year, the one listed last wins.
#[must_use]
pub fn select_latest(records: &[RawRecord], config: &PipelineConfig) -> Selection {
    let specs: FxHashMap<&str, &IndicatorSpec> = config
        .indicators
        .iter()
        .map(|spec| (spec.measure.as_str(), spec))
        .collect();

    let mut selection = Selection::default();
    let mut pending: BTreeMap<&str, Pending> = BTreeMap::new();

    for record in records {
        if !is_country_level(record, &config.granularity) {
            selection.non_country += 1;
            continue;
        }
        let Some(spec) = specs.get(record.indicator.as_str()) else {
            selection.unused_indicator += 1;
            continue;
        };

        let idx = spec.dimension.index();
        selection.observations[idx] += 1;

        let entry = pending.entry(record.country.as_str()).or_default();
        match (&entry.country_code, &record.country_code) {
            (None, _) => entry.country_code.clone_from(&record.country_code),
            (Some(kept), Some(code)) if kept != code => {
                warn!(
                    "Country '{}' is reported under codes '{kept}' and '{code}'; keeping '{kept}'",
                    record.country
                );
                selection.conflicting_codes += 1;
            }
            _ => {}
        }

        let slot = &mut entry.latest[idx];
        match *slot {
            Some((year, _)) if record.year < year => selection.superseded += 1,
            Some(_) => {
                selection.superseded += 1;
                *slot = Some((record.year, record.value));
            }
            None => *slot = Some((record.year, record.value)),
        }
    }

    selection.rows = pending
        .into_iter()
        .map(|(country, p)| WideRow {
            country: country.to_string(),
            country_code: p.country_code,
            values: DimensionScores::from_fn(|dim| p.latest[dim.index()].map(|(_, v)| v)),
        })
        .collect();

    selection
}
