//! Scenario projection.
//!
//! A projection is always computed from the baseline profile, never from a
//! previous projection, and never mutates its inputs.

pub mod outcome;
pub mod policy;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::dimension::Dimension;
use crate::error::{Result, WellbeingError};
use crate::models::{CountryProfile, DimensionScores, OecdAverage};
use crate::pipeline::Composite;

pub use outcome::{OutcomeEstimate, estimate_outcome, pearson};
pub use policy::{PolicyOutcome, default_policy_model, simulate_policy};

/// Signed per-dimension shifts in percentage points.
///
/// Dimensions without an entry are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deltas(BTreeMap<Dimension, f64>);

impl Deltas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delta of `dimension`; non-finite values are rejected
    pub fn set(&mut self, dimension: Dimension, delta: f64) -> Result<()> {
        if !delta.is_finite() {
            return Err(WellbeingError::InvalidDelta(format!(
                "{dimension}: {delta} is not a finite number"
            )));
        }
        self.0.insert(dimension, delta);
        Ok(())
    }

    /// Builder form of [`Deltas::set`]
    pub fn with(mut self, dimension: Dimension, delta: f64) -> Result<Self> {
        self.set(dimension, delta)?;
        Ok(self)
    }

    /// Parse `dimension=delta` assignments such as `safety=+10` or `income=-2.5`.
    ///
    /// A dimension given twice keeps its last value.
    pub fn from_assignments<'a>(assignments: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut deltas = Self::new();
        for assignment in assignments {
            let (dimension, delta) = parse_assignment(assignment)?;
            deltas.set(dimension, delta)?;
        }
        Ok(deltas)
    }

    #[must_use]
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(d, v)| (*d, *v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Deltas {
    type Err = WellbeingError;

    /// Comma separated assignments: `safety=+10,income=-2`
    fn from_str(s: &str) -> Result<Self> {
        Self::from_assignments(s.split(',').map(str::trim).filter(|a| !a.is_empty()))
    }
}

fn parse_assignment(assignment: &str) -> Result<(Dimension, f64)> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        WellbeingError::InvalidDelta(format!("expected dimension=delta, got '{assignment}'"))
    })?;
    let dimension = name.parse::<Dimension>()?;
    let delta = value
        .trim()
        .trim_start_matches('+')
        .parse::<f64>()
        .map_err(|e| WellbeingError::InvalidDelta(format!("{assignment}: {e}")))?;
    Ok((dimension, delta))
}

/// A hypothetical profile derived from a baseline and a set of deltas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedProfile {
    pub country: String,
    pub baseline: DimensionScores,
    pub projected: DimensionScores,
    pub baseline_composite: f64,
    pub projected_composite: f64,
    /// Touched dimensions whose un-clamped value left [0, 100]
    pub clamped: Vec<Dimension>,
    /// Touched dimensions without a baseline score; they stay missing
    pub unscored: Vec<Dimension>,
}

impl ProjectedProfile {
    /// Projected gaps against `average`
    #[must_use]
    pub fn projected_gaps(&self, average: &OecdAverage) -> DimensionScores {
        average.gaps_for(&self.projected)
    }

    /// Change of the composite index caused by the deltas
    #[must_use]
    pub fn composite_change(&self) -> f64 {
        self.projected_composite - self.baseline_composite
    }
}

/// Apply `deltas` to `baseline`.
///
/// Each touched score becomes `clamp(score + delta, 0, 100)` and the
/// composite is recomputed with `composite`. Scores that end up unchanged
/// keep the stored composite.
#[must_use]
pub fn project(baseline: &CountryProfile, deltas: &Deltas, composite: &Composite) -> ProjectedProfile {
    let mut projected = baseline.scores;
    let mut clamped = Vec::new();
    let mut unscored = Vec::new();

    for (dim, delta) in deltas.iter() {
        let Some(score) = baseline.score(dim) else {
            unscored.push(dim);
            continue;
        };
        let shifted = score + delta;
        if !(0.0..=100.0).contains(&shifted) {
            clamped.push(dim);
        }
        projected.set(dim, Some(shifted.clamp(0.0, 100.0)));
    }

    let projected_composite = if projected == baseline.scores {
        baseline.composite_index
    } else {
        composite
            .combine(&projected)
            .unwrap_or(baseline.composite_index)
    };

    ProjectedProfile {
        country: baseline.country.clone(),
        baseline: baseline.scores,
        projected,
        baseline_composite: baseline.composite_index,
        projected_composite,
        clamped,
        unscored,
    }
}
