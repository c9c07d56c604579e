//! Table-wide policy simulation.
//!
//! A policy raises chosen dimensions by a percentage for every country at once
//! (`score * (1 + boost / 100)`, capped to 0-100). Life satisfaction is then
//! modelled as a weighted sum of the other dimensions, before and after the
//! boost. The model is a fixed heuristic, not fitted to the data.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::CompositeMethod;
use crate::dimension::Dimension;
use crate::models::{DimensionScores, ProfileTable};
use crate::pipeline::Composite;

use super::Deltas;

/// The default life-satisfaction model: a weighted sum over nine dimensions
#[must_use]
pub fn default_policy_model() -> CompositeMethod {
    CompositeMethod::Weighted {
        weights: BTreeMap::from([
            (Dimension::Environment, 0.15),
            (Dimension::Education, 0.15),
            (Dimension::Jobs, 0.20),
            (Dimension::Safety, 0.10),
            (Dimension::Income, 0.10),
            (Dimension::Housing, 0.10),
            (Dimension::Health, 0.10),
            (Dimension::WorkLifeBalance, 0.05),
            (Dimension::SocialConnections, 0.05),
        ]),
    }
}

/// One country under a table-wide policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyOutcome {
    pub country: String,
    /// Scores after the boosts; missing scores stay missing
    pub simulated: DimensionScores,
    /// Boosted dimensions that hit a bound of the 0-100 range
    pub capped: Vec<Dimension>,
    /// Life satisfaction score stored in the profile
    pub life_satisfaction: Option<f64>,
    /// Modelled life satisfaction of the unboosted scores
    pub modelled_baseline: Option<f64>,
    /// Modelled life satisfaction of the boosted scores
    pub modelled_simulated: Option<f64>,
}

impl PolicyOutcome {
    /// Modelled change in life satisfaction caused by the policy
    #[must_use]
    pub fn modelled_shift(&self) -> Option<f64> {
        Some(self.modelled_simulated? - self.modelled_baseline?)
    }
}

/// Apply percentage `boosts` to every profile of `table` and model life
/// satisfaction with `model`.
///
/// Outcomes follow the table order. Boosts below -100% floor at zero.
#[must_use]
pub fn simulate_policy(
    table: &ProfileTable,
    boosts: &Deltas,
    model: &CompositeMethod,
) -> Vec<PolicyOutcome> {
    let model = Composite::new(model.clone(), None);

    table
        .iter()
        .map(|profile| {
            let mut simulated = profile.scores;
            let mut capped = Vec::new();
            for (dim, boost) in boosts.iter() {
                let Some(score) = profile.scores.get(dim) else {
                    continue;
                };
                let boosted = score * (1.0 + boost / 100.0);
                if !(0.0..=100.0).contains(&boosted) {
                    capped.push(dim);
                }
                simulated.set(dim, Some(boosted.clamp(0.0, 100.0)));
            }

            PolicyOutcome {
                country: profile.country.clone(),
                simulated,
                capped,
                life_satisfaction: profile.score(Dimension::LifeSatisfaction),
                modelled_baseline: model.combine(&profile.scores),
                modelled_simulated: model.combine(&simulated),
            }
        })
        .collect()
}
