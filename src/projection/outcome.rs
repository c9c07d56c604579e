//! Life-satisfaction outcome estimate for a single-dimension improvement.
//!
//! The estimate is `improvement * r * scale`, where `r` is the Pearson
//! correlation between life satisfaction and the improved dimension across
//! the profile table. It is a correlation heuristic for display, not a causal
//! model.

use serde::Serialize;

use crate::dimension::Dimension;
use crate::models::{CountryProfile, ProfileTable};

/// Estimated effect of improving one dimension of one country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEstimate {
    pub country: String,
    pub dimension: Dimension,
    pub improvement: f64,
    /// Correlation with life satisfaction; `None` when undefined
    pub correlation: Option<f64>,
    pub life_satisfaction_shift: f64,
    pub current_score: Option<f64>,
    pub projected_score: Option<f64>,
    pub current_life_satisfaction: Option<f64>,
    pub projected_life_satisfaction: Option<f64>,
}

/// Estimate the life-satisfaction shift of improving `dimension` by
/// `improvement` points for `profile`, using `table` for the correlation
#[must_use]
pub fn estimate_outcome(
    table: &ProfileTable,
    profile: &CountryProfile,
    dimension: Dimension,
    improvement: f64,
    scale: f64,
) -> OutcomeEstimate {
    let pairs: Vec<(f64, f64)> = table
        .iter()
        .filter_map(|p| Some((p.score(Dimension::LifeSatisfaction)?, p.score(dimension)?)))
        .collect();
    let correlation = pearson(&pairs);
    let shift = correlation.map_or(0.0, |r| improvement * r * scale);

    let current_life_satisfaction = profile.score(Dimension::LifeSatisfaction);
    let current_score = profile.score(dimension);

    OutcomeEstimate {
        country: profile.country.clone(),
        dimension,
        improvement,
        correlation,
        life_satisfaction_shift: shift,
        current_score,
        projected_score: current_score.map(|s| (s + improvement).clamp(0.0, 100.0)),
        current_life_satisfaction,
        projected_life_satisfaction: current_life_satisfaction
            .map(|s| (s + shift).clamp(0.0, 100.0)),
    }
}

/// Pearson correlation of paired samples.
///
/// `None` with fewer than two pairs or when either side has zero variance.
#[must_use]
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (cov, var_x, var_y) = pairs.iter().fold((0.0, 0.0, 0.0), |(c, vx, vy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (c + dx * dy, vx + dx * dx, vy + dy * dy)
    });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
