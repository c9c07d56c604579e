//! The composite wellbeing index.
//!
//! Shared by the pipeline and the scenario projector so a projection with no
//! deltas reproduces the stored composite exactly.

use crate::config::{CompositeMethod, PipelineConfig};
use crate::dimension::Dimension;
use crate::models::DimensionScores;
use crate::utils::round_to;

/// Combination function for the composite index
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    method: CompositeMethod,
    decimals: Option<u32>,
}

impl Default for Composite {
    fn default() -> Self {
        Self::new(CompositeMethod::Mean, Some(1))
    }
}

impl Composite {
    #[must_use]
    pub const fn new(method: CompositeMethod, decimals: Option<u32>) -> Self {
        Self { method, decimals }
    }

    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.composite.clone(), config.decimals)
    }

    #[must_use]
    pub const fn method(&self) -> &CompositeMethod {
        &self.method
    }

    /// Composite of the present scores, rounded to the configured decimals.
    ///
    /// Scores are folded in canonical dimension order, so the result depends
    /// only on the values. `None` when no contributing dimension is present.
    #[must_use]
    pub fn combine(&self, scores: &DimensionScores) -> Option<f64> {
        self.unrounded(scores).map(|v| round_to(v, self.decimals))
    }

    /// Whether `scores` has at least one dimension contributing to the composite
    #[must_use]
    pub fn covers(&self, scores: &DimensionScores) -> bool {
        scores.present().any(|(dim, _)| self.weight(dim) > 0.0)
    }

    fn unrounded(&self, scores: &DimensionScores) -> Option<f64> {
        let (weighted_sum, total_weight) = scores
            .present()
            .map(|(dim, value)| (self.weight(dim), value))
            .filter(|(w, _)| *w > 0.0)
            .fold((0.0, 0.0), |(sum, total), (w, v)| (sum + w * v, total + w));

        (total_weight > 0.0).then(|| weighted_sum / total_weight)
    }

    fn weight(&self, dim: Dimension) -> f64 {
        match &self.method {
            CompositeMethod::Mean => 1.0,
            CompositeMethod::Weighted { weights } => weights.get(&dim).copied().unwrap_or(0.0),
        }
    }
}
