//! Per-dimension score vectors.

use serde::{Deserialize, Serialize};

use crate::dimension::{DIMENSION_COUNT, Dimension};

/// One optional value per dimension, indexed in canonical order.
///
/// `None` marks a dimension that is explicitly missing for the country; it is
/// never conflated with a zero score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScores([Option<f64>; DIMENSION_COUNT]);

impl DimensionScores {
    /// A vector with every dimension missing
    #[must_use]
    pub const fn empty() -> Self {
        Self([None; DIMENSION_COUNT])
    }

    /// Build a vector by evaluating `f` for every dimension
    pub fn from_fn(mut f: impl FnMut(Dimension) -> Option<f64>) -> Self {
        let mut values = [None; DIMENSION_COUNT];
        for dim in Dimension::ALL {
            values[dim.index()] = f(dim);
        }
        Self(values)
    }

    /// A fully populated vector
    #[must_use]
    pub fn from_values(values: [f64; DIMENSION_COUNT]) -> Self {
        Self(values.map(Some))
    }

    #[must_use]
    pub const fn get(&self, dim: Dimension) -> Option<f64> {
        self.0[dim.index()]
    }

    pub fn set(&mut self, dim: Dimension, value: Option<f64>) {
        self.0[dim.index()] = value;
    }

    /// Iterate over every dimension in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, Option<f64>)> + '_ {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// Iterate over the present values in canonical order
    pub fn present(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.iter().filter_map(|(d, v)| v.map(|v| (d, v)))
    }

    /// Dimensions without a value
    #[must_use]
    pub fn missing(&self) -> Vec<Dimension> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(d, _)| d)
            .collect()
    }

    #[must_use]
    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.present_count() == DIMENSION_COUNT
    }

    /// Apply `f` to every present value
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(Dimension, f64) -> f64) -> Self {
        Self::from_fn(|d| self.get(d).map(|v| f(d, v)))
    }
}
