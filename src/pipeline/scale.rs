//! Per-indicator scaling onto 0-100.
//!
//! Higher-is-better indicators are min-max scaled. Lower-is-better indicators
//! are inverted through their percentile rank, so one extreme value cannot
//! squeeze the remaining countries together the way `max - value` would.
//! Only present values take part; missing cells stay missing.

use std::cmp::Ordering;

use crate::dimension::Polarity;

/// Scaled scores of one indicator column
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledColumn {
    /// One score per input cell, `None` where the input was missing
    pub scores: Vec<Option<f64>>,
    /// All present values were equal and got the neutral score
    pub degenerate: bool,
}

/// Scale a column according to its polarity
#[must_use]
pub fn scale_column(values: &[Option<f64>], polarity: Polarity, neutral: f64) -> ScaledColumn {
    match polarity {
        Polarity::HigherIsBetter => min_max_scale(values, neutral),
        Polarity::LowerIsBetter => inverted_percentile_scale(values, neutral),
    }
}

/// `(value - min) / (max - min) * 100`; a zero-variance column gets `neutral`
#[must_use]
pub fn min_max_scale(values: &[Option<f64>], neutral: f64) -> ScaledColumn {
    let Some((min, max)) = bounds(values) else {
        return ScaledColumn {
            scores: values.to_vec(),
            degenerate: false,
        };
    };

    if max == min {
        return neutral_column(values, neutral);
    }

    // halving keeps the span finite when min and max sit near the f64 limits
    let halve = !(max - min).is_finite();
    let ratio = |v: f64| {
        if halve {
            (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
        } else {
            (v - min) / (max - min)
        }
    };
    ScaledColumn {
        scores: values
            .iter()
            .map(|v| v.map(|v| (ratio(v) * 100.0).clamp(0.0, 100.0)))
            .collect(),
        degenerate: false,
    }
}

/// `(1 - rank_pct) * 100`; a zero-variance column gets `neutral`
#[must_use]
pub fn inverted_percentile_scale(values: &[Option<f64>], neutral: f64) -> ScaledColumn {
    match bounds(values) {
        Some((min, max)) if max == min => neutral_column(values, neutral),
        _ => ScaledColumn {
            scores: percentile_ranks(values)
                .into_iter()
                .map(|pct| pct.map(|p| ((1.0 - p) * 100.0).clamp(0.0, 100.0)))
                .collect(),
            degenerate: false,
        },
    }
}

/// Percentile rank of every present value: `average_rank / n`.
///
/// Ranks run from 1 (smallest) to `n` over the present values. Equal values
/// share the mean of the ranks they span, so the result is in `(0, 1]` and
/// does not depend on the sort algorithm.
#[must_use]
pub fn percentile_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    present.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let n = present.len() as f64;
    let mut ranks = vec![None; values.len()];
    let mut start = 0;
    while start < present.len() {
        let mut end = start;
        while end + 1 < present.len() && present[end + 1].1 == present[start].1 {
            end += 1;
        }
        // positions are 0-based, ranks 1-based
        let average_rank = (start + end + 2) as f64 / 2.0;
        for &(idx, _) in &present[start..=end] {
            ranks[idx] = Some(average_rank / n);
        }
        start = end + 1;
    }
    ranks
}

fn bounds(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((
            if v.partial_cmp(&min) == Some(Ordering::Less) { v } else { min },
            if v.partial_cmp(&max) == Some(Ordering::Greater) { v } else { max },
        )),
    })
}

fn neutral_column(values: &[Option<f64>], neutral: f64) -> ScaledColumn {
    ScaledColumn {
        scores: values.iter().map(|v| v.map(|_| neutral)).collect(),
        degenerate: true,
    }
}
