//! Sanity checks over a produced profile table.

use std::fmt;

use log::warn;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::models::ProfileTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    /// Offending countries or values when the check failed
    pub detail: Option<String>,
}

impl ValidationCheck {
    fn new(name: impl Into<String>, failures: Vec<String>) -> Self {
        let passed = failures.is_empty();
        Self {
            name: name.into(),
            passed,
            detail: (!passed).then(|| failures.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            write!(f, "{status} - {}", check.name)?;
            if let Some(detail) = &check.detail {
                write!(f, " ({detail})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Run every check against `table`, logging the failed ones
#[must_use]
pub fn validate_table(table: &ProfileTable, config: &PipelineConfig) -> ValidationReport {
    let tolerance = config.decimals.map_or(1e-9, |d| 10f64.powi(-(d as i32)));
    let average = table.average();

    let mut missing_names = Vec::new();
    let mut missing_codes = Vec::new();
    let mut out_of_range = Vec::new();
    let mut bad_composite = Vec::new();
    let mut inconsistent_gaps = Vec::new();

    for (row, profile) in table.iter().enumerate() {
        if profile.country.trim().is_empty() {
            missing_names.push(format!("row {}", row + 1));
        }
        if profile.country_code.is_none() {
            missing_codes.push(profile.country.clone());
        }
        if !(0.0..=100.0).contains(&profile.composite_index) {
            bad_composite.push(format!("{} = {}", profile.country, profile.composite_index));
        }
        for (dim, score) in profile.scores.present() {
            if !(0.0..=100.0).contains(&score) {
                out_of_range.push(format!("{}.{dim} = {score}", profile.country));
            }
        }
        for (dim, gap) in profile.gaps.iter() {
            let expected = profile.score(dim).zip(average.get(dim)).map(|(s, a)| s - a);
            let consistent = match (gap, expected) {
                (Some(gap), Some(expected)) => (gap - expected).abs() <= tolerance,
                (None, None) => true,
                _ => false,
            };
            if !consistent {
                inconsistent_gaps.push(format!("{}.{}", profile.country, dim.gap_column()));
            }
        }
    }

    let too_few = if table.len() < config.min_countries {
        vec![format!("{} < {}", table.len(), config.min_countries)]
    } else {
        Vec::new()
    };

    let report = ValidationReport {
        checks: vec![
            ValidationCheck::new("No missing country names", missing_names),
            ValidationCheck::new("No missing country codes", missing_codes),
            ValidationCheck::new("All scores 0-100", out_of_range),
            ValidationCheck::new("Composite index within 0-100", bad_composite),
            ValidationCheck::new("All gaps consistent with the OECD average", inconsistent_gaps),
            ValidationCheck::new(format!("At least {} countries", config.min_countries), too_few),
        ],
    };

    for check in report.failures() {
        warn!(
            "Validation failed: {} ({})",
            check.name,
            check.detail.as_deref().unwrap_or_default()
        );
    }
    report
}
