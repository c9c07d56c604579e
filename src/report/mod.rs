//! Human readable summaries of a produced profile table.

pub mod validation;

use std::path::Path;

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::config::PipelineConfig;
use crate::dimension::{Dimension, Polarity};
use crate::error::Result;
use crate::error::util::safe_create_file;
use crate::models::ProfileTable;
use crate::pipeline::NormalizationReport;
use crate::ranking::{RankBy, top_performers};

pub use validation::{ValidationCheck, ValidationReport, validate_table};

/// Countries listed in the metadata ranking
const METADATA_TOP_N: usize = 5;

/// Render the metadata summary that accompanies the artifact
#[must_use]
pub fn render_metadata(
    table: &ProfileTable,
    config: &PipelineConfig,
    report: Option<&NormalizationReport>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut summary = String::new();
    summary.push_str("OECD WELLBEING DATA - NORMALIZED COUNTRY PROFILES\n");
    summary.push_str("==================================================\n\n");
    summary.push_str(&format!("Generated: {}\n\n", generated_at.to_rfc3339()));

    summary.push_str("Dataset Summary:\n");
    summary.push_str(&format!("- Countries: {}\n", table.len()));
    summary.push_str(&format!("- Dimensions: {}\n", Dimension::ALL.len()));
    summary.push_str("- Data Years: most recent available per indicator\n\n");

    summary.push_str("Dimensions Included:\n");
    for dim in Dimension::ALL {
        let measure = config
            .indicator_for(dim)
            .map_or(dim.default_measure(), |s| s.measure.as_str());
        summary.push_str(&format!("  * {}: {} ({})\n", dim.name(), dim.description(), measure));
    }

    summary.push_str("\nValue Interpretation:\n");
    summary.push_str("- All dimensions normalized to a 0-100 scale\n");
    summary.push_str("- Higher values are better outcomes for every dimension\n");
    summary.push_str(&format!(
        "- Zero-variance indicators receive the neutral score {}\n",
        config.neutral_score
    ));
    summary.push_str(&format!("- Missing data policy: {:?}\n", config.missing_data));

    summary.push_str("\nColumns:\n");
    summary.push_str("- country: Country name\n");
    summary.push_str("- country_code: ISO 3-letter code (for mapping)\n");
    summary.push_str("- composite_index: Combination of the dimension scores\n");
    summary.push_str("- [dimension]: Normalized score (0-100)\n");
    summary.push_str("- [dimension]_gap: Difference from the OECD average\n");

    summary.push_str("\nInverted Measures (lower raw values = higher normalized scores):\n");
    for spec in config
        .indicators
        .iter()
        .filter(|s| s.polarity == Polarity::LowerIsBetter)
        .sorted_by_key(|s| s.dimension)
    {
        summary.push_str(&format!("- {} ({})\n", spec.dimension.name(), spec.measure));
    }

    if let Some(report) = report {
        summary.push_str("\nPipeline Report:\n");
        summary.push_str(&format!("- Input records: {}\n", report.input_records));
        summary.push_str(&format!("- Superseded records: {}\n", report.superseded_records));
        summary.push_str(&format!("- Non-country records: {}\n", report.non_country_records));
        summary.push_str(&format!(
            "- Excluded countries: {}\n",
            report.excluded.iter().map(|e| e.country.as_str()).join(", ")
        ));
        summary.push_str(&format!("- Flagged cells: {}\n", report.flagged.len()));
        summary.push_str(&format!(
            "- Degenerate indicators: {}\n",
            report.degenerate.iter().join(", ")
        ));
    }

    summary.push_str(&format!("\nTop {METADATA_TOP_N} Countries:\n"));
    for ranked in top_performers(table, RankBy::Composite, METADATA_TOP_N) {
        summary.push_str(&format!("{}. {} ({:.1})\n", ranked.rank, ranked.country, ranked.value));
    }

    summary
}

/// Write the metadata summary next to the artifact
pub fn write_metadata(path: &Path, metadata: &str) -> Result<()> {
    let mut file = safe_create_file(path, "writing the metadata summary")?;
    std::io::Write::write_all(&mut file, metadata.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DIMENSION_COUNT;
    use crate::models::{CountryProfile, DimensionScores};
    use chrono::TimeZone;

    fn table() -> ProfileTable {
        let profile = |country: &str, value: f64| CountryProfile {
            country: country.into(),
            country_code: None,
            scores: DimensionScores::from_values([value; DIMENSION_COUNT]),
            composite_index: value,
            gaps: DimensionScores::empty(),
        };
        ProfileTable::new(vec![profile("Norway", 71.3), profile("Chile", 30.0)])
    }

    #[test]
    fn test_render_metadata() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let text = render_metadata(&table(), &PipelineConfig::default(), None, at);

        assert!(text.contains("Generated: 2024-05-01T12:00:00+00:00"));
        assert!(text.contains("- Countries: 2"));
        assert!(text.contains("- safety (Homicides)"));
        assert!(text.contains("1. Norway (71.3)"));
        assert!(text.contains("2. Chile (30.0)"));
        assert!(!text.contains("Pipeline Report"));
    }

    #[test]
    fn test_render_metadata_with_report() {
        let report = NormalizationReport {
            input_records: 420,
            degenerate: vec![Dimension::Housing],
            ..NormalizationReport::default()
        };
        let text = render_metadata(&table(), &PipelineConfig::default(), Some(&report), Utc::now());
        assert!(text.contains("- Input records: 420"));
        assert!(text.contains("- Degenerate indicators: housing"));
    }

    #[test]
    fn test_write_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.txt");
        write_metadata(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
