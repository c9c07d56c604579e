use std::collections::BTreeMap;

use crate::utils::{COUNTRIES, assert_close, fixture_records, noisy_fixture_records};
use wellbeing_lens::pipeline::ExclusionReason;
use wellbeing_lens::{
    CompositeMethod, Dimension, MissingDataPolicy, PipelineConfig, RawRecord, WellbeingError,
    normalize, normalize_with_report,
};

fn three_countries_with_homicides(rates: [f64; 3]) -> Vec<RawRecord> {
    let names: Vec<&str> = COUNTRIES.iter().take(3).map(|(c, _)| *c).collect();
    fixture_records()
        .into_iter()
        .filter(|r| names.contains(&r.country.as_str()))
        .map(|mut r| {
            if r.indicator == Dimension::Safety.default_measure() {
                let idx = names.iter().position(|n| *n == r.country).unwrap_or_default();
                r.value = rates[idx];
            }
            r
        })
        .collect()
}

/// The 1 / 2 / 100 homicide example keeps the gap between 1 and 2
#[test]
fn test_homicide_outlier_does_not_compress() {
    let records = three_countries_with_homicides([1.0, 2.0, 100.0]);
    let table = normalize(&records, &PipelineConfig::default()).unwrap();

    let safety = |country: &str| table.profile(country).unwrap().score(Dimension::Safety).unwrap();
    assert_eq!(safety("Australia"), 66.7);
    assert_eq!(safety("Chile"), 33.3);
    assert_eq!(safety("Denmark"), 0.0);
}

/// Every score lies in [0, 100] and each dimension spans the full range
#[test]
fn test_fixture_scores_span_range() {
    let table = normalize(&fixture_records(), &PipelineConfig::default()).unwrap();
    assert_eq!(table.len(), COUNTRIES.len());

    for dim in Dimension::ALL {
        let scores: Vec<f64> = table.iter().filter_map(|p| p.score(dim)).collect();
        assert_eq!(scores.len(), COUNTRIES.len());
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
        if dim.default_polarity() == wellbeing_lens::Polarity::HigherIsBetter {
            assert!(scores.contains(&0.0), "{dim} has no minimum");
            assert!(scores.contains(&100.0), "{dim} has no maximum");
        }
    }
}

/// Gaps equal score minus the cross-country mean, up to output rounding
#[test]
fn test_gaps_match_average() {
    let table = normalize(&fixture_records(), &PipelineConfig::default()).unwrap();
    for profile in &table {
        for dim in Dimension::ALL {
            let expected = profile.score(dim).unwrap() - table.average().get(dim).unwrap();
            assert!((profile.gap(dim).unwrap() - expected).abs() <= 0.05 + 1e-9);
        }
    }
}

/// Aggregates, regions, older years and unused measures do not leak in
#[test]
fn test_noise_is_filtered() {
    let clean = normalize(&fixture_records(), &PipelineConfig::default()).unwrap();
    let output = normalize_with_report(&noisy_fixture_records(), &PipelineConfig::default()).unwrap();

    assert_eq!(output.table, clean);
    assert!(output.table.get("OECD average").is_none());
    assert_eq!(output.report.non_country_records, 2);
    assert_eq!(output.report.unused_records, COUNTRIES.len());
    assert_eq!(output.report.superseded_records, COUNTRIES.len());
}

/// Flag keeps a country with a missing indicator, Exclude drops it
#[test]
fn test_missing_data_policies() {
    let records: Vec<RawRecord> = fixture_records()
        .into_iter()
        .filter(|r| !(r.country == "Chile" && r.indicator == Dimension::Education.default_measure()))
        .collect();

    let flagged = normalize_with_report(&records, &PipelineConfig::default()).unwrap();
    let chile = flagged.table.profile("Chile").unwrap();
    assert_eq!(chile.score(Dimension::Education), None);
    assert_eq!(chile.gap(Dimension::Education), None);
    assert_eq!(flagged.report.flagged.len(), 1);
    assert!(flagged.report.excluded.is_empty());

    let config = PipelineConfig {
        missing_data: MissingDataPolicy::Exclude,
        ..PipelineConfig::default()
    };
    let excluded = normalize_with_report(&records, &config).unwrap();
    assert!(excluded.table.get("Chile").is_none());
    assert_eq!(excluded.table.len(), COUNTRIES.len() - 1);
    assert!(matches!(
        excluded.report.excluded[0].reason,
        ExclusionReason::MissingIndicators { .. }
    ));
}

/// A zero-variance indicator gives every country the neutral score
#[test]
fn test_degenerate_indicator() {
    let records: Vec<RawRecord> = fixture_records()
        .into_iter()
        .map(|mut r| {
            if r.indicator == Dimension::Housing.default_measure() {
                r.value = 21.0;
            }
            r
        })
        .collect();

    let config = PipelineConfig {
        neutral_score: 40.0,
        ..PipelineConfig::default()
    };
    let output = normalize_with_report(&records, &config).unwrap();
    assert_eq!(output.report.degenerate, vec![Dimension::Housing]);
    for profile in &output.table {
        assert_eq!(profile.score(Dimension::Housing), Some(40.0));
        assert_eq!(profile.gap(Dimension::Housing), Some(0.0));
    }
}

/// A weighted composite only listens to the weighted dimensions
#[test]
fn test_weighted_composite() {
    let config = PipelineConfig {
        composite: CompositeMethod::Weighted {
            weights: BTreeMap::from([(Dimension::LifeSatisfaction, 1.0)]),
        },
        ..PipelineConfig::default()
    };
    let table = normalize(&fixture_records(), &config).unwrap();
    for profile in &table {
        assert_close(
            profile.composite_index,
            profile.score(Dimension::LifeSatisfaction).unwrap(),
        );
    }
}

/// An indicator without a single observation aborts the run
#[test]
fn test_missing_indicator_is_fatal() {
    let records: Vec<RawRecord> = fixture_records()
        .into_iter()
        .filter(|r| r.indicator != Dimension::Environment.default_measure())
        .collect();
    let err = normalize(&records, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, WellbeingError::MissingIndicator { .. }));
}

/// Only aggregates in the input leaves nothing to normalize
#[test]
fn test_only_aggregates_is_empty() {
    let records = vec![RawRecord::new("OECD", "Life satisfaction", 2022, 6.7)];
    let err = normalize(&records, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, WellbeingError::EmptyDataset(_)));
}
