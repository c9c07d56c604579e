use crate::utils::fixture_table;
use wellbeing_lens::diagnosis::{HIGHLIGHT_COUNT, diagnose, diagnose_country};
use wellbeing_lens::{CountryProfile, DIMENSION_COUNT, DimensionScores, OecdAverage};

/// A profile sitting exactly on the average has nothing to report
#[test]
fn test_zero_gap_profile_is_empty() {
    let average = OecdAverage::from_scores(DimensionScores::from_values([55.5; DIMENSION_COUNT]));
    let profile = CountryProfile {
        country: "Averageland".into(),
        country_code: None,
        scores: *average.scores(),
        composite_index: 55.5,
        gaps: DimensionScores::from_values([0.0; DIMENSION_COUNT]),
    };

    let diagnosis = diagnose(&profile, &average);
    assert!(diagnosis.strengths.is_empty());
    assert!(diagnosis.weaknesses.is_empty());
    assert!(diagnosis.is_unremarkable());
}

/// At most two strengths and two weaknesses, strongest first
#[test]
fn test_fixture_diagnoses() {
    let table = fixture_table();
    for profile in &table {
        let gaps = table.average().gaps_for(&profile.scores);
        let positive = gaps.present().filter(|(_, g)| *g > 0.0).count();
        let negative = gaps.present().filter(|(_, g)| *g < 0.0).count();

        let diagnosis = diagnose_country(&table, &profile.country).unwrap();
        assert_eq!(diagnosis.strengths.len(), positive.min(HIGHLIGHT_COUNT));
        assert_eq!(diagnosis.weaknesses.len(), negative.min(HIGHLIGHT_COUNT));
        assert!(diagnosis.strengths.iter().all(|g| g.gap > 0.0));
        assert!(diagnosis.weaknesses.iter().all(|g| g.gap < 0.0));
        assert!(diagnosis.strengths.windows(2).all(|w| w[0].gap >= w[1].gap));
        assert!(diagnosis.weaknesses.windows(2).all(|w| w[0].gap <= w[1].gap));
        assert_eq!(
            diagnosis.top_performer.as_ref().map(|t| t.country.as_str()),
            table.countries().first().copied()
        );
    }
}

/// Unknown countries are reported as such
#[test]
fn test_unknown_country() {
    let table = fixture_table();
    assert!(matches!(
        diagnose_country(&table, "Atlantis"),
        Err(wellbeing_lens::WellbeingError::UnknownCountry(_))
    ));
}
