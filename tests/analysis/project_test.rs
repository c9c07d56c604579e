use crate::utils::{assert_close, fixture_table};
use wellbeing_lens::pipeline::Composite;
use wellbeing_lens::projection::{Deltas, estimate_outcome, project, simulate_policy};
use wellbeing_lens::ranking::{RankBy, top_performers};
use wellbeing_lens::{DIMENSION_COUNT, Dimension, PipelineConfig};

/// An empty delta set reproduces the baseline exactly
#[test]
fn test_empty_projection_is_identity() {
    let table = fixture_table();
    let composite = Composite::from_config(&PipelineConfig::default());
    for profile in &table {
        let projection = project(profile, &Deltas::new(), &composite);
        assert_eq!(projection.projected, profile.scores);
        assert_eq!(projection.projected_composite, profile.composite_index);
        assert_eq!(projection.projected_gaps(table.average()), table.average().gaps_for(&profile.scores));
    }
}

/// A +1000 delta clamps to 100 and is reported
#[test]
fn test_large_delta_clamps() {
    let table = fixture_table();
    let profile = table.profile("Mexico").unwrap();
    let deltas = Deltas::new().with(Dimension::Safety, 1000.0).unwrap();

    let projection = project(profile, &deltas, &Composite::default());
    assert_eq!(projection.projected.get(Dimension::Safety), Some(100.0));
    assert_eq!(projection.clamped, vec![Dimension::Safety]);

    let expected_change = (100.0 - profile.score(Dimension::Safety).unwrap()) / DIMENSION_COUNT as f64;
    assert!((projection.composite_change() - expected_change).abs() <= 0.1 + 1e-9);
}

/// Each projection starts from the baseline
#[test]
fn test_projection_is_stateless() {
    let table = fixture_table();
    let profile = table.profile("Japan").unwrap();
    let deltas: Deltas = "jobs=+5,housing=-5".parse().unwrap();

    let once = project(profile, &deltas, &Composite::default());
    let again = project(profile, &deltas, &Composite::default());
    assert_eq!(once, again);
    assert_eq!(table.profile("Japan").unwrap(), profile);
}

/// Top performers by a dimension are sorted descending
#[test]
fn test_top_performers_by_dimension() {
    let table = fixture_table();
    let top = top_performers(&table, RankBy::Dimension(Dimension::Health), 3);
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].value, 100.0);
    assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
}

/// The outcome estimate scales with the improvement
#[test]
fn test_outcome_estimate_is_linear() {
    let table = fixture_table();
    let profile = table.profile("Portugal").unwrap();

    let small = estimate_outcome(&table, profile, Dimension::Income, 5.0, 0.3);
    let large = estimate_outcome(&table, profile, Dimension::Income, 10.0, 0.3);
    assert!(small.correlation.is_some());
    assert_close(large.life_satisfaction_shift, 2.0 * small.life_satisfaction_shift);
}

/// A table-wide policy never lowers modelled life satisfaction and respects the cap
#[test]
fn test_policy_simulation_over_fixture() {
    let table = fixture_table();
    let config = PipelineConfig::default();
    let boosts: Deltas = "environment=+25, education=+25, jobs=+50".parse().unwrap();

    let outcomes = simulate_policy(&table, &boosts, &config.policy_model);
    assert_eq!(outcomes.len(), table.len());

    for (outcome, profile) in outcomes.iter().zip(&table) {
        assert_eq!(outcome.country, profile.country);
        assert!(outcome.modelled_shift().unwrap() >= 0.0);
        for (dim, score) in outcome.simulated.present() {
            assert!((0.0..=100.0).contains(&score), "{dim}");
        }
        assert_eq!(
            outcome.simulated.get(Dimension::Safety),
            profile.score(Dimension::Safety)
        );
        // jobs leaders at 100 stay capped
        if profile.score(Dimension::Jobs) == Some(100.0) {
            assert!(outcome.capped.contains(&Dimension::Jobs));
        }
    }

    let untouched = simulate_policy(&table, &Deltas::new(), &config.policy_model);
    assert!(untouched.iter().all(|o| o.modelled_shift() == Some(0.0)));
}
