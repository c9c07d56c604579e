use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use wellbeing_lens::{Dimension, PipelineConfig, ProfileTable, RawRecord, normalize};

/// Countries of the synthetic fixture with their ISO codes
pub const COUNTRIES: &[(&str, &str)] = &[
    ("Australia", "AUS"),
    ("Chile", "CHL"),
    ("Denmark", "DNK"),
    ("Finland", "FIN"),
    ("Japan", "JPN"),
    ("Mexico", "MEX"),
    ("Norway", "NOR"),
    ("Portugal", "PRT"),
];

/// A plausible raw value for `country_idx` on `dim`.
///
/// The multiplier cycles differently per dimension so that countries rank
/// differently across dimensions.
#[must_use]
pub fn raw_value(country_idx: usize, dim: Dimension) -> f64 {
    let (base, step) = match dim {
        Dimension::LifeSatisfaction => (5.5, 0.3),
        Dimension::Health => (76.0, 1.1),
        Dimension::Income => (18_000.0, 3_500.0),
        Dimension::Education => (240.0, 9.0),
        Dimension::Jobs => (58.0, 3.0),
        Dimension::WorkLifeBalance => (1.5, 2.5),
        Dimension::Safety => (0.4, 1.7),
        Dimension::Environment => (30.0, 6.0),
        Dimension::SocialConnections => (82.0, 2.0),
        Dimension::Housing => (12.0, 1.8),
    };
    let multiplier = (country_idx * 7 + dim.index() * 3) % 11;
    base + step * multiplier as f64
}

/// Complete, clean country-level records for every fixture country
#[must_use]
pub fn fixture_records() -> Vec<RawRecord> {
    COUNTRIES
        .iter()
        .enumerate()
        .flat_map(|(c, (country, code))| {
            Dimension::ALL.into_iter().map(move |dim| {
                RawRecord::new(*country, dim.default_measure(), 2022, raw_value(c, dim))
                    .with_code(*code)
            })
        })
        .collect()
}

/// Fixture records plus the noise a real export carries: aggregates,
/// regions, older years and unrelated measures
#[must_use]
pub fn noisy_fixture_records() -> Vec<RawRecord> {
    let mut records = Vec::new();
    for (c, (country, code)) in COUNTRIES.iter().enumerate() {
        records.push(
            RawRecord::new(*country, Dimension::Safety.default_measure(), 2015, 99.0)
                .with_code(*code),
        );
        records.push(RawRecord::new(*country, "Voter turnout", 2022, 60.0 + c as f64).with_code(*code));
    }
    records.extend(fixture_records());
    records.push(
        RawRecord::new("OECD average", Dimension::Safety.default_measure(), 2022, 2.6)
            .with_code("OECD"),
    );
    records.push(
        RawRecord::new("Helsinki-Uusimaa", Dimension::Jobs.default_measure(), 2022, 99.0)
            .with_code("FI1B"),
    );
    records
}

/// Normalized fixture table with the default configuration
#[must_use]
pub fn fixture_table() -> ProfileTable {
    normalize(&fixture_records(), &PipelineConfig::default()).expect("fixture normalizes")
}

/// Write `records` as an OECD-style CSV export with breakdown columns.
///
/// Each record is written as a `Total` row followed by a `Female` breakdown
/// row carrying a different value.
pub fn write_oecd_csv(dir: &Path, records: &[RawRecord]) -> PathBuf {
    let mut csv = String::from("REF_AREA,Country,Measure,Sex,TIME_PERIOD,OBS_VALUE\n");
    for r in records {
        let code = r.country_code.as_deref().unwrap_or_default();
        for (sex, value) in [("Total", r.value), ("Female", r.value + 1.0)] {
            let _ = writeln!(
                csv,
                "{code},\"{}\",\"{}\",{sex},{},{value}",
                r.country, r.indicator, r.year
            );
        }
    }
    let path = dir.join("oecd_export.csv");
    std::fs::write(&path, csv).expect("write fixture csv");
    path
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
