use crate::utils::{COUNTRIES, fixture_records, noisy_fixture_records, write_oecd_csv};
use wellbeing_lens::pipeline;
use wellbeing_lens::reader::read_raw_records;
use wellbeing_lens::report::{render_metadata, validate_table};
use wellbeing_lens::{PipelineConfig, WellbeingError, normalize};

/// An OECD-style export with breakdown rows normalizes like the clean records
#[test]
fn test_oecd_export_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_oecd_csv(dir.path(), &noisy_fixture_records());
    let config = PipelineConfig::default();

    let (output, stats) = pipeline::run(&path, &config).unwrap();
    let expected = normalize(&fixture_records(), &config).unwrap();

    assert_eq!(stats.rows_read, 2 * noisy_fixture_records().len());
    assert_eq!(stats.rows_not_total, noisy_fixture_records().len());
    assert_eq!(stats.rows_incomplete, 0);
    assert_eq!(output.table, expected);
    assert_eq!(
        output.table.profile("Finland").unwrap().country_code.as_deref(),
        Some("FIN")
    );
}

/// Reading keeps codes and drops breakdown rows
#[test]
fn test_read_raw_records_from_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_oecd_csv(dir.path(), &fixture_records());

    let dataset = read_raw_records(&path, &PipelineConfig::default()).unwrap();
    assert_eq!(dataset.records, fixture_records());
}

/// Validation and metadata of a small run
#[test]
fn test_reports_for_fixture() {
    let config = PipelineConfig::default();
    let table = normalize(&fixture_records(), &config).unwrap();

    let validation = validate_table(&table, &config);
    let failed: Vec<&str> = validation.failures().map(|c| c.name.as_str()).collect();
    assert_eq!(failed, vec!["At least 25 countries"]);

    let metadata = render_metadata(&table, &config, None, chrono::Utc::now());
    assert!(metadata.contains(&format!("- Countries: {}", COUNTRIES.len())));
}

/// A file without a value column is a schema error
#[test]
fn test_missing_value_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    std::fs::write(&path, "Country,Measure,TIME_PERIOD\nFinland,Homicides,2022\n").unwrap();

    let err = read_raw_records(&path, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, WellbeingError::Schema(_)));
}

/// A header-only file is an empty dataset
#[test]
fn test_header_only_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    std::fs::write(&path, "Country,Measure,TIME_PERIOD,OBS_VALUE\n").unwrap();

    let err = read_raw_records(&path, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, WellbeingError::EmptyDataset(_)));
}
