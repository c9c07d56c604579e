use crate::utils::fixture_table;
use wellbeing_lens::writer::{profiles_to_record_batch, read_profiles, write_profiles};
use wellbeing_lens::{Dimension, PipelineConfig, RawRecord, normalize};

/// The CSV artifact reads back into the same table and average
#[test]
fn test_csv_artifact_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oecd_wellbeing_processed.csv");
    let table = fixture_table();

    write_profiles(&table, &path).unwrap();
    let loaded = read_profiles(&path, 4).unwrap();

    assert_eq!(loaded, table);
    assert_eq!(loaded.average(), table.average());
    assert_eq!(loaded.countries(), table.countries());
}

/// The Parquet artifact preserves explicitly missing cells
#[test]
fn test_parquet_artifact_keeps_missing_cells() {
    let mut records = crate::utils::fixture_records();
    records.retain(|r: &RawRecord| {
        !(r.country == "Norway" && r.indicator == Dimension::Jobs.default_measure())
    });
    let table = normalize(&records, &PipelineConfig::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.parquet");
    write_profiles(&table, &path).unwrap();
    let loaded = read_profiles(&path, 1024).unwrap();

    let norway = loaded.profile("NOR").unwrap();
    assert_eq!(norway.score(Dimension::Jobs), None);
    assert_eq!(norway.gap(Dimension::Jobs), None);
    assert_eq!(loaded, table);
}

/// Column layout of the artifact
#[test]
fn test_artifact_columns() {
    let batch = profiles_to_record_batch(&fixture_table()).unwrap();
    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();

    assert_eq!(names[0], "country");
    assert_eq!(names[1], "country_code");
    for dim in Dimension::ALL {
        assert!(names.contains(&dim.name()));
        assert!(names.contains(&dim.gap_column().as_str()));
    }
    assert!(names.contains(&"composite_index"));
}

/// Unsupported extensions are rejected before anything is written
#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.xlsx");
    assert!(write_profiles(&fixture_table(), &path).is_err());
    assert!(!path.exists());
}
