//! The persisted Country Profile artifact.
//!
//! One row per country with the columns `country`, `country_code`, the ten
//! dimension scores, `composite_index` and the ten `<dimension>_gap` columns.
//! Missing cells are nulls. The artifact can be written as CSV or Parquet and
//! read back into a `ProfileTable`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, new_null_array};
use arrow::compute::cast;
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::util::safe_create_file;
use crate::error::{Result, WellbeingError};
use crate::models::{CountryProfile, DimensionScores, ProfileTable};
use crate::reader::{FileFormat, read_batches};
use crate::utils::{log_operation_complete, log_operation_start};

/// Flat serde form of one artifact row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub country: String,
    pub country_code: Option<String>,
    pub life_satisfaction: Option<f64>,
    pub health: Option<f64>,
    pub income: Option<f64>,
    pub education: Option<f64>,
    pub jobs: Option<f64>,
    pub work_life_balance: Option<f64>,
    pub safety: Option<f64>,
    pub environment: Option<f64>,
    pub social_connections: Option<f64>,
    pub housing: Option<f64>,
    pub composite_index: Option<f64>,
    pub life_satisfaction_gap: Option<f64>,
    pub health_gap: Option<f64>,
    pub income_gap: Option<f64>,
    pub education_gap: Option<f64>,
    pub jobs_gap: Option<f64>,
    pub work_life_balance_gap: Option<f64>,
    pub safety_gap: Option<f64>,
    pub environment_gap: Option<f64>,
    pub social_connections_gap: Option<f64>,
    pub housing_gap: Option<f64>,
}

impl ProfileRow {
    /// Arrow schema of the artifact, in column order
    #[must_use]
    pub fn schema() -> Schema {
        let mut fields = vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("country_code", DataType::Utf8, true),
        ];
        fields.extend(
            Dimension::ALL
                .into_iter()
                .map(|d| Field::new(d.name(), DataType::Float64, true)),
        );
        fields.push(Field::new("composite_index", DataType::Float64, true));
        fields.extend(
            Dimension::ALL
                .into_iter()
                .map(|d| Field::new(d.gap_column(), DataType::Float64, true)),
        );
        Schema::new(fields)
    }

    fn scores(&self) -> DimensionScores {
        DimensionScores::from_fn(|d| match d {
            Dimension::LifeSatisfaction => self.life_satisfaction,
            Dimension::Health => self.health,
            Dimension::Income => self.income,
            Dimension::Education => self.education,
            Dimension::Jobs => self.jobs,
            Dimension::WorkLifeBalance => self.work_life_balance,
            Dimension::Safety => self.safety,
            Dimension::Environment => self.environment,
            Dimension::SocialConnections => self.social_connections,
            Dimension::Housing => self.housing,
        })
    }

    fn gaps(&self) -> DimensionScores {
        DimensionScores::from_fn(|d| match d {
            Dimension::LifeSatisfaction => self.life_satisfaction_gap,
            Dimension::Health => self.health_gap,
            Dimension::Income => self.income_gap,
            Dimension::Education => self.education_gap,
            Dimension::Jobs => self.jobs_gap,
            Dimension::WorkLifeBalance => self.work_life_balance_gap,
            Dimension::Safety => self.safety_gap,
            Dimension::Environment => self.environment_gap,
            Dimension::SocialConnections => self.social_connections_gap,
            Dimension::Housing => self.housing_gap,
        })
    }

    /// Convert back into a profile; a row without composite index is rejected
    pub fn into_profile(self) -> Result<CountryProfile> {
        let Some(composite_index) = self.composite_index else {
            return Err(WellbeingError::schema(format!(
                "profile of '{}' has no composite_index",
                self.country
            )));
        };
        Ok(CountryProfile {
            scores: self.scores(),
            gaps: self.gaps(),
            country: self.country,
            country_code: self.country_code,
            composite_index,
        })
    }
}

impl From<&CountryProfile> for ProfileRow {
    fn from(p: &CountryProfile) -> Self {
        let s = &p.scores;
        let g = &p.gaps;
        Self {
            country: p.country.clone(),
            country_code: p.country_code.clone(),
            life_satisfaction: s.get(Dimension::LifeSatisfaction),
            health: s.get(Dimension::Health),
            income: s.get(Dimension::Income),
            education: s.get(Dimension::Education),
            jobs: s.get(Dimension::Jobs),
            work_life_balance: s.get(Dimension::WorkLifeBalance),
            safety: s.get(Dimension::Safety),
            environment: s.get(Dimension::Environment),
            social_connections: s.get(Dimension::SocialConnections),
            housing: s.get(Dimension::Housing),
            composite_index: Some(p.composite_index),
            life_satisfaction_gap: g.get(Dimension::LifeSatisfaction),
            health_gap: g.get(Dimension::Health),
            income_gap: g.get(Dimension::Income),
            education_gap: g.get(Dimension::Education),
            jobs_gap: g.get(Dimension::Jobs),
            work_life_balance_gap: g.get(Dimension::WorkLifeBalance),
            safety_gap: g.get(Dimension::Safety),
            environment_gap: g.get(Dimension::Environment),
            social_connections_gap: g.get(Dimension::SocialConnections),
            housing_gap: g.get(Dimension::Housing),
        }
    }
}

/// Convert the table into a single record batch in the artifact layout
pub fn profiles_to_record_batch(table: &ProfileTable) -> Result<RecordBatch> {
    let rows: Vec<ProfileRow> = table.iter().map(ProfileRow::from).collect();
    let fields: Vec<FieldRef> = ProfileRow::schema()
        .fields()
        .iter()
        .map(Arc::clone)
        .collect();
    Ok(serde_arrow::to_record_batch(&fields, &rows)?)
}

/// Write the table to `path`, choosing CSV or Parquet by extension
pub fn write_profiles(table: &ProfileTable, path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => write_profiles_csv(table, path),
        FileFormat::Parquet => write_profiles_parquet(table, path),
    }
}

/// Write the table as CSV with a header row
pub fn write_profiles_csv(table: &ProfileTable, path: &Path) -> Result<()> {
    log_operation_start("Writing profiles to", path);
    let start = Instant::now();

    let batch = profiles_to_record_batch(table)?;
    let file = safe_create_file(path, "writing the profile artifact")?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}

/// Write the table as a Snappy-compressed Parquet file
pub fn write_profiles_parquet(table: &ProfileTable, path: &Path) -> Result<()> {
    log_operation_start("Writing profiles to", path);
    let start = Instant::now();

    let batch = profiles_to_record_batch(table)?;
    let file = safe_create_file(path, "writing the profile artifact")?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}

/// Read a profile artifact back; the OECD average is recomputed
pub fn read_profiles(path: &Path, batch_size: usize) -> Result<ProfileTable> {
    log_operation_start("Reading profiles from", path);
    let start = Instant::now();

    let mut profiles = Vec::new();
    for batch in read_batches(path, batch_size)? {
        let batch = conform_to_artifact_schema(&batch)?;
        let rows: Vec<ProfileRow> = serde_arrow::from_record_batch(&batch)?;
        for row in rows {
            profiles.push(row.into_profile()?);
        }
    }
    if profiles.is_empty() {
        return Err(WellbeingError::EmptyDataset(format!(
            "no profiles in {}",
            path.display()
        )));
    }

    log_operation_complete("read", path, profiles.len(), Some(start.elapsed()));
    Ok(ProfileTable::new(profiles))
}

/// Select and cast the artifact columns of `batch`.
///
/// CSV input arrives as text, so every column is cast to its artifact type.
/// Only `country` and `composite_index` are required; other absent columns
/// are filled with nulls.
fn conform_to_artifact_schema(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = ProfileRow::schema();
    let input = batch.schema();

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let column = match input.index_of(field.name()) {
            Ok(idx) => cast(batch.column(idx), field.data_type())?,
            Err(_) if field.name() == "country" || field.name() == "composite_index" => {
                return Err(WellbeingError::schema(format!(
                    "profile artifact has no '{}' column",
                    field.name()
                )));
            }
            Err(_) => new_null_array(field.data_type(), batch.num_rows()),
        };
        columns.push(column);
    }

    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
