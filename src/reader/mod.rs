//! Reading raw long-format observations.
//!
//! Input files are CSV (with a header row) or Parquet. Both are read into
//! Arrow record batches, filtered down to breakdown totals, and the mapped
//! columns are extracted into `RawRecord`s.

pub mod columns;

use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::PipelineConfig;
use crate::error::util::safe_open_file;
use crate::error::{Result, WellbeingError};
use crate::filter::{BatchFilter, BreakdownFilter};
use crate::models::RawRecord;
use crate::utils::{log_operation_complete, log_operation_start};

pub use columns::ColumnMapping;

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            _ => Err(WellbeingError::io_error(
                "Unsupported file extension, expected .csv or .parquet",
            )
            .with_path(path)),
        }
    }
}

/// Counts describing what happened while reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Rows in the file
    pub rows_read: usize,
    /// Rows removed because a breakdown column was not the total
    pub rows_not_total: usize,
    /// Rows removed because country, indicator, year or value was null
    pub rows_incomplete: usize,
}

/// Raw records extracted from one input file
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub records: Vec<RawRecord>,
    pub stats: ReadStats,
}

/// Read every record batch of a CSV or Parquet file
pub fn read_batches(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => read_csv_batches(path, batch_size),
        FileFormat::Parquet => read_parquet_batches(path, batch_size),
    }
}

/// Read a CSV file with every column typed as nullable UTF-8.
///
/// Column types are resolved later by casting the mapped columns, so a
/// column that mixes numbers and text cannot fail type inference.
pub fn read_csv_batches(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let mut file = safe_open_file(path, "reading CSV data")?;

    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(&mut file, Some(1))?;
    let schema = Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );
    file.seek(SeekFrom::Start(0))?;

    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .with_batch_size(batch_size)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Read all record batches of a Parquet file
pub fn read_parquet_batches(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let file = safe_open_file(path, "reading parquet data")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(batch_size)
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Read raw long-format records from `path`.
///
/// Fails on a missing required column or a file without any row.
pub fn read_raw_records(path: &Path, config: &PipelineConfig) -> Result<RawDataset> {
    log_operation_start("Reading raw records from", path);
    let start = Instant::now();

    let batches = read_batches(path, config.batch_size)?;
    let dataset = records_from_batches(&batches, config)?;

    log_operation_complete("read", path, dataset.records.len(), Some(start.elapsed()));
    Ok(dataset)
}

/// Extract raw records from already loaded record batches
pub fn records_from_batches(batches: &[RecordBatch], config: &PipelineConfig) -> Result<RawDataset> {
    let rows_read: usize = batches.iter().map(RecordBatch::num_rows).sum();
    if rows_read == 0 {
        return Err(WellbeingError::EmptyDataset(
            "input contains no rows".to_string(),
        ));
    }

    let breakdown = BreakdownFilter::new(&config.granularity);
    let mut stats = ReadStats {
        rows_read,
        ..ReadStats::default()
    };
    let mut records = Vec::with_capacity(rows_read);

    for batch in batches {
        let mapping = ColumnMapping::resolve(&batch.schema())?;
        let totals = breakdown.filter(batch)?;
        stats.rows_not_total += batch.num_rows() - totals.num_rows();

        let before = records.len();
        extract_records(&totals, &mapping, &mut records)?;
        stats.rows_incomplete += totals.num_rows() - (records.len() - before);
    }

    if stats.rows_not_total > 0 {
        debug!(
            "Dropped {} rows with demographic breakdowns",
            stats.rows_not_total
        );
    }
    if stats.rows_incomplete > 0 {
        warn!(
            "Dropped {} rows with a missing country, indicator, year or value",
            stats.rows_incomplete
        );
    }

    Ok(RawDataset { records, stats })
}

fn extract_records(
    batch: &RecordBatch,
    mapping: &ColumnMapping,
    out: &mut Vec<RawRecord>,
) -> Result<()> {
    let countries = cast(batch.column(mapping.country), &DataType::Utf8)?;
    let countries = countries.as_string::<i32>();
    let indicators = cast(batch.column(mapping.indicator), &DataType::Utf8)?;
    let indicators = indicators.as_string::<i32>();
    let years = cast(batch.column(mapping.year), &DataType::Float64)?;
    let years = years.as_primitive::<Float64Type>();
    let values = cast(batch.column(mapping.value), &DataType::Float64)?;
    let values = values.as_primitive::<Float64Type>();
    let codes = mapping
        .country_code
        .map(|idx| cast(batch.column(idx), &DataType::Utf8))
        .transpose()?;
    let codes = codes.as_ref().map(|c| c.as_string::<i32>());

    for row in 0..batch.num_rows() {
        if countries.is_null(row)
            || indicators.is_null(row)
            || years.is_null(row)
            || values.is_null(row)
        {
            continue;
        }

        let country = countries.value(row).trim();
        let indicator = indicators.value(row).trim();
        let year = years.value(row);
        let value = values.value(row);
        if country.is_empty() || indicator.is_empty() || !value.is_finite() {
            continue;
        }
        let Some(year) = whole_year(year) else {
            continue;
        };

        let country_code = codes
            .filter(|c| !c.is_null(row))
            .map(|c| c.value(row).trim().to_string())
            .filter(|c| !c.is_empty());

        out.push(RawRecord {
            country: country.to_string(),
            country_code,
            indicator: indicator.to_string(),
            year,
            value,
        });
    }

    Ok(())
}

/// A year cell as `i32`; fractional or out-of-range years are rejected
fn whole_year(year: f64) -> Option<i32> {
    (year.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&year))
        .then_some(year as i32)
}
