//! Country-granularity filtering
//!
//! Raw OECD exports mix country totals with demographic breakdowns and
//! aggregate areas. Breakdown rows are removed on the Arrow record batches
//! while reading; aggregate areas are recognised on the extracted records.

use std::collections::HashSet;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray};
use arrow::compute::{cast, filter as arrow_filter};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::config::GranularityConfig;
use crate::error::{Result, WellbeingError};
use crate::models::RawRecord;

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(WellbeingError::schema(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names this filter looks at
    fn required_columns(&self) -> HashSet<String>;
}

/// Keeps rows whose breakdown columns all hold the total label.
///
/// Breakdown columns absent from a batch are ignored, so data that was
/// already aggregated to totals passes unchanged. Null cells count as totals.
#[derive(Debug, Clone)]
pub struct BreakdownFilter {
    columns: Vec<String>,
    total_label: String,
}

impl BreakdownFilter {
    #[must_use]
    pub fn new(granularity: &GranularityConfig) -> Self {
        Self {
            columns: granularity.breakdown_columns.clone(),
            total_label: granularity.total_label.clone(),
        }
    }

    /// Compute the keep-mask for `batch`
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let mut keep = vec![true; batch.num_rows()];
        let schema = batch.schema();

        for name in &self.columns {
            let Ok(idx) = schema.index_of(name) else {
                continue;
            };
            let column = cast(batch.column(idx), &DataType::Utf8)?;
            let values = column.as_string::<i32>();
            for (row, flag) in keep.iter_mut().enumerate() {
                if *flag && !values.is_null(row) && values.value(row).trim() != self.total_label {
                    *flag = false;
                }
            }
        }

        Ok(BooleanArray::from(keep))
    }
}

impl BatchFilter for BreakdownFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.mask(batch)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.columns.iter().cloned().collect()
    }
}

/// Why a record is not a country-level observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonCountryReason {
    /// Name or code is a configured aggregate area
    Aggregate,
    /// Code is not a 3-letter ISO code (regions, groupings)
    NonIsoCode,
}

/// Classify a record against the granularity rules
#[must_use]
pub fn classify_area(record: &RawRecord, granularity: &GranularityConfig) -> Option<NonCountryReason> {
    let matches_aggregate = |value: &str| {
        granularity
            .aggregate_areas
            .iter()
            .any(|area| area.eq_ignore_ascii_case(value.trim()))
    };

    if matches_aggregate(record.country.as_str())
        || record.country_code.as_deref().is_some_and(matches_aggregate)
    {
        return Some(NonCountryReason::Aggregate);
    }

    if granularity.require_iso3_codes {
        if let Some(code) = record.country_code.as_deref() {
            if !is_iso3(code) {
                return Some(NonCountryReason::NonIsoCode);
            }
        }
    }

    None
}

/// Whether a record describes a whole country
#[must_use]
pub fn is_country_level(record: &RawRecord, granularity: &GranularityConfig) -> bool {
    classify_area(record, granularity).is_none()
}

fn is_iso3(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
