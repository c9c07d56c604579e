//! Column name resolution for raw input files.
//!
//! Accepts both the plain long format (`country`, `indicator`, `year`,
//! `value`) and the OECD SDMX export headers.

use arrow_schema::Schema;

use crate::error::{Result, WellbeingError};

const COUNTRY_ALIASES: &[&str] = &["country", "Country"];
const CODE_ALIASES: &[&str] = &["country_code", "REF_AREA"];
const INDICATOR_ALIASES: &[&str] = &["indicator", "Measure", "measure"];
const YEAR_ALIASES: &[&str] = &["year", "Year", "TIME_PERIOD"];
const VALUE_ALIASES: &[&str] = &["value", "OBS_VALUE", "Value"];

/// Indices of the mapped columns in a record batch schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub country: usize,
    pub country_code: Option<usize>,
    pub indicator: usize,
    pub year: usize,
    pub value: usize,
}

impl ColumnMapping {
    /// Resolve the mapped columns of `schema`
    pub fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            country: required(schema, "country", COUNTRY_ALIASES)?,
            country_code: find(schema, CODE_ALIASES),
            indicator: required(schema, "indicator", INDICATOR_ALIASES)?,
            year: required(schema, "year", YEAR_ALIASES)?,
            value: required(schema, "value", VALUE_ALIASES)?,
        })
    }
}

fn find(schema: &Schema, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|name| schema.index_of(name).ok())
}

fn required(schema: &Schema, role: &str, aliases: &[&str]) -> Result<usize> {
    find(schema, aliases).ok_or_else(|| {
        let available: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        WellbeingError::schema(format!(
            "no {role} column (expected one of {aliases:?}); found {available:?}"
        ))
    })
}
