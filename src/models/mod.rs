//! Domain models for the wellbeing dataset
//!
//! Raw long-format observations come in as `RawRecord`s; the pipeline turns
//! them into one immutable `CountryProfile` per country, collected in a
//! `ProfileTable` together with the derived `OecdAverage`.

pub mod profile;
pub mod record;
pub mod scores;
pub mod table;

pub use profile::{CountryProfile, OecdAverage};
pub use record::RawRecord;
pub use scores::DimensionScores;
pub use table::ProfileTable;
