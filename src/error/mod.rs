//! Error handling for the wellbeing pipeline.
//!
//! Only structurally invalid input surfaces as an error. Missing values,
//! zero-variance indicators and out-of-range projections are resolved locally
//! and recorded in the relevant report instead.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow_schema::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the wellbeing pipeline
#[derive(Debug, thiserror::Error)]
pub enum WellbeingError {
    /// Error opening, reading or writing a file
    #[error("IO error: {message}{}", path_suffix(.path))]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<io::Error>,
    },

    /// Error reading or building Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting between rows and record batches
    #[error("Conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// Error decoding a JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the expected shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Nothing left to normalize
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// An indicator of the configured set has no observation at all
    #[error("Indicator '{measure}' ({dimension}) has no observations")]
    MissingIndicator { measure: String, dimension: String },

    /// The requested country is not part of the profile table
    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    /// The requested dimension name is not one of the ten dimensions
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A delta could not be parsed or is not finite
    #[error("Invalid delta: {0}")]
    InvalidDelta(String),

    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl WellbeingError {
    /// Create an IO error without an underlying source
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an IO error wrapping the underlying `io::Error`
    pub fn io_error_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: Some(source),
        }
    }

    /// Attach a path to an IO error. Other variants are returned unchanged.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io {
                message, source, ..
            } => Self::Io {
                message,
                path: Some(path.into()),
                source,
            },
            other => other,
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<io::Error> for WellbeingError {
    fn from(error: io::Error) -> Self {
        Self::io_error_with_source(error.to_string(), error)
    }
}

/// Result type for wellbeing pipeline operations
pub type Result<T> = std::result::Result<T, WellbeingError>;
