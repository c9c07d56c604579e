//! Utility functions for error handling
//!
//! File helpers that attach the path and the purpose of the operation to
//! any failure, so pipeline diagnostics point at the offending file.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, WellbeingError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(
            WellbeingError::io_error(format!("File not found, needed for: {purpose}"))
                .with_path(path),
        );
    }

    if !path.is_file() {
        return Err(
            WellbeingError::io_error(format!("Path is not a file, expected one for: {purpose}"))
                .with_path(path),
        );
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        WellbeingError::io_error_with_source(context, e).with_path(path)
    })
}

/// Create (or truncate) a file for writing, creating missing parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            WellbeingError::io_error_with_source(
                format!("Failed to create output directory for: {purpose}"),
                e,
            )
            .with_path(parent)
        })?;
    }

    fs::File::create(path).map_err(|e| {
        WellbeingError::io_error_with_source(format!("Failed to create file for: {purpose}"), e)
            .with_path(path)
    })
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    match io::Read::read_to_string(&mut file, &mut content) {
        Ok(_) => Ok(content),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file content for: {purpose}"),
            };
            Err(WellbeingError::io_error_with_source(context, e).with_path(path))
        }
    }
}
