//! Logging and progress helpers shared by the pipeline and the CLI

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file that was operated on
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} items from {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        );
    } else {
        log::info!(
            "Successfully {} {} items from {}",
            operation,
            items,
            path.display()
        );
    }
}

/// Spinner for the named stages of a pipeline run.
///
/// Falls back to a hidden bar when the template cannot be parsed, so
/// progress reporting never aborts a run.
#[must_use]
pub fn stage_spinner(stages: u64) -> ProgressBar {
    let pb = ProgressBar::new(stages);
    match ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
    {
        Ok(style) => pb.set_style(style),
        Err(e) => {
            log::debug!("Progress template rejected: {e}");
            pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Round `value` to `decimals` places; `None` returns it unchanged
#[must_use]
pub fn round_to(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) => {
            let factor = 10f64.powi(d as i32);
            (value * factor).round() / factor
        }
        None => value,
    }
}
