//! Utilities for path collection and size formatting.

use crate::{Result, error::DocFuseError};
use std::path::PathBuf;

/// Expand input arguments into paths, keeping argument order.
///
/// Each pattern contributes its matches in glob order. A pattern that matches
/// nothing is kept as a literal path, so a mistyped file name surfaces as
/// "file not found" during ingestion instead of vanishing.
///
/// # Errors
///
/// Returns [`DocFuseError::InvalidConfig`] for a malformed pattern and
/// [`DocFuseError::Other`] when a match can't be read.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let paths = collect_paths_for_pattern(pattern.as_ref())?;
        if paths.is_empty() {
            resolved_paths.push(PathBuf::from(pattern.as_ref()));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

/// Matches of one pattern.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./scans/*.jpg"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| {
        DocFuseError::invalid_config(format!("Invalid pattern '{pattern}': {err}"))
    })?;

    for entry in paths {
        let path = entry.map_err(|err| DocFuseError::other(err.to_string()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
