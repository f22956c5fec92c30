//! Output formatting and display for docfuse.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Error and warning display
//! - The document list and merge summaries
//! - Quiet and verbose modes

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, Verbosity};

use crate::document::DocumentEntry;
use crate::list::DocumentList;
use crate::merge::MergeReport;
use crate::utils::format_file_size;

/// One-line description of an entry: name, type, size and rotation.
pub fn describe_entry(entry: &DocumentEntry) -> String {
    let mut line = format!(
        "{} ({}, {})",
        entry.name(),
        entry.doc_type(),
        format_file_size(entry.size_bytes())
    );
    let degrees = entry.rotation().as_degrees();
    if degrees != 0 {
        line.push_str(&format!(", rotated {degrees}°"));
    }
    line
}

/// Display the list in merge order.
pub fn display_documents(formatter: &OutputFormatter, list: &DocumentList) {
    for (index, entry) in list.iter().enumerate() {
        formatter.list_item(index + 1, &describe_entry(entry));
    }
}

/// Display a merge summary.
///
/// The one-line summary is always printed (unless quiet); the breakdown by
/// entry type only in verbose mode.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.info(&format!(
        "Merged {} document(s) into {} pages in {:.2}s",
        report.entries,
        report.pages,
        report.elapsed_ms as f64 / 1000.0
    ));

    if report.placeholder_entries > 0 {
        formatter.warning(&format!(
            "{} document(s) could not be converted and were replaced by a placeholder page",
            report.placeholder_entries
        ));
    }

    if formatter.is_verbose() {
        formatter.section("Statistics");
        formatter.detail("PDF documents", &report.pdf_entries.to_string());
        formatter.detail("Images", &report.image_entries.to_string());
        formatter.detail("Placeholders", &report.placeholder_entries.to_string());
        formatter.detail("Input size", &report.format_input_size());
        formatter.detail("Output size", &report.format_output_size());
    }
}
