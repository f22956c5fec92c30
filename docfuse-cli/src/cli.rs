//! Command-line interface definition for docfuse.
//!
//! Kept free of library types so `build.rs` can include it to render the
//! man page.

use clap::Parser;
use std::path::PathBuf;

/// Compression levels accepted by `--compression`.
pub const COMPRESSION_LEVELS: [&str; 3] = ["none", "standard", "maximum"];

/// Assemble PDFs, images and office documents into one PDF.
///
/// Inputs are merged in the order given. PDF pages are copied as they are,
/// images become one page each at their native size, and any other document
/// is represented by a placeholder page carrying its file name.
#[derive(Parser, Debug)]
#[command(name = "docfuse")]
#[command(version)]
#[command(about = "Assemble PDFs, images and office documents into one PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files or glob patterns, in merge order
    ///
    /// Examples:
    ///   docfuse cover.pdf scans/*.jpg minutes.docx
    ///   docfuse "chapters/*.pdf" -o book
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Base name of the merged document
    ///
    /// The `.pdf` extension is added automatically. Defaults to
    /// `documento_fusionado`.
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory the merged document is written to
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Rotate the input at a position clockwise (e.g. "2=90")
    ///
    /// Positions are 1-based and count inputs after glob expansion. The
    /// rotation is added to whatever rotation the page already has. May be
    /// repeated.
    #[arg(short, long, value_name = "POS=DEG")]
    pub rotate: Vec<String>,

    /// URL of a document conversion service
    ///
    /// Recorded for the session. Office and text documents still merge as
    /// placeholder pages.
    #[arg(long, value_name = "URL", env = "DOCFUSE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Compression level for the output PDF
    ///
    /// - none: streams are written uncompressed
    /// - standard: streams are Flate-compressed (default)
    /// - maximum: also drops unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = COMPRESSION_LEVELS)]
    pub compression: String,

    /// Number of inputs read concurrently
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Overwrite the output file if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// List what would be merged without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the merge report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Show per-document details and merge statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Checks that need no I/O and no library types.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.inputs.is_empty() {
            return Err("No input files specified".to_string());
        }

        if self.jobs == Some(0) {
            return Err("Number of jobs must be at least 1".to_string());
        }

        if !COMPRESSION_LEVELS.contains(&self.compression.as_str()) {
            return Err(format!("Invalid compression level: {}", self.compression));
        }

        if let Some(value) = self.rotate.iter().find(|value| !value.contains('=')) {
            return Err(format!("Invalid rotation '{value}': expected POS=DEG"));
        }

        Ok(())
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,docfuse=debug"
        } else {
            "warn"
        }
    }

    /// Whether human-readable status lines should be suppressed.
    pub fn is_silent(&self) -> bool {
        self.quiet || self.json
    }
}
