//! docfuse - Assemble PDFs, images and office documents into one PDF.
//!
//! Command-line front end: ingests files from disk, applies rotations, runs
//! the merge and writes the artifact into a directory.

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use std::process;
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use docfuse::config::{BackendConfig, CompressionLevel, MergeOptions, OutputName};
use docfuse::document::{EntryId, Rotation};
use docfuse::error::DocFuseError;
use docfuse::io::ArtifactWriter;
use docfuse::output::{OutputFormatter, display_documents, display_merge_report};
use docfuse::session::Session;
use docfuse::utils::collect_paths_for_patterns;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        let (message, code) = match err.downcast_ref::<DocFuseError>() {
            Some(inner) => (inner.user_message(), inner.exit_code()),
            None => (format!("{err:#}"), 1),
        };
        debug!(error = %format!("{err:#}"), "Run failed");
        eprintln!("Error: {message}");
        process::exit(code);
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A `--rotate` request: 1-based input position and rotation to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RotateRequest {
    position: usize,
    rotation: Rotation,
}

impl FromStr for RotateRequest {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        let (position, degrees) = value
            .split_once('=')
            .with_context(|| format!("Invalid rotation '{value}': expected POS=DEG"))?;

        let position: usize = position
            .trim()
            .parse()
            .with_context(|| format!("Invalid position in rotation '{value}'"))?;
        if position == 0 {
            bail!("Invalid rotation '{value}': positions start at 1");
        }

        let degrees: i64 = degrees
            .trim()
            .parse()
            .with_context(|| format!("Invalid degrees in rotation '{value}'"))?;
        let rotation = Rotation::from_degrees(degrees).with_context(|| {
            format!("Invalid rotation '{value}': degrees must be a multiple of 90")
        })?;

        Ok(Self { position, rotation })
    }
}

impl RotateRequest {
    /// Number of clockwise quarter turns.
    fn steps(&self) -> i64 {
        self.rotation.as_degrees() / 90
    }
}

fn merge_options(cli: &Cli) -> anyhow::Result<MergeOptions> {
    let defaults = MergeOptions::default();
    Ok(MergeOptions {
        compression: CompressionLevel::from_str(&cli.compression)?,
        workers: cli.jobs.unwrap_or(defaults.workers),
        ..defaults
    })
}

/// Rotate ingested entries; positions index into `ids`.
fn apply_rotations(
    session: &mut Session,
    ids: &[EntryId],
    requests: &[RotateRequest],
) -> anyhow::Result<()> {
    for request in requests {
        let index = request.position.checked_sub(1);
        let id = index.and_then(|i| ids.get(i)).with_context(|| {
            format!(
                "No input at position {} ({} input(s) given)",
                request.position,
                ids.len()
            )
        })?;
        for _ in 0..request.steps() {
            session.list_mut().rotate(id);
        }
    }
    Ok(())
}

/// Main application logic.
async fn run(cli: Cli) -> anyhow::Result<()> {
    cli.validate().map_err(DocFuseError::invalid_config)?;

    let formatter = OutputFormatter::new(cli.is_silent(), cli.verbose);
    let options = merge_options(&cli)?;
    let requests = cli
        .rotate
        .iter()
        .map(|value| value.parse::<RotateRequest>())
        .collect::<anyhow::Result<Vec<_>>>()?;
    let output = OutputName::resolve(cli.output.as_deref().unwrap_or_default());
    let target = cli.output_dir.join(output.file_name());

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", docfuse::NAME, docfuse::VERSION));
        formatter.blank_line();
    }

    let paths = collect_paths_for_patterns(&cli.inputs)?;
    let mut session = Session::with_options(options, BackendConfig::new(cli.backend_url.clone()));
    let ids = session.ingest_paths(&paths).await?;
    apply_rotations(&mut session, &ids, &requests)?;

    if formatter.should_print() {
        formatter.info(&format!("{} document(s) to merge:", session.list().len()));
        display_documents(&formatter, session.list());
        formatter.blank_line();
    }

    let writer = if cli.force {
        ArtifactWriter::overwriting()
    } else {
        ArtifactWriter::new()
    };
    writer.can_write(&cli.output_dir).await?;

    if !cli.force && writer.exists(&target).await {
        return Err(DocFuseError::OutputExists { path: target }.into());
    }

    if cli.dry_run {
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", target.display()));
        formatter.info("  Run without --dry-run to create the merged PDF");
        return Ok(());
    }

    formatter.info("Merging documents...");
    let artifact = session.merge(&output).await?;
    let stats = writer.save(&artifact, &cli.output_dir).await?;

    if cli.json {
        let report = serde_json::to_string_pretty(&artifact.report)
            .context("Failed to serialize merge report")?;
        println!("{report}");
    } else if formatter.should_print() {
        display_merge_report(&formatter, &artifact.report);
        formatter.success(&format!(
            "Successfully created {} ({})",
            stats.output_path.display(),
            stats.format_file_size()
        ));
    }

    session.teardown();
    Ok(())
}
