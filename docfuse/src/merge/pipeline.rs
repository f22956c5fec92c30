//! The merge pipeline.
//!
//! A merge runs in two phases:
//!
//! 1. **Load**: the byte sources of all PDF and image entries are read
//!    concurrently, bounded by [`MergeOptions::workers`]. Results come back in
//!    list order.
//! 2. **Build**: on a blocking task, every entry is appended to one output
//!    document strictly in list order, dispatching on its type.
//!
//! Any error in either phase aborts the whole merge. Nothing is written back
//! to the list, so a failed attempt can simply be retried.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info};

use crate::config::{BackendConfig, MergeOptions, OutputName};
use crate::document::{ByteSource, DocType, DocumentEntry, Rotation};
use crate::error::{DocFuseError, Result};
use crate::list::DocumentList;
use crate::merge::builder::OutputDocument;
use crate::merge::image::append_image;
use crate::merge::metadata::DocumentInfo;
use crate::merge::pages::append_pdf;
use crate::merge::placeholder::append_placeholder;
use crate::utils::format_file_size;

/// Snapshot of one entry taken when the merge starts.
#[derive(Debug, Clone)]
pub struct MergeItem {
    /// Original file name.
    pub name: String,
    /// Type assigned at ingestion.
    pub doc_type: DocType,
    /// MIME hint, used to pick the image encoding.
    pub mime: Option<String>,
    /// Rotation at the time the merge started.
    pub rotation: Rotation,
    /// Size of the original file.
    pub size: u64,
    source: ByteSource,
}

impl MergeItem {
    fn from_entry(entry: &DocumentEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            doc_type: entry.doc_type(),
            mime: entry.mime().map(str::to_string),
            rotation: entry.rotation(),
            size: entry.size_bytes(),
            source: entry.source().clone(),
        }
    }

    /// Whether the entry's bytes are needed. Placeholder entries are never read.
    pub fn needs_content(&self) -> bool {
        matches!(self.doc_type, DocType::Pdf | DocType::Image)
    }

    async fn load(&self) -> Result<Option<Arc<[u8]>>> {
        if !self.needs_content() {
            return Ok(None);
        }

        let bytes = self
            .source
            .read()
            .await
            .map_err(|source| DocFuseError::ReadSource {
                name: self.name.clone(),
                source,
            })?;
        debug!(name = %self.name, bytes = bytes.len(), "Loaded entry content");
        Ok(Some(bytes))
    }
}

/// Summary of a finished merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Number of entries merged.
    pub entries: usize,
    /// Pages in the output.
    pub pages: usize,
    /// Entries whose pages were copied from a PDF.
    pub pdf_entries: usize,
    /// Entries embedded as image pages.
    pub image_entries: usize,
    /// Entries replaced by a placeholder page.
    pub placeholder_entries: usize,
    /// Combined size of all entries.
    pub input_size: u64,
    /// Size of the serialized output.
    pub output_size: u64,
    /// Wall time of the whole merge in milliseconds.
    pub elapsed_ms: u64,
}

impl MergeReport {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// The downloadable result of a merge.
#[derive(Debug, Clone)]
pub struct MergedArtifact {
    /// File name including the `.pdf` extension.
    pub file_name: String,
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// What went into the artifact.
    pub report: MergeReport,
}

/// Turns the ordered document list into one PDF.
///
/// Only one merge may be in flight per pipeline. The gate is taken by
/// [`start`](Self::start) and held by the returned [`MergeTask`] until it
/// finishes or is dropped.
#[derive(Debug, Clone)]
pub struct MergePipeline {
    options: MergeOptions,
    backend: BackendConfig,
    in_flight: Arc<AtomicBool>,
}

impl MergePipeline {
    /// Create a pipeline.
    pub fn new(options: MergeOptions, backend: BackendConfig) -> Self {
        Self {
            options,
            backend,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Options applied to every merge.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// The configured conversion backend.
    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// Replace the conversion backend setting.
    pub fn set_backend(&mut self, backend: BackendConfig) {
        self.backend = backend;
    }

    /// Whether a merge is in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot `list` and take the in-flight gate.
    ///
    /// # Errors
    ///
    /// - [`DocFuseError::MergeInProgress`] if another merge holds the gate
    /// - [`DocFuseError::NothingToMerge`] if the list is empty
    /// - [`DocFuseError::InvalidConfig`] if the options are invalid
    pub fn start(&self, list: &DocumentList, output: &OutputName) -> Result<MergeTask> {
        let guard = InFlightGuard::acquire(&self.in_flight).ok_or(DocFuseError::MergeInProgress)?;

        if list.is_empty() {
            return Err(DocFuseError::NothingToMerge);
        }
        self.options.validate()?;

        Ok(MergeTask {
            items: list.iter().map(MergeItem::from_entry).collect(),
            output: output.clone(),
            options: self.options.clone(),
            backend: self.backend.clone(),
            _guard: guard,
        })
    }

    /// Merge `list` in its current order.
    ///
    /// Shorthand for [`start`](Self::start) followed by [`MergeTask::run`].
    pub async fn merge(&self, list: &DocumentList, output: &OutputName) -> Result<MergedArtifact> {
        self.start(list, output)?.run().await
    }
}

/// A merge that has been started but not yet run.
///
/// Holds a snapshot of the list, so the list itself may be dropped or
/// changed while the task runs.
#[derive(Debug)]
pub struct MergeTask {
    items: Vec<MergeItem>,
    output: OutputName,
    options: MergeOptions,
    backend: BackendConfig,
    _guard: InFlightGuard,
}

impl MergeTask {
    /// Entries to merge, in output order.
    pub fn items(&self) -> &[MergeItem] {
        &self.items
    }

    /// Name of the artifact being produced.
    pub fn output(&self) -> &OutputName {
        &self.output
    }

    /// Load every entry and build the output document.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline failure encountered. No partial output is
    /// produced.
    pub async fn run(self) -> Result<MergedArtifact> {
        let started = Instant::now();
        let Self {
            items,
            output,
            options,
            backend,
            _guard,
        } = self;

        info!(
            entries = items.len(),
            output = %output.file_name(),
            "Starting merge"
        );
        if let Some(url) = &backend.url {
            debug!(url, "Conversion backend is not contacted; using placeholder pages");
        }

        let contents: Vec<Option<Arc<[u8]>>> = stream::iter(items.iter().map(MergeItem::load))
            .buffered(options.workers.max(1))
            .try_collect()
            .await?;

        let info = DocumentInfo::new(output.base(), options.producer.as_str());
        let (bytes, mut report) =
            task::spawn_blocking(move || build_document(&items, &contents, &info, &options))
                .await
                .map_err(|e| DocFuseError::merge_failed(format!("Merge task failed: {e}")))??;

        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            pages = report.pages,
            size = %report.format_output_size(),
            elapsed_ms = report.elapsed_ms,
            "Merge finished"
        );

        Ok(MergedArtifact {
            file_name: output.file_name(),
            bytes,
            report,
        })
    }
}

/// Append every item in order and serialize the result.
fn build_document(
    items: &[MergeItem],
    contents: &[Option<Arc<[u8]>>],
    info: &DocumentInfo,
    options: &MergeOptions,
) -> Result<(Vec<u8>, MergeReport)> {
    let mut out = OutputDocument::new();
    let mut report = MergeReport {
        entries: items.len(),
        input_size: items.iter().map(|item| item.size).sum(),
        ..Default::default()
    };

    for (item, content) in items.iter().zip(contents) {
        let before = out.page_count();

        match (item.doc_type, content.as_deref()) {
            (DocType::Pdf, Some(bytes)) => {
                append_pdf(&mut out, &item.name, bytes, item.rotation)?;
                report.pdf_entries += 1;
            }
            (DocType::Image, Some(bytes)) => {
                append_image(&mut out, &item.name, item.mime.as_deref(), bytes, item.rotation)?;
                report.image_entries += 1;
            }
            (DocType::Office | DocType::Text, _) => {
                append_placeholder(&mut out, &item.name)?;
                report.placeholder_entries += 1;
            }
            (doc_type, None) => {
                return Err(DocFuseError::merge_failed(format!(
                    "No content loaded for {doc_type} entry '{}'",
                    item.name
                )));
            }
        }

        debug!(
            name = %item.name,
            doc_type = %item.doc_type,
            rotation = item.rotation.as_degrees(),
            pages = out.page_count() - before,
            "Appended entry"
        );
    }

    report.pages = out.page_count();
    let bytes = out.finish(info, options)?;
    report.output_size = bytes.len() as u64;

    Ok((bytes, report))
}

/// Holds the in-flight flag while a merge is pending or running.
#[derive(Debug)]
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
