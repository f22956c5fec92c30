//! One editing session: the document list and everything that acts on it.
//!
//! A [`Session`] is what a front end holds for its whole lifetime. It turns
//! ingested files into entries, exposes the list operations, routes drag
//! gestures and starts merges.
//!
//! # Examples
//!
//! ```no_run
//! use docfuse::config::{BackendConfig, OutputName};
//! use docfuse::document::SourceFile;
//! use docfuse::session::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(BackendConfig::default());
//! let ids = session.ingest([
//!     SourceFile::from_bytes("a.pdf", std::fs::read("a.pdf")?, None),
//!     SourceFile::from_bytes("notes.txt", b"hola".to_vec(), None),
//! ]);
//! session.list_mut().rotate(&ids[0]);
//!
//! let artifact = session.merge(&OutputName::resolve("")).await?;
//! println!("{} ({} pages)", artifact.file_name, artifact.report.pages);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{BackendConfig, MergeOptions, OutputName};
use crate::document::{DocumentEntry, EntryId, IdGenerator, PreviewRegistry, SourceFile};
use crate::drag::{DragController, DragOutcome};
use crate::error::Result;
use crate::io::FileReader;
use crate::list::DocumentList;
use crate::merge::{MergePipeline, MergeTask, MergedArtifact};

/// Owns the document list for the lifetime of an application.
#[derive(Debug)]
pub struct Session {
    list: DocumentList,
    drag: DragController,
    previews: PreviewRegistry,
    ids: IdGenerator,
    pipeline: MergePipeline,
}

impl Session {
    /// Start an empty session with default merge options.
    pub fn new(backend: BackendConfig) -> Self {
        Self::with_options(MergeOptions::default(), backend)
    }

    /// Start an empty session.
    pub fn with_options(options: MergeOptions, backend: BackendConfig) -> Self {
        if let Some(url) = &backend.url {
            info!(url, "Conversion backend configured");
        }

        Self {
            list: DocumentList::new(),
            drag: DragController::new(),
            previews: PreviewRegistry::new(),
            ids: IdGenerator::new(),
            pipeline: MergePipeline::new(options, backend),
        }
    }

    /// Use `ids` for entries ingested from now on.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// The document list.
    pub fn list(&self) -> &DocumentList {
        &self.list
    }

    /// The document list, for reorder, rotate, delete and select operations.
    pub fn list_mut(&mut self) -> &mut DocumentList {
        &mut self.list
    }

    /// Registry holding the previews of image entries.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// The configured conversion backend.
    pub fn backend(&self) -> &BackendConfig {
        self.pipeline.backend()
    }

    /// Replace the conversion backend setting.
    pub fn set_backend(&mut self, backend: BackendConfig) {
        self.pipeline.set_backend(backend);
    }

    /// Turn files into entries and append them in the order given.
    ///
    /// Returns the ids of the new entries.
    pub fn ingest(&mut self, files: impl IntoIterator<Item = SourceFile>) -> Vec<EntryId> {
        let entries: Vec<DocumentEntry> = files
            .into_iter()
            .map(|file| DocumentEntry::new(self.ids.next_id(), file, &self.previews))
            .collect();
        let ids: Vec<EntryId> = entries.iter().map(|e| e.id().clone()).collect();

        let added = self.list.append(entries);
        debug!(added, total = self.list.len(), "Ingested files");
        ids
    }

    /// Ingest files from disk.
    ///
    /// All paths are checked before anything is appended, so a missing file
    /// leaves the list unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first path that can't be ingested.
    pub async fn ingest_paths(&mut self, paths: &[PathBuf]) -> Result<Vec<EntryId>> {
        let files = FileReader::new().ingest_all(paths).await?;
        Ok(self.ingest(files))
    }

    /// Begin dragging `id`.
    pub fn drag_start(&mut self, id: EntryId) {
        self.drag.drag_start(id);
    }

    /// Finish a drag, reordering the list.
    pub fn drag_end(&mut self, active: &EntryId, over: Option<&EntryId>) -> DragOutcome {
        self.drag.drag_end(&mut self.list, active, over)
    }

    /// Abort the current drag.
    pub fn drag_cancel(&mut self) {
        self.drag.drag_cancel();
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Whether a merge is pending or running.
    pub fn is_merging(&self) -> bool {
        self.pipeline.is_running()
    }

    /// Snapshot the list and take the merge gate.
    ///
    /// The returned task can run while the session keeps serving list
    /// operations; it works on the snapshot.
    ///
    /// # Errors
    ///
    /// See [`MergePipeline::start`].
    pub fn start_merge(&self, output: &OutputName) -> Result<MergeTask> {
        self.pipeline.start(&self.list, output)
    }

    /// Merge the list in its current order.
    ///
    /// On failure the list and selection are exactly as before the call.
    pub async fn merge(&self, output: &OutputName) -> Result<MergedArtifact> {
        self.pipeline.merge(&self.list, output).await
    }

    /// Release every preview and empty the list.
    ///
    /// Returns how many previews were released.
    pub fn teardown(&mut self) -> usize {
        self.drag.drag_cancel();
        let released = self.previews.release_all();
        self.list.clear_all();
        debug!(released, "Session torn down");
        released
    }
}
