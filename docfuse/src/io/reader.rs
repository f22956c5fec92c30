//! Ingesting files from the filesystem.
//!
//! Only metadata is touched at ingestion time. Content stays on disk behind a
//! [`ByteSource::Path`] and is read when a merge needs it.
//!
//! # Examples
//!
//! ```no_run
//! use docfuse::io::reader::FileReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = FileReader::new();
//! let files = reader
//!     .ingest_all(&[PathBuf::from("a.pdf"), PathBuf::from("scan.jpg")])
//!     .await?;
//! assert_eq!(files.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::document::{ByteSource, SourceFile, guess_mime};
use crate::error::{DocFuseError, Result};

/// Builds [`SourceFile`]s from paths.
#[derive(Debug, Clone, Default)]
pub struct FileReader;

impl FileReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Ingest one file.
    ///
    /// The display name is the final path component, the size comes from the
    /// file metadata and the MIME hint is guessed from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The path is a directory
    /// - Metadata can't be read
    pub async fn ingest(&self, path: &Path) -> Result<SourceFile> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DocFuseError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => DocFuseError::Io(e),
        })?;

        if !metadata.is_file() {
            return Err(DocFuseError::invalid_config(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = guess_mime(&name).map(str::to_string);
        debug!(name, size = metadata.len(), ?mime, "Ingested file");

        Ok(SourceFile {
            name,
            size: metadata.len(),
            mime,
            source: ByteSource::Path(path.to_path_buf()),
        })
    }

    /// Ingest several files, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that can't be ingested.
    pub async fn ingest_all(&self, paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(self.ingest(path).await?);
        }
        Ok(files)
    }
}
