//! Delivering merged artifacts to disk.
//!
//! This module provides safe artifact writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite protection
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use docfuse::io::writer::ArtifactWriter;
//! use docfuse::merge::MergedArtifact;
//! use std::path::Path;
//!
//! # async fn example(artifact: MergedArtifact) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = ArtifactWriter::new();
//! let stats = writer.save(&artifact, Path::new("out")).await?;
//! println!("Wrote {}", stats.output_path.display());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{DocFuseError, Result};
use crate::merge::MergedArtifact;
use crate::utils::format_file_size;

/// Options for writing artifacts.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Replace an existing file at the target path.
    pub overwrite: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            overwrite: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Artifact writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter {
    options: WriteOptions,
}

impl ArtifactWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer that replaces existing files.
    pub fn overwriting() -> Self {
        Self {
            options: WriteOptions {
                overwrite: true,
                ..Default::default()
            },
        }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Save an artifact into `dir` under its own file name.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target exists and overwriting is disabled
    /// - The directory doesn't exist or isn't writable
    /// - Write operation fails
    pub async fn save(&self, artifact: &MergedArtifact, dir: &Path) -> Result<WriteStatistics> {
        let path = dir.join(&artifact.file_name);
        self.save_bytes(artifact.bytes.clone(), &path).await
    }

    /// Write `bytes` to `path` and return statistics about the operation.
    ///
    /// # Errors
    ///
    /// See [`save`](Self::save).
    pub async fn save_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            if !options.overwrite && path_buf.exists() {
                return Err(DocFuseError::OutputExists { path: path_buf });
            }

            if options.atomic {
                let part = PartFile::new(path_buf.with_extension("pdf.part"));
                write_file(&part.path, &bytes, options.buffer_size)?;
                part.persist(&path_buf)
                    .map_err(|e| DocFuseError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    })?;
            } else {
                write_file(&path_buf, &bytes, options.buffer_size)?;
            }

            Ok::<_, DocFuseError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| DocFuseError::other(format!("Write task failed: {e}")))??;

        debug!(path = %stats.output_path.display(), size = stats.file_size, "Wrote artifact");
        Ok(stats)
    }

    /// Check if a file can be written into `dir`.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory doesn't exist
    /// - The directory is not writable
    pub async fn can_write(&self, dir: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(dir).await.map_err(|_| {
            DocFuseError::invalid_config(format!(
                "Output directory does not exist: {}",
                dir.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(DocFuseError::invalid_config(format!(
                "Output path is not a directory: {}",
                dir.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(DocFuseError::invalid_config(format!(
                "Output directory is not writable: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

fn write_file(path: &Path, bytes: &[u8], buffer_size: usize) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| DocFuseError::FailedToCreateOutput {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);
    writer
        .write_all(bytes)
        .and_then(|()| writer.flush())
        .map_err(|e| DocFuseError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Temporary file next to the target; removed on drop unless persisted.
struct PartFile {
    path: PathBuf,
    persisted: bool,
}

impl PartFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    /// Rename onto `target`.
    fn persist(mut self, target: &Path) -> std::io::Result<()> {
        std::fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
