//! Error types for docfuse.
//!
//! Errors fall into two groups:
//!
//! - **Pipeline failures**: anything that goes wrong while a merge is running
//!   (unreadable sources, corrupt or encrypted PDFs, undecodable images, layout
//!   problems). These abort the whole merge and are reported to the user as a
//!   single failure.
//! - **Everything else**: configuration, ingestion and artifact delivery.
//!
//! List operations never produce errors; stale or unknown ids are no-ops.

use std::io;
use std::path::PathBuf;

/// Result type alias for docfuse operations.
pub type Result<T> = std::result::Result<T, DocFuseError>;

/// Message shown to the user when a merge fails for any reason.
pub const PIPELINE_FAILURE_MESSAGE: &str =
    "Error al fusionar los documentos. Revisa los archivos e inténtalo de nuevo.";

/// Main error type for docfuse operations.
#[derive(Debug, thiserror::Error)]
pub enum DocFuseError {
    /// Input file was not found during ingestion.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The bytes behind an entry could not be read.
    #[error("Failed to read '{name}'\n  Reason: {source}")]
    ReadSource {
        /// Display name of the entry.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A PDF entry could not be parsed.
    #[error("Failed to load PDF '{name}'\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Display name of the entry.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A PDF entry is encrypted.
    #[error(
        "PDF '{name}' is encrypted and cannot be merged\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Display name of the entry.
        name: String,
    },

    /// An image entry could not be decoded.
    #[error("Failed to embed image '{name}'\n  Reason: {reason}")]
    ImageDecode {
        /// Display name of the entry.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Page construction failed (fonts, content streams, page tree).
    #[error("Failed to lay out page: {reason}")]
    Layout {
        /// Description of what went wrong.
        reason: String,
    },

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The document list is empty.
    #[error("No documents to merge")]
    NothingToMerge,

    /// A merge was requested while another one is still running.
    #[error("A merge is already in progress")]
    MergeInProgress,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output name",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for DocFuseError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl DocFuseError {
    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create an ImageDecode error.
    pub fn image_decode(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageDecode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a Layout error.
    pub fn layout(reason: impl Into<String>) -> Self {
        Self::Layout {
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the single "pipeline failure" class.
    ///
    /// Pipeline failures abort the merge without producing output and leave
    /// the document list untouched.
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(
            self,
            Self::ReadSource { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::ImageDecode { .. }
                | Self::Layout { .. }
                | Self::MergeFailed { .. }
        )
    }

    /// The message to show the user.
    ///
    /// Every pipeline failure maps to the same message; other errors use
    /// their display text.
    pub fn user_message(&self) -> String {
        if self.is_pipeline_failure() {
            PIPELINE_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::ReadSource { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::ImageDecode { .. } => 3,
            Self::Layout { .. } => 6,
            Self::MergeFailed { .. } => 6,
            Self::NothingToMerge => 1,
            Self::MergeInProgress => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
