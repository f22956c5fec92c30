//! docfuse - Assemble PDFs, images and office documents into one PDF.
//!
//! This library provides the core of a document assembly tool:
//!
//! - An ordered document list with selection and group-aware reordering
//! - A two-phase drag gesture controller on top of the list
//! - A merge pipeline that copies PDF pages, embeds images and inserts
//!   placeholder pages for documents it cannot convert
//! - Filesystem ingestion and artifact delivery
//!
//! # Examples
//!
//! ## Building and merging a list
//!
//! ```no_run
//! use docfuse::config::{BackendConfig, OutputName};
//! use docfuse::io::ArtifactWriter;
//! use docfuse::list::Direction;
//! use docfuse::session::Session;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(BackendConfig::default());
//! let ids = session
//!     .ingest_paths(&[PathBuf::from("cover.pdf"), PathBuf::from("scan.jpg")])
//!     .await?;
//!
//! session.list_mut().rotate(&ids[1]);
//! session.list_mut().move_entry(&ids[1], Direction::Up);
//!
//! let artifact = session.merge(&OutputName::resolve("informe")).await?;
//! ArtifactWriter::new().save(&artifact, Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Group moves
//!
//! ```
//! use docfuse::document::{DocumentEntry, EntryId, PreviewRegistry, SourceFile};
//! use docfuse::list::{Direction, DocumentList};
//!
//! let previews = PreviewRegistry::new();
//! let mut list = DocumentList::new();
//! list.append(["B", "A", "C"].map(|id| {
//!     DocumentEntry::new(
//!         EntryId::new(id),
//!         SourceFile::from_bytes(format!("{id}.pdf"), Vec::new(), None),
//!         &previews,
//!     )
//! }));
//!
//! list.toggle_select(&EntryId::new("A"));
//! list.toggle_select(&EntryId::new("C"));
//! list.move_entry(&EntryId::new("A"), Direction::Up);
//!
//! let order: Vec<String> = list.ids().iter().map(|id| id.to_string()).collect();
//! assert_eq!(order, ["A", "C", "B"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod drag;
pub mod error;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::{BackendConfig, MergeOptions, OutputName};
pub use document::{DocType, DocumentEntry, EntryId, Rotation, SourceFile};
pub use error::{DocFuseError, Result};
pub use list::DocumentList;
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
