//! Merging the document list into a single PDF.
//!
//! Each entry is dispatched on its type:
//! - PDF entries have their pages copied with additive rotation
//! - Image entries become one page sized to the image
//! - Office and text entries become a placeholder page
//!
//! # Examples
//!
//! ```no_run
//! use docfuse::config::{BackendConfig, MergeOptions, OutputName};
//! use docfuse::list::DocumentList;
//! use docfuse::merge::MergePipeline;
//!
//! # async fn example(list: DocumentList) -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = MergePipeline::new(MergeOptions::default(), BackendConfig::default());
//! let artifact = pipeline.merge(&list, &OutputName::resolve("")).await?;
//! println!("{}: {} pages", artifact.file_name, artifact.report.pages);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod fonts;
pub mod image;
pub mod metadata;
pub mod pages;
pub mod pipeline;
pub mod placeholder;

pub use builder::OutputDocument;
pub use metadata::DocumentInfo;
pub use pipeline::{MergeItem, MergePipeline, MergeReport, MergeTask, MergedArtifact};
