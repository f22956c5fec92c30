//! Filesystem boundary: ingesting input files and writing the merged artifact.

pub mod reader;
pub mod writer;

pub use reader::FileReader;
pub use writer::{ArtifactWriter, WriteOptions, WriteStatistics};
