//! Uploaded documents and their metadata.
//!
//! A [`DocumentEntry`] is created once per ingested [`SourceFile`]. Its type is
//! derived from the file name at ingestion and never changes; the only mutable
//! state is the user-chosen [`Rotation`].

pub mod classify;
pub mod id;
pub mod preview;

pub use classify::{classify, guess_mime};
pub use id::IdGenerator;
pub use preview::{PreviewHandle, PreviewRegistry};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Kind of document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// `.pdf`
    Pdf,
    /// `.png`, `.jpg`, `.jpeg`, `.webp`
    Image,
    /// Word, Excel and PowerPoint documents.
    Office,
    /// Anything else.
    Text,
}

impl DocType {
    /// Lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Office => "office",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen clockwise rotation of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise.
    Clockwise270,
}

impl Rotation {
    /// The next rotation step, wrapping 270 back to 0.
    pub fn advance(self) -> Self {
        match self {
            Self::None => Self::Clockwise90,
            Self::Clockwise90 => Self::Rotate180,
            Self::Rotate180 => Self::Clockwise270,
            Self::Clockwise270 => Self::None,
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// Parse a rotation from degrees.
    ///
    /// Any multiple of 90 is accepted and normalized into `0..360`, so `-90`
    /// and `450` map to 270 and 90. Other values return `None`.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Clockwise90),
            180 => Some(Self::Rotate180),
            270 => Some(Self::Clockwise270),
            _ => None,
        }
    }
}

/// Stable handle of an entry, unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wrap an existing token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where the bytes of an uploaded file live.
///
/// Bytes are read-only once set. In-memory bytes are shared by reference
/// count so a merge can read them without copying or borrowing the list.
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// Content already held in memory.
    Memory(Arc<[u8]>),
    /// Content read lazily from the filesystem.
    Path(PathBuf),
}

impl ByteSource {
    /// Read the full content.
    pub async fn read(&self) -> io::Result<Arc<[u8]>> {
        match self {
            Self::Memory(bytes) => Ok(Arc::clone(bytes)),
            Self::Path(path) => tokio::fs::read(path).await.map(Arc::from),
        }
    }
}

/// A raw file as handed over at the ingestion boundary.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type reported by the uploader, if any.
    pub mime: Option<String>,
    /// The file content.
    pub source: ByteSource,
}

impl SourceFile {
    /// Build a source file from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>, mime: Option<&str>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime: mime.map(str::to_string),
            source: ByteSource::Memory(Arc::from(bytes)),
        }
    }
}

/// One document in the list.
///
/// Entries are deliberately not `Clone`: each one exclusively owns its byte
/// source and preview handle, and dropping the entry releases the preview.
#[derive(Debug)]
pub struct DocumentEntry {
    id: EntryId,
    name: String,
    size_bytes: u64,
    doc_type: DocType,
    mime: Option<String>,
    source: ByteSource,
    preview: Option<PreviewHandle>,
    rotation: Rotation,
}

impl DocumentEntry {
    /// Create an entry from an ingested file.
    ///
    /// The type is classified from the file name. Image entries get a preview
    /// handle from `previews`.
    pub fn new(id: EntryId, file: SourceFile, previews: &PreviewRegistry) -> Self {
        let doc_type = classify(&file.name);
        let preview = (doc_type == DocType::Image).then(|| previews.create(&file.source));

        Self {
            id,
            name: file.name,
            size_bytes: file.size,
            doc_type,
            mime: file.mime,
            source: file.source,
            preview,
            rotation: Rotation::None,
        }
    }

    /// Stable id of this entry.
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the original file in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Type assigned at ingestion.
    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    /// MIME hint supplied at ingestion.
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// The content of this entry.
    pub fn source(&self) -> &ByteSource {
        &self.source
    }

    /// Preview resource, present only for images.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// Current user rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub(crate) fn rotate(&mut self) {
        self.rotation = self.rotation.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_rotation_wraps_after_four_steps() {
        let mut rotation = Rotation::None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            rotation = rotation.advance();
            seen.push(rotation.as_degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
        assert_eq!(rotation, Rotation::None);
    }

    #[rstest]
    #[case(0, Some(Rotation::None))]
    #[case(90, Some(Rotation::Clockwise90))]
    #[case(180, Some(Rotation::Rotate180))]
    #[case(270, Some(Rotation::Clockwise270))]
    #[case(360, Some(Rotation::None))]
    #[case(450, Some(Rotation::Clockwise90))]
    #[case(-90, Some(Rotation::Clockwise270))]
    #[case(45, None)]
    fn test_rotation_from_degrees(#[case] degrees: i64, #[case] expected: Option<Rotation>) {
        assert_eq!(Rotation::from_degrees(degrees), expected);
    }

    #[test]
    fn test_entry_classifies_on_creation() {
        let previews = PreviewRegistry::new();
        let entry = DocumentEntry::new(
            EntryId::new("a"),
            SourceFile::from_bytes("Informe.DOCX", b"fake".to_vec(), None),
            &previews,
        );

        assert_eq!(entry.doc_type(), DocType::Office);
        assert_eq!(entry.size_bytes(), 4);
        assert_eq!(entry.rotation(), Rotation::None);
        assert!(entry.preview().is_none());
    }

    #[test]
    fn test_image_entry_owns_preview() {
        let previews = PreviewRegistry::new();
        let entry = DocumentEntry::new(
            EntryId::new("img"),
            SourceFile::from_bytes("photo.png", vec![1, 2, 3], Some("image/png")),
            &previews,
        );

        assert!(entry.preview().is_some());
        assert_eq!(previews.live_count(), 1);

        drop(entry);
        assert_eq!(previews.live_count(), 0);
        assert_eq!(previews.released_count(), 1);
    }

    #[test]
    fn test_rotate_entry() {
        let previews = PreviewRegistry::new();
        let mut entry = DocumentEntry::new(
            EntryId::new("a"),
            SourceFile::from_bytes("a.pdf", Vec::new(), None),
            &previews,
        );
        entry.rotate();
        entry.rotate();
        assert_eq!(entry.rotation().as_degrees(), 180);
    }

    #[tokio::test]
    async fn test_memory_source_read() {
        let file = SourceFile::from_bytes("a.txt", b"hello".to_vec(), Some("text/plain"));
        let bytes = file.source.read().await.unwrap();
        assert_eq!(&*bytes, b"hello");
    }

    #[tokio::test]
    async fn test_missing_path_source_fails() {
        let source = ByteSource::Path(PathBuf::from("/nonexistent/docfuse/file.pdf"));
        assert!(source.read().await.is_err());
    }
}
