//! Incremental construction of the merged output document.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashMap;
use tracing::debug;

use crate::config::{CompressionLevel, MergeOptions};
use crate::error::Result;
use crate::merge::metadata::DocumentInfo;

/// A PDF under construction with a single flat page tree.
///
/// Pages are appended in call order. The `Pages` node and the catalog are only
/// written by [`OutputDocument::finish`], so a builder that is dropped halfway
/// leaves nothing behind.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    shared: HashMap<&'static str, ObjectId>,
}

impl OutputDocument {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            shared: HashMap::new(),
        }
    }

    /// Id reserved for the `Pages` node every page hangs from.
    pub fn pages_id(&self) -> ObjectId {
        self.pages_id
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// First object number that is free for objects brought in from elsewhere.
    pub fn next_object_number(&self) -> u32 {
        self.doc.max_id + 1
    }

    /// Store a new object and return its id.
    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// Store an object once per document under `key`, reusing it afterwards.
    pub fn shared_object(&mut self, key: &'static str, make: impl FnOnce() -> Object) -> ObjectId {
        if let Some(id) = self.shared.get(key) {
            return *id;
        }
        let id = self.doc.add_object(make());
        self.shared.insert(key, id);
        id
    }

    /// Append a new page built from `page`.
    ///
    /// `Type` and `Parent` are filled in.
    pub fn push_page(&mut self, mut page: Dictionary) -> ObjectId {
        page.set("Type", "Page");
        page.set("Parent", self.pages_id);
        let id = self.doc.add_object(page);
        self.kids.push(Object::Reference(id));
        id
    }

    /// Move objects of another document in, then append its pages.
    ///
    /// The objects must already be numbered from
    /// [`next_object_number`](Self::next_object_number) upwards and the pages
    /// must already point at [`pages_id`](Self::pages_id).
    pub fn absorb(
        &mut self,
        objects: impl IntoIterator<Item = (ObjectId, Object)>,
        max_id: u32,
        pages: &[ObjectId],
    ) {
        self.doc.objects.extend(objects);
        self.doc.max_id = self.doc.max_id.max(max_id);
        self.kids.extend(pages.iter().map(|&id| Object::Reference(id)));
    }

    /// Write the page tree, catalog and metadata, then serialize.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn finish(self, info: &DocumentInfo, options: &MergeOptions) -> Result<Vec<u8>> {
        let Self {
            mut doc,
            pages_id,
            kids,
            ..
        } = self;

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        info.apply(&mut doc);

        match options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                let pruned = doc.prune_objects();
                debug!(pruned = pruned.len(), "Pruned unreachable objects");
                doc.compress();
            }
        }

        doc.renumber_objects();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
