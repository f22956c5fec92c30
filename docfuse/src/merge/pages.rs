//! Copying pages out of source PDFs.
//!
//! This module handles:
//! - Loading a PDF entry and rejecting encrypted files
//! - Materializing inherited page attributes before re-parenting
//! - Additive rotation (intrinsic page rotation + entry rotation)

use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::document::Rotation;
use crate::error::{DocFuseError, Result};
use crate::merge::builder::OutputDocument;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Parse PDF bytes.
///
/// # Errors
///
/// Returns [`DocFuseError::FailedToLoadPdf`] for unparsable input and
/// [`DocFuseError::EncryptedPdf`] for encrypted documents.
pub fn load_pdf(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        let message = e.to_string();
        if message.to_lowercase().contains("encrypt") || message.contains("password") {
            DocFuseError::encrypted_pdf(name)
        } else {
            DocFuseError::failed_to_load_pdf(name, message)
        }
    })?;

    if doc.is_encrypted() {
        return Err(DocFuseError::encrypted_pdf(name));
    }

    Ok(doc)
}

/// Append every page of a PDF entry to `out`, in the source's page order.
///
/// Each copied page gets `Rotate = (effective page rotation + rotation) mod
/// 360`. Returns the number of pages appended.
///
/// # Errors
///
/// Fails if the bytes cannot be loaded or a page object is malformed.
pub fn append_pdf(
    out: &mut OutputDocument,
    name: &str,
    bytes: &[u8],
    rotation: Rotation,
) -> Result<usize> {
    let mut source = load_pdf(name, bytes)?;

    // Renumber objects to avoid ID conflicts
    source.renumber_objects_with(out.next_object_number());

    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    if page_ids.is_empty() {
        warn!(name, "PDF has no pages");
    }

    // A page object may appear more than once in `Kids`; adjust it once.
    let mut adjusted = HashSet::new();
    for &page_id in &page_ids {
        if !adjusted.insert(page_id) {
            continue;
        }
        let inherited = inherited_attributes(&source, page_id);
        let intrinsic = effective_rotation(&source, page_id, &inherited);

        let page = source
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| DocFuseError::failed_to_load_pdf(name, format!("Invalid page: {e}")))?;

        for (key, value) in inherited {
            page.set(key, value);
        }

        let degrees = (intrinsic + rotation.as_degrees()).rem_euclid(360);
        page.set("Rotate", degrees);
        page.set("Parent", out.pages_id());
    }

    debug!(name, pages = page_ids.len(), "Copied PDF pages");

    let max_id = source.max_id;
    let objects = source
        .objects
        .into_iter()
        .filter(|(_, object)| !is_tree_node(object));
    out.absorb(objects, max_id, &page_ids);

    Ok(page_ids.len())
}

/// Collect inheritable attributes that `page_id` lacks but an ancestor sets.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        if missing.is_empty() {
            break;
        }
        let Some(node) = parent.and_then(|id| doc.get_dictionary(id).ok()) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}

/// Rotation the page displays with before any user rotation.
fn effective_rotation(doc: &Document, page_id: ObjectId, inherited: &[(&[u8], Object)]) -> i64 {
    let own = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Rotate").ok());
    let value = own.or_else(|| {
        inherited
            .iter()
            .find(|(key, _)| *key == b"Rotate")
            .map(|(_, value)| value)
    });

    value
        .map(|value| resolve(doc, value))
        .and_then(|value| match value {
            Object::Integer(degrees) => Some(*degrees),
            Object::Real(degrees) => Some(*degrees as i64),
            _ => None,
        })
        .unwrap_or(0)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Catalog and intermediate page tree nodes of a source document.
fn is_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Catalog" || name == b"Pages")
}
