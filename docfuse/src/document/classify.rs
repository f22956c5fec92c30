//! File type classification by extension.
//!
//! Classification only looks at the file name suffix, case-insensitively.
//! It cannot fail: anything unrecognized is treated as text.

use super::DocType;

const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "xls", "xlsx", "ppt", "pptx"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Lowercased extension of a file name (text after the last dot).
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Classify a file by its name.
///
/// # Examples
///
/// ```
/// use docfuse::document::{classify, DocType};
///
/// assert_eq!(classify("scan.JPG"), DocType::Image);
/// assert_eq!(classify("notes"), DocType::Text);
/// ```
pub fn classify(name: &str) -> DocType {
    let Some(ext) = extension(name) else {
        return DocType::Text;
    };
    let ext = ext.as_str();

    if OFFICE_EXTENSIONS.contains(&ext) {
        DocType::Office
    } else if IMAGE_EXTENSIONS.contains(&ext) {
        DocType::Image
    } else if PDF_EXTENSIONS.contains(&ext) {
        DocType::Pdf
    } else {
        DocType::Text
    }
}

/// Best-effort MIME type for a file name, used when the uploader gives none.
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let mime = match extension(name)?.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}
