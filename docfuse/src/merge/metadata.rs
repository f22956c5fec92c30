//! Document information dictionary of the merged output.
//!
//! The merged PDF carries:
//! - Title (the artifact base name)
//! - Creator and Producer
//! - Creation and modification dates

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Values written to the output's Info dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Document title.
    pub title: String,
    /// Creator and Producer string.
    pub producer: String,
}

impl DocumentInfo {
    /// Create document info.
    pub fn new(title: impl Into<String>, producer: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            producer: producer.into(),
        }
    }

    /// Write an Info dictionary into `doc` and point the trailer at it.
    ///
    /// Any existing Info reference is replaced.
    pub fn apply(&self, doc: &mut Document) {
        let date = format_pdf_date(Utc::now());

        let mut info = Dictionary::new();
        info.set("Title", text_string(&self.title));
        info.set("Creator", text_string(&self.producer));
        info.set("Producer", text_string(&self.producer));
        info.set("CreationDate", Object::string_literal(date.clone()));
        info.set("ModDate", Object::string_literal(date));

        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    /// Read the title back from a document, if it has one.
    pub fn read_title(doc: &Document) -> Option<String> {
        let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        let info = doc.get_dictionary(info_id).ok()?;
        match info.get(b"Title").ok()? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            _ => None,
        }
    }
}

/// Encode a PDF text string: plain ASCII stays a literal, anything else is
/// written as big-endian UTF-16 with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// PDF date string in UTC: `D:YYYYMMDDHHmmSSZ`.
pub(crate) fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use rstest::rstest;

    fn create_test_document() -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_apply_sets_info() {
        let mut doc = create_test_document();
        DocumentInfo::new("Expediente", "docfuse").apply(&mut doc);

        assert!(doc.trailer.has(b"Info"));
        assert_eq!(DocumentInfo::read_title(&doc).as_deref(), Some("Expediente"));
    }

    #[test]
    fn test_non_ascii_title_round_trips() {
        let mut doc = create_test_document();
        DocumentInfo::new("Año fiscal", "docfuse").apply(&mut doc);
        assert_eq!(DocumentInfo::read_title(&doc).as_deref(), Some("Año fiscal"));
    }

    #[test]
    fn test_read_title_without_info() {
        assert_eq!(DocumentInfo::read_title(&create_test_document()), None);
    }

    #[rstest]
    #[case(0, "D:19700101000000Z")]
    #[case(951_782_400, "D:20000229000000Z")]
    #[case(1_700_000_000, "D:20231114221320Z")]
    fn test_format_pdf_date(#[case] secs: i64, #[case] expected: &str) {
        let time = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
        assert_eq!(format_pdf_date(time), expected);
    }
}
