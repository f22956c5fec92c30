//! Shared helpers for integration tests.
//!
//! Inputs are fabricated in memory: PDFs with `lopdf`, images with `image`.

#![allow(dead_code)]

use docfuse::config::BackendConfig;
use docfuse::document::{IdGenerator, SourceFile};
use docfuse::session::Session;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Build a PDF with one US Letter page per entry of `rotations`.
pub fn pdf_bytes(rotations: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for degrees in rotations {
        let content = doc.add_object(Stream::new(Dictionary::new(), b"0 0 m 10 10 l S".to_vec()));
        let page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Rotate" => *degrees,
            "Contents" => content,
        });
        kids.push(page.into());
    }

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

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize test PDF");
    bytes
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut bytes, format)
        .expect("Failed to encode test image");
    bytes.into_inner()
}

/// PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

/// In-memory source file.
pub fn source(name: &str, bytes: Vec<u8>) -> SourceFile {
    SourceFile::from_bytes(name, bytes, None)
}

/// Session with predictable ids (`e1`, `e2`, ...).
pub fn session() -> Session {
    Session::new(BackendConfig::default()).with_id_generator(IdGenerator::sequential("e"))
}

/// Load a merged artifact.
pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("Merged output is not a valid PDF")
}

/// Effective `Rotate` of every page, in page order.
pub fn page_rotations(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .values()
        .map(|id| {
            doc.get_dictionary(*id)
                .ok()
                .and_then(|page| page.get(b"Rotate").ok())
                .and_then(|value| value.as_i64().ok())
                .unwrap_or(0)
        })
        .collect()
}

/// Width and height of every page's MediaBox, in page order.
pub fn page_sizes(doc: &Document) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .map(|id| {
            let media_box = doc
                .get_dictionary(*id)
                .and_then(|page| page.get(b"MediaBox"))
                .and_then(Object::as_array)
                .expect("Page without MediaBox");
            let coord = |i: usize| media_box[i].as_float().expect("Non-numeric MediaBox");
            (coord(2) - coord(0), coord(3) - coord(1))
        })
        .collect()
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test input");
    path
}
