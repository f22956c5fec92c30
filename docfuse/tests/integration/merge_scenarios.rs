//! End-to-end merges of mixed lists.

use docfuse::config::OutputName;
use docfuse::merge::DocumentInfo;
use lopdf::Object;

use crate::common::{jpeg_bytes, load, page_rotations, page_sizes, pdf_bytes, png_bytes, session, source};

#[tokio::test]
async fn test_rotation_adds_to_existing_page_rotation() {
    let mut session = session();
    let ids = session.ingest([source("a.pdf", pdf_bytes(&[90]))]);
    session.list_mut().rotate(&ids[0]);
    session.list_mut().rotate(&ids[0]);

    let artifact = session.merge(&OutputName::default()).await.unwrap();

    assert_eq!(page_rotations(&load(&artifact.bytes)), vec![270]);
}

#[tokio::test]
async fn test_text_file_becomes_one_a4_placeholder_page() {
    let mut session = session();
    session.ingest([source("report.txt", b"quarterly numbers".to_vec())]);

    let artifact = session.merge(&OutputName::default()).await.unwrap();
    let doc = load(&artifact.bytes);

    assert_eq!(page_sizes(&doc), vec![(595.0, 842.0)]);
    let page_id = *doc.get_pages().values().next().unwrap();
    let shown: Vec<Vec<u8>> = doc
        .get_and_decode_page_content(page_id)
        .unwrap()
        .operations
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first()?.as_str().ok().map(<[u8]>::to_vec))
        .collect();
    assert!(shown.contains(&b"report.txt".to_vec()));

    assert_eq!(artifact.report.placeholder_entries, 1);
    assert_eq!(artifact.report.pages, 1);
}

#[tokio::test]
async fn test_mixed_list_pages_follow_list_order() {
    let mut session = session();
    session.ingest([
        source("slides.pptx", Vec::new()),
        source("two.pdf", pdf_bytes(&[0, 0])),
        source("photo.png", png_bytes(40, 30)),
        source("notes.md", Vec::new()),
    ]);

    let artifact = session.merge(&OutputName::resolve("bundle")).await.unwrap();
    let doc = load(&artifact.bytes);

    assert_eq!(
        page_sizes(&doc),
        vec![
            (595.0, 842.0),
            (612.0, 792.0),
            (612.0, 792.0),
            (40.0, 30.0),
            (595.0, 842.0),
        ]
    );
    assert_eq!(artifact.file_name, "bundle.pdf");
    assert_eq!(DocumentInfo::read_title(&doc).as_deref(), Some("bundle"));

    let report = &artifact.report;
    assert_eq!(report.entries, 4);
    assert_eq!(report.pdf_entries, 1);
    assert_eq!(report.image_entries, 1);
    assert_eq!(report.placeholder_entries, 2);
    assert_eq!(report.output_size, artifact.bytes.len() as u64);
}

#[tokio::test]
async fn test_jpeg_is_embedded_without_reencoding() {
    let jpeg = jpeg_bytes(16, 8);
    let mut session = session();
    let ids = session.ingest([source("scan.jpg", jpeg.clone())]);
    session.list_mut().rotate(&ids[0]);

    let artifact = session.merge(&OutputName::default()).await.unwrap();
    let doc = load(&artifact.bytes);

    assert_eq!(page_sizes(&doc), vec![(16.0, 8.0)]);
    assert_eq!(page_rotations(&doc), vec![90]);

    let embedded = doc
        .objects
        .values()
        .filter_map(|object| match object {
            Object::Stream(stream) => Some(stream),
            _ => None,
        })
        .find(|stream| {
            stream
                .dict
                .get(b"Filter")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"DCTDecode")
        })
        .expect("No JPEG stream in output");
    assert_eq!(embedded.content, jpeg);
}

#[tokio::test]
async fn test_rotating_four_times_is_a_no_op() {
    let mut session = session();
    let ids = session.ingest([source("a.pdf", pdf_bytes(&[180]))]);
    for _ in 0..4 {
        session.list_mut().rotate(&ids[0]);
    }

    let artifact = session.merge(&OutputName::default()).await.unwrap();

    assert_eq!(page_rotations(&load(&artifact.bytes)), vec![180]);
}

#[tokio::test]
async fn test_list_edits_after_start_do_not_affect_running_merge() {
    let mut session = session();
    let ids = session.ingest([source("a.pdf", pdf_bytes(&[0])), source("b.txt", Vec::new())]);

    let task = session.start_merge(&OutputName::default()).unwrap();
    session.list_mut().rotate(&ids[0]);
    session.list_mut().delete(&ids[1]);

    let artifact = task.run().await.unwrap();
    let doc = load(&artifact.bytes);

    assert_eq!(page_rotations(&doc), vec![0, 0]);
    assert_eq!(artifact.report.entries, 2);
    assert!(!session.is_merging());
}
