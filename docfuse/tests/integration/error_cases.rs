//! Failure paths: aborted merges, rejected requests and missing inputs.

use docfuse::config::{BackendConfig, MergeOptions, OutputName};
use docfuse::error::{DocFuseError, PIPELINE_FAILURE_MESSAGE};
use docfuse::session::Session;
use rstest::rstest;
use std::path::PathBuf;

use crate::common::{pdf_bytes, png_bytes, session, source};

#[rstest]
#[case::corrupt_pdf("broken.pdf", b"this is not a pdf".to_vec())]
#[case::corrupt_image("broken.png", b"\x89PNG truncated".to_vec())]
#[case::jpeg_name_png_bytes("mislabeled.jpg", png_bytes(4, 4))]
#[tokio::test]
async fn test_bad_entry_aborts_merge_and_keeps_list(#[case] name: &str, #[case] bytes: Vec<u8>) {
    let mut session = session();
    let ids = session.ingest([
        source("good.pdf", pdf_bytes(&[0])),
        source(name, bytes),
        source("notes.txt", Vec::new()),
    ]);
    session.list_mut().toggle_select(&ids[0]);
    session.list_mut().rotate(&ids[2]);

    let err = session.merge(&OutputName::default()).await.unwrap_err();

    assert!(err.is_pipeline_failure(), "{err:?}");
    assert_eq!(err.user_message(), PIPELINE_FAILURE_MESSAGE);
    assert_eq!(session.list().ids(), ids);
    assert!(session.list().is_selected(&ids[0]));
    assert_eq!(session.list().get(&ids[2]).unwrap().rotation().as_degrees(), 90);
    assert!(!session.is_merging());
}

#[tokio::test]
async fn test_retry_after_fixing_the_list_succeeds() {
    let mut session = session();
    let ids = session.ingest([
        source("good.pdf", pdf_bytes(&[0])),
        source("broken.pdf", b"garbage".to_vec()),
    ]);

    assert!(session.merge(&OutputName::default()).await.is_err());

    session.list_mut().delete(&ids[1]);
    let artifact = session.merge(&OutputName::default()).await.unwrap();
    assert_eq!(artifact.report.pages, 1);
}

#[tokio::test]
async fn test_empty_session_has_nothing_to_merge() {
    let session = session();
    let err = session.merge(&OutputName::default()).await.unwrap_err();

    assert!(matches!(err, DocFuseError::NothingToMerge));
    assert!(!err.is_pipeline_failure());
}

#[tokio::test]
async fn test_merge_rejected_while_another_is_pending() {
    let mut session = session();
    session.ingest([source("a.txt", Vec::new())]);

    let pending = session.start_merge(&OutputName::default()).unwrap();
    let err = session.merge(&OutputName::default()).await.unwrap_err();
    assert!(matches!(err, DocFuseError::MergeInProgress));

    pending.run().await.unwrap();
    assert!(session.merge(&OutputName::default()).await.is_ok());
}

#[tokio::test]
async fn test_invalid_options_fail_before_reading() {
    let options = MergeOptions {
        workers: 0,
        ..MergeOptions::default()
    };
    let mut session = Session::with_options(options, BackendConfig::default());
    session.ingest([source("a.pdf", pdf_bytes(&[0]))]);

    let err = session.merge(&OutputName::default()).await.unwrap_err();
    assert!(matches!(err, DocFuseError::InvalidConfig { .. }));
    assert!(!session.is_merging());
}

#[tokio::test]
async fn test_missing_input_reports_path() {
    let mut session = session();
    let missing = PathBuf::from("/nonexistent/docfuse/missing.pdf");

    let err = session.ingest_paths(&[missing.clone()]).await.unwrap_err();

    match &err {
        DocFuseError::FileNotFound { path } => assert_eq!(path, &missing),
        other => panic!("Unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
    assert!(session.list().is_empty());
}

#[tokio::test]
async fn test_configured_backend_still_produces_placeholders() {
    let mut session = Session::new(BackendConfig::new(Some("http://localhost:3000".to_string())));
    session.ingest([source("deck.pptx", Vec::new())]);

    let artifact = session.merge(&OutputName::default()).await.unwrap();
    assert_eq!(artifact.report.placeholder_entries, 1);
}
