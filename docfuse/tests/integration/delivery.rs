//! Ingesting from disk and writing the artifact back.

use docfuse::config::OutputName;
use docfuse::error::DocFuseError;
use docfuse::io::ArtifactWriter;
use docfuse::utils::collect_paths_for_patterns;
use tempfile::TempDir;

use crate::common::{load, page_sizes, pdf_bytes, png_bytes, session, write_file};

#[tokio::test]
async fn test_ingest_merge_and_save() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths = vec![
        write_file(input.path(), "cover.pdf", &pdf_bytes(&[0])),
        write_file(input.path(), "chart.png", &png_bytes(20, 10)),
        write_file(input.path(), "minutes.docx", b"PK"),
    ];

    let mut session = session();
    let ids = session.ingest_paths(&paths).await.unwrap();
    assert_eq!(ids.len(), 3);
    assert_eq!(session.previews().live_count(), 1);

    let artifact = session.merge(&OutputName::resolve("informe.pdf")).await.unwrap();
    let stats = ArtifactWriter::new().save(&artifact, output.path()).await.unwrap();

    assert_eq!(stats.output_path, output.path().join("informe.pdf"));
    assert_eq!(stats.file_size, artifact.bytes.len() as u64);

    let saved = std::fs::read(&stats.output_path).unwrap();
    assert_eq!(
        page_sizes(&load(&saved)),
        vec![(612.0, 792.0), (20.0, 10.0), (595.0, 842.0)]
    );
}

#[tokio::test]
async fn test_second_save_does_not_clobber_first() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let paths = vec![write_file(input.path(), "a.pdf", &pdf_bytes(&[0]))];

    let mut session = session();
    session.ingest_paths(&paths).await.unwrap();
    let artifact = session.merge(&OutputName::default()).await.unwrap();

    let writer = ArtifactWriter::new();
    writer.save(&artifact, output.path()).await.unwrap();
    let err = writer.save(&artifact, output.path()).await.unwrap_err();

    assert!(matches!(err, DocFuseError::OutputExists { .. }));
    assert!(output.path().join("documento_fusionado.pdf").exists());
}

#[tokio::test]
async fn test_glob_expansion_feeds_ingestion_in_sorted_order() {
    let input = TempDir::new().unwrap();
    write_file(input.path(), "02.pdf", &pdf_bytes(&[0]));
    write_file(input.path(), "01.pdf", &pdf_bytes(&[90]));
    write_file(input.path(), "skip.txt", b"x");

    let pattern = input.path().join("*.pdf").to_string_lossy().into_owned();
    let paths = collect_paths_for_patterns([pattern]).unwrap();

    let mut session = session();
    session.ingest_paths(&paths).await.unwrap();

    let names: Vec<&str> = session.list().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["01.pdf", "02.pdf"]);
}

#[tokio::test]
async fn test_files_are_read_at_merge_time() {
    let input = TempDir::new().unwrap();
    let path = write_file(input.path(), "late.pdf", &pdf_bytes(&[0]));

    let mut session = session();
    session.ingest_paths(&[path.clone()]).await.unwrap();
    std::fs::write(&path, pdf_bytes(&[0, 0, 0])).unwrap();

    let artifact = session.merge(&OutputName::default()).await.unwrap();
    assert_eq!(artifact.report.pages, 3);
}
