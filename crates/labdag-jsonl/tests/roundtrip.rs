//! Integration tests for writing and reading JSONL files on disk.

use labdag_jsonl::{read_jsonl, write_jsonl_atomic, write_jsonl_atomic_iter, Error};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Record {
    id: u32,
    name: String,
    tags: Vec<String>,
    due: Option<String>,
}

fn record(id: u32, name: &str) -> Record {
    Record {
        id,
        name: name.to_string(),
        tags: vec![],
        due: None,
    }
}

#[rstest]
#[case::plain(record(1, "Plasmid1"))]
#[case::special_chars(record(2, "Line1\nLine2\t\"quoted\"\\"))]
#[case::unicode(record(3, "Zellkultur \u{00fc} \u{4e16}\u{754c}"))]
#[case::empty_name(record(4, ""))]
#[case::with_fields(Record { id: 5, name: "Primer".to_string(), tags: vec!["pcr".to_string()], due: Some("2024-02-01".to_string()) })]
#[tokio::test]
async fn file_roundtrip_preserves_record(#[case] original: Record) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.jsonl");

    write_jsonl_atomic(&path, std::slice::from_ref(&original))
        .await
        .unwrap();
    let read_back: Vec<Record> = read_jsonl(&path).await.unwrap();

    assert_eq!(read_back, vec![original]);
}

#[tokio::test]
async fn atomic_write_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.jsonl");

    write_jsonl_atomic(&path, &[record(1, "old"), record(2, "old")])
        .await
        .unwrap();
    write_jsonl_atomic_iter(&path, (10..13).map(|id| record(id, "new")))
        .await
        .unwrap();

    let read_back: Vec<Record> = read_jsonl(&path).await.unwrap();
    assert_eq!(read_back.len(), 3);
    assert!(read_back.iter().all(|r| r.name == "new"));
    assert!(!dir.path().join("records.jsonl.tmp").exists());
}

#[tokio::test]
async fn failed_write_leaves_target_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.jsonl");
    write_jsonl_atomic(&path, &[record(1, "kept")]).await.unwrap();

    // Map keys must be strings in JSON, so this value cannot serialize.
    let mut bad = std::collections::HashMap::new();
    bad.insert(vec![1u8], 1u8);
    let result = write_jsonl_atomic(&path, &[bad]).await;
    assert!(matches!(result, Err(Error::Json(_))));

    let read_back: Vec<Record> = read_jsonl(&path).await.unwrap();
    assert_eq!(read_back, vec![record(1, "kept")]);
    assert!(!dir.path().join("records.jsonl.tmp").exists());
}

#[tokio::test]
async fn read_reports_first_bad_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.jsonl");
    let good = serde_json::to_string(&record(1, "ok")).unwrap();
    tokio::fs::write(&path, format!("{good}\n\n{{\"id\": \"x\"}}\n{good}\n"))
        .await
        .unwrap();

    let err = read_jsonl::<Record, _>(&path).await.unwrap_err();
    assert_eq!(err.line_number(), Some(3));
}

#[tokio::test]
async fn read_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_jsonl::<Record, _>(dir.path().join("absent.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
