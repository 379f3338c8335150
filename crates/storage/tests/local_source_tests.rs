//! Tests for the local directory snapshot source.

use lake_common::DataCategory;
use std::fs;
use std::path::Path;
use storage::{LocalSnapshotSource, RetrievalError, SnapshotSource};
use tempfile::TempDir;
use test_utils::npy_f64_rows;

fn write(root: &Path, key: &str, bytes: &[u8]) {
    let path = root.join(key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn populated() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let file = npy_f64_rows(&[vec![10.0, 11.0], vec![12.0, 13.0]]);
    write(dir.path(), "temperature/2022-02-14 06.npy", &file);
    write(dir.path(), "temperature/2022-02-14 18.npy", &file);
    write(dir.path(), "temperature/notes.txt", b"not a snapshot");
    write(dir.path(), "temperature/latest.npy", &file);
    dir
}

#[tokio::test]
async fn test_list_skips_foreign_and_unparseable_files() {
    let dir = populated();
    let source = LocalSnapshotSource::new(dir.path());

    let mut paths: Vec<String> = source
        .list_available(DataCategory::Temperature)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.path)
        .collect();
    paths.sort();

    assert_eq!(
        paths,
        vec!["temperature/2022-02-14 06.npy", "temperature/2022-02-14 18.npy"]
    );
}

#[tokio::test]
async fn test_missing_category_lists_empty() {
    let dir = populated();
    let source = LocalSnapshotSource::new(dir.path());
    assert!(source.list_available(DataCategory::Flow).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_binary_returns_file_bytes() {
    let dir = populated();
    let source = LocalSnapshotSource::new(dir.path());
    let bytes = source.fetch_binary("temperature/2022-02-14 18.npy").await.unwrap();
    assert_eq!(&bytes[..6], b"\x93NUMPY");
}

#[tokio::test]
async fn test_fetch_missing_is_not_found() {
    let dir = populated();
    let source = LocalSnapshotSource::new(dir.path());
    let err = source.fetch_binary("flow/2022-02-14 18.npy").await.unwrap_err();
    assert!(matches!(err, RetrievalError::NotFound(_)));
}

#[tokio::test]
async fn test_fetch_refuses_paths_outside_root() {
    let dir = populated();
    let source = LocalSnapshotSource::new(dir.path().join("temperature"));
    let err = source.fetch_binary("../temperature/2022-02-14 18.npy").await.unwrap_err();
    assert!(matches!(err, RetrievalError::NotFound(_)));
}
