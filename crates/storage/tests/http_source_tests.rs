//! Tests for the HTTP snapshot source against a canned local server.

use lake_common::DataCategory;
use std::net::SocketAddr;
use storage::{HttpSnapshotSource, HttpSourceConfig, RetrievalError, SnapshotSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult>
  <IsTruncated>false</IsTruncated>
  <Contents><Key>temperature/2022-02-14 06.npy</Key></Contents>
  <Contents><Key>temperature/2022-02-14 18.npy</Key></Contents>
  <Contents><Key>temperature/README</Key></Contents>
</ListBucketResult>"#;

/// Serve one canned response per connection based on the request target.
async fn spawn_bucket() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let target = request.split_whitespace().nth(1).unwrap_or("").to_string();

                let (status, body): (&str, Vec<u8>) = if target.contains("list-type=2") {
                    ("200 OK", LISTING.as_bytes().to_vec())
                } else if target == "/bucket/temperature/2022-02-14%2018.npy" {
                    ("200 OK", test_utils::npy_f64_rows(&[vec![1.0, 2.0]]))
                } else if target.contains("forbidden") {
                    ("403 Forbidden", Vec::new())
                } else {
                    ("404 Not Found", Vec::new())
                };

                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn source(addr: SocketAddr) -> HttpSnapshotSource {
    HttpSnapshotSource::new(&HttpSourceConfig {
        base_url: format!("http://{}/bucket", addr),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_binary_over_http() {
    let source = source(spawn_bucket().await);
    let bytes = source.fetch_binary("temperature/2022-02-14 18.npy").await.unwrap();
    let tensor = npy_parser::decode(bytes).unwrap();
    assert_eq!(tensor.shape(), &[1, 2]);
}

#[tokio::test]
async fn test_http_status_errors() {
    let source = source(spawn_bucket().await);

    let err = source.fetch_binary("temperature/2000-01-01 00.npy").await.unwrap_err();
    assert!(matches!(err, RetrievalError::NotFound(_)));

    let err = source.fetch_binary("forbidden.npy").await.unwrap_err();
    assert!(matches!(err, RetrievalError::Status { status: 403, .. }));
}

#[tokio::test]
async fn test_list_available_over_http() {
    let source = source(spawn_bucket().await);
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
