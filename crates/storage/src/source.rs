//! Retrieval interface.

use crate::RetrievalResult;
use async_trait::async_trait;
use bytes::Bytes;
use lake_common::{DataCategory, SnapshotEntry};

/// Where snapshot files come from.
///
/// Paths are relative keys such as `temperature/2022-02-14 18.npy`.
/// Listings may come back in any order.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw bytes of one snapshot file.
    async fn fetch_binary(&self, path: &str) -> RetrievalResult<Bytes>;

    /// List the snapshots published for a category.
    async fn list_available(&self, category: DataCategory) -> RetrievalResult<Vec<SnapshotEntry>>;

    /// Human-readable description used in logs.
    fn describe(&self) -> String;
}
