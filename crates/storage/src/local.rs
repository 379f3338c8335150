//! Snapshots from a local directory tree.

use crate::{RetrievalError, RetrievalResult, SnapshotSource};
use async_trait::async_trait;
use bytes::Bytes;
use lake_common::{DataCategory, SnapshotEntry};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Reads `<root>/<category>/<YYYY-MM-DD HH>.npy`.
#[derive(Debug, Clone)]
pub struct LocalSnapshotSource {
    root: PathBuf,
}

impl LocalSnapshotSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative key, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> RetrievalResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir)
        });
        if escapes {
            return Err(RetrievalError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl SnapshotSource for LocalSnapshotSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch_binary(&self, path: &str) -> RetrievalResult<Bytes> {
        let full = self.resolve(path)?;
        match fs::read(&full).await {
            Ok(data) => {
                debug!(size = data.len(), "Read snapshot file");
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RetrievalError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn list_available(&self, category: DataCategory) -> RetrievalResult<Vec<SnapshotEntry>> {
        let dir = self.root.join(category.path_prefix());
        let mut reader = match fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Category directory missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(item) = reader.next_entry().await? {
            let name = item.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(".npy") {
                continue;
            }
            let key = format!("{}/{}", category.path_prefix(), name);
            match SnapshotEntry::from_path(&key) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(file = %key, error = %e, "Skipping file with unparseable name"),
            }
        }

        debug!(count = entries.len(), "Listed local snapshots");
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("local:{}", self.root.display())
    }
}
