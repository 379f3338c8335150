//! Fetch, decode and post-process snapshots into a dataset status.

use crate::{RetrievalError, RetrievalResult, SnapshotSource};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use lake_common::time::sort_newest_first;
use lake_common::{DataCategory, DatasetStatus, LakeError, LakeResult, Snapshot, SnapshotEntry};
use metrics::counter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Result of a [`SnapshotLoader::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The load is the most recent request; its status should be shown.
    Current(DatasetStatus<Snapshot>),
    /// A later request started before this one finished.
    Superseded,
}

impl LoadOutcome {
    pub fn into_status(self) -> Option<DatasetStatus<Snapshot>> {
        match self {
            LoadOutcome::Current(status) => Some(status),
            LoadOutcome::Superseded => None,
        }
    }
}

/// Loads snapshots from a [`SnapshotSource`].
///
/// Every call to [`load`](Self::load) or [`load_at`](Self::load_at) takes a
/// new generation number. When a
/// load finishes after a newer one has started its result is reported as
/// [`LoadOutcome::Superseded`], so the latest selection always wins.
pub struct SnapshotLoader<S: ?Sized> {
    source: Arc<S>,
    timeout: Duration,
    generation: AtomicU64,
}

impl<S: SnapshotSource + ?Sized> SnapshotLoader<S> {
    pub fn new(source: Arc<S>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Generation of the most recent load request.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// List a category, newest first.
    pub async fn list(&self, category: DataCategory) -> RetrievalResult<Vec<SnapshotEntry>> {
        let mut entries = self.source.list_available(category).await?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Pick the snapshot for `at`, or the newest one when `at` is `None`.
    pub async fn resolve(
        &self,
        category: DataCategory,
        at: Option<DateTime<Utc>>,
    ) -> RetrievalResult<SnapshotEntry> {
        let entries = self.list(category).await?;
        let found = match at {
            Some(ts) => entries.into_iter().find(|e| e.timestamp == ts),
            None => entries.into_iter().next(),
        };
        match (found, at) {
            (Some(entry), _) => Ok(entry),
            (None, None) => Err(RetrievalError::NoSnapshots(category)),
            (None, Some(ts)) => Err(RetrievalError::NotFound(format!(
                "{} snapshot for {}",
                category,
                ts.format("%Y-%m-%d %H:00")
            ))),
        }
    }

    /// Fetch and decode `path` as a `category` snapshot.
    ///
    /// Errors become [`DatasetStatus::Unavailable`].
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn load(&self, path: &str, category: DataCategory) -> LoadOutcome {
        let generation = self.next_generation();
        self.load_with_generation(path, category, generation).await
    }

    /// Resolve then load. A failed listing is reported the same way as a
    /// failed fetch.
    ///
    /// The generation is taken before the listing, so a slow listing for an
    /// earlier selection cannot overtake a later one.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn load_at(&self, category: DataCategory, at: Option<DateTime<Utc>>) -> LoadOutcome {
        let generation = self.next_generation();
        let resolved = self.resolve(category, at).await;

        if self.is_superseded(generation) {
            return Self::superseded(generation);
        }

        match resolved {
            Ok(entry) => self.load_with_generation(&entry.path, category, generation).await,
            Err(e) => {
                warn!(%category, error = %e, "No snapshot to load");
                counter!("snapshot_loads_total", "outcome" => "unavailable").increment(1);
                LoadOutcome::Current(DatasetStatus::Unavailable(LakeError::from(e).to_string()))
            }
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn superseded(generation: u64) -> LoadOutcome {
        debug!(generation, "Discarding superseded snapshot load");
        counter!("snapshot_loads_total", "outcome" => "superseded").increment(1);
        LoadOutcome::Superseded
    }

    async fn load_with_generation(
        &self,
        path: &str,
        category: DataCategory,
        generation: u64,
    ) -> LoadOutcome {
        let result = match tokio::time::timeout(self.timeout, self.fetch_and_decode(path, category)).await {
            Ok(result) => result,
            Err(_) => Err(RetrievalError::Timeout(self.timeout).into()),
        };

        if self.is_superseded(generation) {
            return Self::superseded(generation);
        }

        match &result {
            Ok(_) => {
                info!(path, %category, "Snapshot ready");
                counter!("snapshot_loads_total", "outcome" => "ready").increment(1);
            }
            Err(e) => {
                warn!(path, %category, error = %e, "Snapshot unavailable");
                counter!("snapshot_loads_total", "outcome" => "unavailable").increment(1);
            }
        }
        LoadOutcome::Current(DatasetStatus::from_result(result))
    }

    async fn fetch_and_decode(&self, path: &str, category: DataCategory) -> LakeResult<Snapshot> {
        let bytes = self.source.fetch_binary(path).await?;
        let size = bytes.len();

        let snapshot = tokio::task::spawn_blocking(move || decode_snapshot(bytes, category))
            .await
            .map_err(|e| LakeError::Io(format!("decode worker failed: {}", e)))??;

        debug!(path, size, "Decoded snapshot");
        Ok(snapshot)
    }
}

/// Decode a raw `.npy` file and apply the category's post-processing.
pub fn decode_snapshot(data: Bytes, category: DataCategory) -> LakeResult<Snapshot> {
    let tensor = npy_parser::decode(data)?;
    let planes = tensor.to_grids()?;
    category.post_process(planes)
}
