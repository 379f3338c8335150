//! Snapshot timestamps and listing entries.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid snapshot time format: {0}")]
    InvalidFormat(String),
}

impl From<TimeParseError> for crate::LakeError {
    fn from(err: TimeParseError) -> Self {
        crate::LakeError::InvalidTime(err.to_string())
    }
}

/// One available snapshot as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Path / key identifying the file to the retrieval layer
    pub path: String,
    /// Forecast hour the snapshot describes (UTC)
    pub timestamp: DateTime<Utc>,
}

impl SnapshotEntry {
    /// Build an entry from a path such as `flow/2022-02-14 18.npy`.
    pub fn from_path(path: &str) -> Result<Self, TimeParseError> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let stem = file_name.strip_suffix(".npy").unwrap_or(file_name);
        Ok(Self {
            path: path.to_string(),
            timestamp: parse_snapshot_timestamp(stem)?,
        })
    }
}

/// Parse a `YYYY-MM-DD HH` snapshot stem. The separator between date and
/// hour may be a space or `+` (URL-encoded space).
pub fn parse_snapshot_timestamp(stem: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let normalized = stem.trim().replace('+', " ");
    NaiveDateTime::parse_from_str(&format!("{}:00", normalized), "%Y-%m-%d %H:%M")
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .map_err(|_| TimeParseError::InvalidFormat(stem.to_string()))
}

/// Parse a `YYYYMMDDHH` date query, as used to select a snapshot hour.
pub fn parse_date_query(query: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let query = query.trim();
    if query.len() != 10 || !query.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidFormat(format!(
            "expected date to have format 'YYYYMMDDHH', got '{}'",
            query
        )));
    }
    NaiveDateTime::parse_from_str(&format!("{}00", query), "%Y%m%d%H%M")
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .map_err(|_| TimeParseError::InvalidFormat(query.to_string()))
}

/// Sort entries newest first. Listings resolve in no particular order.
pub fn sort_newest_first(entries: &mut [SnapshotEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
