//! Retrieval errors.

use lake_common::{DataCategory, LakeError};
use std::time::Duration;
use thiserror::Error;

pub type RetrievalResult<T> = Result<T, RetrievalError>;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} fetching {path}")]
    Status { status: u16, path: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Listing failed: {0}")]
    Listing(String),

    #[error("No {0} snapshots available")]
    NoSnapshots(DataCategory),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetrievalError::Request(format!("timed out: {}", err))
        } else {
            RetrievalError::Request(err.to_string())
        }
    }
}

impl From<RetrievalError> for LakeError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Timeout(_) => LakeError::Timeout,
            other => LakeError::Retrieval(other.to_string()),
        }
    }
}
