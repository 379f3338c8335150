//! Error types for .npy decoding.

use lake_common::LakeError;
use thiserror::Error;

/// Result type for npy parser operations.
pub type NpyResult<T> = Result<T, NpyError>;

/// Error types for .npy decoding and tensor access.
#[derive(Error, Debug)]
pub enum NpyError {
    /// The byte stream is not a supported .npy file
    #[error("Invalid npy format: {0}")]
    Format(String),

    /// Tensor access with the wrong number of indices or an out-of-range index
    #[error("Index error: {0}")]
    Index(String),

    /// Array conversion requested for a tensor with more than 3 axes
    #[error("Unsupported tensor rank {0}: array conversion supports at most 3 dimensions")]
    UnsupportedRank(usize),

    /// Tensor shape doesn't fit the requested view (e.g. grid of a rank-1 tensor)
    #[error("Shape error: {0}")]
    Shape(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NpyError> for LakeError {
    fn from(err: NpyError) -> Self {
        match err {
            NpyError::Format(msg) => LakeError::Format(msg),
            NpyError::Index(msg) => LakeError::Index(msg),
            NpyError::UnsupportedRank(rank) => LakeError::UnsupportedRank(rank),
            NpyError::Shape(msg) => LakeError::Shape(msg),
            NpyError::Io(e) => LakeError::Io(e.to_string()),
        }
    }
}
