//! Error types for lake conditions rendering.

use thiserror::Error;

/// Result type alias using LakeError.
pub type LakeResult<T> = Result<T, LakeError>;

/// Primary error type shared by every crate in the workspace.
///
/// Crate-specific errors (`NpyError`, `FlowError`, ...) convert into this
/// type at crate boundaries.
#[derive(Debug, Error)]
pub enum LakeError {
    // === Decode Errors ===
    #[error("Invalid binary snapshot: {0}")]
    Format(String),

    #[error("Tensor index error: {0}")]
    Index(String),

    #[error("Unsupported tensor rank {0} for array conversion (max 3)")]
    UnsupportedRank(usize),

    // === Data Errors ===
    #[error("Grid shape error: {0}")]
    Shape(String),

    #[error("Invalid snapshot time: {0}")]
    InvalidTime(String),

    // === Retrieval Errors ===
    #[error("Snapshot retrieval failed: {0}")]
    Retrieval(String),

    #[error("Request timeout")]
    Timeout,

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl LakeError {
    /// Whether the error means "this dataset can't be shown" rather than a
    /// programming error. Loaders turn these into an unavailable status.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LakeError::Format(_)
                | LakeError::UnsupportedRank(_)
                | LakeError::Retrieval(_)
                | LakeError::Timeout
                | LakeError::InvalidTime(_)
                | LakeError::Io(_)
        )
    }

    /// Short user-facing fallback text for this error.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            LakeError::Retrieval(_) | LakeError::Timeout | LakeError::Io(_) => {
                "Failed to download data"
            }
            LakeError::Format(_) | LakeError::UnsupportedRank(_) | LakeError::Index(_) => {
                "Data is temporarily unavailable"
            }
            _ => "Visualization is temporarily unavailable",
        }
    }
}

impl From<std::io::Error> for LakeError {
    fn from(err: std::io::Error) -> Self {
        LakeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LakeError {
    fn from(err: serde_json::Error) -> Self {
        LakeError::Config(format!("JSON error: {}", err))
    }
}
