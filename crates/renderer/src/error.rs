//! Error types for rendering.

use lake_common::LakeError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Invalid hex colour '{0}'")]
    InvalidColor(String),

    #[error("Invalid shoreline polygon: {0}")]
    InvalidPolygon(String),

    /// Pixel data length doesn't match the declared dimensions
    #[error("Buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Drawing surface error: {0}")]
    Canvas(String),

    #[error("Cannot paint an empty grid")]
    EmptyGrid,

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl From<RenderError> for LakeError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidPalette(_)
            | RenderError::InvalidColor(_)
            | RenderError::InvalidPolygon(_) => LakeError::Config(err.to_string()),
            _ => LakeError::Render(err.to_string()),
        }
    }
}
