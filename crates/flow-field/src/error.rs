//! Error types for vector fields and particle systems.

use lake_common::LakeError;
use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// `u` and `v` grids differ in shape
    #[error("u grid is {u_rows}x{u_cols} but v grid is {v_rows}x{v_cols}")]
    ShapeMismatch {
        u_rows: usize,
        u_cols: usize,
        v_rows: usize,
        v_cols: usize,
    },

    #[error("vector field grids are empty")]
    EmptyGrid,

    #[error("invalid cell size {dx}x{dy}: must be positive and finite")]
    InvalidCellSize { dx: f64, dy: f64 },

    /// Particles need at least one cell with finite u and v to spawn in
    #[error("vector field has no wet cells")]
    NoWetCells,
}

impl From<FlowError> for LakeError {
    fn from(err: FlowError) -> Self {
        LakeError::Shape(err.to_string())
    }
}
