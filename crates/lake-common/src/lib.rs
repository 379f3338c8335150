//! Common types and utilities shared across the lake conditions crates.

pub mod dataset;
pub mod error;
pub mod grid;
pub mod interpolation;
pub mod time;

pub use dataset::{DataCategory, DatasetStatus, Snapshot};
pub use error::{LakeError, LakeResult};
pub use grid::Grid;
pub use interpolation::bilinear;
pub use time::{parse_date_query, SnapshotEntry, TimeParseError};
