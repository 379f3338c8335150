//! Snapshot retrieval for lake conditions data.
//!
//! Provides:
//! - [`SnapshotSource`]: the async retrieval interface (fetch + listing)
//! - [`LocalSnapshotSource`]: `<root>/<category>/*.npy` on disk
//! - [`HttpSnapshotSource`]: an S3-style bucket over HTTP
//! - [`SnapshotLoader`]: fetch, decode and post-process into a
//!   [`DatasetStatus`](lake_common::DatasetStatus), discarding superseded loads

pub mod error;
pub mod http;
pub mod loader;
pub mod local;
pub mod source;

pub use error::{RetrievalError, RetrievalResult};
pub use http::{HttpSnapshotSource, HttpSourceConfig};
pub use loader::{decode_snapshot, LoadOutcome, SnapshotLoader};
pub use local::LocalSnapshotSource;
pub use source::SnapshotSource;
