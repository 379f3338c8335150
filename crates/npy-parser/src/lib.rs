//! NumPy `.npy` decoder for lake snapshot files.
//!
//! Snapshots are published as `.npy` version 1.0 files:
//!
//! | Bytes | Content |
//! |---|---|
//! | 0-5 | magic `\x93NUMPY` |
//! | 6, 7 | major / minor version (only 1.0) |
//! | 8-9 | little-endian u16 header length `H` |
//! | 10..10+H | ASCII dict literal with `descr`, `fortran_order`, `shape` |
//! | rest | little-endian element data, row-major |
//!
//! Decoding is all-or-nothing: a [`Tensor`] is only returned once the whole
//! payload has been validated and read.
//!
//! Reference: <https://numpy.org/devdocs/reference/generated/numpy.lib.format.html>

pub mod dtype;
pub mod error;
pub mod header;
pub mod tensor;

pub use dtype::{DType, TensorData};
pub use error::{NpyError, NpyResult};
pub use header::NpyHeader;
pub use tensor::{NestedArray, Tensor};

use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// File signature.
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Magic + version + header length prefix.
const PREAMBLE_LEN: usize = 10;

/// Decode a complete `.npy` byte buffer.
pub fn decode(bytes: impl Into<Bytes>) -> NpyResult<Tensor> {
    let data: Bytes = bytes.into();

    if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
        return Err(NpyError::Format("not a numpy file (bad magic)".to_string()));
    }
    if data.len() < PREAMBLE_LEN {
        return Err(NpyError::Format(format!(
            "truncated preamble: {} bytes",
            data.len()
        )));
    }

    let (major, minor) = (data[6], data[7]);
    if (major, minor) != (1, 0) {
        return Err(NpyError::Format(format!(
            "unsupported numpy file version {}.{}",
            major, minor
        )));
    }

    let header_len = u16::from_le_bytes([data[8], data[9]]) as usize;
    let payload_start = PREAMBLE_LEN + header_len;
    if data.len() < payload_start {
        return Err(NpyError::Format(format!(
            "header declares {} bytes but only {} remain",
            header_len,
            data.len() - PREAMBLE_LEN
        )));
    }

    let header = header::parse_header(&data[PREAMBLE_LEN..payload_start])?;

    if header.fortran_order {
        return Err(NpyError::Format(
            "fortran_order arrays are not supported".to_string(),
        ));
    }

    let dtype = DType::from_descr(&header.descr)
        .ok_or_else(|| NpyError::Format(format!("unknown dtype '{}'", header.descr)))?;

    let count = header.element_count()?;
    let remaining = data.len() - payload_start;
    let expected = count
        .checked_mul(dtype.byte_width())
        .ok_or_else(|| NpyError::Format(format!("shape {:?} is too large", header.shape)))?;
    if remaining != expected {
        return Err(NpyError::Format(format!(
            "invalid byte count for dtype '{}': expected {}, found {}",
            dtype, expected, remaining
        )));
    }

    let values = TensorData::read(dtype, data.slice(payload_start..), count);
    debug!(dtype = %dtype, shape = ?header.shape, "Decoded npy payload");

    Tensor::new(values, header.shape)
}

/// Read and decode a `.npy` file from disk.
pub fn decode_file<P: AsRef<Path>>(path: P) -> NpyResult<Tensor> {
    let bytes = std::fs::read(path.as_ref())?;
    decode(bytes)
}
