//! Supported element encodings and typed payload buffers.

use bytes::{Buf, Bytes};
use std::fmt;

/// Element encoding declared by the header's `descr` field.
///
/// Multi-byte types are always little-endian; single-byte and unsigned types
/// use the `|` (not applicable) byte-order marker as numpy writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F8,
    F4,
    I4,
    I2,
    I1,
    U4,
    U2,
    U1,
}

impl DType {
    pub const ALL: [DType; 8] = [
        DType::F8,
        DType::F4,
        DType::I4,
        DType::I2,
        DType::I1,
        DType::U4,
        DType::U2,
        DType::U1,
    ];

    /// Look up a `descr` tag such as `<f8`.
    pub fn from_descr(descr: &str) -> Option<Self> {
        match descr {
            "<f8" => Some(DType::F8),
            "<f4" => Some(DType::F4),
            "<i4" => Some(DType::I4),
            "<i2" => Some(DType::I2),
            "<i1" => Some(DType::I1),
            "|u4" => Some(DType::U4),
            "|u2" => Some(DType::U2),
            "|u1" => Some(DType::U1),
            _ => None,
        }
    }

    pub fn descr(&self) -> &'static str {
        match self {
            DType::F8 => "<f8",
            DType::F4 => "<f4",
            DType::I4 => "<i4",
            DType::I2 => "<i2",
            DType::I1 => "<i1",
            DType::U4 => "|u4",
            DType::U2 => "|u2",
            DType::U1 => "|u1",
        }
    }

    /// Size of one element in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            DType::F8 => 8,
            DType::F4 | DType::I4 | DType::U4 => 4,
            DType::I2 | DType::U2 => 2,
            DType::I1 | DType::U1 => 1,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descr())
    }
}

/// Flat, typed element buffer in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F64(Vec<f64>),
    F32(Vec<f32>),
    I32(Vec<i32>),
    I16(Vec<i16>),
    I8(Vec<i8>),
    U32(Vec<u32>),
    U16(Vec<u16>),
    U8(Vec<u8>),
}

impl TensorData {
    /// Read `count` little-endian elements of `dtype` from `payload`.
    ///
    /// The caller guarantees `payload.len() == count * dtype.byte_width()`.
    pub(crate) fn read(dtype: DType, mut payload: Bytes, count: usize) -> Self {
        macro_rules! read_all {
            ($variant:ident, $getter:ident) => {
                TensorData::$variant((0..count).map(|_| payload.$getter()).collect())
            };
        }

        match dtype {
            DType::F8 => read_all!(F64, get_f64_le),
            DType::F4 => read_all!(F32, get_f32_le),
            DType::I4 => read_all!(I32, get_i32_le),
            DType::I2 => read_all!(I16, get_i16_le),
            DType::I1 => read_all!(I8, get_i8),
            DType::U4 => read_all!(U32, get_u32_le),
            DType::U2 => read_all!(U16, get_u16_le),
            DType::U1 => read_all!(U8, get_u8),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            TensorData::F64(_) => DType::F8,
            TensorData::F32(_) => DType::F4,
            TensorData::I32(_) => DType::I4,
            TensorData::I16(_) => DType::I2,
            TensorData::I8(_) => DType::I1,
            TensorData::U32(_) => DType::U4,
            TensorData::U16(_) => DType::U2,
            TensorData::U8(_) => DType::U1,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::F64(v) => v.len(),
            TensorData::F32(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I16(v) => v.len(),
            TensorData::I8(v) => v.len(),
            TensorData::U32(v) => v.len(),
            TensorData::U16(v) => v.len(),
            TensorData::U8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at flat `offset` widened to f64. Every supported type is exact
    /// in f64.
    pub fn value(&self, offset: usize) -> f64 {
        match self {
            TensorData::F64(v) => v[offset],
            TensorData::F32(v) => v[offset] as f64,
            TensorData::I32(v) => v[offset] as f64,
            TensorData::I16(v) => v[offset] as f64,
            TensorData::I8(v) => v[offset] as f64,
            TensorData::U32(v) => v[offset] as f64,
            TensorData::U16(v) => v[offset] as f64,
            TensorData::U8(v) => v[offset] as f64,
        }
    }

    /// All elements widened to f64.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.value(i)).collect()
    }
}
