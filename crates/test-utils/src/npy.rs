//! Reference `.npy` writer.
//!
//! Produces files the way `numpy.save` lays them out (version 1.0, header
//! padded with spaces to a 64-byte boundary and terminated by `\n`) so decoder
//! tests never depend on checked-in binaries.

use std::io::Write;
use std::path::PathBuf;

/// Typed element values accepted by the writer.
#[derive(Debug, Clone, PartialEq)]
pub enum NpyValues {
    F8(Vec<f64>),
    F4(Vec<f32>),
    I4(Vec<i32>),
    I2(Vec<i16>),
    I1(Vec<i8>),
    U4(Vec<u32>),
    U2(Vec<u16>),
    U1(Vec<u8>),
}

impl NpyValues {
    /// numpy `descr` string for these values.
    pub fn descr(&self) -> &'static str {
        match self {
            NpyValues::F8(_) => "<f8",
            NpyValues::F4(_) => "<f4",
            NpyValues::I4(_) => "<i4",
            NpyValues::I2(_) => "<i2",
            NpyValues::I1(_) => "<i1",
            NpyValues::U4(_) => "|u4",
            NpyValues::U2(_) => "|u2",
            NpyValues::U1(_) => "|u1",
        }
    }

    pub fn len(&self) -> usize {
        self.as_f64().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values widened to f64 for comparison against decoded tensors.
    pub fn as_f64(&self) -> Vec<f64> {
        match self {
            NpyValues::F8(v) => v.clone(),
            NpyValues::F4(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::I4(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::I2(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::I1(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::U4(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::U2(v) => v.iter().map(|&x| x as f64).collect(),
            NpyValues::U1(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    fn le_bytes(&self) -> Vec<u8> {
        match self {
            NpyValues::F8(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::F4(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::I4(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::I2(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::I1(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::U4(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::U2(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            NpyValues::U1(v) => v.clone(),
        }
    }
}

/// Python tuple literal for a shape: `()`, `(3,)`, `(2, 3)`.
pub fn shape_literal(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        _ => {
            let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    }
}

/// Header dict padded the way numpy pads it.
pub fn npy_header(descr: &str, fortran_order: bool, shape: &[usize]) -> String {
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        descr,
        if fortran_order { "True" } else { "False" },
        shape_literal(shape)
    );
    // magic(6) + version(2) + length(2) + header + '\n' aligned to 64
    let unpadded = 10 + header.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    header.push_str(&" ".repeat(padding));
    header.push('\n');
    header
}

/// Assemble a file from a raw header string and payload.
pub fn npy_from_parts(major: u8, minor: u8, header: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(10 + header.len() + payload.len());
    out.extend_from_slice(b"\x93NUMPY");
    out.push(major);
    out.push(minor);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(payload);
    out
}

/// Encode `values` with `shape` as a version 1.0, C-order `.npy` file.
pub fn npy_bytes(values: &NpyValues, shape: &[usize]) -> Vec<u8> {
    npy_bytes_with_order(values, shape, false)
}

/// Encode with an explicit `fortran_order` flag. The payload is written as
/// given; only the header flag changes.
pub fn npy_bytes_with_order(values: &NpyValues, shape: &[usize], fortran_order: bool) -> Vec<u8> {
    let header = npy_header(values.descr(), fortran_order, shape);
    npy_from_parts(1, 0, &header, &values.le_bytes())
}

/// Encode 2D `f64` rows, as snapshot temperature files are published.
pub fn npy_f64_rows(rows: &[Vec<f64>]) -> Vec<u8> {
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    npy_bytes(&NpyValues::F8(flat), &[rows.len(), n_cols])
}

/// Write encoded bytes into a fresh temp dir, returning the dir guard and path.
pub fn write_npy_file(name: &str, bytes: &[u8]) -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(&path)?;
    file.write_all(bytes)?;
    Ok((dir, path))
}
