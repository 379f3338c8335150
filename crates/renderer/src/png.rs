//! PNG encoding for RGBA rasters.
//!
//! Two encodings are produced:
//! - **Indexed (colour type 3)** when the image has at most 256 distinct
//!   RGBA values. Discrete palettes and legend swatches always qualify.
//! - **RGBA (colour type 6)** otherwise.

use crate::{RenderError, RenderResult};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum entries in a PLTE chunk.
const MAX_PALETTE_SIZE: usize = 256;

/// Rows per parallel work unit when scanning for distinct colours.
const ROWS_PER_TASK: usize = 32;

type Rgba = [u8; 4];

fn check_len(pixels: &[u8], width: usize, height: usize) -> RenderResult<()> {
    let expected = width * height * 4;
    if pixels.len() != expected {
        return Err(RenderError::BufferSize {
            width: width as u32,
            height: height as u32,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode, choosing indexed output when the palette fits.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels, width, height)?;
    match extract_palette(pixels, width) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Distinct colours and per-pixel indices, or `None` if there are more than
/// 256 colours.
fn extract_palette(pixels: &[u8], width: usize) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let stride = (width * 4 * ROWS_PER_TASK).max(4);

    let mut distinct: Vec<Rgba> = pixels
        .par_chunks(stride)
        .map(|block| {
            let mut seen = HashSet::new();
            for px in block.chunks_exact(4) {
                seen.insert([px[0], px[1], px[2], px[3]]);
                if seen.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            seen
        })
        .reduce(HashSet::new, |mut a, b| {
            a.extend(b);
            a
        })
        .into_iter()
        .collect();

    if distinct.len() > MAX_PALETTE_SIZE {
        return None;
    }
    // stable output for identical images
    distinct.sort_unstable();

    let lookup: HashMap<Rgba, u8> = distinct
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u8))
        .collect();
    let indices = pixels
        .par_chunks_exact(4)
        .map(|px| lookup[&[px[0], px[1], px[2], px[3]]])
        .collect();

    Some((distinct, indices))
}

/// Indexed PNG from a palette and one index byte per pixel.
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette has {} entries",
            palette.len()
        )));
    }
    if indices.len() != width * height {
        return Err(RenderError::Encode(format!(
            "{} indices for a {}x{} image",
            indices.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Truecolour-with-alpha PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_len(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    // bit depth, colour type, compression, filter, interlace
    data.extend_from_slice(&[8, color_type, 0, 0, 0]);
    data
}

/// Zlib-compress rows of `row_bytes` bytes, each prefixed by filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks(row_bytes.max(1)).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_two_colors() {
        let pixels = [255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255, 0, 0, 0, 0];
        let (palette, indices) = extract_palette(&pixels, 2).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], indices[2]);
        assert_eq!(palette[indices[1] as usize], [0, 0, 255, 255]);
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let pixels: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 0, 255])
            .collect();
        assert!(extract_palette(&pixels, 300).is_none());
    }

    #[test]
    fn test_encode_auto_picks_indexed() {
        let pixels = vec![10u8, 20, 30, 255].repeat(16);
        let png = encode_auto(&pixels, 4, 4).unwrap();
        // colour type byte in IHDR
        assert_eq!(png[25], 3);
    }

    #[test]
    fn test_encode_rgba_rejects_bad_length() {
        assert!(matches!(
            encode_rgba(&[0; 10], 2, 2),
            Err(RenderError::BufferSize { expected: 16, .. })
        ));
    }
}
