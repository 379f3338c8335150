//! Tests for PNG encoding.

use flate2::read::ZlibDecoder;
use renderer::png::{encode_auto, encode_indexed, encode_rgba};
use renderer::{render_legend_bar, ColorScale, PixelBuffer};
use std::io::Read;

// ============================================================================
// Helper functions
// ============================================================================

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

struct Chunk {
    kind: [u8; 4],
    data: Vec<u8>,
    crc: u32,
}

/// Split a PNG into its chunks. Panics on malformed input.
fn chunks(png: &[u8]) -> Vec<Chunk> {
    assert_eq!(&png[..8], &SIGNATURE);
    let mut out = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let kind: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
        let data = png[pos + 8..pos + 8 + len].to_vec();
        let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());
        out.push(Chunk { kind, data, crc });
        pos += 12 + len;
    }
    out
}

fn find<'a>(chunks: &'a [Chunk], kind: &[u8; 4]) -> Option<&'a Chunk> {
    chunks.iter().find(|c| &c.kind == kind)
}

fn inflate_idat(chunks: &[Chunk]) -> Vec<u8> {
    let compressed: Vec<u8> = chunks
        .iter()
        .filter(|c| &c.kind == b"IDAT")
        .flat_map(|c| c.data.iter().copied())
        .collect();
    let mut raw = Vec::new();
    ZlibDecoder::new(&compressed[..]).read_to_end(&mut raw).unwrap();
    raw
}

/// Image with `n` distinct opaque colours.
fn gradient_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    pixels
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_chunk_layout_and_crc() {
    let png = encode_rgba(&gradient_pixels(4, 3), 4, 3).unwrap();
    let chunks = chunks(&png);

    let kinds: Vec<&[u8; 4]> = chunks.iter().map(|c| &c.kind).collect();
    assert_eq!(kinds.first(), Some(&b"IHDR"));
    assert_eq!(kinds.last(), Some(&b"IEND"));

    for chunk in &chunks {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&chunk.kind);
        hasher.update(&chunk.data);
        assert_eq!(hasher.finalize(), chunk.crc);
    }
}

#[test]
fn test_ihdr_fields() {
    let png = encode_rgba(&gradient_pixels(17, 5), 17, 5).unwrap();
    let chunks = chunks(&png);
    let ihdr = &find(&chunks, b"IHDR").unwrap().data;
    assert_eq!(ihdr.len(), 13);
    assert_eq!(u32::from_be_bytes(ihdr[0..4].try_into().unwrap()), 17);
    assert_eq!(u32::from_be_bytes(ihdr[4..8].try_into().unwrap()), 5);
    assert_eq!(ihdr[8], 8);
    assert_eq!(ihdr[9], 6);
}

// ============================================================================
// Pixel data
// ============================================================================

#[test]
fn test_rgba_scanlines_roundtrip() {
    let pixels = gradient_pixels(5, 4);
    let chunks = chunks(&encode_rgba(&pixels, 5, 4).unwrap());
    let raw = inflate_idat(&chunks);

    assert_eq!(raw.len(), 4 * (1 + 5 * 4));
    for (row, line) in raw.chunks(1 + 5 * 4).enumerate() {
        assert_eq!(line[0], 0, "row {} filter byte", row);
        assert_eq!(&line[1..], &pixels[row * 20..(row + 1) * 20]);
    }
}

#[test]
fn test_indexed_palette_and_transparency() {
    let mut buffer = PixelBuffer::new(4, 2);
    buffer.set_pixel(0, 0, [255, 0, 0, 255]);
    buffer.set_pixel(3, 1, [0, 0, 255, 255]);

    let chunks = chunks(&encode_auto(buffer.data(), 4, 2).unwrap());
    assert_eq!(find(&chunks, b"IHDR").unwrap().data[9], 3);

    let plte = &find(&chunks, b"PLTE").unwrap().data;
    assert_eq!(plte.len(), 3 * 3);
    // transparent black from the untouched pixels needs a tRNS entry
    let trns = &find(&chunks, b"tRNS").unwrap().data;
    assert!(trns.contains(&0));

    let raw = inflate_idat(&chunks);
    assert_eq!(raw.len(), 2 * (1 + 4));
    let index = raw[1] as usize;
    assert_eq!(&plte[index * 3..index * 3 + 3], &[255, 0, 0]);
}

#[test]
fn test_opaque_indexed_has_no_trns() {
    let bar = render_legend_bar(4, 30, &ColorScale::ice_to_fire());
    let chunks = chunks(&bar.to_png().unwrap());
    assert_eq!(find(&chunks, b"IHDR").unwrap().data[9], 3);
    assert!(find(&chunks, b"tRNS").is_none());
    assert!(find(&chunks, b"PLTE").unwrap().data.len() <= 15 * 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let pixels = gradient_pixels(32, 32);
    let chunks = chunks(&encode_auto(&pixels, 32, 32).unwrap());
    assert_eq!(find(&chunks, b"IHDR").unwrap().data[9], 6);
    assert!(find(&chunks, b"PLTE").is_none());
}

#[test]
fn test_encode_is_deterministic() {
    let bar = render_legend_bar(6, 40, &ColorScale::dark_ocean());
    assert_eq!(bar.to_png().unwrap(), bar.to_png().unwrap());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_indexed_rejects_bad_inputs() {
    assert!(encode_indexed(2, 2, &[], &[0; 4]).is_err());
    assert!(encode_indexed(2, 2, &[[0, 0, 0, 255]], &[0; 3]).is_err());
    assert!(encode_auto(&[0; 15], 2, 2).is_err());
}
