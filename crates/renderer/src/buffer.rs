//! RGBA pixel buffers.

use crate::{png, RenderError, RenderResult};

/// Row-major RGBA8 raster, 4 bytes per pixel, not premultiplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap existing RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RenderError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Set every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Write one pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Fill an axis-aligned rectangle clipped to the buffer.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgba: [u8; 4]) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, rgba);
            }
        }
    }

    /// Replace this buffer's contents with `other`'s. Returns false when the
    /// dimensions differ.
    pub fn copy_from(&mut self, other: &PixelBuffer) -> bool {
        if self.dimensions() != other.dimensions() {
            return false;
        }
        self.data.copy_from_slice(&other.data);
        true
    }

    /// Encode as PNG, choosing an indexed encoding when possible.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        png::encode_auto(&self.data, self.width as usize, self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.data().len(), 24);
        assert!(buf.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_pixel(3, 1, [1, 2, 3, 4]);
        buf.set_pixel(9, 9, [9, 9, 9, 9]);
        assert_eq!(buf.pixel(3, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(2.0, 2.0, 10.0, 10.0, [5, 5, 5, 255]);
        assert_eq!(buf.pixel(3, 3), Some([5, 5, 5, 255]));
        assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_copy_from_requires_same_size() {
        let mut a = PixelBuffer::new(2, 2);
        let mut b = PixelBuffer::new(2, 2);
        b.fill([7, 7, 7, 255]);
        assert!(a.copy_from(&b));
        assert_eq!(a, b);
        assert!(!a.copy_from(&PixelBuffer::new(3, 2)));
    }
}
