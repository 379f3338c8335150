//! Particle trail drawing.

use crate::{PixelBuffer, RenderError, RenderResult};
use flow_field::Particle;
use tiny_skia::{LineCap, Paint, PathBuilder, PixmapMut, Stroke, Transform};

/// Stroke used for particle trails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailStyle {
    /// Non-premultiplied RGBA
    pub color: [u8; 4],
    pub width: f32,
    pub anti_alias: bool,
}

impl Default for TrailStyle {
    /// 1px white at 40% opacity.
    fn default() -> Self {
        Self {
            color: [255, 255, 255, 102],
            width: 1.0,
            anti_alias: true,
        }
    }
}

/// Stroke every particle's render trail onto `buffer`, shifted by `offset`.
/// Returns the number of trails drawn; trails with fewer than two points
/// have nothing to stroke and are skipped.
pub fn draw_particles(
    buffer: &mut PixelBuffer,
    particles: &[Particle],
    offset: (f64, f64),
    style: &TrailStyle,
) -> RenderResult<usize> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Ok(0);
    }

    let Some(mut pixmap) = PixmapMut::from_bytes(buffer.data_mut(), width, height) else {
        return Err(RenderError::Canvas(format!(
            "cannot draw onto a {}x{} buffer",
            width, height
        )));
    };
    premultiply(pixmap.data_mut());

    let mut paint = Paint::default();
    let [r, g, b, a] = style.color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = style.anti_alias;

    let stroke = Stroke {
        width: style.width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };

    let drawn = particles
        .iter()
        .filter(|p| stroke_trail(&mut pixmap, &p.render_trail(), offset, &paint, &stroke))
        .count();

    demultiply(pixmap.data_mut());
    Ok(drawn)
}

fn stroke_trail(
    pixmap: &mut PixmapMut<'_>,
    points: &[(f64, f64)],
    (ox, oy): (f64, f64),
    paint: &Paint<'_>,
    stroke: &Stroke,
) -> bool {
    if points.len() < 2 {
        return false;
    }

    let mut pb = PathBuilder::new();
    let (x0, y0) = points[0];
    pb.move_to((ox + x0) as f32, (oy + y0) as f32);
    for &(x, y) in &points[1..] {
        pb.line_to((ox + x) as f32, (oy + y) as f32);
    }

    match pb.finish() {
        Some(path) => {
            pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
            true
        }
        None => false,
    }
}

/// tiny-skia works on premultiplied pixels.
fn premultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

fn demultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 || a == 0 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiply_roundtrip_opaque() {
        let mut data = vec![10, 20, 30, 255, 0, 0, 0, 0];
        premultiply(&mut data);
        assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0]);
        demultiply(&mut data);
        assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let mut data = vec![200, 100, 0, 128];
        premultiply(&mut data);
        assert_eq!(data, vec![100, 50, 0, 128]);
        demultiply(&mut data);
        assert_eq!(data, vec![199, 100, 0, 128]);
    }
}
