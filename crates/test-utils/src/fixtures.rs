//! Shoreline and raster fixtures.

/// Unit square, counter-clockwise.
pub const UNIT_SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Concave "C" shape in normalized coordinates; the notch spans
/// `x in (0.4, 1.0), y in (0.4, 0.6)`.
pub const NOTCHED_SHORELINE: [(f64, f64); 8] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (1.0, 0.4),
    (0.4, 0.4),
    (0.4, 0.6),
    (1.0, 0.6),
    (1.0, 1.0),
    (0.0, 1.0),
];

/// Diamond inscribed in the unit square.
pub const DIAMOND: [(f64, f64); 4] = [(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)];

/// Converts a polygon fixture into an owned vertex list.
pub fn polygon(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points.to_vec()
}

/// Small raster sizes used by rasterization tests: (width, height).
pub mod raster {
    pub const TINY: (u32, u32) = (8, 8);
    pub const SMALL: (u32, u32) = (32, 24);
    pub const LEGEND: (u32, u32) = (20, 100);
}

/// Square slightly larger than the unit square, so every pixel of a raster
/// is inside it.
pub const FULL_COVER: [(f64, f64); 4] = [(-0.1, -0.1), (1.1, -0.1), (1.1, 1.1), (-0.1, 1.1)];
