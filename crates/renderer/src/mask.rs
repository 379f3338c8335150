//! Shoreline masks.
//!
//! A [`GeographyMask`] is a closed polygon in normalized `[0, 1]²` space
//! (`y` up). It answers point-in-polygon queries and lists the pixels of a
//! raster that fall inside the shoreline. Both answers are memoized per mask
//! instance.

use crate::{RenderError, RenderResult};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Vertical nudge applied when a query point is level with an edge endpoint.
const VERTEX_EPSILON: f64 = 0.0001;

/// Eastward ray-casting test. The polygon is implicitly closed.
pub fn point_in_polygon(point: (f64, f64), polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }
    let crossings = (0..n)
        .filter(|&i| {
            let p1 = polygon[if i == 0 { n - 1 } else { i - 1 }];
            let p2 = polygon[i];
            ray_crosses_edge(point, p1, p2)
        })
        .count();
    crossings % 2 == 1
}

fn ray_crosses_edge((x, y): (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> bool {
    let y = if y == p1.1 || y == p2.1 {
        y + VERTEX_EPSILON
    } else {
        y
    };

    let dy = p2.1 - p1.1;
    if dy == 0.0 {
        return false;
    }

    let t_p = (y - p1.1) / dy;
    let t_r = p1.0 + (p2.0 - p1.0) * t_p - x;
    t_r >= 0.0 && (0.0..=1.0).contains(&t_p)
}

/// Shoreline polygon with memoized containment and interior-pixel queries.
#[derive(Debug)]
pub struct GeographyMask {
    vertices: Vec<(f64, f64)>,
    /// keyed by the exact bit patterns of the query point
    point_memo: RwLock<HashMap<(u64, u64), bool>>,
    raster_memo: RwLock<HashMap<(u32, u32), Arc<Vec<(u32, u32)>>>>,
}

impl GeographyMask {
    pub fn new(vertices: Vec<(f64, f64)>) -> RenderResult<Self> {
        if vertices.len() < 3 {
            return Err(RenderError::InvalidPolygon(format!(
                "need at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(bad) = vertices.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(RenderError::InvalidPolygon(format!(
                "non-finite vertex {:?}",
                bad
            )));
        }
        Ok(Self {
            vertices,
            point_memo: RwLock::new(HashMap::new()),
            raster_memo: RwLock::new(HashMap::new()),
        })
    }

    /// Parse a JSON array of `[x, y]` pairs.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let pairs: Vec<[f64; 2]> = serde_json::from_str(json)
            .map_err(|e| RenderError::InvalidPolygon(e.to_string()))?;
        Self::new(pairs.into_iter().map(|[x, y]| (x, y)).collect())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RenderError::InvalidPolygon(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Whether a normalized point lies inside the shoreline.
    pub fn contains(&self, point: (f64, f64)) -> bool {
        let key = (point.0.to_bits(), point.1.to_bits());
        if let Some(&hit) = self
            .point_memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return hit;
        }

        let inside = point_in_polygon(point, &self.vertices);
        self.point_memo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, inside);
        inside
    }

    /// Pixels `(i, j)` of a `width x height` raster inside the shoreline,
    /// row by row. Pixel `(i, j)` is tested at `(i / width, 1 - j / height)`.
    pub fn interior_pixels(&self, width: u32, height: u32) -> Arc<Vec<(u32, u32)>> {
        if let Some(pixels) = self
            .raster_memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(width, height))
        {
            return Arc::clone(pixels);
        }

        let rows: Vec<Vec<((u32, u32), (f64, f64), bool)>> = (0..height)
            .into_par_iter()
            .map(|j| {
                (0..width)
                    .map(|i| {
                        let point = (i as f64 / width as f64, 1.0 - j as f64 / height as f64);
                        ((i, j), point, point_in_polygon(point, &self.vertices))
                    })
                    .collect()
            })
            .collect();

        let mut pixels = Vec::new();
        {
            let mut memo = self
                .point_memo
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for (pixel, point, inside) in rows.into_iter().flatten() {
                memo.insert((point.0.to_bits(), point.1.to_bits()), inside);
                if inside {
                    pixels.push(pixel);
                }
            }
        }

        debug!(width, height, interior = pixels.len(), "Computed shoreline raster");

        let pixels = Arc::new(pixels);
        self.raster_memo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((width, height), Arc::clone(&pixels));
        pixels
    }

    /// Number of memoized point queries.
    pub fn point_memo_len(&self) -> usize {
        self.point_memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of memoized raster sizes.
    pub fn raster_memo_len(&self) -> usize {
        self.raster_memo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
