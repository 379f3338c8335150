//! Shoreline-masked heatmap rasterization with per-key caching.

use crate::{ColorScale, GeographyMask, PixelBuffer, RenderError, RenderResult, ValueScale};
use lake_common::Grid;
use lru::LruCache;
use metrics::counter;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a [`HeatmapRasterizer::paint`] call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// A cached buffer for the key was copied verbatim
    CacheHit,
    /// Pixels were computed from the grid
    Painted,
}

/// Cache statistics.
#[derive(Debug, Default)]
pub struct HeatmapCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
}

impl HeatmapCacheStats {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// Paints scalar grids into the interior pixels of a [`GeographyMask`].
///
/// Each interior pixel takes the value of the grid cell under it (nearest
/// neighbour). Pixels over no-data cells take the mean of the finite cells
/// in the surrounding 3x3 block, or 0 when there are none. Pixels outside the
/// mask are never written.
///
/// Painted buffers can be cached under a caller-supplied key. A later paint
/// with the same key reuses the cached image even if the grid differs, so
/// keys must identify the data.
pub struct HeatmapRasterizer {
    mask: Arc<GeographyMask>,
    cache: LruCache<String, PixelBuffer>,
    stats: HeatmapCacheStats,
}

impl HeatmapRasterizer {
    /// Rasterizer with an unbounded cache.
    pub fn new(mask: Arc<GeographyMask>) -> Self {
        Self::with_capacity(mask, None)
    }

    /// Rasterizer whose cache keeps at most `capacity` images (`None` for
    /// unbounded).
    pub fn with_capacity(mask: Arc<GeographyMask>, capacity: Option<NonZeroUsize>) -> Self {
        let cache = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            mask,
            cache,
            stats: HeatmapCacheStats::default(),
        }
    }

    pub fn mask(&self) -> &Arc<GeographyMask> {
        &self.mask
    }

    pub fn stats(&self) -> &HeatmapCacheStats {
        &self.stats
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Paint `grid` into `buffer`.
    pub fn paint(
        &mut self,
        buffer: &mut PixelBuffer,
        grid: &Grid,
        scale: &ValueScale,
        palette: &ColorScale,
        cache_key: Option<&str>,
    ) -> RenderResult<PaintOutcome> {
        if let Some(key) = cache_key {
            if let Some(cached) = self.cache.get(key) {
                if buffer.copy_from(cached) {
                    self.stats.hits.fetch_add(1, Ordering::Relaxed);
                    counter!("heatmap_cache_hits_total").increment(1);
                    debug!(key, "Heatmap cache hit");
                    return Ok(PaintOutcome::CacheHit);
                }
                warn!(
                    key,
                    cached = ?cached.dimensions(),
                    requested = ?buffer.dimensions(),
                    "Cached heatmap has different dimensions, repainting"
                );
            }
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            counter!("heatmap_cache_misses_total").increment(1);
        }

        if grid.is_empty() {
            return Err(RenderError::EmptyGrid);
        }

        let (width, height) = buffer.dimensions();
        let (rows, cols) = grid.shape();
        let pixels = self.mask.interior_pixels(width, height);

        for &(i, j) in pixels.iter() {
            let row = ((j as f64 / height as f64 * rows as f64).floor() as usize).min(rows - 1);
            let col = ((i as f64 / width as f64 * cols as f64).floor() as usize).min(cols - 1);
            let value = sample(grid, row, col);
            let color = palette.color(scale.normalize(value));
            buffer.set_pixel(i, j, color.rgba());
        }

        debug!(
            width,
            height,
            pixels = pixels.len(),
            cached = cache_key.is_some(),
            "Painted heatmap"
        );

        if let Some(key) = cache_key {
            if let Some((evicted, _)) = self.cache.push(key.to_string(), buffer.clone()) {
                if evicted != key {
                    self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        Ok(PaintOutcome::Painted)
    }
}

/// Cell value, or the unweighted mean of the finite cells in the clipped 3x3
/// neighbourhood when the cell itself is NaN.
fn sample(grid: &Grid, row: usize, col: usize) -> f64 {
    match grid.get(row, col) {
        Some(v) if !v.is_nan() => v,
        _ => neighbor_mean(grid, row, col),
    }
}

fn neighbor_mean(grid: &Grid, row: usize, col: usize) -> f64 {
    let (row, col) = (row as isize, col as isize);
    let mut sum = 0.0;
    let mut count = 0usize;
    for dr in -1..=1 {
        for dc in -1..=1 {
            if let Some(v) = grid.finite(row + dr, col + dc) {
                sum += v;
                count += 1;
            }
        }
    }
    if count > 0 {
        sum / count as f64
    } else {
        0.0
    }
}
