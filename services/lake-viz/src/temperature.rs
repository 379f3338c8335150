//! Static water temperature map with legend.

use crate::animation::raster_height;
use lake_common::dataset::round_to;
use lake_common::{Grid, LakeResult};
use renderer::{
    legend_ticks, render_legend_bar, ColorScale, HeatmapRasterizer, LegendTick, PaintOutcome,
    PixelBuffer, ValueScale,
};
use tracing::info;

/// A temperature grid (°F, north-up) with its colouring.
#[derive(Debug, Clone)]
pub struct TemperatureMap {
    grid: Grid,
    scale: ValueScale,
    palette: ColorScale,
    units: String,
    decimal_places: u32,
}

impl TemperatureMap {
    pub fn new(
        grid: Grid,
        scale: ValueScale,
        palette: ColorScale,
        units: impl Into<String>,
        decimal_places: u32,
    ) -> Self {
        Self {
            grid,
            scale,
            palette,
            units: units.into(),
            decimal_places,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Paint the heatmap at `width` pixels wide. `cache_key` should name the
    /// snapshot hour.
    pub fn render(
        &self,
        rasterizer: &mut HeatmapRasterizer,
        width: u32,
        cache_key: Option<&str>,
    ) -> LakeResult<PixelBuffer> {
        let mut buffer = PixelBuffer::new(width, raster_height(width, &self.grid));
        let started = std::time::Instant::now();
        let outcome = rasterizer.paint(&mut buffer, &self.grid, &self.scale, &self.palette, cache_key)?;
        info!(
            width,
            height = buffer.height(),
            cached = outcome == PaintOutcome::CacheHit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered temperature map"
        );
        Ok(buffer)
    }

    /// Hover readout, e.g. `"55 ° F"`.
    pub fn hover(&self, x: f64, y: f64, width: u32, height: u32) -> Option<String> {
        self.grid
            .value_at_pixel(x, y, width as f64, height as f64)
            .map(|t| format!("{} {}", round_to(t, self.decimal_places), self.units))
    }

    /// Colour bar plus evenly spaced tick labels over the value domain.
    pub fn legend(&self, width: u32, height: u32, ticks: usize) -> (PixelBuffer, Vec<LegendTick>) {
        (
            render_legend_bar(width, height, &self.palette),
            legend_ticks(self.scale.min, self.scale.max, ticks, self.decimal_places),
        )
    }
}
