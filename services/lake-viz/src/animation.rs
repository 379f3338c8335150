//! Animated surface flow: particle trails over a speed heatmap.

use flow_field::{ParticleConfig, ParticleSystem, VectorField};
use lake_common::dataset::{ms_to_ft_per_min, round_to};
use lake_common::{Grid, LakeResult};
use metrics::counter;
use renderer::{
    draw_particles, paint_wet_cells, ColorScale, GeographyMask, HeatmapRasterizer, PixelBuffer,
    TrailStyle, ValueScale,
};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Units shown next to legend speeds.
pub const LEGEND_UNITS: &str = "feet per minute";

/// Colouring and particle settings shared by the map and legend boxes.
#[derive(Debug, Clone)]
pub struct FlowStyle {
    pub scale: ValueScale,
    pub palette: ColorScale,
    pub particles: ParticleConfig,
    pub trail: TrailStyle,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
}

impl FlowStyle {
    fn spawn(&self, field: Arc<VectorField>, count: usize) -> LakeResult<ParticleSystem> {
        let system = match self.seed {
            Some(seed) => ParticleSystem::seeded(field, count, self.particles, seed)?,
            None => ParticleSystem::new(field, count, self.particles)?,
        };
        Ok(system)
    }
}

/// Height of a raster `width` pixels wide that keeps the grid's aspect ratio.
pub fn raster_height(width: u32, grid: &Grid) -> u32 {
    let (rows, cols) = grid.shape();
    if cols == 0 {
        return 0;
    }
    ((width as f64 * rows as f64 / cols as f64).round() as u32).max(1)
}

/// The main flow map.
///
/// Each [`tick`](Self::tick) repaints the speed heatmap (cached under the
/// snapshot key after the first frame), strokes every particle's trail, then
/// advances every particle.
pub struct FlowAnimation {
    system: ParticleSystem,
    speeds: Grid,
    rasterizer: HeatmapRasterizer,
    style: FlowStyle,
    background_key: String,
    frame: PixelBuffer,
}

impl FlowAnimation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        u: Grid,
        v: Grid,
        width: u32,
        mask: Arc<GeographyMask>,
        cache_capacity: Option<NonZeroUsize>,
        particle_count: usize,
        style: FlowStyle,
        background_key: impl Into<String>,
    ) -> LakeResult<Self> {
        let height = raster_height(width, &u);
        let cell = width as f64 / u.cols().max(1) as f64;
        let field = Arc::new(VectorField::with_square_cells(u, v, cell)?);
        let speeds = field.speed_grid();
        let system = style.spawn(field, particle_count)?;

        debug!(width, height, cell, particles = particle_count, "Flow animation ready");

        Ok(Self {
            system,
            speeds,
            rasterizer: HeatmapRasterizer::with_capacity(mask, cache_capacity),
            style,
            background_key: background_key.into(),
            frame: PixelBuffer::new(width, height),
        })
    }

    pub fn field(&self) -> &Arc<VectorField> {
        self.system.field()
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn rasterizer(&self) -> &HeatmapRasterizer {
        &self.rasterizer
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Render one frame and advance the particles.
    pub fn tick(&mut self) -> LakeResult<&PixelBuffer> {
        self.frame.fill([0, 0, 0, 0]);
        self.rasterizer.paint(
            &mut self.frame,
            &self.speeds,
            &self.style.scale,
            &self.style.palette,
            Some(&self.background_key),
        )?;
        draw_particles(&mut self.frame, self.system.particles(), (0.0, 0.0), &self.style.trail)?;
        self.system.step();

        counter!("flow_animation_ticks_total").increment(1);
        Ok(&self.frame)
    }

    /// Hover readout for a pointer over the map, e.g. `"12 ft/min"`.
    pub fn hover(&self, x: f64, y: f64) -> Option<String> {
        let (width, height) = self.frame.dimensions();
        self.speeds
            .value_at_pixel(x, y, width as f64, height as f64)
            .map(|speed| format!("{} ft/min", round_to(ms_to_ft_per_min(speed), 0)))
    }
}

/// A legend swatch: one wet cell flowing east at a fixed speed.
pub struct FlowLegendBox {
    speed: f64,
    system: ParticleSystem,
    style: FlowStyle,
    frame: PixelBuffer,
}

impl FlowLegendBox {
    pub fn new(
        speed: f64,
        width: f64,
        aspect: f64,
        particle_count: usize,
        style: FlowStyle,
    ) -> LakeResult<Self> {
        let height = width * aspect;
        let field = Arc::new(VectorField::new(
            Grid::filled(1, 1, speed),
            Grid::filled(1, 1, 0.0),
            width,
            height,
        )?);
        let system = style.spawn(field, particle_count)?;
        let frame = PixelBuffer::new(width.round() as u32, height.round() as u32);
        Ok(Self {
            speed,
            system,
            style,
            frame,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Caption such as `"20 feet per minute"`.
    pub fn label(&self) -> String {
        format!("{} {}", round_to(ms_to_ft_per_min(self.speed), 0), LEGEND_UNITS)
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn tick(&mut self) -> LakeResult<&PixelBuffer> {
        paint_wet_cells(
            &mut self.frame,
            self.system.field(),
            (0.0, 0.0),
            Some((&self.style.scale, &self.style.palette)),
        );
        draw_particles(&mut self.frame, self.system.particles(), (0.0, 0.0), &self.style.trail)?;
        self.system.step();
        Ok(&self.frame)
    }
}
