//! Advected particles with short trails.

use crate::{FlowError, FlowResult, VectorField};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Arc;

/// Particle lifetime and motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    /// Ticks before a particle is respawned
    pub max_age: u32,
    /// Maximum number of points in a rendered trail
    pub max_history: usize,
    /// Raster units moved per unit of flow per tick
    pub speed_scale: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_age: 50,
            max_history: 8,
            speed_scale: 4.0,
        }
    }
}

impl ParticleConfig {
    /// Upper bound (exclusive) of the age assigned on respawn.
    pub fn reset_age_bound(&self) -> u32 {
        self.max_age.saturating_sub(10)
    }
}

/// A point moving through a shared [`VectorField`].
///
/// The trail holds raster positions oldest first, newest last. Only the
/// points a render can reach are retained.
#[derive(Debug, Clone)]
pub struct Particle {
    trail: VecDeque<(f64, f64)>,
    age: u32,
    field: Arc<VectorField>,
    config: ParticleConfig,
}

impl Particle {
    /// Particle at an explicit position and age.
    pub fn new(x: f64, y: f64, age: u32, field: Arc<VectorField>, config: ParticleConfig) -> Self {
        let mut trail = VecDeque::with_capacity(config.max_history + 1);
        trail.push_back((x, y));
        Self {
            trail,
            age,
            field,
            config,
        }
    }

    /// Particle spawned at a random wet point with a random age.
    pub fn new_random<R: Rng + ?Sized>(
        field: Arc<VectorField>,
        config: ParticleConfig,
        rng: &mut R,
    ) -> FlowResult<Self> {
        let mut particle = Self::new(0.0, 0.0, 0, field, config);
        if !particle.reset_random(rng) {
            return Err(FlowError::NoWetCells);
        }
        Ok(particle)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn field(&self) -> &Arc<VectorField> {
        &self.field
    }

    /// Newest position.
    pub fn position(&self) -> (f64, f64) {
        // the trail is never empty
        self.trail.back().copied().unwrap_or((0.0, 0.0))
    }

    /// Retained trail, oldest first.
    pub fn history(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.trail.iter().copied()
    }

    /// Respawn at a random wet point with age in `[0, max_age - 10)`.
    /// Returns false (and leaves the particle untouched) if the field has no
    /// wet cells.
    pub fn reset_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(point) = self.field.random_point(rng) else {
            return false;
        };
        self.trail.clear();
        self.trail.push_back(point);
        let bound = self.config.reset_age_bound();
        self.age = if bound == 0 { 0 } else { rng.gen_range(0..bound) };
        true
    }

    pub fn needs_reset(&self) -> bool {
        let (x, y) = self.position();
        self.age > self.config.max_age || self.field.out_of_bounds(x, y)
    }

    /// Advance one tick: respawn if too old or off the wet area, otherwise
    /// step along the local flow.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.needs_reset() {
            self.reset_random(rng);
            return;
        }

        let (x, y) = self.position();
        let (u, v) = self.field.get_flow(x, y);
        let scale = self.config.speed_scale;
        self.trail.push_back((x + u * scale, y + v * scale));
        if self.trail.len() > self.config.max_history + 1 {
            self.trail.pop_front();
        }
        self.age += 1;
    }

    /// Polyline to draw, newest point first.
    ///
    /// Walks the trail from the newest point down to index
    /// `max(1, len - max_history)`, so at most `max_history` points are
    /// returned and the oldest segments drop off.
    pub fn render_trail(&self) -> Vec<(f64, f64)> {
        let len = self.trail.len();
        let end = len.saturating_sub(self.config.max_history).max(1);
        let mut points = Vec::with_capacity(self.config.max_history);
        points.push(self.position());
        for k in (end..len.saturating_sub(1)).rev() {
            points.push(self.trail[k]);
        }
        points
    }
}
