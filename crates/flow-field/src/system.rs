//! A population of particles sharing one field.

use crate::{FlowResult, Particle, ParticleConfig, VectorField};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;

/// Owns `n` particles advected through the same [`VectorField`] and the RNG
/// used for spawning them.
#[derive(Debug)]
pub struct ParticleSystem {
    field: Arc<VectorField>,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    /// Spawn `count` particles using an entropy-seeded RNG.
    pub fn new(field: Arc<VectorField>, count: usize, config: ParticleConfig) -> FlowResult<Self> {
        Self::with_rng(field, count, config, StdRng::from_entropy())
    }

    /// Spawn `count` particles with a fixed seed, for reproducible runs.
    pub fn seeded(
        field: Arc<VectorField>,
        count: usize,
        config: ParticleConfig,
        seed: u64,
    ) -> FlowResult<Self> {
        Self::with_rng(field, count, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        field: Arc<VectorField>,
        count: usize,
        config: ParticleConfig,
        mut rng: StdRng,
    ) -> FlowResult<Self> {
        let particles = (0..count)
            .map(|_| Particle::new_random(field.clone(), config, &mut rng))
            .collect::<FlowResult<Vec<_>>>()?;

        debug!(
            particles = particles.len(),
            wet_cells = field.wet_cells().len(),
            "Spawned particle system"
        );

        Ok(Self {
            field,
            particles,
            rng,
        })
    }

    pub fn field(&self) -> &Arc<VectorField> {
        &self.field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every particle one tick.
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.tick(&mut self.rng);
        }
    }
}
