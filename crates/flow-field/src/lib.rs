//! Surface current fields and particle advection.
//!
//! A [`VectorField`] holds the `u` (eastward) and `v` (southward in raster
//! space) current components on a regular grid of cells, each `dx x dy` raster
//! units. [`Particle`]s are advected through the field one step per tick and
//! leave a short trail behind them; a [`ParticleSystem`] owns a population of
//! particles sharing one field.

pub mod error;
pub mod particle;
pub mod system;
pub mod vector_field;

pub use error::{FlowError, FlowResult};
pub use particle::{Particle, ParticleConfig};
pub use system::ParticleSystem;
pub use vector_field::VectorField;
