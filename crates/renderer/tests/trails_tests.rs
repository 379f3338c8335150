//! Tests for particle trail drawing.

use flow_field::{Particle, ParticleConfig, VectorField};
use lake_common::Grid;
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{draw_particles, PixelBuffer, TrailStyle};
use std::sync::Arc;

// ============================================================================
// Helper functions
// ============================================================================

fn eastward_field() -> Arc<VectorField> {
    Arc::new(
        VectorField::with_square_cells(Grid::filled(32, 32, 1.0), Grid::filled(32, 32, 0.0), 1.0)
            .unwrap(),
    )
}

/// Particle that has moved twice: trail x = 2.5, 6.5, 10.5 at y = 10.5.
fn moved_particle() -> Particle {
    let mut rng = StdRng::seed_from_u64(1);
    let mut particle = Particle::new(2.5, 10.5, 0, eastward_field(), ParticleConfig::default());
    particle.tick(&mut rng);
    particle.tick(&mut rng);
    particle
}

fn assert_channel_near(actual: u8, expected: u8) {
    assert!(
        (actual as i16 - expected as i16).abs() <= 2,
        "channel {} not within 2 of {}",
        actual,
        expected
    );
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_trail_blends_over_opaque_background() {
    let mut buffer = PixelBuffer::new(32, 32);
    buffer.fill([0, 0, 0, 255]);

    let drawn = draw_particles(&mut buffer, &[moved_particle()], (0.0, 0.0), &TrailStyle::default()).unwrap();
    assert_eq!(drawn, 1);

    // drawn segment spans x 6.5..10.5 on row 10
    let px = buffer.pixel(8, 10).unwrap();
    assert_channel_near(px[0], 102);
    assert_channel_near(px[1], 102);
    assert_channel_near(px[2], 102);
    assert_eq!(px[3], 255);

    // oldest point is never part of the rendered trail
    assert_eq!(buffer.pixel(3, 10).unwrap(), [0, 0, 0, 255]);
    assert_eq!(buffer.pixel(8, 20).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn test_trail_on_transparent_background_keeps_color() {
    let mut buffer = PixelBuffer::new(32, 32);
    draw_particles(&mut buffer, &[moved_particle()], (0.0, 0.0), &TrailStyle::default()).unwrap();

    let px = buffer.pixel(8, 10).unwrap();
    assert_channel_near(px[3], 102);
    assert_channel_near(px[0], 255);
}

#[test]
fn test_offset_shifts_trail() {
    let mut buffer = PixelBuffer::new(32, 32);
    buffer.fill([0, 0, 0, 255]);
    draw_particles(&mut buffer, &[moved_particle()], (0.0, 10.0), &TrailStyle::default()).unwrap();

    assert_eq!(buffer.pixel(8, 10).unwrap(), [0, 0, 0, 255]);
    assert_channel_near(buffer.pixel(8, 20).unwrap()[0], 102);
}

#[test]
fn test_single_point_trails_are_skipped() {
    let fresh = Particle::new(5.0, 5.0, 0, eastward_field(), ParticleConfig::default());
    let mut buffer = PixelBuffer::new(16, 16);
    buffer.fill([0, 0, 0, 255]);
    let before = buffer.clone();

    let drawn = draw_particles(&mut buffer, &[fresh.clone(), fresh], (0.0, 0.0), &TrailStyle::default()).unwrap();
    assert_eq!(drawn, 0);
    assert_eq!(buffer, before);
}

#[test]
fn test_empty_buffer_draws_nothing() {
    let mut buffer = PixelBuffer::new(0, 0);
    let drawn = draw_particles(&mut buffer, &[moved_particle()], (0.0, 0.0), &TrailStyle::default()).unwrap();
    assert_eq!(drawn, 0);
}
