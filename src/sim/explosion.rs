//! Explosion generator: initial velocity fields for each burst shape
//!
//! Every call draws fresh randomness. Tests seed their own RNG to check
//! geometry, but the engine's generator is fed from OS entropy.

use std::f32::consts::TAU;

use glam::{Mat3, Vec2, Vec3};
use rand::Rng;

use super::particle::Particle;
use crate::config::{ColorSpec, ExplosionShape, FireworkConfig};
use crate::consts::{BASE_BURST_SPEED, MAX_PARTICLE_COUNT};
use crate::math::{jitter, range};

/// Share of a sphere burst that forms the slower, denser core
const SPHERE_CORE_FRACTION: f32 = 0.2;
/// Heart curve max |x| (16 sin^3 t) used to normalize it to unit scale
const HEART_SCALE: f32 = 16.0;
/// Star radius modulation depth and default point count
const STAR_DEPTH: f32 = 0.45;
const STAR_SPIKES: f32 = 5.0;

/// Number of particles a configuration yields at a quality multiplier
pub fn particle_budget(config: &FireworkConfig, quality_multiplier: f32) -> usize {
    let count = config.particle_count.min(MAX_PARTICLE_COUNT) as f32;
    (count * quality_multiplier.max(0.0)).round() as usize
}

/// Uniform direction on the unit sphere (inverse-CDF method)
pub fn sphere_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = TAU * rng.random::<f32>();
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Random tumble: rotate about Y, then about X
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Mat3 {
    let yaw = range(rng, 0.0, TAU);
    let pitch = range(rng, -1.2, 1.2);
    Mat3::from_rotation_x(pitch) * Mat3::from_rotation_y(yaw)
}

/// Sphere: uniform directions, ~20% slower core
pub fn sphere_vectors<R: Rng + ?Sized>(count: usize, speed: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let mut v = sphere_direction(rng) * jitter(rng, speed, 0.8, 1.2);
            if rng.random::<f32>() < SPHERE_CORE_FRACTION {
                v *= range(rng, 0.35, 0.6);
            }
            v
        })
        .collect()
}

/// Burst: spherical directions with wide, ragged speeds
pub fn burst_vectors<R: Rng + ?Sized>(count: usize, speed: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| sphere_direction(rng) * jitter(rng, speed, 0.2, 1.6))
        .collect()
}

/// Ring: equal angular steps in the view plane, optionally tumbled
pub fn ring_vectors<R: Rng + ?Sized>(
    count: usize,
    speed: f32,
    rotation: Option<Mat3>,
    rng: &mut R,
) -> Vec<Vec3> {
    let step = if count > 0 { TAU / count as f32 } else { 0.0 };
    (0..count)
        .map(|i| {
            let angle = i as f32 * step;
            let v = Vec3::new(angle.cos(), angle.sin(), 0.0) * jitter(rng, speed, 0.98, 1.02);
            match rotation {
                Some(m) => m * v,
                None => v,
            }
        })
        .collect()
}

/// Point on the heart curve at parameter `t`, normalized to unit scale
pub fn heart_point(t: f32) -> Vec2 {
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    Vec2::new(x, y) / HEART_SCALE
}

/// Heart: ordered (`t = i/count * 2pi`) or random `t` per particle
pub fn heart_vectors<R: Rng + ?Sized>(
    count: usize,
    speed: f32,
    ordered: bool,
    rotation: Option<Mat3>,
    rng: &mut R,
) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let t = if ordered {
                i as f32 / count as f32 * TAU
            } else {
                range(rng, 0.0, TAU)
            };
            let v = heart_point(t).extend(range(rng, -0.05, 0.05)) * jitter(rng, speed, 0.95, 1.05);
            match rotation {
                Some(m) => m * v,
                None => v,
            }
        })
        .collect()
}

/// Star: polar radius `1 + k sin(angle * spikes)`
pub fn star_vectors<R: Rng + ?Sized>(count: usize, speed: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let angle = range(rng, 0.0, TAU);
            let r = 1.0 + STAR_DEPTH * (angle * STAR_SPIKES).sin();
            let planar = Vec2::new(angle.cos(), angle.sin()) * r / (1.0 + STAR_DEPTH);
            planar.extend(range(rng, -0.1, 0.1)) * jitter(rng, speed, 0.95, 1.05)
        })
        .collect()
}

/// Produces particle batches for bursts
#[derive(Debug, Clone, Copy)]
pub struct ExplosionGenerator {
    /// Quality tier multiplier on particle count
    pub quality_multiplier: f32,
    /// Tumble rings and hearts through a random 3D rotation
    pub tilt: bool,
}

impl Default for ExplosionGenerator {
    fn default() -> Self {
        Self {
            quality_multiplier: 1.0,
            tilt: true,
        }
    }
}

impl ExplosionGenerator {
    pub fn new(quality_multiplier: f32) -> Self {
        Self {
            quality_multiplier,
            ..Default::default()
        }
    }

    /// Velocity field for a shape; `count` vectors, magnitudes around `speed`
    pub fn velocities<R: Rng + ?Sized>(
        &self,
        shape: ExplosionShape,
        count: usize,
        speed: f32,
        rng: &mut R,
    ) -> Vec<Vec3> {
        let rotation = if self.tilt && rng.random_bool(0.7) {
            Some(random_rotation(rng))
        } else {
            None
        };
        match shape {
            ExplosionShape::Sphere | ExplosionShape::Default => sphere_vectors(count, speed, rng),
            ExplosionShape::Burst => burst_vectors(count, speed, rng),
            ExplosionShape::Ring => ring_vectors(count, speed, rotation, rng),
            ExplosionShape::Heart => {
                let ordered = rng.random_bool(0.5);
                heart_vectors(count, speed, ordered, rotation, rng)
            }
            ExplosionShape::Star => star_vectors(count, speed, rng),
        }
    }

    /// `generate(originX, originY, config)`: one particle per velocity vector
    pub fn generate<R: Rng + ?Sized>(
        &self,
        origin: Vec2,
        config: &FireworkConfig,
        rng: &mut R,
    ) -> Vec<Particle> {
        let config = config.sanitized();
        let count = particle_budget(&config, self.quality_multiplier);
        if count == 0 {
            return Vec::new();
        }

        let speed = config.explosion_size * BASE_BURST_SPEED;
        let origin = origin.extend(0.0);
        self.velocities(config.explosion_shape, count, speed, rng)
            .into_iter()
            .map(|vel| {
                let colors =
                    ColorSpec::resolve_pair(config.primary_color, config.secondary_color, rng);
                Particle::new(origin, vel, colors, &config, rng)
            })
            .collect()
    }
}
