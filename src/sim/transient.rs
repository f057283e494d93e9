//! Decorative transients: shockwave rings and falling sparks
//!
//! Same ownership pattern as particles (owned by the compositor, removed the
//! frame they die) but flat 2D physics and no trail.

use glam::Vec2;
use rand::Rng;

use crate::math::{Rgb, range};

/// Alpha under which a transient is discarded
pub const TRANSIENT_DEAD_ALPHA: f32 = 0.01;

/// Expanding ring emitted at the burst origin
#[derive(Debug, Clone)]
pub struct Shockwave {
    pub center: Vec2,
    pub radius: f32,
    /// Radius gained per frame (slows over time)
    pub growth: f32,
    pub alpha: f32,
    pub decay: f32,
    pub color: Rgb,
}

impl Shockwave {
    pub fn new(center: Vec2, explosion_size: f32, color: Rgb) -> Self {
        Self {
            center,
            radius: 4.0,
            growth: 7.0 * explosion_size.max(0.2),
            alpha: 0.6,
            decay: 0.03,
            color,
        }
    }

    pub fn update(&mut self, step: f32) {
        self.radius += self.growth * step;
        self.growth *= 0.94_f32.powf(step);
        self.alpha -= self.decay * step;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= TRANSIENT_DEAD_ALPHA
    }
}

/// A small falling ember
#[derive(Debug, Clone)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alpha: f32,
    pub decay: f32,
    pub color: Rgb,
    pub size: f32,
}

impl Spark {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, vel: Vec2, color: Rgb, rng: &mut R) -> Self {
        Self {
            pos,
            vel,
            alpha: range(rng, 0.6, 1.0),
            decay: range(rng, 0.03, 0.06),
            color,
            size: range(rng, 0.8, 1.5),
        }
    }

    pub fn update(&mut self, step: f32) {
        self.vel *= 0.97_f32.powf(step);
        self.vel.y += 0.05 * step;
        self.pos += self.vel * step;
        self.alpha -= self.decay * step;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= TRANSIENT_DEAD_ALPHA
    }
}
