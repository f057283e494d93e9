//! Starfield: density proportional to viewport area, twinkling on the sim clock

use glam::Vec2;
use rand::Rng;

use crate::consts::{STAR_AREA_QUOTA, STAR_SKY_FRACTION};
use crate::math::range;

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub base_alpha: f32,
    /// Radians per second
    pub twinkle_speed: f32,
    pub phase: f32,
}

impl Star {
    /// Smooth sinusoidal twinkle
    pub fn brightness(&self, clock: f32) -> f32 {
        self.base_alpha * (0.65 + 0.35 * (clock * self.twinkle_speed + self.phase).sin())
    }

    /// Two-level twinkle for the wireframe look
    pub fn brightness_stepped(&self, clock: f32) -> f32 {
        if (clock * self.twinkle_speed + self.phase).sin() > 0.7 {
            self.base_alpha * 0.35
        } else {
            self.base_alpha
        }
    }
}

/// Number of stars for a viewport (one per `STAR_AREA_QUOTA` px^2)
pub fn star_count(width: f32, height: f32) -> usize {
    if width <= 0.0 || height <= 0.0 {
        return 0;
    }
    (width * height / STAR_AREA_QUOTA).floor() as usize
}

pub fn generate_stars<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Vec<Star> {
    let sky_height = height * STAR_SKY_FRACTION;
    (0..star_count(width, height))
        .map(|_| {
            // Bias toward the top where the sky is darkest
            let y = sky_height * rng.random::<f32>().powf(1.4);
            Star {
                pos: Vec2::new(range(rng, 0.0, width), y),
                size: range(rng, 0.5, 1.6),
                base_alpha: range(rng, 0.3, 0.9),
                twinkle_speed: range(rng, 0.8, 3.0),
                phase: range(rng, 0.0, std::f32::consts::TAU),
            }
        })
        .collect()
}
