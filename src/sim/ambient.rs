//! Burst-driven lighting state: ambient tint and full-frame sky flash
//!
//! Written only by the compositor's frame advance, read only by the painter.

use crate::consts::{AMBIENT_DECAY, SKY_FLASH_DECAY, SKY_FLASH_ON_BURST};
use crate::decay_factor;
use crate::math::Rgb;

/// Intensities below this snap to zero
const CUTOFF: f32 = 0.005;

/// Decaying tint sourced from the most recent burst's color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            intensity: 0.0,
        }
    }
}

impl AmbientLight {
    /// A burst sets the color; bigger shells light the sky more
    pub fn ignite(&mut self, color: Rgb, explosion_size: f32) {
        self.color = color;
        self.intensity = (0.6 + 0.2 * explosion_size).clamp(0.0, 1.0);
    }

    pub fn decay(&mut self, step: f32) {
        self.intensity *= decay_factor(AMBIENT_DECAY, step);
        if self.intensity < CUTOFF {
            self.intensity = 0.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Short full-frame flash on every burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyFlash {
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for SkyFlash {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 0.0,
        }
    }
}

impl SkyFlash {
    pub fn trigger(&mut self, color: Rgb) {
        self.color = color.lerp(Rgb::WHITE, 0.6);
        self.intensity = SKY_FLASH_ON_BURST;
    }

    pub fn decay(&mut self, step: f32) {
        self.intensity *= decay_factor(SKY_FLASH_DECAY, step);
        if self.intensity < CUTOFF {
            self.intensity = 0.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_fixed_on_burst_and_decays_to_zero() {
        let mut flash = SkyFlash::default();
        flash.trigger(Rgb::new(255, 0, 0));
        assert_eq!(flash.intensity, SKY_FLASH_ON_BURST);
        flash.decay(1.0);
        assert!((flash.intensity - SKY_FLASH_ON_BURST * SKY_FLASH_DECAY).abs() < 1e-6);
        for _ in 0..200 {
            flash.decay(1.0);
        }
        assert_eq!(flash.intensity, 0.0);
    }

    #[test]
    fn test_ambient_takes_latest_color() {
        let mut ambient = AmbientLight::default();
        ambient.ignite(Rgb::new(255, 0, 0), 1.0);
        ambient.decay(1.0);
        ambient.ignite(Rgb::new(0, 0, 255), 1.0);
        assert_eq!(ambient.color, Rgb::new(0, 0, 255));
        assert!((ambient.intensity - 0.8).abs() < 1e-6);
        ambient.reset();
        assert_eq!(ambient.intensity, 0.0);
    }
}
