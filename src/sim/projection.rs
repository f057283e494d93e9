//! Perspective-style projection of particle depth onto the screen plane

use glam::{Vec2, Vec3};

use crate::consts::FOCAL_LENGTH;

/// Depth can't push the denominator below this fraction of the focal length
const MIN_DEPTH_RATIO: f32 = 0.1;

/// Projected screen position and apparent size multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub pos: Vec2,
    pub scale: f32,
}

/// `scale = f / (f + z)`, applied around the viewport center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub focal_length: f32,
    pub center: Vec2,
}

impl Projection {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            focal_length: FOCAL_LENGTH,
            center: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Apparent size multiplier for depth `z` (positive z is farther away)
    #[inline]
    pub fn scale(&self, z: f32) -> f32 {
        let denom = (self.focal_length + z).max(self.focal_length * MIN_DEPTH_RATIO);
        self.focal_length / denom
    }

    #[inline]
    pub fn project(&self, p: Vec3) -> Projected {
        let scale = self.scale(p.z);
        let pos = (p.truncate() - self.center) * scale + self.center;
        Projected { pos, scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_depth_is_identity() {
        let proj = Projection::new(800.0, 600.0);
        let p = proj.project(Vec3::new(123.0, 45.0, 0.0));
        assert!((p.pos - Vec2::new(123.0, 45.0)).length() < 1e-4);
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn test_depth_pulls_toward_center() {
        let proj = Projection::new(800.0, 600.0);
        let far = proj.project(Vec3::new(600.0, 100.0, FOCAL_LENGTH));
        assert!((far.scale - 0.5).abs() < 1e-6);
        assert!((far.pos - Vec2::new(500.0, 200.0)).length() < 1e-3);

        let near = proj.project(Vec3::new(600.0, 100.0, -FOCAL_LENGTH / 2.0));
        assert!(near.scale > 1.0);
    }

    #[test]
    fn test_extreme_depth_stays_finite() {
        let proj = Projection::new(800.0, 600.0);
        let p = proj.project(Vec3::new(10.0, 10.0, -10.0 * FOCAL_LENGTH));
        assert!(p.scale.is_finite());
        assert!(p.pos.is_finite());
    }
}
