//! Drifting cloud clusters (optional layer)

use glam::Vec2;
use rand::Rng;

use crate::math::range;

/// Approximate width covered by one cluster
const CLUSTER_SPACING: f32 = 320.0;

#[derive(Debug, Clone, Copy)]
pub struct CloudPuff {
    pub offset: Vec2,
    pub radius: f32,
}

/// A cluster of soft circles drifting right, wrapping around the viewport
#[derive(Debug, Clone)]
pub struct Cloud {
    pub origin: Vec2,
    /// Pixels per second
    pub speed: f32,
    pub alpha: f32,
    pub puffs: Vec<CloudPuff>,
    /// Half-width of the cluster including puff radii
    pub extent: f32,
}

impl Cloud {
    /// Cluster center at `clock` seconds, wrapped so it re-enters from the left
    pub fn position(&self, clock: f32, width: f32) -> Vec2 {
        let span = width + 2.0 * self.extent;
        if span <= 0.0 {
            return self.origin;
        }
        let x = (self.origin.x + self.extent + self.speed * clock).rem_euclid(span) - self.extent;
        Vec2::new(x, self.origin.y)
    }
}

pub fn generate_clouds<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Vec<Cloud> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let count = ((width / CLUSTER_SPACING).ceil() as usize).max(1);
    (0..count)
        .map(|_| {
            let puffs: Vec<CloudPuff> = (0..rng.random_range(5..=9))
                .map(|_| CloudPuff {
                    offset: Vec2::new(range(rng, -70.0, 70.0), range(rng, -14.0, 14.0)),
                    radius: range(rng, 22.0, 48.0),
                })
                .collect();
            let extent = puffs
                .iter()
                .map(|p| p.offset.x.abs() + p.radius)
                .fold(0.0_f32, f32::max);
            Cloud {
                origin: Vec2::new(range(rng, 0.0, width), height * range(rng, 0.08, 0.4)),
                speed: range(rng, 3.0, 12.0),
                alpha: range(rng, 0.05, 0.12),
                puffs,
                extent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cloud_wraps_around() {
        let mut rng = Pcg32::seed_from_u64(1);
        let clouds = generate_clouds(800.0, 600.0, &mut rng);
        assert!(!clouds.is_empty());
        let cloud = &clouds[0];
        let span = 800.0 + 2.0 * cloud.extent;
        let period = span / cloud.speed;
        for i in 0..200 {
            let t = i as f32 * 1.7;
            let p = cloud.position(t, 800.0);
            assert!(p.x >= -cloud.extent - 1e-3 && p.x <= 800.0 + cloud.extent + 1e-3);
        }
        let a = cloud.position(3.0, 800.0);
        let b = cloud.position(3.0 + period, 800.0);
        let diff = (a.x - b.x).abs();
        assert!(diff < 0.05 || (diff - span).abs() < 0.05);
    }

    #[test]
    fn test_empty_viewport_has_no_clouds() {
        let mut rng = Pcg32::seed_from_u64(2);
        assert!(generate_clouds(0.0, 600.0, &mut rng).is_empty());
    }
}
