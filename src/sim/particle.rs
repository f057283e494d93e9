//! Post-burst particles and the trail history they carry

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::config::FireworkConfig;
use crate::consts::{COLOR_FADE_THRESHOLD, PARTICLE_TRAIL_CAPACITY};
use crate::math::{Rgb, range};

/// Fixed-capacity FIFO of recent positions (oldest first)
#[derive(Debug, Clone)]
pub struct TrailHistory<T> {
    points: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> TrailHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a sample, dropping the oldest beyond capacity
    pub fn push(&mut self, point: T) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.points.iter()
    }

    /// The newest `n` samples, oldest first
    pub fn newest(&self, n: usize) -> impl Iterator<Item = &T> {
        self.points.iter().skip(self.points.len().saturating_sub(n))
    }
}

/// A single burst particle
#[derive(Debug, Clone)]
pub struct Particle {
    /// x/y in screen space, z is depth (projection only)
    pub pos: Vec3,
    pub vel: Vec3,
    pub primary: Rgb,
    pub secondary: Rgb,
    /// Starts at 1.0, strictly decreasing
    pub alpha: f32,
    /// Alpha lost per frame
    pub decay: f32,
    /// Downward velocity gained per frame
    pub gravity: f32,
    /// Per-frame velocity retention
    pub drag: f32,
    /// Core radius in pixels at depth 0
    pub size: f32,
    pub trail: TrailHistory<Vec3>,
    pub flicker_rate: f32,
    pub flicker_phase: f32,
}

impl Particle {
    /// Seed a particle from a burst configuration with independent jitter
    pub fn new<R: Rng + ?Sized>(
        origin: Vec3,
        vel: Vec3,
        colors: (Rgb, Rgb),
        config: &FireworkConfig,
        rng: &mut R,
    ) -> Self {
        Self {
            pos: origin,
            vel,
            primary: colors.0,
            secondary: colors.1,
            alpha: 1.0,
            decay: config.decay * range(rng, 0.7, 1.3),
            gravity: config.gravity * range(rng, 0.8, 1.2),
            drag: range(rng, 0.92, 0.96),
            size: range(rng, 1.4, 2.4),
            trail: TrailHistory::new(PARTICLE_TRAIL_CAPACITY),
            flicker_rate: range(rng, 8.0, 20.0),
            flicker_phase: range(rng, 0.0, std::f32::consts::TAU),
        }
    }

    /// Advance by `step` reference frames
    pub fn update(&mut self, step: f32) {
        self.trail.push(self.pos);

        self.vel *= self.drag.powf(step);
        self.vel.y += self.gravity * step;
        self.pos += self.vel * step;

        self.alpha -= self.decay * step;
    }

    /// Primary while bright, secondary past the fade point
    pub fn color(&self) -> Rgb {
        if self.alpha >= COLOR_FADE_THRESHOLD {
            self.primary
        } else {
            self.secondary
        }
    }

    /// Flicker multiplier for drawn alpha, active once the particle is fading
    pub fn flicker(&self, clock: f32) -> f32 {
        if self.alpha >= COLOR_FADE_THRESHOLD {
            1.0
        } else {
            0.6 + 0.4 * (clock * self.flicker_rate + self.flicker_phase).sin()
        }
    }

    pub fn is_dead(&self, dead_alpha: f32) -> bool {
        self.alpha <= dead_alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn particle(config: &FireworkConfig) -> Particle {
        let mut rng = Pcg32::seed_from_u64(1);
        Particle::new(
            Vec3::new(100.0, 100.0, 0.0),
            Vec3::new(3.0, -2.0, 1.0),
            (Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)),
            config,
            &mut rng,
        )
    }

    #[test]
    fn test_trail_history_drops_oldest() {
        let mut trail = TrailHistory::new(3);
        for i in 0..5 {
            trail.push(i);
        }
        assert_eq!(trail.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(trail.newest(2).copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(trail.newest(10).count(), 3);
    }

    #[test]
    fn test_update_integrates_drag_and_gravity() {
        let config = FireworkConfig::default();
        let mut p = particle(&config);
        let start = p.pos;
        let vel = p.vel;
        p.update(1.0);

        let expected_vel = Vec3::new(vel.x * p.drag, vel.y * p.drag + p.gravity, vel.z * p.drag);
        assert!((p.vel - expected_vel).length() < 1e-5);
        assert!((p.pos - (start + expected_vel)).length() < 1e-5);
        assert_eq!(p.trail.len(), 1);
        assert!(p.drag >= 0.92 && p.drag < 0.96);
    }

    #[test]
    fn test_color_switches_at_fade_point() {
        let config = FireworkConfig::default();
        let mut p = particle(&config);
        assert_eq!(p.color(), p.primary);
        assert_eq!(p.flicker(1.0), 1.0);
        p.alpha = COLOR_FADE_THRESHOLD - 0.01;
        assert_eq!(p.color(), p.secondary);
        let f = p.flicker(1.0);
        assert!((0.2..=1.0).contains(&f));
    }

    #[test]
    fn test_trail_is_bounded() {
        let config = FireworkConfig::default();
        let mut p = particle(&config);
        for _ in 0..50 {
            p.update(1.0);
        }
        assert_eq!(p.trail.len(), PARTICLE_TRAIL_CAPACITY);
    }

    proptest! {
        #[test]
        fn prop_alpha_strictly_decreases(decay in 0.002f32..0.1, step in 0.25f32..3.0) {
            let config = FireworkConfig { decay, ..Default::default() };
            let mut p = particle(&config);
            let mut prev = p.alpha;
            while !p.is_dead(0.02) {
                p.update(step);
                prop_assert!(p.alpha < prev);
                prev = p.alpha;
            }
        }
    }
}
