//! Ascending rockets

use glam::Vec2;
use rand::Rng;

use super::particle::TrailHistory;
use super::transient::Spark;
use crate::config::{ColorSpec, FireworkConfig};
use crate::consts::{ROCKET_BURST_SPEED, ROCKET_GRAVITY, ROCKET_TRAIL_CAPACITY};
use crate::math::{Rgb, range};

/// Rocket lifecycle; `Exploded` is terminal and consumed the frame it is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocketPhase {
    Ascending,
    Exploded,
}

/// A rocket climbing toward its burst altitude
#[derive(Debug, Clone)]
pub struct Rocket {
    pub pos: Vec2,
    pub vel: Vec2,
    pub config: FireworkConfig,
    pub trail: TrailHistory<Vec2>,
    pub phase: RocketPhase,
    /// Altitude (screen y) that triggers the burst if reached before apex
    pub target_y: f32,
    launch_y: f32,
    drift: f32,
    wobble_amp: f32,
    wobble_phase: f32,
}

impl Rocket {
    /// Launch from `(x, ground_y)` toward a random altitude in the upper sky
    pub fn launch<R: Rng + ?Sized>(
        x: f32,
        ground_y: f32,
        viewport_height: f32,
        config: FireworkConfig,
        rng: &mut R,
    ) -> Self {
        let target_y = viewport_height * range(rng, 0.12, 0.4);
        let climb = (ground_y - target_y).max(1.0);
        // Enough speed to reach roughly the target; the slower ones burst at apex instead
        let speed = (2.0 * ROCKET_GRAVITY * climb).sqrt() * range(rng, 0.95, 1.1);

        Self {
            pos: Vec2::new(x, ground_y),
            vel: Vec2::new(0.0, -speed),
            config,
            trail: TrailHistory::new(ROCKET_TRAIL_CAPACITY),
            phase: RocketPhase::Ascending,
            target_y,
            launch_y: ground_y,
            drift: range(rng, -0.4, 0.4),
            wobble_amp: range(rng, 0.1, 0.35),
            wobble_phase: range(rng, 0.0, std::f32::consts::TAU),
        }
    }

    /// Advance by `step` reference frames
    pub fn update(&mut self, step: f32) {
        if self.phase == RocketPhase::Exploded {
            return;
        }
        self.trail.push(self.pos);

        let altitude = self.launch_y - self.pos.y;
        self.vel.x = self.drift + self.wobble_amp * (altitude * 0.05 + self.wobble_phase).sin();

        self.pos += self.vel * step;
        self.vel.y += ROCKET_GRAVITY * step;

        if self.vel.y > -ROCKET_BURST_SPEED || self.pos.y <= self.target_y {
            self.phase = RocketPhase::Exploded;
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.phase == RocketPhase::Exploded
    }

    /// Head color: the primary color, or warm white for rainbow shells
    pub fn head_color(&self) -> Rgb {
        match self.config.primary_color {
            ColorSpec::Solid(c) => c.lerp(Rgb::WHITE, 0.5),
            ColorSpec::Rainbow => Rgb::new(255, 240, 200),
        }
    }

    /// Occasionally drop a falling spark behind the rocket
    pub fn shed_spark<R: Rng + ?Sized>(&self, step: f32, rng: &mut R) -> Option<Spark> {
        if self.is_exploded() || rng.random::<f32>() > 0.4 * step {
            return None;
        }
        let vel = Vec2::new(range(rng, -0.6, 0.6), self.vel.y * 0.1 + range(rng, 0.2, 0.8));
        Some(Spark::new(self.pos, vel, Rgb::new(255, 200, 120), rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rocket_climbs_then_bursts() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            let mut rocket = Rocket::launch(400.0, 700.0, 760.0, FireworkConfig::default(), &mut rng);
            assert!(rocket.vel.y < 0.0);
            let mut frames = 0;
            let mut last_y = rocket.pos.y;
            while !rocket.is_exploded() {
                rocket.update(1.0);
                assert!(rocket.pos.y < last_y, "rocket must keep climbing until burst");
                last_y = rocket.pos.y;
                frames += 1;
                assert!(frames < 1000, "rocket never burst");
            }
            // Burst near the target altitude or near apex
            assert!(rocket.pos.y <= rocket.target_y || rocket.vel.y > -ROCKET_BURST_SPEED);
        }
    }

    #[test]
    fn test_exploded_rocket_is_frozen() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut rocket = Rocket::launch(100.0, 500.0, 600.0, FireworkConfig::default(), &mut rng);
        rocket.phase = RocketPhase::Exploded;
        let pos = rocket.pos;
        rocket.update(1.0);
        assert_eq!(rocket.pos, pos);
        assert!(rocket.shed_spark(1.0, &mut rng).is_none());
    }

    #[test]
    fn test_zero_particle_config_still_flies() {
        let mut rng = Pcg32::seed_from_u64(9);
        let config = FireworkConfig {
            particle_count: 0,
            ..Default::default()
        };
        let mut rocket = Rocket::launch(100.0, 500.0, 600.0, config, &mut rng);
        for _ in 0..1000 {
            rocket.update(1.0);
        }
        assert!(rocket.is_exploded());
        assert_eq!(rocket.trail.len(), rocket.trail.capacity());
    }
}
