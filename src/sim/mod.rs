//! Simulation entities
//!
//! Rockets, particles and decorative transients each own their kinematic
//! state. Rates are per reference frame and scaled by the caller's step;
//! randomness is always drawn from the caller's RNG.

pub mod ambient;
pub mod explosion;
pub mod particle;
pub mod projection;
pub mod rocket;
pub mod transient;

pub use ambient::{AmbientLight, SkyFlash};
pub use explosion::{ExplosionGenerator, particle_budget};
pub use particle::{Particle, TrailHistory};
pub use projection::{Projected, Projection};
pub use rocket::{Rocket, RocketPhase};
pub use transient::{Shockwave, Spark};
