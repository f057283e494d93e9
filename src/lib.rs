//! Skyburst - real-time fireworks over a procedural night skyline
//!
//! Core modules:
//! - `sim`: Entity models (rockets, particles, transients) and the explosion generator
//! - `scene`: Procedural backdrop (stars, skyline, clouds), regenerated on resize
//! - `renderer`: Draw list building for both visual styles and the WebGPU pipeline
//! - `audio`: Procedurally synthesized launch/explosion cues
//! - `compositor`: The per-frame driver
//! - `engine`: Facade consumed by the host application

pub mod audio;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use audio::{AudioBackend, AudioManager, NullAudio, SoundCue};
pub use compositor::{Compositor, FrameStats};
pub use config::{ColorSpec, ExplosionShape, FireworkConfig};
pub use engine::Engine;
pub use math::Rgb;
pub use settings::{QualityPreset, Settings, VisualStyle};

/// Engine tuning constants
///
/// Rates are expressed per 60 Hz reference frame and scaled by the frame step.
pub mod consts {
    /// Reference frame rate that per-frame rates are tuned against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Frame step bounds (in reference frames) so a stalled tab can't explode the sim
    pub const MIN_FRAME_STEP: f32 = 0.25;
    pub const MAX_FRAME_STEP: f32 = 3.0;

    /// Perspective focal length (pixels)
    pub const FOCAL_LENGTH: f32 = 400.0;

    /// Explosion speed for `explosion_size == 1.0` (pixels per frame)
    pub const BASE_BURST_SPEED: f32 = 6.0;
    /// Alpha below which the secondary color takes over
    pub const COLOR_FADE_THRESHOLD: f32 = 0.45;
    /// Trail samples kept per particle
    pub const PARTICLE_TRAIL_CAPACITY: usize = 6;
    /// Trail samples kept per rocket
    pub const ROCKET_TRAIL_CAPACITY: usize = 10;

    /// Configuration bounds (applied before the quality multiplier)
    pub const MAX_PARTICLE_COUNT: u32 = 500;
    pub const MIN_EXPLOSION_SIZE: f32 = 0.1;
    pub const MAX_EXPLOSION_SIZE: f32 = 3.0;
    pub const MIN_DECAY: f32 = 0.002;
    pub const MAX_DECAY: f32 = 0.1;
    pub const MAX_GRAVITY: f32 = 0.5;

    /// Rocket gravity (pixels per frame^2)
    pub const ROCKET_GRAVITY: f32 = 0.12;
    /// Rocket bursts once its upward speed falls under this (pixels per frame)
    pub const ROCKET_BURST_SPEED: f32 = 1.0;

    /// Value the sky flash is set to on every burst
    pub const SKY_FLASH_ON_BURST: f32 = 0.35;
    /// Per-frame multiplicative decay of the sky flash
    pub const SKY_FLASH_DECAY: f32 = 0.88;
    /// Per-frame multiplicative decay of ambient light
    pub const AMBIENT_DECAY: f32 = 0.96;

    /// Fraction of viewport height taken by the water band under the skyline
    pub const WATER_FRACTION: f32 = 0.08;
    /// Viewport area (px^2) per generated star
    pub const STAR_AREA_QUOTA: f32 = 2400.0;
    /// Stars live in the upper part of the sky
    pub const STAR_SKY_FRACTION: f32 = 0.7;

    /// Decorative spark cap
    pub const MAX_SPARKS: usize = 600;
}

/// Convert a frame delta in seconds to a step in reference frames
#[inline]
pub fn frame_step(dt: f32) -> f32 {
    (dt * consts::REFERENCE_FPS).clamp(consts::MIN_FRAME_STEP, consts::MAX_FRAME_STEP)
}

/// Multiplicative per-frame decay applied over a fractional number of frames
#[inline]
pub fn decay_factor(per_frame: f32, step: f32) -> f32 {
    per_frame.powf(step)
}
