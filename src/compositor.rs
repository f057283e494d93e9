//! Per-frame driver
//!
//! One call to [`Compositor::frame`] paints the backdrop, advances every live
//! entity, draws it, and drops it the same frame it dies. Layer order is
//! sky -> stars/clouds -> skyline -> water -> flash -> entities (additive).

use rand::Rng;

use crate::audio::{AudioBackend, AudioManager, SoundCue};
use crate::config::{ColorSpec, FireworkConfig};
use crate::consts::{MAX_SPARKS, REFERENCE_FPS};
use crate::frame_step;
use crate::math::Rgb;
use crate::renderer::{DrawList, Painter};
use crate::scene::Scene;
use crate::settings::Settings;
use crate::sim::{AmbientLight, ExplosionGenerator, Particle, Rocket, Shockwave, SkyFlash, Spark};

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Live counts after the frame
    pub rockets: usize,
    pub particles: usize,
    /// Shockwaves + sparks
    pub transients: usize,
    /// Entities that emitted geometry this frame
    pub drawn: usize,
    /// Rockets that burst this frame
    pub bursts: usize,
    /// Sound cues scheduled this frame
    pub sounds: usize,
}

#[derive(Default)]
pub struct Compositor {
    scene: Scene,
    rockets: Vec<Rocket>,
    /// Oldest first, so eviction drains from the front
    particles: Vec<Particle>,
    shockwaves: Vec<Shockwave>,
    sparks: Vec<Spark>,
    ambient: AmbientLight,
    flash: SkyFlash,
    /// Simulation seconds; drives twinkle, flicker, blink and drift
    clock: f32,
    generator: ExplosionGenerator,
    draw_list: DrawList,
    /// Next frame starts from a clean buffer
    wipe: bool,
}

/// Drop the oldest entries beyond `cap`
fn evict_oldest<T>(items: &mut Vec<T>, cap: usize) -> usize {
    let excess = items.len().saturating_sub(cap);
    if excess > 0 {
        items.drain(..excess);
    }
    excess
}

/// Tint for ambient light, flash and shockwave
fn burst_color(config: &FireworkConfig, batch: &[Particle]) -> Rgb {
    match config.primary_color {
        ColorSpec::Solid(c) => c,
        ColorSpec::Rainbow => batch.first().map_or(Rgb::WHITE, |p| p.primary),
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ambient(&self) -> AmbientLight {
        self.ambient
    }

    pub fn flash(&self) -> SkyFlash {
        self.flash
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn entity_count(&self) -> usize {
        self.rockets.len() + self.particles.len() + self.shockwaves.len() + self.sparks.len()
    }

    /// Regenerate the backdrop for a new viewport; in-flight entities survive
    pub fn resize<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) {
        self.scene = Scene::generate(width, height, rng);
        self.wipe = true;
    }

    /// Start the next frame from a clean buffer without touching entities
    pub fn clear_buffer(&mut self) {
        self.wipe = true;
    }

    /// Empty every live collection and reset lighting. Idempotent.
    pub fn clear(&mut self) {
        self.rockets.clear();
        self.particles.clear();
        self.shockwaves.clear();
        self.sparks.clear();
        self.ambient.reset();
        self.flash.reset();
        self.wipe = true;
    }

    /// Advance and draw one frame of `dt` seconds
    pub fn frame<B: AudioBackend, R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        settings: &Settings,
        audio: &mut AudioManager<B>,
        rng: &mut R,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        if self.scene.is_empty() {
            return stats;
        }

        let step = frame_step(dt);
        self.clock += step / REFERENCE_FPS;
        self.ambient.decay(step);
        self.flash.decay(step);
        self.generator.quality_multiplier = settings.quality.particle_multiplier();

        let quality = settings.quality;
        let dead_alpha = settings.style.dead_alpha();
        let mut painter = Painter::begin(
            &mut self.draw_list,
            &self.scene,
            settings.style,
            quality,
            self.clock,
        );
        if std::mem::take(&mut self.wipe) {
            painter.wipe();
        }

        // Backdrop
        painter.sky(&self.ambient);
        painter.stars(&self.scene.stars);
        if settings.clouds {
            painter.clouds(&self.scene.clouds, &self.ambient);
        }
        painter.skyline(&self.scene.skyline, &self.ambient);
        painter.water(&self.ambient);
        painter.flash(&self.flash);

        // Rockets: a burst replaces the rocket with its particles in the same frame
        let generator = self.generator;
        let particles = &mut self.particles;
        let shockwaves = &mut self.shockwaves;
        let sparks = &mut self.sparks;
        let ambient = &mut self.ambient;
        let flash = &mut self.flash;
        self.rockets.retain_mut(|rocket| {
            rocket.update(step);
            if let Some(spark) = rocket.shed_spark(step, rng) {
                sparks.push(spark);
            }
            if painter.rocket(rocket) {
                stats.drawn += 1;
            }
            if !rocket.is_exploded() {
                return true;
            }

            let batch = generator.generate(rocket.pos, &rocket.config, rng);
            let color = burst_color(&rocket.config, &batch);
            let size = rocket.config.sanitized().explosion_size;
            log::debug!(
                "Burst '{}' ({}) at {:?}: {} particles",
                rocket.config.name,
                rocket.config.explosion_shape.as_str(),
                rocket.pos,
                batch.len()
            );

            particles.extend(batch);
            let evicted = evict_oldest(particles, quality.max_particles());
            if evicted > 0 {
                log::debug!("Particle ceiling reached, evicted {}", evicted);
            }
            if quality.shockwaves_enabled() {
                shockwaves.push(Shockwave::new(rocket.pos, size, color));
            }
            ambient.ignite(color, size);
            flash.trigger(color);
            if audio.play(SoundCue::Explosion { size }) {
                stats.sounds += 1;
            }
            stats.bursts += 1;
            false
        });

        self.particles.retain_mut(|p| {
            p.update(step);
            if p.is_dead(dead_alpha) {
                return false;
            }
            if painter.particle(p) {
                stats.drawn += 1;
            }
            true
        });

        self.shockwaves.retain_mut(|wave| {
            wave.update(step);
            if wave.is_dead() {
                return false;
            }
            if painter.shockwave(wave) {
                stats.drawn += 1;
            }
            true
        });

        evict_oldest(&mut self.sparks, MAX_SPARKS);
        self.sparks.retain_mut(|spark| {
            spark.update(step);
            if spark.is_dead() {
                return false;
            }
            if painter.spark(spark) {
                stats.drawn += 1;
            }
            true
        });

        stats.rockets = self.rockets.len();
        stats.particles = self.particles.len();
        stats.transients = self.shockwaves.len() + self.sparks.len();
        stats
    }

    /// Launch point on the ground, scattered around the middle of the viewport
    fn launch_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let w = self.scene.width;
        w * 0.5 + (rng.random::<f32>() - 0.5) * w * 0.6
    }

    /// Spawn a rocket for `config`. Returns false if there is no surface yet.
    pub fn launch<R: Rng + ?Sized>(&mut self, config: FireworkConfig, rng: &mut R) -> bool {
        if self.scene.is_empty() {
            return false;
        }
        let x = self.launch_x(rng);
        let rocket = Rocket::launch(x, self.scene.ground_y(), self.scene.height, config, rng);
        log::debug!("Launch '{}' from x={:.0}", rocket.config.name, x);
        self.rockets.push(rocket);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::settings::{QualityPreset, VisualStyle};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn sized(rng: &mut Pcg32) -> Compositor {
        let mut c = Compositor::new();
        c.resize(1280.0, 720.0, rng);
        c
    }

    fn run_until_burst(c: &mut Compositor, settings: &Settings, audio: &mut AudioManager<NullAudio>, rng: &mut Pcg32) -> FrameStats {
        for _ in 0..2000 {
            let stats = c.frame(DT, settings, audio, rng);
            if stats.bursts > 0 {
                return stats;
            }
        }
        panic!("rocket never burst");
    }

    #[test]
    fn test_burst_replaces_rocket_with_particles() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(0.7);
        let settings = Settings::default();
        assert!(c.launch(FireworkConfig::default(), &mut rng));

        let stats = run_until_burst(&mut c, &settings, &mut audio, &mut rng);
        assert_eq!(stats.rockets, 0);
        assert_eq!(stats.particles, 150);
        assert_eq!(stats.sounds, 1);
        assert!(c.ambient().intensity > 0.0);
        assert!(c.flash().intensity > 0.0);
    }

    #[test]
    fn test_particles_die_and_are_removed() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(0.0);
        let settings = Settings::default();
        c.launch(FireworkConfig::default(), &mut rng);
        run_until_burst(&mut c, &settings, &mut audio, &mut rng);

        for _ in 0..2000 {
            c.frame(DT, &settings, &mut audio, &mut rng);
            assert!(c.particles().iter().all(|p| !p.is_dead(settings.style.dead_alpha())));
        }
        assert_eq!(c.entity_count(), 0);
        assert_eq!(c.ambient().intensity, 0.0);
    }

    #[test]
    fn test_clear_then_tick_draws_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(1.0);
        let settings = Settings::default();
        for _ in 0..5 {
            c.launch(FireworkConfig::random(&mut rng), &mut rng);
        }
        for _ in 0..60 {
            c.frame(DT, &settings, &mut audio, &mut rng);
        }
        c.clear();
        c.clear();
        let stats = c.frame(DT, &settings, &mut audio, &mut rng);
        assert_eq!(stats, FrameStats::default());
        assert!(matches!(c.draw_list().load, crate::renderer::LoadAction::Clear(_)));
    }

    #[test]
    fn test_zero_particle_config_bursts_cleanly() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(0.5);
        let settings = Settings::default();
        let config = FireworkConfig {
            particle_count: 0,
            ..FireworkConfig::default()
        };
        c.launch(config, &mut rng);
        let stats = run_until_burst(&mut c, &settings, &mut audio, &mut rng);
        assert_eq!(stats.particles, 0);
        assert_eq!(c.particles().len(), 0);
    }

    #[test]
    fn test_particle_ceiling_evicts_oldest() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(0.0);
        let settings = Settings::from_preset(QualityPreset::Low);
        let config = FireworkConfig {
            particle_count: 500,
            decay: 0.002,
            ..FireworkConfig::default()
        };
        for _ in 0..12 {
            c.launch(config.clone(), &mut rng);
        }
        for _ in 0..400 {
            let stats = c.frame(DT, &settings, &mut audio, &mut rng);
            assert!(stats.particles <= QualityPreset::Low.max_particles());
        }
    }

    #[test]
    fn test_resize_preserves_entities() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut c = sized(&mut rng);
        c.launch(FireworkConfig::default(), &mut rng);
        c.resize(640.0, 480.0, &mut rng);
        assert_eq!(c.rockets().len(), 1);
        assert_eq!(c.scene().width, 640.0);
    }

    #[test]
    fn test_unsized_surface_is_a_no_op() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut c = Compositor::new();
        let mut audio = AudioManager::<NullAudio>::new(1.0);
        assert!(!c.launch(FireworkConfig::default(), &mut rng));
        let stats = c.frame(DT, &Settings::default(), &mut audio, &mut rng);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(c.draw_list().vertex_count(), 0);
    }

    #[test]
    fn test_wireframe_clears_every_frame() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut c = sized(&mut rng);
        let mut audio = AudioManager::<NullAudio>::new(0.0);
        let settings = Settings {
            style: VisualStyle::Wireframe,
            ..Settings::default()
        };
        c.frame(DT, &settings, &mut audio, &mut rng);
        assert!(matches!(c.draw_list().load, crate::renderer::LoadAction::Clear(_)));
        assert!(c.draw_list().vertex_count() > 0);
    }
}
