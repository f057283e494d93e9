//! Engine facade consumed by the host application
//!
//! Owns the compositor, the audio output and the RNG. Hosts forward user
//! intents (launch, clear, settings changes) and call [`Engine::tick`] once
//! per display refresh.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioBackend, AudioManager, SoundCue};
use crate::compositor::{Compositor, FrameStats};
use crate::config::FireworkConfig;
use crate::renderer::DrawList;
use crate::settings::{QualityPreset, Settings, VisualStyle};

pub struct Engine<B: AudioBackend> {
    settings: Settings,
    compositor: Compositor,
    audio: AudioManager<B>,
    rng: Pcg32,
}

impl<B: AudioBackend> Engine<B> {
    pub fn new(settings: Settings) -> Self {
        let audio = AudioManager::new(settings.master_gain());
        Self::with_audio(settings, audio)
    }

    /// Build around an audio manager owned by the caller. Its volume is
    /// brought in line with `settings`.
    pub fn with_audio(settings: Settings, mut audio: AudioManager<B>) -> Self {
        audio.set_volume(settings.master_gain());
        log::info!(
            "Engine created: quality={}, style={}, volume={}",
            settings.quality.as_str(),
            settings.style.as_str(),
            settings.volume
        );
        Self {
            settings,
            compositor: Compositor::new(),
            audio,
            rng: Pcg32::from_os_rng(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    /// Geometry produced by the last tick
    pub fn draw_list(&self) -> &DrawList {
        self.compositor.draw_list()
    }

    /// Spawn one rocket and play the launch cue. No-op until the surface is sized.
    pub fn launch(&mut self, config: FireworkConfig) {
        if self.compositor.launch(config, &mut self.rng) {
            self.audio.play(SoundCue::Launch);
        }
    }

    /// Launch a randomized preset
    pub fn launch_random(&mut self) {
        let config = FireworkConfig::random(&mut self.rng);
        self.launch(config);
    }

    /// Remove every live entity and reset burst lighting
    pub fn clear(&mut self) {
        self.compositor.clear();
    }

    /// Call from a user-gesture handler
    pub fn unlock_audio(&mut self) {
        self.audio.unlock();
    }

    /// New surface size in pixels; regenerates the backdrop
    pub fn resize(&mut self, width: f32, height: f32) {
        self.compositor.resize(width, height, &mut self.rng);
    }

    /// UI volume, 0 - 100
    pub fn set_volume(&mut self, volume: u32) {
        self.settings.set_volume(volume);
        self.audio.set_volume(self.settings.master_gain());
        self.settings.save();
    }

    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.settings.quality = quality;
        self.settings.save();
    }

    pub fn set_style(&mut self, style: VisualStyle) {
        if self.settings.style != style {
            self.settings.style = style;
            // Trails from the other style shouldn't bleed through
            self.compositor.clear_buffer();
            self.settings.save();
        }
    }

    pub fn set_clouds(&mut self, clouds: bool) {
        self.settings.clouds = clouds;
        self.settings.save();
    }

    /// Advance and draw one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> FrameStats {
        self.compositor
            .frame(dt, &self.settings, &mut self.audio, &mut self.rng)
    }

    /// Teardown: drop entities and close the audio output
    pub fn dispose(&mut self) {
        self.compositor.clear();
        self.audio.dispose();
    }
}
