//! Host-facing settings: volume, quality tier, visual style
//!
//! Persisted in LocalStorage on the web; the simulation itself is never saved.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to a configuration's particle count
    pub fn particle_multiplier(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Ceiling on simultaneously live particles (oldest evicted first)
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 1500,
            QualityPreset::Medium => 4000,
            QualityPreset::High => 8000,
        }
    }

    /// Trail length multiplier (1.0 = full history)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.34,
            QualityPreset::Medium => 0.67,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether particles get a soft outer glow
    pub fn glow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether the water band mirrors particles
    pub fn reflections_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }

    /// Skyline layers (front first) that get lit window grids
    pub fn window_layers(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 1,
            QualityPreset::High => 2,
        }
    }

    /// Whether bursts emit an expanding shockwave ring
    pub fn shockwaves_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Rendering variant; never affects physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VisualStyle {
    /// Soft gradients, round glows, motion-trail fade
    #[default]
    Bloom,
    /// Flat squares, thin strokes, fresh clear every frame
    Wireframe,
}

impl VisualStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualStyle::Bloom => "Bloom",
            VisualStyle::Wireframe => "Wireframe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bloom" | "soft" | "realistic" => Some(VisualStyle::Bloom),
            "wireframe" | "sharp" | "retro" => Some(VisualStyle::Wireframe),
            _ => None,
        }
    }

    /// Alpha at which particles are considered dead
    pub fn dead_alpha(&self) -> f32 {
        match self {
            VisualStyle::Bloom => 0.02,
            VisualStyle::Wireframe => 0.05,
        }
    }
}

/// Settings/preferences forwarded by the host UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Renderer variant
    pub style: VisualStyle,
    /// Drifting cloud layer
    pub clouds: bool,
    /// Master volume as shown in the UI (0 - 100)
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            style: VisualStyle::Bloom,
            clouds: false,
            volume: 70,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Set UI volume, clamped to 0 - 100
    pub fn set_volume(&mut self, volume: u32) {
        self.volume = volume.min(100) as u8;
    }

    /// Master gain in [0, 1]
    pub fn master_gain(&self) -> f32 {
        self.volume.min(100) as f32 / 100.0
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "skyburst_settings";

    /// Settings from a stored JSON blob; corrupt or missing blobs give defaults
    pub fn from_stored(json: Option<&str>) -> Self {
        match json.map(serde_json::from_str::<Settings>) {
            Some(Ok(mut settings)) => {
                settings.volume = settings.volume.min(100);
                settings
            }
            Some(Err(err)) => {
                log::warn!("Discarding stored settings: {}", err);
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Restore persisted settings (LocalStorage on the web)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let settings = Self::from_stored(stored.as_deref());
        log::info!(
            "Settings: quality={}, style={}, volume={}, clouds={}",
            settings.quality.as_str(),
            settings.style.as_str(),
            settings.volume,
            settings.clouds
        );
        settings
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, settings not persisted");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not write {}", Self::STORAGE_KEY);
                }
            }
            Err(err) => log::warn!("Could not serialize settings: {}", err),
        }
    }

    /// Nothing is persisted natively
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_stored(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
