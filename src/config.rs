//! Firework configuration record
//!
//! This is what the host (or the external prompt-to-config service) hands to
//! `Engine::launch`. It arrives as JSON, so every field is lenient: unknown
//! shapes fall back to `Default`, malformed colors to white, and numbers are
//! clamped by `sanitized()` instead of being rejected.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::*;
use crate::math::{Rgb, hsl_to_rgb, range};

/// Saturation/lightness used for derived rainbow hues
const RAINBOW_SATURATION: f32 = 1.0;
const RAINBOW_LIGHTNESS: f32 = 0.6;

/// A color slot: a fixed RGB value or the rainbow marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColorRepr", into = "String")]
pub enum ColorSpec {
    Solid(Rgb),
    /// Derive a hue per particle (complementary for the secondary slot)
    Rainbow,
}

/// Every shape a color slot may arrive in
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Triple([f64; 3]),
    Channels { r: f64, g: f64, b: f64 },
    Other(serde::de::IgnoredAny),
}

fn channel(v: f64) -> u8 {
    if v.is_finite() { v.round().clamp(0.0, 255.0) as u8 } else { 0 }
}

impl From<ColorRepr> for ColorSpec {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Text(s) => ColorSpec::from(s),
            ColorRepr::Triple([r, g, b]) | ColorRepr::Channels { r, g, b } => {
                ColorSpec::Solid(Rgb::new(channel(r), channel(g), channel(b)))
            }
            ColorRepr::Other(_) => {
                log::warn!("Color is neither a string nor an RGB triple, using white");
                ColorSpec::Solid(Rgb::WHITE)
            }
        }
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("rainbow") {
            return ColorSpec::Rainbow;
        }
        match Rgb::from_hex(&s) {
            Some(rgb) => ColorSpec::Solid(rgb),
            None => {
                log::warn!("Unrecognized color {:?}, using white", s);
                ColorSpec::Solid(Rgb::WHITE)
            }
        }
    }
}

impl From<ColorSpec> for String {
    fn from(c: ColorSpec) -> Self {
        match c {
            ColorSpec::Solid(rgb) => rgb.to_hex(),
            ColorSpec::Rainbow => "rainbow".to_string(),
        }
    }
}

impl ColorSpec {
    /// Resolve a (primary, secondary) color pair for one particle
    pub fn resolve_pair<R: Rng + ?Sized>(
        primary: ColorSpec,
        secondary: ColorSpec,
        rng: &mut R,
    ) -> (Rgb, Rgb) {
        let primary_rgb = match primary {
            ColorSpec::Solid(c) => c,
            ColorSpec::Rainbow => {
                hsl_to_rgb(range(rng, 0.0, 360.0), RAINBOW_SATURATION, RAINBOW_LIGHTNESS)
            }
        };
        let secondary_rgb = match secondary {
            ColorSpec::Solid(c) => c,
            ColorSpec::Rainbow => hsl_to_rgb(
                primary_rgb.hue() + 180.0,
                RAINBOW_SATURATION,
                RAINBOW_LIGHTNESS,
            ),
        };
        (primary_rgb, secondary_rgb)
    }
}

/// Geometric distribution of a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExplosionShape {
    Sphere,
    Heart,
    Star,
    Ring,
    Burst,
    #[default]
    Default,
}

impl ExplosionShape {
    pub const ALL: [ExplosionShape; 6] = [
        ExplosionShape::Sphere,
        ExplosionShape::Heart,
        ExplosionShape::Star,
        ExplosionShape::Ring,
        ExplosionShape::Burst,
        ExplosionShape::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExplosionShape::Sphere => "sphere",
            ExplosionShape::Heart => "heart",
            ExplosionShape::Star => "star",
            ExplosionShape::Ring => "ring",
            ExplosionShape::Burst => "burst",
            ExplosionShape::Default => "default",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sphere" | "peony" => Some(ExplosionShape::Sphere),
            "heart" => Some(ExplosionShape::Heart),
            "star" => Some(ExplosionShape::Star),
            "ring" | "circle" => Some(ExplosionShape::Ring),
            "burst" | "random" => Some(ExplosionShape::Burst),
            "default" => Some(ExplosionShape::Default),
            _ => None,
        }
    }
}

impl From<String> for ExplosionShape {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or_default()
    }
}

impl From<ExplosionShape> for String {
    fn from(shape: ExplosionShape) -> Self {
        shape.as_str().to_string()
    }
}

/// Accept any JSON number for counts; negatives and NaN become 0
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let v = f64::deserialize(deserializer)?;
    Ok(if v.is_finite() {
        v.round().clamp(0.0, u32::MAX as f64) as u32
    } else {
        0
    })
}

/// Per-launch configuration (immutable once launched)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FireworkConfig {
    pub name: String,
    pub primary_color: ColorSpec,
    pub secondary_color: ColorSpec,
    #[serde(deserialize_with = "lenient_count")]
    pub particle_count: u32,
    pub explosion_shape: ExplosionShape,
    /// Velocity magnitude multiplier
    pub explosion_size: f32,
    /// Alpha lost per frame
    #[serde(alias = "decayRate")]
    pub decay: f32,
    /// Downward velocity gained per frame
    pub gravity: f32,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            name: "Classic".to_string(),
            primary_color: ColorSpec::Solid(Rgb::new(255, 60, 60)),
            secondary_color: ColorSpec::Solid(Rgb::new(255, 200, 80)),
            particle_count: 150,
            explosion_shape: ExplosionShape::Sphere,
            explosion_size: 1.0,
            decay: 0.015,
            gravity: 0.05,
        }
    }
}

/// Named palette used by `FireworkConfig::random`
const PALETTE: [(&str, Rgb); 10] = [
    ("Strontium", Rgb::new(255, 40, 40)),
    ("Calcium", Rgb::new(255, 140, 0)),
    ("Sodium", Rgb::new(255, 220, 0)),
    ("Barium", Rgb::new(0, 255, 100)),
    ("Copper", Rgb::new(60, 120, 255)),
    ("Caesium", Rgb::new(110, 100, 255)),
    ("Potassium", Rgb::new(180, 60, 255)),
    ("Lithium", Rgb::new(255, 70, 160)),
    ("Charcoal", Rgb::new(255, 200, 60)),
    ("Magnesium", Rgb::new(255, 255, 255)),
];

impl FireworkConfig {
    /// Parse a configuration produced by the host or the prompt service
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp every numeric field into the range the generator can afford
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        Self {
            name: self.name.clone(),
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            particle_count: self.particle_count.min(MAX_PARTICLE_COUNT),
            explosion_shape: self.explosion_shape,
            explosion_size: finite_or(self.explosion_size, defaults.explosion_size)
                .clamp(MIN_EXPLOSION_SIZE, MAX_EXPLOSION_SIZE),
            decay: finite_or(self.decay, defaults.decay).clamp(MIN_DECAY, MAX_DECAY),
            gravity: finite_or(self.gravity, defaults.gravity).clamp(0.0, MAX_GRAVITY),
        }
    }

    /// A random, already-sane configuration (the host's "randomize" intent)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (name, primary) = PALETTE[rng.random_range(0..PALETTE.len())];
        let primary_color = if rng.random_bool(0.12) {
            ColorSpec::Rainbow
        } else {
            ColorSpec::Solid(primary)
        };
        let secondary_color = if rng.random_bool(0.3) {
            ColorSpec::Rainbow
        } else {
            ColorSpec::Solid(PALETTE[rng.random_range(0..PALETTE.len())].1)
        };
        let explosion_shape = ExplosionShape::ALL[rng.random_range(0..ExplosionShape::ALL.len())];

        Self {
            name: format!("{} {}", name, explosion_shape.as_str()),
            primary_color,
            secondary_color,
            particle_count: rng.random_range(80..=220),
            explosion_shape,
            explosion_size: range(rng, 0.8, 1.5),
            decay: range(rng, 0.011, 0.02),
            gravity: range(rng, 0.035, 0.08),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_parse_service_json() {
        let json = r##"{
            "name": "Valentine",
            "primaryColor": "#ff3366",
            "secondaryColor": "rainbow",
            "particleCount": 180.4,
            "explosionShape": "Heart",
            "explosionSize": 1.2,
            "decayRate": 0.02,
            "gravity": 0.06
        }"##;
        let cfg = FireworkConfig::from_json(json).unwrap();
        assert_eq!(cfg.name, "Valentine");
        assert_eq!(cfg.primary_color, ColorSpec::Solid(Rgb::new(255, 51, 102)));
        assert_eq!(cfg.secondary_color, ColorSpec::Rainbow);
        assert_eq!(cfg.particle_count, 180);
        assert_eq!(cfg.explosion_shape, ExplosionShape::Heart);
        assert!((cfg.decay - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_missing_and_unknown_fields_degrade() {
        let cfg = FireworkConfig::from_json(
            r#"{"explosionShape": "dodecahedron", "particleCount": -40, "primaryColor": "blue-ish"}"#,
        )
        .unwrap();
        assert_eq!(cfg.explosion_shape, ExplosionShape::Default);
        assert_eq!(cfg.particle_count, 0);
        assert_eq!(cfg.primary_color, ColorSpec::Solid(Rgb::WHITE));
        assert_eq!(cfg.gravity, FireworkConfig::default().gravity);
    }

    #[test]
    fn test_rgb_triple_colors() {
        let cfg = FireworkConfig::from_json(
            r#"{"primaryColor": [255, 0, 0], "secondaryColor": {"r": 0, "g": 128, "b": 300}}"#,
        )
        .unwrap();
        assert_eq!(cfg.primary_color, ColorSpec::Solid(Rgb::new(255, 0, 0)));
        assert_eq!(cfg.secondary_color, ColorSpec::Solid(Rgb::new(0, 128, 255)));
    }

    #[test]
    fn test_unusable_color_falls_back_to_white() {
        let cfg = FireworkConfig::from_json(r#"{"primaryColor": true, "secondaryColor": [1, 2]}"#).unwrap();
        assert_eq!(cfg.primary_color, ColorSpec::Solid(Rgb::WHITE));
        assert_eq!(cfg.secondary_color, ColorSpec::Solid(Rgb::WHITE));
    }

    #[test]
    fn test_json_round_trip_keeps_rainbow_marker() {
        let cfg = FireworkConfig {
            primary_color: ColorSpec::Rainbow,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"primaryColor\":\"rainbow\""));
        assert_eq!(FireworkConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn test_rainbow_pair_is_complementary() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let (p, s) = ColorSpec::resolve_pair(ColorSpec::Rainbow, ColorSpec::Rainbow, &mut rng);
            let diff = (p.hue() - s.hue()).rem_euclid(360.0);
            assert!((diff - 180.0).abs() < 3.0, "hues {} / {}", p.hue(), s.hue());
        }
    }

    #[test]
    fn test_random_configs_are_sane() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let cfg = FireworkConfig::random(&mut rng);
            assert_eq!(cfg.sanitized(), cfg);
        }
    }

    proptest! {
        #[test]
        fn prop_sanitized_is_in_bounds(
            count in any::<u32>(),
            size in any::<f32>(),
            decay in any::<f32>(),
            gravity in any::<f32>(),
        ) {
            let cfg = FireworkConfig {
                particle_count: count,
                explosion_size: size,
                decay,
                gravity,
                ..Default::default()
            }
            .sanitized();
            prop_assert!(cfg.particle_count <= MAX_PARTICLE_COUNT);
            prop_assert!((MIN_EXPLOSION_SIZE..=MAX_EXPLOSION_SIZE).contains(&cfg.explosion_size));
            prop_assert!((MIN_DECAY..=MAX_DECAY).contains(&cfg.decay));
            prop_assert!((0.0..=MAX_GRAVITY).contains(&cfg.gravity));
        }
    }
}
