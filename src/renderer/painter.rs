//! Turns scene and entity state into draw-list geometry
//!
//! One painter serves both visual styles: physics is shared, only the shapes
//! emitted here differ. Backdrop layers use alpha blending, entities are
//! drawn additively.

use glam::Vec2;

use super::draw_list::{Blend, DrawList, LoadAction};
use super::shapes;
use super::vertex::{Vertex, palette};
use crate::math::Rgb;
use crate::scene::{Cloud, Scene, Skyline, Star, WINDOW_SIZE};
use crate::settings::{QualityPreset, VisualStyle};
use crate::sim::{AmbientLight, Particle, Projection, Rocket, Shockwave, SkyFlash, Spark};

/// Off-screen margin before an entity is culled (pixels)
const CULL_MARGIN: f32 = 40.0;
/// Previous frame opacity removed per frame at full trail quality
const MIN_FADE: f32 = 0.18;
const MAX_FADE: f32 = 0.35;
/// How strongly ambient light tints each backdrop layer
const SKY_TINT: f32 = 0.35;
const SKYLINE_TINT: f32 = 0.25;
const WATER_TINT: f32 = 0.5;
/// Horizontal shift of the wireframe extrusion per pixel off-center
const EXTRUSION: f32 = 0.035;

pub struct Painter<'a> {
    list: &'a mut DrawList,
    style: VisualStyle,
    quality: QualityPreset,
    clock: f32,
    size: Vec2,
    ground_y: f32,
    projection: Projection,
}

impl<'a> Painter<'a> {
    /// Start a frame: clear for wireframe, keep-and-fade for bloom
    pub fn begin(
        list: &'a mut DrawList,
        scene: &Scene,
        style: VisualStyle,
        quality: QualityPreset,
        clock: f32,
    ) -> Self {
        let load = match style {
            VisualStyle::Bloom => LoadAction::Keep,
            VisualStyle::Wireframe => LoadAction::Clear([0.0, 0.0, 0.0, 1.0]),
        };
        list.begin(load);
        Self {
            list,
            style,
            quality,
            clock,
            size: Vec2::new(scene.width, scene.height),
            ground_y: scene.ground_y(),
            projection: Projection::new(scene.width, scene.height),
        }
    }

    /// Drop whatever earlier frames left in the accumulation buffer
    pub fn wipe(&mut self) {
        if self.list.load == LoadAction::Keep {
            self.list.load = LoadAction::Clear(palette::CLEAR);
        }
    }

    fn alpha(&mut self) -> &mut Vec<Vertex> {
        self.list.layer(Blend::Alpha)
    }

    fn additive(&mut self) -> &mut Vec<Vertex> {
        self.list.layer(Blend::Additive)
    }

    fn on_screen(&self, p: Vec2) -> bool {
        p.x >= -CULL_MARGIN
            && p.x <= self.size.x + CULL_MARGIN
            && p.y >= -CULL_MARGIN
            && p.y <= self.size.y + CULL_MARGIN
    }

    /// Opacity of the bloom fade overlay; longer trails at higher quality
    pub fn fade_alpha(quality: QualityPreset) -> f32 {
        MAX_FADE - (MAX_FADE - MIN_FADE) * quality.trail_quality()
    }

    /// Sky gradient. In bloom style it doubles as the trail-fading overlay.
    pub fn sky(&mut self, ambient: &AmbientLight) {
        if self.style == VisualStyle::Wireframe {
            return;
        }
        let fade = Self::fade_alpha(self.quality);
        let tint = ambient.intensity * SKY_TINT;
        let top = palette::SKY_ZENITH.lerp(ambient.color, tint * 0.4).to_rgba(fade);
        let bottom = palette::SKY_HORIZON.lerp(ambient.color, tint).to_rgba(fade);
        let size = self.size;
        shapes::gradient_rect(self.alpha(), Vec2::ZERO, size, top, bottom);
    }

    pub fn stars(&mut self, stars: &[Star]) {
        let clock = self.clock;
        match self.style {
            VisualStyle::Bloom => {
                let out = self.list.layer(Blend::Alpha);
                for star in stars {
                    let a = star.brightness(clock);
                    shapes::circle(out, star.pos, star.size, palette::STAR.to_rgba(a));
                }
            }
            VisualStyle::Wireframe => {
                let out = self.list.layer(Blend::Alpha);
                for star in stars {
                    let a = star.brightness_stepped(clock);
                    let half = Vec2::splat(star.size * 0.5);
                    shapes::rect(out, star.pos - half, star.pos + half, palette::WIRE.to_rgba(a));
                }
            }
        }
    }

    pub fn clouds(&mut self, clouds: &[Cloud], ambient: &AmbientLight) {
        let (clock, width) = (self.clock, self.size.x);
        let color = palette::CLOUD.lerp(ambient.color, ambient.intensity * SKY_TINT);
        let out = self.list.layer(Blend::Alpha);
        for cloud in clouds {
            let center = cloud.position(clock, width);
            for puff in &cloud.puffs {
                shapes::radial_glow(
                    out,
                    center + puff.offset,
                    puff.radius,
                    color.to_rgba(cloud.alpha),
                    color.to_rgba(0.0),
                );
            }
        }
    }

    pub fn skyline(&mut self, skyline: &Skyline, ambient: &AmbientLight) {
        match self.style {
            VisualStyle::Bloom => self.skyline_solid(skyline, ambient),
            VisualStyle::Wireframe => self.skyline_wire(skyline, ambient),
        }
    }

    fn skyline_solid(&mut self, skyline: &Skyline, ambient: &AmbientLight) {
        let window_layers = self.quality.window_layers();
        let clock = self.clock;
        let ground = skyline.ground_y;
        let out = self.list.layer(Blend::Alpha);

        for layer in &skyline.layers {
            // Far layers catch more of the burst light
            let depth_weight = 1.0 / (layer.depth as f32 + 1.0);
            let color = layer
                .color
                .lerp(ambient.color, ambient.intensity * SKYLINE_TINT * depth_weight)
                .to_rgba(1.0);
            let lit = skyline.front_index(layer) < window_layers;

            for b in &layer.buildings {
                let top = ground - b.height;
                shapes::rect(out, Vec2::new(b.x, top), Vec2::new(b.right(), ground), color);

                if lit {
                    for w in &b.windows {
                        let min = Vec2::new(b.x, top) + w.offset;
                        shapes::rect(out, min, min + WINDOW_SIZE, w.color.to_rgba(0.85));
                    }
                }

                if let Some(spire) = b.spire {
                    let base = Vec2::new(b.x + b.width * spire.anchor, top);
                    let tip = base - Vec2::new(0.0, spire.height);
                    shapes::line(out, base, tip, (2.0, 1.0), (color, color));
                    if spire.beacon_on(clock) {
                        shapes::circle(out, tip, 1.8, palette::BEACON.to_rgba(1.0));
                    }
                }
            }
        }
    }

    /// Outlined buildings with a fake vanishing-point side face
    fn skyline_wire(&mut self, skyline: &Skyline, ambient: &AmbientLight) {
        let center_x = self.size.x / 2.0;
        let wire = palette::WIRE.lerp(ambient.color, ambient.intensity * SKYLINE_TINT);
        let clock = self.clock;
        let ground = skyline.ground_y;
        let out = self.list.layer(Blend::Alpha);
        let fill = [0.0, 0.0, 0.0, 1.0];

        for layer in &skyline.layers {
            let line = wire.to_rgba(0.35 + 0.2 * layer.depth as f32);
            let thin = (1.0, 1.0);

            for b in &layer.buildings {
                let top = ground - b.height;
                let shift = Vec2::new((center_x - b.center_x()) * EXTRUSION, -b.height * 0.02);

                // Side face toward the center, then the front face over it
                let edge = if shift.x >= 0.0 { b.right() } else { b.x };
                let face = [
                    Vec2::new(edge, ground),
                    Vec2::new(edge, top),
                    Vec2::new(edge, top) + shift,
                    Vec2::new(edge + shift.x, ground),
                ];
                shapes::quad(out, face, [fill; 4]);
                for i in 0..4 {
                    shapes::line(out, face[i], face[(i + 1) % 4], thin, (line, line));
                }

                let corners = [
                    Vec2::new(b.x, ground),
                    Vec2::new(b.x, top),
                    Vec2::new(b.right(), top),
                    Vec2::new(b.right(), ground),
                ];
                shapes::quad(out, corners, [fill; 4]);
                for i in 0..3 {
                    shapes::line(out, corners[i], corners[i + 1], thin, (line, line));
                }

                if let Some(spire) = b.spire {
                    let base = Vec2::new(b.x + b.width * spire.anchor, top);
                    let tip = base - Vec2::new(0.0, spire.height);
                    shapes::line(out, base, tip, thin, (line, line));
                    if spire.beacon_on(clock) {
                        shapes::rect(out, tip - Vec2::ONE, tip + Vec2::ONE, palette::BEACON.to_rgba(1.0));
                    }
                }
            }
        }
    }

    /// Water band below the skyline
    pub fn water(&mut self, ambient: &AmbientLight) {
        let (ground, size) = (self.ground_y, self.size);
        match self.style {
            VisualStyle::Bloom => {
                let top = palette::WATER
                    .lerp(ambient.color, ambient.intensity * WATER_TINT)
                    .to_rgba(1.0);
                let bottom = palette::WATER.to_rgba(1.0);
                shapes::gradient_rect(self.alpha(), Vec2::new(0.0, ground), size, top, bottom);
            }
            VisualStyle::Wireframe => {
                let color = palette::WIRE
                    .lerp(ambient.color, ambient.intensity * WATER_TINT)
                    .to_rgba(0.5);
                let out = self.alpha();
                shapes::line(out, Vec2::new(0.0, ground), Vec2::new(size.x, ground), (1.0, 1.0), (color, color));
            }
        }
    }

    /// Full-frame flash over the backdrop
    pub fn flash(&mut self, flash: &SkyFlash) {
        if flash.intensity <= 0.0 {
            return;
        }
        let size = self.size;
        shapes::rect(self.alpha(), Vec2::ZERO, size, flash.color.to_rgba(flash.intensity));
    }

    pub fn rocket(&mut self, rocket: &Rocket) -> bool {
        if !self.on_screen(rocket.pos) {
            return false;
        }
        let color = rocket.head_color();
        let mut points: Vec<Vec2> = rocket.trail.iter().copied().collect();
        points.push(rocket.pos);
        let glow = self.quality.glow_enabled();

        match self.style {
            VisualStyle::Bloom => {
                let out = self.additive();
                shapes::trail(out, &points, 2.5, color.to_rgba(0.8));
                if glow {
                    shapes::radial_glow(out, rocket.pos, 7.0, color.to_rgba(0.4), color.to_rgba(0.0));
                }
                shapes::circle(out, rocket.pos, 1.8, Rgb::WHITE.to_rgba(1.0));
            }
            VisualStyle::Wireframe => {
                let out = self.additive();
                shapes::trail(out, &points, 1.0, color.to_rgba(1.0));
                shapes::rect(out, rocket.pos - Vec2::splat(1.5), rocket.pos + Vec2::splat(1.5), color.to_rgba(1.0));
            }
        }
        true
    }

    pub fn particle(&mut self, p: &Particle) -> bool {
        if p.is_dead(self.style.dead_alpha()) {
            return false;
        }
        let projected = self.projection.project(p.pos);
        if !self.on_screen(projected.pos) {
            return false;
        }

        let alpha = (p.alpha * p.flicker(self.clock)).clamp(0.0, 1.0);
        let color = p.color();
        let radius = p.size * projected.scale;
        let trail_len = (p.trail.capacity() as f32 * self.quality.trail_quality()).ceil() as usize;
        let mut points: Vec<Vec2> = p
            .trail
            .newest(trail_len)
            .map(|&t| self.projection.project(t).pos)
            .collect();
        points.push(projected.pos);

        match self.style {
            VisualStyle::Bloom => {
                let glow = self.quality.glow_enabled();
                let reflect = self.quality.reflections_enabled() && projected.pos.y < self.ground_y;
                let mirrored = self.reflect(projected.pos);
                let out = self.list.layer(Blend::Additive);

                shapes::trail(out, &points, radius * 1.2, color.to_rgba(alpha * 0.6));
                if glow {
                    shapes::radial_glow(
                        out,
                        projected.pos,
                        radius * 4.0,
                        color.to_rgba(alpha * 0.35),
                        color.to_rgba(0.0),
                    );
                }
                shapes::circle(out, projected.pos, radius, color.to_rgba(alpha));
                shapes::circle(
                    out,
                    projected.pos,
                    radius * 0.45,
                    color.lerp(Rgb::WHITE, 0.7).to_rgba(alpha),
                );
                if reflect {
                    shapes::circle(out, mirrored, radius * 0.8, color.to_rgba(alpha * 0.2));
                }
            }
            VisualStyle::Wireframe => {
                let out = self.list.layer(Blend::Additive);
                shapes::trail(out, &points, 1.0, color.to_rgba(alpha * 0.8));
                let half = Vec2::splat(radius * 0.8);
                shapes::rect(out, projected.pos - half, projected.pos + half, color.to_rgba(alpha));
            }
        }
        true
    }

    /// Map a sky position into the water band, flipped and compressed
    fn reflect(&self, pos: Vec2) -> Vec2 {
        let band = self.size.y - self.ground_y;
        if self.ground_y <= 0.0 {
            return pos;
        }
        let depth = (self.ground_y - pos.y).clamp(0.0, self.ground_y) / self.ground_y;
        Vec2::new(pos.x, self.ground_y + depth * band)
    }

    pub fn shockwave(&mut self, wave: &Shockwave) -> bool {
        if !self.on_screen(wave.center) {
            return false;
        }
        let width = match self.style {
            VisualStyle::Bloom => 3.0,
            VisualStyle::Wireframe => 1.0,
        };
        let color = wave.color.to_rgba(wave.alpha);
        shapes::ring(self.additive(), wave.center, wave.radius, wave.radius + width, color);
        true
    }

    pub fn spark(&mut self, spark: &Spark) -> bool {
        if !self.on_screen(spark.pos) {
            return false;
        }
        let color = spark.color.to_rgba(spark.alpha);
        match self.style {
            VisualStyle::Bloom => shapes::circle(self.additive(), spark.pos, spark.size, color),
            VisualStyle::Wireframe => {
                let half = Vec2::splat(spark.size * 0.5);
                shapes::rect(self.additive(), spark.pos - half, spark.pos + half, color);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FireworkConfig;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn scene() -> Scene {
        let mut rng = Pcg32::seed_from_u64(3);
        Scene::generate(800.0, 600.0, &mut rng)
    }

    fn particle_at(pos: Vec3) -> Particle {
        let mut rng = Pcg32::seed_from_u64(4);
        let config = FireworkConfig::default();
        Particle::new(pos, Vec3::ZERO, (Rgb::WHITE, Rgb::WHITE), &config, &mut rng)
    }

    #[test]
    fn test_load_action_follows_style() {
        let scene = scene();
        let mut list = DrawList::default();
        Painter::begin(&mut list, &scene, VisualStyle::Bloom, QualityPreset::Medium, 0.0);
        assert_eq!(list.load, LoadAction::Keep);
        Painter::begin(&mut list, &scene, VisualStyle::Wireframe, QualityPreset::Medium, 0.0);
        assert!(matches!(list.load, LoadAction::Clear(_)));
    }

    #[test]
    fn test_offscreen_particle_is_culled() {
        let scene = scene();
        let mut list = DrawList::default();
        let mut painter = Painter::begin(&mut list, &scene, VisualStyle::Bloom, QualityPreset::High, 0.0);
        assert!(!painter.particle(&particle_at(Vec3::new(-500.0, 100.0, 0.0))));
        assert!(painter.particle(&particle_at(Vec3::new(400.0, 200.0, 0.0))));
        assert!(list.vertex_count() > 0);
    }

    #[test]
    fn test_dead_particle_is_not_drawn() {
        let scene = scene();
        let mut list = DrawList::default();
        let mut painter = Painter::begin(&mut list, &scene, VisualStyle::Wireframe, QualityPreset::Low, 0.0);
        let mut p = particle_at(Vec3::new(400.0, 200.0, 0.0));
        p.alpha = 0.01;
        assert!(!painter.particle(&p));
        assert_eq!(list.vertex_count(), 0);
    }

    #[test]
    fn test_glow_skipped_at_low_quality() {
        let scene = scene();
        let p = particle_at(Vec3::new(400.0, 200.0, 0.0));
        let count = |quality| {
            let mut list = DrawList::default();
            let mut painter = Painter::begin(&mut list, &scene, VisualStyle::Bloom, quality, 0.0);
            painter.particle(&p);
            list.vertex_count()
        };
        assert!(count(QualityPreset::Low) < count(QualityPreset::Medium));
    }

    #[test]
    fn test_reflection_lands_in_water_band() {
        let scene = scene();
        let mut list = DrawList::default();
        let painter = Painter::begin(&mut list, &scene, VisualStyle::Bloom, QualityPreset::High, 0.0);
        for y in [0.0, 100.0, 300.0, scene.ground_y() - 1.0] {
            let m = painter.reflect(Vec2::new(10.0, y));
            assert!(m.y >= scene.ground_y() && m.y <= scene.height);
        }
    }

    fn backdrop_vertices(style: VisualStyle, ambient: &AmbientLight) -> Vec<Vertex> {
        let scene = scene();
        let mut list = DrawList::default();
        let mut painter = Painter::begin(&mut list, &scene, style, QualityPreset::High, 0.0);
        painter.sky(ambient);
        painter.skyline(&scene.skyline, ambient);
        painter.water(ambient);
        list.batches.iter().flat_map(|b| b.vertices.iter().copied()).collect()
    }

    #[test]
    fn test_ambient_light_tints_backdrop_in_both_styles() {
        let dark = AmbientLight::default();
        let mut lit = AmbientLight::default();
        lit.ignite(Rgb::new(255, 0, 0), 3.0);
        for style in [VisualStyle::Bloom, VisualStyle::Wireframe] {
            let before = backdrop_vertices(style, &dark);
            let after = backdrop_vertices(style, &lit);
            assert_eq!(before.len(), after.len());
            assert_ne!(before, after, "{:?} ignores ambient light", style);
        }
    }

    #[test]
    fn test_fade_shorter_trails_at_low_quality() {
        assert!(Painter::fade_alpha(QualityPreset::Low) > Painter::fade_alpha(QualityPreset::High));
    }
}
