//! Procedural backdrop: starfield, skyline and optional clouds
//!
//! Generated once per viewport size and regenerated on resize. Nothing here
//! is mutated per frame; idle motion (twinkle, drift, blink) is a pure
//! function of the simulation clock.

pub mod clouds;
pub mod skyline;
pub mod stars;

use rand::Rng;

pub use clouds::{Cloud, CloudPuff, generate_clouds};
pub use skyline::{Building, Skyline, SkylineLayer, Spire, WINDOW_SIZE, Window};
pub use stars::{Star, generate_stars, star_count};

use crate::consts::WATER_FRACTION;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub stars: Vec<Star>,
    pub skyline: Skyline,
    pub clouds: Vec<Cloud>,
}

impl Scene {
    /// Build the backdrop for a viewport. Degenerate sizes give an empty scene.
    pub fn generate<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Self {
                width: width.max(0.0),
                height: height.max(0.0),
                ..Self::default()
            };
        }

        let ground_y = Self::ground_y_for(height);
        let scene = Self {
            width,
            height,
            stars: generate_stars(width, height, rng),
            skyline: Skyline::generate(width, height, ground_y, rng),
            clouds: generate_clouds(width, height, rng),
        };
        log::info!(
            "Scene generated for {}x{}: {} stars, {} buildings, {} clouds",
            width,
            height,
            scene.stars.len(),
            scene.skyline.building_count(),
            scene.clouds.len()
        );
        scene
    }

    fn ground_y_for(height: f32) -> f32 {
        height * (1.0 - WATER_FRACTION)
    }

    /// Screen y where buildings stand and rockets launch from
    pub fn ground_y(&self) -> f32 {
        Self::ground_y_for(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_resize_regeneration_scales_stars() {
        let mut rng = Pcg32::seed_from_u64(1);
        let small = Scene::generate(640.0, 480.0, &mut rng);
        let large = Scene::generate(1920.0, 1080.0, &mut rng);
        assert!(large.stars.len() > small.stars.len());
        assert_eq!(small.stars.len(), star_count(640.0, 480.0));
        assert!((large.ground_y() - 1080.0 * (1.0 - WATER_FRACTION)).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_sizes_do_not_fault() {
        let mut rng = Pcg32::seed_from_u64(2);
        for (w, h) in [(0.0, 0.0), (0.0, 500.0), (500.0, 0.0), (-10.0, 20.0), (f32::NAN, 5.0)] {
            let scene = Scene::generate(w, h, &mut rng);
            assert!(scene.is_empty());
            assert!(scene.stars.is_empty());
            assert_eq!(scene.skyline.building_count(), 0);
            assert!(scene.clouds.is_empty());
        }
    }
}
