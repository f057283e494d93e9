//! Procedural city skyline
//!
//! Each depth layer tiles buildings left to right with a little overlap until
//! the viewport is covered. Layers are stored far-to-near (draw order).

use glam::Vec2;
use rand::Rng;

use crate::math::{Rgb, range};

/// Generation parameters for one depth layer
#[derive(Debug, Clone, Copy)]
struct LayerParams {
    /// Building width range in pixels
    width: (f32, f32),
    /// Building height range as a fraction of viewport height
    height: (f32, f32),
    color: Rgb,
    spire_chance: f64,
}

/// Far to near: taller silhouettes behind, darker and shorter up front
const LAYERS: [LayerParams; 3] = [
    LayerParams {
        width: (30.0, 70.0),
        height: (0.18, 0.38),
        color: Rgb::new(26, 30, 52),
        spire_chance: 0.18,
    },
    LayerParams {
        width: (40.0, 95.0),
        height: (0.12, 0.28),
        color: Rgb::new(17, 19, 36),
        spire_chance: 0.12,
    },
    LayerParams {
        width: (55.0, 120.0),
        height: (0.06, 0.2),
        color: Rgb::new(8, 9, 20),
        spire_chance: 0.0,
    },
];

/// Max fraction of a building's width the next one may overlap
const MAX_OVERLAP: f32 = 0.2;

/// Window cell geometry
pub const WINDOW_SIZE: Vec2 = Vec2::new(4.0, 6.0);
const WINDOW_GAP: Vec2 = Vec2::new(5.0, 7.0);
const WINDOW_MARGIN: f32 = 6.0;
const WINDOW_LIT_CHANCE: f64 = 0.3;

/// A lit window, relative to its building's top-left corner
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub offset: Vec2,
    /// Warm/cool light
    pub color: Rgb,
}

/// Antenna with an independent blinking light
#[derive(Debug, Clone, Copy)]
pub struct Spire {
    pub height: f32,
    /// Horizontal position as a fraction of the building width
    pub anchor: f32,
    pub blink_rate: f32,
    pub blink_phase: f32,
}

impl Spire {
    /// Whether the beacon is lit at `clock` seconds
    pub fn beacon_on(&self, clock: f32) -> bool {
        (clock * self.blink_rate + self.blink_phase).sin() > 0.55
    }
}

#[derive(Debug, Clone)]
pub struct Building {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub windows: Vec<Window>,
    pub spire: Option<Spire>,
}

impl Building {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct SkylineLayer {
    /// 0 = farthest
    pub depth: usize,
    pub color: Rgb,
    pub buildings: Vec<Building>,
}

#[derive(Debug, Clone, Default)]
pub struct Skyline {
    /// Far to near
    pub layers: Vec<SkylineLayer>,
    /// Screen y of the building bases
    pub ground_y: f32,
}

impl Skyline {
    pub fn generate<R: Rng + ?Sized>(
        width: f32,
        viewport_height: f32,
        ground_y: f32,
        rng: &mut R,
    ) -> Self {
        if width <= 0.0 || viewport_height <= 0.0 {
            return Self::default();
        }

        let layer_count = LAYERS.len();
        let layers = LAYERS
            .iter()
            .enumerate()
            .map(|(depth, params)| {
                // Only the two nearest layers carry windows
                let windowed = depth + 2 >= layer_count;
                SkylineLayer {
                    depth,
                    color: params.color,
                    buildings: tile_layer(params, width, viewport_height, windowed, rng),
                }
            })
            .collect();

        Self { layers, ground_y }
    }

    /// Near-to-far index (0 = front) for quality checks
    pub fn front_index(&self, layer: &SkylineLayer) -> usize {
        self.layers.len().saturating_sub(layer.depth + 1)
    }

    pub fn building_count(&self) -> usize {
        self.layers.iter().map(|l| l.buildings.len()).sum()
    }
}

fn tile_layer<R: Rng + ?Sized>(
    params: &LayerParams,
    width: f32,
    viewport_height: f32,
    windowed: bool,
    rng: &mut R,
) -> Vec<Building> {
    let mut buildings = Vec::new();
    // Start a little off-screen so the left edge is never bare
    let mut x = -range(rng, 0.0, params.width.0);

    while x < width {
        let w = range(rng, params.width.0, params.width.1);
        let h = viewport_height * range(rng, params.height.0, params.height.1);
        let windows = if windowed {
            window_grid(w, h, rng)
        } else {
            Vec::new()
        };
        let spire = (h > viewport_height * params.height.1 * 0.75 && rng.random_bool(params.spire_chance))
            .then(|| Spire {
                height: range(rng, 10.0, 32.0),
                anchor: range(rng, 0.3, 0.7),
                blink_rate: range(rng, 1.5, 3.5),
                blink_phase: range(rng, 0.0, std::f32::consts::TAU),
            });

        buildings.push(Building {
            x,
            width: w,
            height: h,
            windows,
            spire,
        });

        x += w * (1.0 - range(rng, 0.0, MAX_OVERLAP));
    }

    buildings
}

fn window_grid<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Vec<Window> {
    let cell = WINDOW_SIZE + WINDOW_GAP;
    let cols = ((width - 2.0 * WINDOW_MARGIN + WINDOW_GAP.x) / cell.x).floor().max(0.0) as usize;
    let rows = ((height - 2.0 * WINDOW_MARGIN + WINDOW_GAP.y) / cell.y).floor().max(0.0) as usize;

    let mut windows = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if !rng.random_bool(WINDOW_LIT_CHANCE) {
                continue;
            }
            let color = if rng.random_bool(0.8) {
                Rgb::new(255, 214, 140)
            } else {
                Rgb::new(170, 210, 255)
            };
            windows.push(Window {
                offset: Vec2::new(
                    WINDOW_MARGIN + col as f32 * cell.x,
                    WINDOW_MARGIN + row as f32 * cell.y,
                ),
                color,
            });
        }
    }
    windows
}
