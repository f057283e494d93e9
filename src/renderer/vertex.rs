//! Vertex type for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Pixel-space position with straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Fixed backdrop colors
pub mod palette {
    use crate::math::Rgb;

    pub const SKY_ZENITH: Rgb = Rgb::new(3, 4, 14);
    pub const SKY_HORIZON: Rgb = Rgb::new(16, 18, 42);
    pub const WATER: Rgb = Rgb::new(4, 6, 16);
    pub const STAR: Rgb = Rgb::new(235, 240, 255);
    pub const CLOUD: Rgb = Rgb::new(120, 125, 150);
    pub const BEACON: Rgb = Rgb::new(255, 60, 50);
    /// Wireframe style draws on pure black with a single line color
    pub const WIRE: Rgb = Rgb::new(90, 200, 255);
    /// Background fill as a clear color
    pub const CLEAR: [f32; 4] = [0.01, 0.015, 0.05, 1.0];
}
