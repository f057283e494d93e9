//! Rendering
//!
//! The painter turns simulation state into a `DrawList` of plain triangles;
//! the WebGPU `RenderState` uploads and draws it. Only the GPU layer depends
//! on a live surface, so everything above it runs headless.

pub mod draw_list;
pub mod painter;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw_list::{Batch, Blend, DrawList, LoadAction};
pub use painter::Painter;
pub use pipeline::RenderState;
pub use vertex::Vertex;
