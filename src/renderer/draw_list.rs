//! Frame description handed from the compositor to the GPU layer
//!
//! Batches are drawn in order; consecutive pushes with the same blend mode
//! share a batch so a typical frame is only a handful of draw calls.

use super::vertex::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Standard "over" compositing for backdrop layers
    Alpha,
    /// Additive (`lighter`) compositing for glowing entities
    Additive,
}

/// What happens to the previous frame before drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadAction {
    /// Start from a solid color
    Clear([f32; 4]),
    /// Keep the previous frame; a translucent overlay is drawn over it to fade trails
    Keep,
}

#[derive(Debug, Clone)]
pub struct Batch {
    pub blend: Blend,
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone)]
pub struct DrawList {
    pub load: LoadAction,
    pub batches: Vec<Batch>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            load: LoadAction::Keep,
            batches: Vec::new(),
        }
    }
}

impl DrawList {
    /// Reset for a new frame
    pub fn begin(&mut self, load: LoadAction) {
        self.load = load;
        self.batches.clear();
    }

    /// Vertex sink for the given blend mode; starts a new batch on a mode change
    pub fn layer(&mut self, blend: Blend) -> &mut Vec<Vertex> {
        let reuse = self.batches.last().is_some_and(|b| b.blend == blend);
        if !reuse {
            self.batches.push(Batch {
                blend,
                vertices: Vec::new(),
            });
        }
        let last = self.batches.len() - 1;
        &mut self.batches[last].vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.iter().filter(|b| !b.vertices.is_empty()).count()
    }
}
