//! # Mesh Builders
//!
//! Incremental assembly of one shape's attribute buffers. The tessellator
//! drives a builder with one `new_group` / `add_*` / `end_group` sequence per
//! sub-shape and finishes with `build`, which always returns a valid buffer.
//!
//! ## Example
//!
//! ```rust
//! use shape_mesh::{FaceMeshBuilder, MeshBuilder, ShapeRef};
//!
//! let mut builder = FaceMeshBuilder::new();
//! builder.new_group();
//! builder
//!     .add_position(0.0, 0.0, 0.0)
//!     .add_position(1.0, 0.0, 0.0)
//!     .add_position(0.0, 1.0, 0.0);
//! builder.add_indices(0, 1, 2);
//! builder.end_group(ShapeRef(0));
//!
//! let mesh = builder.build();
//! assert_eq!(mesh.ranges.len(), 1);
//! assert_eq!(mesh.index_len(), 3);
//! ```

mod edge;
mod face;


pub use edge::EdgeMeshBuilder;
pub use face::FaceMeshBuilder;

use crate::buffers::{MeshBuffers, MeshColor};
use crate::shape::ShapeRef;

/// Operations shared by face and edge builders.
pub trait MeshBuilder {
    /// Starts the contribution of a new sub-shape.
    fn new_group(&mut self) -> &mut Self;

    /// Closes the current sub-shape, recording its range.
    fn end_group(&mut self, shape: ShapeRef) -> &mut Self;

    /// Appends a vertex position.
    fn add_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self;

    /// Sets the uniform color used when per-vertex colors are incomplete.
    fn set_color(&mut self, color: u32) -> &mut Self;

    /// Appends a per-vertex color triple.
    fn add_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self;

    /// Finalizes the typed buffers.
    fn build(self) -> MeshBuffers
    where
        Self: Sized;
}

/// Color bookkeeping shared by the builders.
#[derive(Debug, Clone)]
pub(crate) struct ColorState {
    uniform: u32,
    per_vertex: Option<Vec<f32>>,
}

impl ColorState {
    pub(crate) fn new(uniform: u32) -> Self {
        Self {
            uniform,
            per_vertex: None,
        }
    }

    pub(crate) fn set(&mut self, color: u32) {
        self.uniform = color;
    }

    pub(crate) fn push(&mut self, r: f32, g: f32, b: f32) {
        self.per_vertex.get_or_insert_with(Vec::new).extend([r, g, b]);
    }

    /// Per-vertex colors win only when they cover every position exactly;
    /// anything else falls back to the uniform color.
    pub(crate) fn resolve(self, position_len: usize) -> MeshColor {
        match self.per_vertex {
            Some(values) if values.len() == position_len => MeshColor::PerVertex(values),
            Some(values) => {
                log::warn!(
                    "per-vertex colors cover {} of {} values, using uniform color {:#08x}",
                    values.len(),
                    position_len,
                    self.uniform
                );
                MeshColor::Uniform(self.uniform)
            }
            None => MeshColor::Uniform(self.uniform),
        }
    }
}
