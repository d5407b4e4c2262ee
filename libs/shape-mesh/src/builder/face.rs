//! Triangle buffer builder.

use config::constants::{MeshConfig, POSITION_STRIDE, UV_STRIDE};

use super::{ColorState, MeshBuilder};
use crate::buffers::{IndexBuffer, MeshBuffers, MeshKind, MeshRange};
use crate::shape::ShapeRef;

/// Builds an indexed surface buffer, one range per face.
///
/// Indices passed to [`FaceMeshBuilder::add_indices`] are local to the
/// current group; the builder offsets them by the vertex count recorded at
/// `new_group`.
#[derive(Debug, Clone)]
pub struct FaceMeshBuilder {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    ranges: Vec<MeshRange>,
    color: ColorState,
    /// Index-array length when the current group started
    group_start: usize,
    /// Vertex count when the current group started
    vertex_base: u32,
}

impl Default for FaceMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceMeshBuilder {
    /// Creates a builder with the default face color.
    pub fn new() -> Self {
        Self::with_config(&MeshConfig::default())
    }

    /// Creates a builder taking its default color from `config`.
    pub fn with_config(config: &MeshConfig) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            ranges: Vec::new(),
            color: ColorState::new(config.face_color),
            group_start: 0,
            vertex_base: 0,
        }
    }

    /// Appends a vertex normal.
    pub fn add_normal(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.normals.extend([x, y, z]);
        self
    }

    /// Appends a texture coordinate.
    pub fn add_uv(&mut self, u: f32, v: f32) -> &mut Self {
        self.uvs.extend([u, v]);
        self
    }

    /// Appends a triangle using group-local vertex indices.
    pub fn add_indices(&mut self, i: u32, j: u32, k: u32) -> &mut Self {
        let base = self.vertex_base;
        self.indices.extend([base + i, base + j, base + k]);
        self
    }

    /// Returns the number of vertices added so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_STRIDE
    }
}

/// Keeps an optional attribute only if it was fed for every vertex.
fn complete_attribute(name: &str, values: Vec<f32>, expected: usize) -> Option<Vec<f32>> {
    if values.is_empty() {
        return None;
    }
    if values.len() != expected {
        log::warn!(
            "dropping {name}: {} values for {expected} expected",
            values.len()
        );
        return None;
    }
    Some(values)
}

impl MeshBuilder for FaceMeshBuilder {
    fn new_group(&mut self) -> &mut Self {
        self.group_start = self.indices.len();
        self.vertex_base = self.vertex_count() as u32;
        self
    }

    fn end_group(&mut self, shape: ShapeRef) -> &mut Self {
        let count = self.indices.len() - self.group_start;
        self.ranges.push(MeshRange::new(self.group_start, count, shape));
        self
    }

    fn add_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.positions.extend([x, y, z]);
        self
    }

    fn set_color(&mut self, color: u32) -> &mut Self {
        self.color.set(color);
        self
    }

    fn add_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.color.push(r, g, b);
        self
    }

    fn build(self) -> MeshBuffers {
        let vertex_count = self.vertex_count();
        let normal = complete_attribute("normal", self.normals, self.positions.len());
        let uv = complete_attribute("uv", self.uvs, vertex_count * UV_STRIDE);
        let color = self.color.resolve(self.positions.len());
        MeshBuffers {
            kind: MeshKind::Surface,
            index: Some(IndexBuffer::from_values(self.indices, vertex_count)),
            position: self.positions,
            normal,
            uv,
            color,
            ranges: self.ranges,
            groups: Vec::new(),
        }
    }
}
