//! Line segment buffer builder.

use config::constants::{MeshConfig, POSITION_STRIDE};

use super::{ColorState, MeshBuilder};
use crate::buffers::{LineType, MeshBuffers, MeshKind, MeshRange};
use crate::shape::ShapeRef;

/// Builds a segment buffer from polylines, one range per edge.
///
/// Positions are polyline points: from the second point of a group on, each
/// point emits a segment joining it to its predecessor, so `n` points become
/// `n - 1` segments and `2 * (n - 1)` vertices.
#[derive(Debug, Clone)]
pub struct EdgeMeshBuilder {
    positions: Vec<f32>,
    ranges: Vec<MeshRange>,
    color: ColorState,
    line_type: LineType,
    line_width: Option<f32>,
    group_start: usize,
    previous: Option<[f32; 3]>,
}

impl Default for EdgeMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeMeshBuilder {
    /// Creates a builder with the default edge color.
    pub fn new() -> Self {
        Self::with_config(&MeshConfig::default())
    }

    /// Creates a builder taking its default color from `config`.
    pub fn with_config(config: &MeshConfig) -> Self {
        Self {
            positions: Vec::new(),
            ranges: Vec::new(),
            color: ColorState::new(config.edge_color),
            line_type: LineType::Solid,
            line_width: None,
            group_start: 0,
            previous: None,
        }
    }

    /// Sets the dash pattern of the whole buffer.
    pub fn set_line_type(&mut self, line_type: LineType) -> &mut Self {
        self.line_type = line_type;
        self
    }

    /// Sets a line width override for the whole buffer.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = Some(width);
        self
    }

    /// Returns the number of segment vertices emitted so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_STRIDE
    }
}

impl MeshBuilder for EdgeMeshBuilder {
    fn new_group(&mut self) -> &mut Self {
        self.group_start = self.positions.len();
        self.previous = None;
        self
    }

    fn end_group(&mut self, shape: ShapeRef) -> &mut Self {
        let start = self.group_start / POSITION_STRIDE;
        let count = (self.positions.len() - self.group_start) / POSITION_STRIDE;
        self.ranges.push(MeshRange::new(start, count, shape));
        self
    }

    fn add_position(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if let Some(previous) = self.previous {
            self.positions.extend(previous);
            self.positions.extend([x, y, z]);
        }
        self.previous = Some([x, y, z]);
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
        let color = self.color.resolve(self.positions.len());
        MeshBuffers {
            kind: MeshKind::LineSegments {
                line_type: self.line_type,
                line_width: self.line_width,
            },
            position: self.positions,
            normal: None,
            uv: None,
            index: None,
            color,
            ranges: self.ranges,
            groups: Vec::new(),
        }
    }
}
