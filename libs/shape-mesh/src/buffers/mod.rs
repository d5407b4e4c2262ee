//! # Mesh Buffers
//!
//! Flat attribute buffers handed to the renderer, together with the
//! sub-shape ranges and material groups that partition them.
//!
//! ## Layout
//!
//! ```text
//! position  [x y z | x y z | ...]        3 floats per vertex
//! normal    [x y z | ...]  (optional)    3 floats per vertex
//! uv        [u v | ...]    (optional)    2 floats per vertex
//! index     [a b c | ...]  (surfaces)    3 entries per triangle
//! ```
//!
//! Surface ranges and groups count index entries; line ranges count
//! vertices (two per segment).

mod index;

#[cfg(test)]
mod tests;

pub use index::{IndexBuffer, IndexIter};

use std::ops::Range;

use config::constants::{
    MeshConfig, DEFAULT_EDGE_COLOR, DEFAULT_FACE_COLOR, POSITION_STRIDE, SEGMENT_STRIDE,
    TRIANGLE_STRIDE, UV_STRIDE,
};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::shape::ShapeRef;

/// Dash pattern of a line buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineType {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line.
    Dash,
}

/// Primitive topology of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum MeshKind {
    /// Indexed triangles.
    #[default]
    Surface,
    /// Non-indexed segments, two consecutive vertices each.
    LineSegments {
        /// Dash pattern
        line_type: LineType,
        /// Optional width override
        line_width: Option<f32>,
    },
    /// Non-indexed point markers.
    Points {
        /// Point size
        size: f32,
    },
}

impl MeshKind {
    /// Returns true if buffers of both kinds may be merged together.
    pub fn same_topology(&self, other: &MeshKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Number of flat range units per primitive (index entries per triangle
    /// for surfaces, vertices per segment for lines).
    pub fn range_stride(&self) -> usize {
        match self {
            Self::Surface => TRIANGLE_STRIDE,
            Self::LineSegments { .. } => SEGMENT_STRIDE,
            Self::Points { .. } => 1,
        }
    }
}

/// Buffer color: one packed `0xRRGGBB` value for the whole buffer, or one
/// `r g b` float triple per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshColor {
    /// Single color for every vertex.
    Uniform(u32),
    /// Per-vertex color triples in `0.0..=1.0`.
    PerVertex(Vec<f32>),
}

impl MeshColor {
    /// Expands a packed color to an `[r, g, b]` float triple.
    pub fn unpack(color: u32) -> [f32; 3] {
        [
            ((color >> 16) & 0xff) as f32 / 255.0,
            ((color >> 8) & 0xff) as f32 / 255.0,
            (color & 0xff) as f32 / 255.0,
        ]
    }

    /// Produces per-vertex color triples for `vertex_count` vertices.
    pub fn expand(&self, vertex_count: usize) -> Vec<f32> {
        match self {
            Self::Uniform(color) => Self::unpack(*color).repeat(vertex_count),
            Self::PerVertex(values) => values.clone(),
        }
    }
}

/// Span of a flat buffer contributed by one sub-shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRange {
    /// First flat position (index entry or vertex)
    pub start: usize,
    /// Number of flat positions
    pub count: usize,
    /// Sub-shape that produced the span
    pub shape: ShapeRef,
    /// Placement of an instanced copy, absent for the shape's own placement
    pub transform: Option<Mat4>,
}

impl MeshRange {
    /// Creates a range without an instance transform.
    pub fn new(start: usize, count: usize, shape: ShapeRef) -> Self {
        Self {
            start,
            count,
            shape,
            transform: None,
        }
    }

    /// Exclusive end of the span.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// The span as a `Range`.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns true if `flat` falls inside the span.
    #[inline]
    pub fn contains(&self, flat: usize) -> bool {
        flat >= self.start && flat < self.end()
    }

    /// Copy moved by `offset`, placed by `transform` on top of any placement
    /// already recorded.
    pub(crate) fn shifted(&self, offset: usize, transform: Option<&Mat4>) -> Self {
        let transform = match (transform, self.transform) {
            (Some(outer), Some(inner)) => Some(*outer * inner),
            (Some(outer), None) => Some(*outer),
            (None, inner) => inner,
        };
        Self {
            start: self.start + offset,
            count: self.count,
            shape: self.shape,
            transform,
        }
    }
}

/// Material partition of the index array, one draw call each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshGroup {
    /// First index entry
    pub start: usize,
    /// Number of index entries
    pub count: usize,
    /// Material slot used for the draw call
    pub material_index: u32,
}

impl MeshGroup {
    /// Creates a group.
    pub fn new(start: usize, count: usize, material_index: u32) -> Self {
        Self {
            start,
            count,
            material_index,
        }
    }

    /// Exclusive end of the group.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Attribute buffers of one shape or of an aggregated batch of shapes.
///
/// Positions, normals and uvs are stored flat as `f32` values ready for
/// upload. Surfaces always carry an index array, lines and points never do.
///
/// # Example
///
/// ```rust
/// use shape_mesh::{LineType, MeshBuffers};
/// use glam::Vec3;
///
/// let edge = MeshBuffers::segment(Vec3::ZERO, Vec3::X, 0x111111, LineType::Solid);
/// assert_eq!(edge.vertex_count(), 2);
/// assert!(edge.index.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    /// Primitive topology
    pub kind: MeshKind,
    /// Vertex positions
    pub position: Vec<f32>,
    /// Optional vertex normals
    pub normal: Option<Vec<f32>>,
    /// Optional texture coordinates
    pub uv: Option<Vec<f32>>,
    /// Triangle indices, present only for surfaces
    pub index: Option<IndexBuffer>,
    /// Uniform or per-vertex color
    pub color: MeshColor,
    /// Sub-shape ranges, ascending and disjoint
    pub ranges: Vec<MeshRange>,
    /// Material groups, ascending and disjoint
    pub groups: Vec<MeshGroup>,
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::empty_surface()
    }
}

impl MeshBuffers {
    /// Creates an empty surface buffer.
    pub fn empty_surface() -> Self {
        Self {
            kind: MeshKind::Surface,
            position: Vec::new(),
            normal: None,
            uv: None,
            index: Some(IndexBuffer::default()),
            color: MeshColor::Uniform(DEFAULT_FACE_COLOR),
            ranges: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Creates an empty solid line buffer.
    pub fn empty_lines() -> Self {
        Self {
            kind: MeshKind::LineSegments {
                line_type: LineType::Solid,
                line_width: None,
            },
            position: Vec::new(),
            normal: None,
            uv: None,
            index: None,
            color: MeshColor::Uniform(DEFAULT_EDGE_COLOR),
            ranges: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Creates a zero-filled surface destination sized for `vertex_count`
    /// vertices and `index_count` index entries.
    ///
    /// The index width is chosen from `vertex_count`, so the buffer can later
    /// be filled with `set_into` without reallocation.
    pub fn surface_with_capacity(
        vertex_count: usize,
        index_count: usize,
        normals: bool,
        uvs: bool,
    ) -> Self {
        Self {
            position: vec![0.0; vertex_count * POSITION_STRIDE],
            normal: normals.then(|| vec![0.0; vertex_count * POSITION_STRIDE]),
            uv: uvs.then(|| vec![0.0; vertex_count * UV_STRIDE]),
            index: Some(IndexBuffer::zeroed(index_count, vertex_count)),
            ..Self::empty_surface()
        }
    }

    /// Creates a zero-filled line destination sized for `vertex_count` vertices.
    pub fn lines_with_capacity(vertex_count: usize) -> Self {
        Self {
            position: vec![0.0; vertex_count * POSITION_STRIDE],
            ..Self::empty_lines()
        }
    }

    /// Creates a single-segment line buffer from `start` to `end`.
    pub fn segment(start: Vec3, end: Vec3, color: u32, line_type: LineType) -> Self {
        let mut position = Vec::with_capacity(2 * POSITION_STRIDE);
        position.extend_from_slice(&start.to_array());
        position.extend_from_slice(&end.to_array());
        Self {
            kind: MeshKind::LineSegments {
                line_type,
                line_width: None,
            },
            position,
            color: MeshColor::Uniform(color),
            ..Self::empty_lines()
        }
    }

    /// Creates a single point marker.
    pub fn point(at: Vec3, size: f32, color: u32) -> Self {
        Self {
            kind: MeshKind::Points { size },
            position: at.to_array().to_vec(),
            normal: None,
            uv: None,
            index: None,
            color: MeshColor::Uniform(color),
            ranges: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Creates a vertex marker sized and colored from `config`.
    pub fn vertex_marker(at: Vec3, config: &MeshConfig) -> Self {
        Self::point(at, config.vertex_size, config.edge_color)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.position.len() / POSITION_STRIDE
    }

    /// Returns the number of index entries (zero for lines and points).
    #[inline]
    pub fn index_len(&self) -> usize {
        self.index.as_ref().map_or(0, IndexBuffer::len)
    }

    /// Returns true if the buffer holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Returns true for triangle buffers.
    #[inline]
    pub fn is_surface(&self) -> bool {
        matches!(self.kind, MeshKind::Surface)
    }

    /// Returns true if vertex normals are present.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normal.is_some()
    }

    /// Returns true if texture coordinates are present.
    #[inline]
    pub fn has_uvs(&self) -> bool {
        self.uv.is_some()
    }

    /// Length of the flat array that ranges address: index entries for
    /// surfaces, vertices otherwise.
    #[inline]
    pub fn range_extent(&self) -> usize {
        if self.is_surface() {
            self.index_len()
        } else {
            self.vertex_count()
        }
    }

    /// Checks the structural invariants of the buffer.
    ///
    /// Verifies:
    /// - attribute arrays are whole tuples and cover every vertex
    /// - the index array matches the kind, its width and its vertex count
    /// - ranges and groups are ascending, disjoint and in bounds
    pub fn validate(&self) -> MeshResult<()> {
        check_stride("position", self.position.len(), POSITION_STRIDE)?;
        let vertex_count = self.vertex_count();

        if let Some(normal) = &self.normal {
            check_length("normal", normal.len(), vertex_count * POSITION_STRIDE)?;
        }
        if let Some(uv) = &self.uv {
            check_length("uv", uv.len(), vertex_count * UV_STRIDE)?;
        }
        if let MeshColor::PerVertex(values) = &self.color {
            check_length("color", values.len(), vertex_count * POSITION_STRIDE)?;
        }

        match (&self.kind, &self.index) {
            (MeshKind::Surface, Some(index)) => {
                check_stride("index", index.len(), TRIANGLE_STRIDE)?;
                if !index.is_wide() && IndexBuffer::needs_wide(vertex_count) {
                    return Err(MeshError::IndexTooNarrow { vertex_count });
                }
                for (position, value) in index.iter().enumerate() {
                    if value as usize >= vertex_count {
                        return Err(MeshError::IndexOutOfBounds {
                            position,
                            value,
                            vertex_count,
                        });
                    }
                }
            }
            (MeshKind::Surface, None) => return Err(MeshError::IndexPresence),
            (_, Some(_)) => return Err(MeshError::IndexPresence),
            (_, None) => {}
        }

        self.validate_ranges()?;
        self.validate_groups()
    }

    fn validate_ranges(&self) -> MeshResult<()> {
        let stride = self.kind.range_stride();
        let len = self.range_extent();
        let mut previous_end = 0;
        for (position, range) in self.ranges.iter().enumerate() {
            if range.start < previous_end {
                return Err(MeshError::UnorderedRanges { position });
            }
            if range.count % stride != 0 {
                return Err(MeshError::MisalignedRange {
                    position,
                    count: range.count,
                    stride,
                });
            }
            if range.end() > len {
                return Err(MeshError::RangeOutOfBounds {
                    position,
                    end: range.end(),
                    len,
                });
            }
            previous_end = range.end();
        }
        Ok(())
    }

    fn validate_groups(&self) -> MeshResult<()> {
        let len = self.index_len();
        let mut previous_end = 0;
        for (position, group) in self.groups.iter().enumerate() {
            if group.start < previous_end {
                return Err(MeshError::UnorderedGroups { position });
            }
            if group.end() > len {
                return Err(MeshError::GroupOutOfBounds {
                    position,
                    end: group.end(),
                    len,
                });
            }
            previous_end = group.end();
        }
        Ok(())
    }
}

fn check_stride(attribute: &'static str, len: usize, stride: usize) -> MeshResult<()> {
    if len % stride != 0 {
        return Err(MeshError::MisalignedAttribute {
            attribute,
            len,
            stride,
        });
    }
    Ok(())
}

fn check_length(attribute: &'static str, len: usize, expected: usize) -> MeshResult<()> {
    if len != expected {
        return Err(MeshError::AttributeLength {
            attribute,
            len,
            expected,
        });
    }
    Ok(())
}
