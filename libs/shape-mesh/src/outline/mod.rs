//! # Face Outlines
//!
//! Boundary polyline of a triangulated face region, drawn as the highlight
//! silhouette of a picked face.
//!
//! ## Algorithm
//!
//! 1. Register the three edges of every triangle under an undirected key
//!    `(min(i, j), max(i, j))`, counting occurrences
//! 2. In a 2-manifold triangulation interior edges are seen twice and
//!    boundary edges once
//! 3. Emit the endpoints of every edge seen exactly once, in first-seen order
//!
//! Degenerate edges (`i == j`) are counted like any other edge.


use std::collections::HashMap;

use config::constants::{HIGHLIGHT_EDGE_COLOR, OUTLINE_EDGE_FLOATS, POSITION_STRIDE};

use crate::buffers::{LineType, MeshBuffers, MeshColor, MeshKind};

/// Occurrence count and endpoints of one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEntry {
    /// Number of triangles that registered the edge
    pub count: u32,
    /// Endpoint coordinates as first seen, `[x0 y0 z0 x1 y1 z1]`
    pub points: [f32; OUTLINE_EDGE_FLOATS],
}

/// Undirected edge registry preserving first-seen order.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    slots: HashMap<(u32, u32), usize>,
    edges: Vec<EdgeEntry>,
}

impl EdgeMap {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the edge between vertices `i` and `j` of `position`.
    ///
    /// The first registration records the endpoint coordinates in the order
    /// given; later registrations in either direction only bump the count.
    /// An edge whose endpoint has no position is skipped.
    pub fn add_edge(&mut self, position: &[f32], i: u32, j: u32) {
        let key = (i.min(j), i.max(j));
        if let Some(&slot) = self.slots.get(&key) {
            self.edges[slot].count += 1;
            return;
        }

        let (Some(start), Some(end)) = (vertex(position, i), vertex(position, j)) else {
            log::warn!(
                "outline edge ({i}, {j}) addresses a missing vertex of {}",
                position.len() / POSITION_STRIDE
            );
            return;
        };
        if i == j {
            log::debug!("degenerate outline edge at vertex {i}");
        }

        let mut points = [0.0; OUTLINE_EDGE_FLOATS];
        points[..POSITION_STRIDE].copy_from_slice(start);
        points[POSITION_STRIDE..].copy_from_slice(end);
        self.slots.insert(key, self.edges.len());
        self.edges.push(EdgeEntry { count: 1, points });
    }

    /// Looks up the edge between `i` and `j` in either direction.
    pub fn get(&self, i: u32, j: u32) -> Option<&EdgeEntry> {
        let slot = self.slots.get(&(i.min(j), i.max(j)))?;
        self.edges.get(*slot)
    }

    /// Returns the number of distinct edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if no edge has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Endpoints of every edge registered exactly once, in first-seen order,
    /// six floats per edge.
    pub fn boundary(&self) -> Vec<f32> {
        self.edges
            .iter()
            .filter(|edge| edge.count == 1)
            .flat_map(|edge| edge.points)
            .collect()
    }
}

fn vertex(position: &[f32], index: u32) -> Option<&[f32]> {
    let start = (index as usize).checked_mul(POSITION_STRIDE)?;
    position.get(start..start + POSITION_STRIDE)
}

/// Boundary edges of the triangles listed by `indices` over `position`.
///
/// Every consecutive triple of `indices` is one triangle; a trailing partial
/// triple is ignored.
pub fn triangle_outline(position: &[f32], indices: impl IntoIterator<Item = u32>) -> Vec<f32> {
    let mut edges = EdgeMap::new();
    let mut indices = indices.into_iter();
    while let (Some(a), Some(b), Some(c)) = (indices.next(), indices.next(), indices.next()) {
        edges.add_edge(position, a, b);
        edges.add_edge(position, b, c);
        edges.add_edge(position, c, a);
    }
    edges.boundary()
}

/// Boundary edges of a face buffer, six floats per edge.
///
/// A buffer without triangles yields an empty outline.
///
/// # Example
///
/// ```rust
/// use shape_mesh::{face_outline, IndexBuffer, MeshBuffers};
///
/// let face = MeshBuffers {
///     position: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///     index: Some(IndexBuffer::U16(vec![0, 1, 2])),
///     ..MeshBuffers::empty_surface()
/// };
/// assert_eq!(face_outline(&face).len(), 18);
/// ```
pub fn face_outline(face: &MeshBuffers) -> Vec<f32> {
    match &face.index {
        Some(index) => triangle_outline(&face.position, index),
        None => Vec::new(),
    }
}

/// Outline of the face recorded at `range_index` of `mesh`.
///
/// Returns `None` whenever [`sub_face`](crate::sub_face) would.
pub fn sub_face_outlines(mesh: &MeshBuffers, range_index: usize) -> Option<Vec<f32>> {
    let range = mesh.ranges.get(range_index)?;
    let indices = mesh.index.as_ref()?.iter_span(range.span())?;
    Some(triangle_outline(&mesh.position, indices))
}

/// Wraps outline floats in a solid segment buffer drawn in the highlight
/// color. A trailing partial edge is dropped.
pub fn highlight_outline(mut outline: Vec<f32>) -> MeshBuffers {
    let whole = outline.len() - outline.len() % OUTLINE_EDGE_FLOATS;
    if whole != outline.len() {
        log::warn!("dropping {} trailing outline values", outline.len() - whole);
        outline.truncate(whole);
    }
    MeshBuffers {
        kind: MeshKind::LineSegments {
            line_type: LineType::Solid,
            line_width: None,
        },
        position: outline,
        color: MeshColor::Uniform(HIGHLIGHT_EDGE_COLOR),
        ..MeshBuffers::empty_lines()
    }
}
