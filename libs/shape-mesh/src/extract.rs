//! # Sub-Shape Extraction
//!
//! Recovers a standalone buffer for a single sub-shape of an aggregated
//! buffer, typically to draw a hover or selection highlight on top of it.

use config::constants::{DEFAULT_EDGE_COLOR, POSITION_STRIDE};

use crate::buffers::{MeshBuffers, MeshColor};

/// Extracts the face recorded at `range_index`.
///
/// Positions, normals and uvs are carried over whole, so index values keep
/// addressing the parent's vertices; only the index array is narrowed to the
/// face's span. The result has no ranges or groups of its own.
///
/// Returns `None` for a line buffer, for an out-of-bounds `range_index`, or
/// for a range reaching past the index array.
pub fn sub_face(mesh: &MeshBuffers, range_index: usize) -> Option<MeshBuffers> {
    let range = mesh.ranges.get(range_index)?;
    let Some(index) = mesh.index.as_ref()?.slice(range.span()) else {
        log::warn!(
            "face range {range_index} ({}..{}) exceeds index length {}",
            range.start,
            range.end(),
            mesh.index_len()
        );
        return None;
    };
    Some(MeshBuffers {
        kind: mesh.kind,
        position: mesh.position.clone(),
        normal: mesh.normal.clone(),
        uv: mesh.uv.clone(),
        index: Some(index),
        color: mesh.color.clone(),
        ranges: Vec::new(),
        groups: Vec::new(),
    })
}

/// Extracts the edge recorded at `range_index`.
///
/// Line buffers have no index array, so the positions themselves are sliced
/// to the edge's vertex span. The result has no ranges of its own.
///
/// Returns `None` for a surface buffer, for an out-of-bounds `range_index`,
/// or for a range reaching past the positions.
pub fn sub_edge(mesh: &MeshBuffers, range_index: usize) -> Option<MeshBuffers> {
    if mesh.index.is_some() {
        return None;
    }
    let range = mesh.ranges.get(range_index)?;
    let span = range.start * POSITION_STRIDE..range.end() * POSITION_STRIDE;
    let Some(position) = mesh.position.get(span.clone()) else {
        log::warn!(
            "edge range {range_index} ({}..{}) exceeds vertex count {}",
            range.start,
            range.end(),
            mesh.vertex_count()
        );
        return None;
    };
    let slice_attribute = |values: &Vec<f32>| values.get(span.clone()).map(<[f32]>::to_vec);

    let color = match &mesh.color {
        MeshColor::PerVertex(values) => match values.get(span.clone()) {
            Some(values) => MeshColor::PerVertex(values.to_vec()),
            None => {
                log::warn!(
                    "edge range {range_index} exceeds {} color values, using {DEFAULT_EDGE_COLOR:#08x}",
                    values.len()
                );
                MeshColor::Uniform(DEFAULT_EDGE_COLOR)
            }
        },
        uniform => uniform.clone(),
    };

    Some(MeshBuffers {
        kind: mesh.kind,
        position: position.to_vec(),
        normal: mesh.normal.as_ref().and_then(slice_attribute),
        uv: None,
        index: None,
        color,
        ranges: Vec::new(),
        groups: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::{IndexBuffer, LineType, MeshRange};
    use crate::shape::ShapeRef;
    use glam::Vec3;

    /// Two triangles, each its own face, sharing no vertices.
    fn two_faces() -> MeshBuffers {
        MeshBuffers {
            position: vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                5.0, 0.0, 0.0, 6.0, 0.0, 0.0, 5.0, 1.0, 0.0,
            ],
            normal: Some([0.0f32, 0.0, 1.0].repeat(6)),
            uv: Some([0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0].repeat(2)),
            index: Some(IndexBuffer::U16(vec![0, 1, 2, 3, 4, 5])),
            ranges: vec![
                MeshRange::new(0, 3, ShapeRef(1)),
                MeshRange::new(3, 3, ShapeRef(2)),
            ],
            ..MeshBuffers::empty_surface()
        }
    }

    fn polyline() -> MeshBuffers {
        let mut edge = MeshBuffers::segment(Vec3::ZERO, Vec3::X, 0x111111, LineType::Solid);
        edge.position
            .extend_from_slice(&[1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 7.0, 0.0, 0.0, 8.0, 0.0, 0.0]);
        edge.ranges = vec![
            MeshRange::new(0, 4, ShapeRef(1)),
            MeshRange::new(4, 2, ShapeRef(2)),
        ];
        edge
    }

    #[test]
    fn test_sub_face_narrows_index() {
        let mesh = two_faces();
        let face = sub_face(&mesh, 1).unwrap();
        assert_eq!(face.index, Some(IndexBuffer::U16(vec![3, 4, 5])));
        assert_eq!(face.position, mesh.position);
        assert_eq!(face.normal, mesh.normal);
        assert_eq!(face.uv, mesh.uv);
        assert!(face.ranges.is_empty());
        assert!(face.validate().is_ok());
    }

    #[test]
    fn test_sub_face_out_of_bounds() {
        let mesh = two_faces();
        assert!(sub_face(&mesh, 2).is_none());
        assert!(sub_face(&mesh, usize::MAX).is_none());
    }

    #[test]
    fn test_sub_face_range_past_index() {
        let mut mesh = two_faces();
        mesh.ranges[1].count = 6;
        assert!(sub_face(&mesh, 1).is_none());
    }

    #[test]
    fn test_sub_face_of_lines() {
        assert!(sub_face(&polyline(), 0).is_none());
    }

    #[test]
    fn test_sub_edge_slices_positions() {
        let mesh = polyline();
        let edge = sub_edge(&mesh, 1).unwrap();
        assert_eq!(edge.position, vec![7.0, 0.0, 0.0, 8.0, 0.0, 0.0]);
        assert!(edge.ranges.is_empty());
        assert!(edge.index.is_none());

        let first = sub_edge(&mesh, 0).unwrap();
        assert_eq!(first.vertex_count(), 4);
        assert_eq!(&first.position[..], &mesh.position[..12]);
    }

    #[test]
    fn test_sub_edge_out_of_bounds() {
        let mesh = polyline();
        assert!(sub_edge(&mesh, 2).is_none());
        assert!(sub_edge(&two_faces(), 0).is_none());
    }

    #[test]
    fn test_sub_edge_short_vertex_colors_fall_back() {
        let mut mesh = polyline();
        mesh.color = MeshColor::PerVertex(vec![1.0; 12]);
        let edge = sub_edge(&mesh, 1).unwrap();
        assert_eq!(edge.color, MeshColor::Uniform(DEFAULT_EDGE_COLOR));
        assert_eq!(edge.vertex_count(), 2);
    }

    #[test]
    fn test_sub_edge_slices_vertex_colors() {
        let mut mesh = polyline();
        mesh.color = MeshColor::PerVertex((0..18).map(|v| v as f32).collect());
        let edge = sub_edge(&mesh, 1).unwrap();
        assert_eq!(
            edge.color,
            MeshColor::PerVertex((12..18).map(|v| v as f32).collect())
        );
    }
}
