//! # Buffer Tests
//!
//! Tests for index width selection, colors and buffer validation.

use super::*;
use approx::assert_relative_eq;

fn triangle() -> MeshBuffers {
    MeshBuffers {
        position: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        index: Some(IndexBuffer::U16(vec![0, 1, 2])),
        ranges: vec![MeshRange::new(0, 3, ShapeRef(0))],
        ..MeshBuffers::empty_surface()
    }
}

// =============================================================================
// IndexBuffer
// =============================================================================

#[test]
fn test_index_width_threshold() {
    assert!(!IndexBuffer::needs_wide(65_535));
    assert!(IndexBuffer::needs_wide(65_536));

    assert!(!IndexBuffer::zeroed(3, 65_535).is_wide());
    assert!(IndexBuffer::zeroed(3, 65_536).is_wide());
}

#[test]
fn test_from_values_narrows() {
    let index = IndexBuffer::from_values(vec![0, 1, 2], 3);
    assert_eq!(index, IndexBuffer::U16(vec![0, 1, 2]));
}

#[test]
fn test_from_values_keeps_large_values() {
    // Values that do not fit u16 are never truncated
    let index = IndexBuffer::from_values(vec![0, 70_000, 2], 3);
    assert_eq!(index, IndexBuffer::U32(vec![0, 70_000, 2]));
}

#[test]
fn test_index_access() {
    let index = IndexBuffer::U16(vec![4, 5, 6, 7]);
    assert_eq!(index.len(), 4);
    assert_eq!(index.get(2), Some(6));
    assert_eq!(index.get(4), None);
    assert_eq!(index.max_value(), Some(7));
    assert_eq!(index.to_u32_vec(), vec![4, 5, 6, 7]);
    assert_eq!(index.slice(1..3), Some(IndexBuffer::U16(vec![5, 6])));
    assert!(index.slice(3..5).is_none());
    assert_eq!(index.iter_span(2..4).map(|it| it.len()), Some(2));
    assert!(IndexBuffer::default().max_value().is_none());
}

#[test]
fn test_index_set() {
    let mut index = IndexBuffer::zeroed(2, 10);
    index.set(1, 9);
    assert_eq!(index.to_u32_vec(), vec![0, 9]);

    let mut wide = IndexBuffer::zeroed(1, 100_000);
    wide.set(0, 99_999);
    assert_eq!(wide.get(0), Some(99_999));
}

#[test]
#[should_panic(expected = "does not fit")]
fn test_index_set_overflow_panics() {
    let mut index = IndexBuffer::zeroed(1, 10);
    index.set(0, 65_536);
}

// =============================================================================
// Colors and kinds
// =============================================================================

#[test]
fn test_unpack_color() {
    let [r, g, b] = MeshColor::unpack(0xff8000);
    assert_relative_eq!(r, 1.0);
    assert_relative_eq!(g, 128.0 / 255.0);
    assert_relative_eq!(b, 0.0);
}

#[test]
fn test_expand_color() {
    let uniform = MeshColor::Uniform(0x0000ff);
    assert_eq!(uniform.expand(2), vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);

    let per_vertex = MeshColor::PerVertex(vec![0.5; 6]);
    assert_eq!(per_vertex.expand(2), vec![0.5; 6]);
}

#[test]
fn test_same_topology_ignores_line_style() {
    let solid = MeshKind::LineSegments {
        line_type: LineType::Solid,
        line_width: None,
    };
    let dash = MeshKind::LineSegments {
        line_type: LineType::Dash,
        line_width: Some(2.0),
    };
    assert!(solid.same_topology(&dash));
    assert!(!solid.same_topology(&MeshKind::Surface));
    assert_eq!(MeshKind::default(), MeshKind::Surface);
}

// =============================================================================
// Constructors
// =============================================================================

#[test]
fn test_empty_buffers_are_valid() {
    let surface = MeshBuffers::empty_surface();
    assert!(surface.is_empty());
    assert!(surface.is_surface());
    assert_eq!(surface.color, MeshColor::Uniform(0xdedede));
    assert!(surface.validate().is_ok());

    let lines = MeshBuffers::empty_lines();
    assert!(lines.index.is_none());
    assert_eq!(lines.color, MeshColor::Uniform(0x111111));
    assert!(lines.validate().is_ok());
}

#[test]
fn test_segment_and_point() {
    let segment = MeshBuffers::segment(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), 0xff0000, LineType::Dash);
    assert_eq!(segment.position, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    assert_eq!(
        segment.kind,
        MeshKind::LineSegments {
            line_type: LineType::Dash,
            line_width: None
        }
    );
    assert!(segment.validate().is_ok());

    let point = MeshBuffers::point(Vec3::ONE, 5.0, 0x00ff00);
    assert_eq!(point.vertex_count(), 1);
    assert_eq!(point.kind, MeshKind::Points { size: 5.0 });
    assert!(point.validate().is_ok());
}

#[test]
fn test_vertex_marker_uses_config() {
    let marker = MeshBuffers::vertex_marker(Vec3::ONE, &MeshConfig::default());
    assert_eq!(marker.kind, MeshKind::Points { size: 5.0 });
    assert_eq!(marker.color, MeshColor::Uniform(0x111111));

    let config = MeshConfig::new(0xdedede, 0x00ff00, 8.0).unwrap();
    let marker = MeshBuffers::vertex_marker(Vec3::ZERO, &config);
    assert_eq!(marker.kind, MeshKind::Points { size: 8.0 });
    assert_eq!(marker.color, MeshColor::Uniform(0x00ff00));
    assert!(marker.validate().is_ok());
}

#[test]
fn test_surface_with_capacity() {
    let mesh = MeshBuffers::surface_with_capacity(4, 6, true, false);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.index_len(), 6);
    assert_eq!(mesh.normal.as_ref().map(Vec::len), Some(12));
    assert!(mesh.uv.is_none());
    assert!(!mesh.index.as_ref().unwrap().is_wide());

    let large = MeshBuffers::surface_with_capacity(70_000, 3, false, false);
    assert!(large.index.unwrap().is_wide());
}

#[test]
fn test_range_extent() {
    assert_eq!(triangle().range_extent(), 3);
    let lines = MeshBuffers::segment(Vec3::ZERO, Vec3::X, 0, LineType::Solid);
    assert_eq!(lines.range_extent(), 2);
}

#[test]
fn test_range_shift_composes_transforms() {
    let inner = Mat4::from_translation(Vec3::X);
    let outer = Mat4::from_scale(Vec3::splat(2.0));
    let mut range = MeshRange::new(3, 3, ShapeRef(1));
    range.transform = Some(inner);

    let moved = range.shifted(6, Some(&outer));
    assert_eq!(moved.span(), 9..12);
    assert_eq!(moved.transform, Some(outer * inner));

    let kept = range.shifted(0, None);
    assert_eq!(kept.transform, Some(inner));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_triangle() {
    assert_eq!(triangle().validate(), Ok(()));
}

#[test]
fn test_validate_misaligned_position() {
    let mut mesh = triangle();
    mesh.position.push(1.0);
    assert_eq!(
        mesh.validate(),
        Err(MeshError::MisalignedAttribute {
            attribute: "position",
            len: 10,
            stride: 3
        })
    );
}

#[test]
fn test_validate_short_normals() {
    let mut mesh = triangle();
    mesh.normal = Some(vec![0.0, 0.0, 1.0]);
    assert_eq!(
        mesh.validate(),
        Err(MeshError::AttributeLength {
            attribute: "normal",
            len: 3,
            expected: 9
        })
    );
}

#[test]
fn test_validate_index_out_of_bounds() {
    let mut mesh = triangle();
    mesh.index = Some(IndexBuffer::U16(vec![0, 1, 3]));
    assert_eq!(
        mesh.validate(),
        Err(MeshError::IndexOutOfBounds {
            position: 2,
            value: 3,
            vertex_count: 3
        })
    );
}

#[test]
fn test_validate_narrow_index_for_large_buffer() {
    let mesh = MeshBuffers {
        position: vec![0.0; 65_536 * 3],
        index: Some(IndexBuffer::U16(vec![0, 1, 2])),
        ..MeshBuffers::empty_surface()
    };
    assert_eq!(
        mesh.validate(),
        Err(MeshError::IndexTooNarrow {
            vertex_count: 65_536
        })
    );
}

#[test]
fn test_validate_index_presence() {
    let mut surface = triangle();
    surface.index = None;
    assert_eq!(surface.validate(), Err(MeshError::IndexPresence));

    let mut lines = MeshBuffers::empty_lines();
    lines.index = Some(IndexBuffer::default());
    assert_eq!(lines.validate(), Err(MeshError::IndexPresence));
}

#[test]
fn test_validate_ranges() {
    let mut overlapping = triangle();
    overlapping.ranges.push(MeshRange::new(0, 3, ShapeRef(1)));
    assert_eq!(
        overlapping.validate(),
        Err(MeshError::UnorderedRanges { position: 1 })
    );

    let mut misaligned = triangle();
    misaligned.ranges[0].count = 2;
    assert_eq!(
        misaligned.validate(),
        Err(MeshError::MisalignedRange {
            position: 0,
            count: 2,
            stride: 3
        })
    );

    let mut past_end = triangle();
    past_end.ranges[0].start = 3;
    assert_eq!(
        past_end.validate(),
        Err(MeshError::RangeOutOfBounds {
            position: 0,
            end: 6,
            len: 3
        })
    );
}

#[test]
fn test_validate_groups() {
    let mut mesh = triangle();
    mesh.groups = vec![MeshGroup::new(0, 3, 0)];
    assert!(mesh.validate().is_ok());

    mesh.groups.push(MeshGroup::new(1, 2, 1));
    assert_eq!(
        mesh.validate(),
        Err(MeshError::UnorderedGroups { position: 1 })
    );

    mesh.groups = vec![MeshGroup::new(0, 6, 0)];
    assert_eq!(
        mesh.validate(),
        Err(MeshError::GroupOutOfBounds {
            position: 0,
            end: 6,
            len: 3
        })
    );
}

#[test]
fn test_validate_vertex_colors() {
    let mut mesh = triangle();
    mesh.color = MeshColor::PerVertex(vec![1.0; 9]);
    assert!(mesh.validate().is_ok());

    mesh.color = MeshColor::PerVertex(vec![1.0; 6]);
    assert!(matches!(
        mesh.validate(),
        Err(MeshError::AttributeLength {
            attribute: "color",
            ..
        })
    ));
}
