//! # Tests for Config Constants
//!
//! Unit tests verifying the configuration constants and the validated
//! `MeshConfig` snapshot.

use crate::constants::*;

// =============================================================================
// LAYOUT TESTS
// =============================================================================

#[test]
fn test_index_limit_matches_u16_range() {
    // Every vertex below the limit must be addressable by a u16 index
    assert_eq!(U16_INDEX_VERTEX_LIMIT, u16::MAX as usize + 1);
}

#[test]
fn test_strides() {
    assert_eq!(POSITION_STRIDE, 3);
    assert_eq!(UV_STRIDE, 2);
    assert_eq!(TRIANGLE_STRIDE, 3);
    assert_eq!(SEGMENT_STRIDE, 2);
    assert_eq!(OUTLINE_EDGE_FLOATS, 2 * POSITION_STRIDE);
}

// =============================================================================
// DISPLAY TESTS
// =============================================================================

#[test]
fn test_default_colors_fit_packed_range() {
    assert!(DEFAULT_FACE_COLOR <= MAX_PACKED_COLOR);
    assert!(DEFAULT_EDGE_COLOR <= MAX_PACKED_COLOR);
    assert!(HIGHLIGHT_EDGE_COLOR <= MAX_PACKED_COLOR);
}

#[test]
fn test_default_vertex_size_is_positive() {
    assert!(DEFAULT_VERTEX_SIZE > 0.0);
}

// =============================================================================
// MESH CONFIG TESTS
// =============================================================================

#[test]
fn test_default_config_uses_constants() {
    let cfg = MeshConfig::default();
    assert_eq!(cfg.face_color, DEFAULT_FACE_COLOR);
    assert_eq!(cfg.edge_color, DEFAULT_EDGE_COLOR);
    assert_eq!(cfg.vertex_size, DEFAULT_VERTEX_SIZE);
}

#[test]
fn test_new_accepts_valid_values() {
    let cfg = MeshConfig::new(0x00ff00, 0xffffff, 1.5).unwrap();
    assert_eq!(cfg.face_color, 0x00ff00);
    assert_eq!(cfg.edge_color, 0xffffff);
    assert_eq!(cfg.vertex_size, 1.5);
}

#[test]
fn test_new_rejects_wide_colors() {
    assert_eq!(
        MeshConfig::new(0x1000000, 0, 1.0).unwrap_err(),
        ConfigError::InvalidColor(0x1000000)
    );
    assert_eq!(
        MeshConfig::new(0, 0xabcdef01, 1.0).unwrap_err(),
        ConfigError::InvalidColor(0xabcdef01)
    );
}

#[test]
fn test_new_rejects_bad_vertex_size() {
    assert_eq!(
        MeshConfig::new(0, 0, 0.0).unwrap_err(),
        ConfigError::InvalidVertexSize(0.0)
    );
    assert!(MeshConfig::new(0, 0, -2.0).is_err());
    assert!(MeshConfig::new(0, 0, f32::NAN).is_err());
    assert!(MeshConfig::new(0, 0, f32::INFINITY).is_err());
}

#[test]
fn test_error_display() {
    let err = ConfigError::InvalidColor(0x1000000);
    assert!(err.to_string().contains("0xRRGGBB"));
    let err = ConfigError::InvalidVertexSize(-1.0);
    assert!(err.to_string().contains("vertex_size"));
}
