//! # Configuration Constants
//!
//! Centralized constants for the shape mesh engine. Buffer layout limits,
//! default display colors and the runtime configuration snapshot are defined
//! here.
//!
//! ## Categories
//!
//! - **Layout**: Index width and attribute strides shared with the renderer
//! - **Display**: Default colors and sizes used by mesh builders
//! - **Materials**: Material slot used when nothing else is assigned

use std::fmt;

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

/// Vertex count at which index buffers switch from 16-bit to 32-bit values.
///
/// A buffer with fewer vertices than this stores its indices as `u16`; once
/// the total vertex count reaches the limit every index is stored as `u32`.
/// The value is a contract with the rendering consumer and is not
/// configurable at runtime.
///
/// # Example
///
/// ```rust
/// use config::constants::U16_INDEX_VERTEX_LIMIT;
///
/// fn needs_wide_indices(vertex_count: usize) -> bool {
///     vertex_count >= U16_INDEX_VERTEX_LIMIT
/// }
///
/// assert!(!needs_wide_indices(65_535));
/// assert!(needs_wide_indices(65_536));
/// ```
pub const U16_INDEX_VERTEX_LIMIT: usize = 65_536;

/// Number of floats per position or normal tuple.
///
/// # Example
///
/// ```rust
/// use config::constants::POSITION_STRIDE;
///
/// let position = [0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(position.len() / POSITION_STRIDE, 2);
/// ```
pub const POSITION_STRIDE: usize = 3;

/// Number of floats per texture coordinate tuple.
///
/// # Example
///
/// ```rust
/// use config::constants::UV_STRIDE;
///
/// let uv = [0.0f32, 0.0, 1.0, 0.0];
/// assert_eq!(uv.len() / UV_STRIDE, 2);
/// ```
pub const UV_STRIDE: usize = 2;

/// Number of index entries per triangle.
pub const TRIANGLE_STRIDE: usize = 3;

/// Number of vertices per line segment.
pub const SEGMENT_STRIDE: usize = 2;

/// Number of floats written per boundary edge of a face outline
/// (two endpoints of three coordinates each).
///
/// # Example
///
/// ```rust
/// use config::constants::OUTLINE_EDGE_FLOATS;
///
/// // A single triangle has three boundary edges
/// assert_eq!(3 * OUTLINE_EDGE_FLOATS, 18);
/// ```
pub const OUTLINE_EDGE_FLOATS: usize = 6;

// =============================================================================
// DISPLAY CONSTANTS
// =============================================================================

/// Default uniform color of face buffers, packed as `0xRRGGBB`.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_FACE_COLOR;
///
/// let red = (DEFAULT_FACE_COLOR >> 16) & 0xff;
/// assert_eq!(red, 0xde);
/// ```
pub const DEFAULT_FACE_COLOR: u32 = 0xdedede;

/// Default uniform color of edge buffers, packed as `0xRRGGBB`.
pub const DEFAULT_EDGE_COLOR: u32 = 0x111111;

/// Color used for highlighted edges and outlines, packed as `0xRRGGBB`.
pub const HIGHLIGHT_EDGE_COLOR: u32 = 0x0000ee;

/// Largest value a packed `0xRRGGBB` color may take.
pub const MAX_PACKED_COLOR: u32 = 0xffffff;

/// Default point size of vertex marker buffers.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_VERTEX_SIZE;
///
/// assert!(DEFAULT_VERTEX_SIZE > 0.0);
/// ```
pub const DEFAULT_VERTEX_SIZE: f32 = 5.0;

// =============================================================================
// MATERIAL CONSTANTS
// =============================================================================

/// Material slot assigned to geometry that carries no explicit group.
///
/// A surface buffer without groups is drawn as one implicit group using
/// this material index.
pub const DEFAULT_MATERIAL_INDEX: u32 = 0;

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Immutable snapshot of the display defaults used by mesh builders.
///
/// # Examples
/// ```
/// use config::constants::MeshConfig;
/// let config = MeshConfig::default();
/// assert!(config.vertex_size > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshConfig {
    /// Uniform color applied to face buffers without per-vertex colors.
    pub face_color: u32,
    /// Uniform color applied to edge buffers without per-vertex colors.
    pub edge_color: u32,
    /// Point size of vertex marker buffers.
    pub vertex_size: f32,
}

impl MeshConfig {
    /// Builds a configuration, rejecting colors outside `0xRRGGBB` and
    /// vertex sizes that are not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use config::constants::MeshConfig;
    /// let cfg = MeshConfig::new(0xff0000, 0x000000, 3.0).expect("valid config");
    /// assert_eq!(cfg.face_color, 0xff0000);
    /// assert!(MeshConfig::new(0x1000000, 0, 3.0).is_err());
    /// ```
    pub fn new(face_color: u32, edge_color: u32, vertex_size: f32) -> Result<Self, ConfigError> {
        if face_color > MAX_PACKED_COLOR {
            return Err(ConfigError::InvalidColor(face_color));
        }
        if edge_color > MAX_PACKED_COLOR {
            return Err(ConfigError::InvalidColor(edge_color));
        }
        if !vertex_size.is_finite() || vertex_size <= 0.0 {
            return Err(ConfigError::InvalidVertexSize(vertex_size));
        }
        Ok(Self {
            face_color,
            edge_color,
            vertex_size,
        })
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            face_color: DEFAULT_FACE_COLOR,
            edge_color: DEFAULT_EDGE_COLOR,
            vertex_size: DEFAULT_VERTEX_SIZE,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a packed color does not fit in `0xRRGGBB`.
    InvalidColor(u32),
    /// Raised when the vertex size is zero, negative or not finite.
    InvalidVertexSize(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidColor(value) => {
                write!(f, "color must fit in 0xRRGGBB: {value:#x}")
            }
            ConfigError::InvalidVertexSize(value) => {
                write!(f, "vertex_size must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
