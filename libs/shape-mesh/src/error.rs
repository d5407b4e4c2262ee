//! # Mesh Errors
//!
//! Error types for mesh validation and aggregation passes.
//!
//! ## Error Policy
//!
//! - Lookups that miss (out-of-range pick, unknown range) return `None`
//! - Structural problems found by `MeshBuffers::validate` return an error
//! - Caller bugs in batching (attribute layout mismatch, mixing surface and
//!   line buffers, overflowing a pre-sized destination) panic

use thiserror::Error;

/// Errors that can occur while validating or aggregating mesh buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// An aggregation pass observed its cancellation flag.
    #[error("Aggregation cancelled after {completed} of {total} instances")]
    Cancelled {
        /// Instances merged before the pass stopped
        completed: usize,
        /// Instances in the batch
        total: usize,
    },

    /// An attribute array length is not a multiple of its tuple size.
    #[error("Attribute '{attribute}' has {len} values, not a multiple of {stride}")]
    MisalignedAttribute {
        /// Attribute name
        attribute: &'static str,
        /// Number of scalar values
        len: usize,
        /// Expected tuple size
        stride: usize,
    },

    /// An optional attribute does not cover every vertex.
    #[error("Attribute '{attribute}' has {len} values, expected {expected}")]
    AttributeLength {
        /// Attribute name
        attribute: &'static str,
        /// Number of scalar values
        len: usize,
        /// Number of values required by the vertex count
        expected: usize,
    },

    /// An index entry addresses a vertex that does not exist.
    #[error("Index {value} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfBounds {
        /// Position in the index array
        position: usize,
        /// Offending index value
        value: u32,
        /// Number of vertices in the buffer
        vertex_count: usize,
    },

    /// A 16-bit index buffer is used for a buffer that needs 32-bit indices.
    #[error("16-bit indices cannot address {vertex_count} vertices")]
    IndexTooNarrow {
        /// Number of vertices in the buffer
        vertex_count: usize,
    },

    /// A surface buffer lacks an index array or a line buffer carries one.
    #[error("Index array presence does not match mesh kind")]
    IndexPresence,

    /// A range starts before the previous range ends.
    #[error("Range {position} is out of order or overlaps its predecessor")]
    UnorderedRanges {
        /// Position of the offending range
        position: usize,
    },

    /// A range count is not a whole number of triangles or segments.
    #[error("Range {position} has count {count}, not a multiple of {stride}")]
    MisalignedRange {
        /// Position of the offending range
        position: usize,
        /// Range length
        count: usize,
        /// Expected primitive size
        stride: usize,
    },

    /// A range reaches past the end of the array it addresses.
    #[error("Range {position} ends at {end}, past the buffer length {len}")]
    RangeOutOfBounds {
        /// Position of the offending range
        position: usize,
        /// Exclusive end of the range
        end: usize,
        /// Length of the addressed array
        len: usize,
    },

    /// A material group starts before the previous group ends.
    #[error("Group {position} is out of order or overlaps its predecessor")]
    UnorderedGroups {
        /// Position of the offending group
        position: usize,
    },

    /// A material group reaches past the end of the index array.
    #[error("Group {position} ends at {end}, past the index length {len}")]
    GroupOutOfBounds {
        /// Position of the offending group
        position: usize,
        /// Exclusive end of the group
        end: usize,
        /// Length of the index array
        len: usize,
    },
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
