//! # Shape Mesh
//!
//! Mesh aggregation and sub-shape extraction for tessellated CAD shapes.
//! Every shape is tessellated into flat attribute buffers; this crate
//! batches those buffers into few draw calls and maps pick results back to
//! the sub-shape that produced them.
//!
//! ## Architecture
//!
//! ```text
//! tessellator → builder (MeshBuffers per shape)
//!                  → aggregate (MeshBatch / combine / set_into)
//!                      → renderer
//!
//! pick hit → range (RangeTable) → extract (sub_face / sub_edge)
//!                                   → outline (face boundary)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use shape_mesh::{face_outline, sub_face, FaceMeshBuilder, MeshBuilder, RangeTable, ShapeRef};
//!
//! let mut builder = FaceMeshBuilder::new();
//! builder.new_group();
//! builder
//!     .add_position(0.0, 0.0, 0.0)
//!     .add_position(1.0, 0.0, 0.0)
//!     .add_position(0.0, 1.0, 0.0);
//! builder.add_indices(0, 1, 2);
//! builder.end_group(ShapeRef(42));
//! let mesh = builder.build();
//!
//! let (picked, range) = RangeTable::of(&mesh).find_triangle(0).unwrap();
//! assert_eq!(range.shape, ShapeRef(42));
//!
//! let face = sub_face(&mesh, picked).unwrap();
//! assert_eq!(face_outline(&face).len(), 18);
//! ```

pub mod aggregate;
pub mod buffers;
pub mod builder;
pub mod error;
pub mod extract;
pub mod outline;
pub mod range;
pub mod shape;

pub use aggregate::{
    aggregate_batches, combine, concat, merge_groups, set_into, set_into_with_materials,
    GroupRemap, MeshBatch, MeshOffset,
};
pub use buffers::{
    IndexBuffer, IndexIter, LineType, MeshBuffers, MeshColor, MeshGroup, MeshKind, MeshRange,
};
pub use builder::{EdgeMeshBuilder, FaceMeshBuilder, MeshBuilder};
pub use error::{MeshError, MeshResult};
pub use extract::{sub_edge, sub_face};
pub use outline::{
    face_outline, highlight_outline, sub_face_outlines, triangle_outline, EdgeEntry, EdgeMap,
};
pub use range::RangeTable;
pub use shape::{ShapeRef, ShapeTable};
