//! # Batch Aggregation
//!
//! A batch collects shape buffers with their placements, sizes one
//! destination for all of them and fills it with [`set_into`]. Every
//! instance is a checkpoint: a raised cancellation flag stops the pass and
//! the partial destination is dropped.
//!
//! Independent batches share nothing, so [`aggregate_batches`] runs them on
//! the rayon pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Mat4;
use rayon::prelude::*;

use super::{set_into_with_materials, MeshOffset};
use crate::buffers::{LineType, MeshBuffers, MeshColor, MeshKind};
use crate::error::{MeshError, MeshResult};

/// Shape buffers and placements to be merged into one buffer.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::AtomicBool;
/// use std::sync::Arc;
/// use shape_mesh::{FaceMeshBuilder, MeshBatch, MeshBuilder, ShapeRef};
/// use glam::Mat4;
///
/// let mut builder = FaceMeshBuilder::new();
/// builder.new_group();
/// builder.add_position(0.0, 0.0, 0.0).add_position(1.0, 0.0, 0.0).add_position(0.0, 1.0, 0.0);
/// builder.add_indices(0, 1, 2);
/// builder.end_group(ShapeRef(0));
/// let shape = Arc::new(builder.build());
///
/// let mut batch = MeshBatch::surfaces();
/// batch.push(shape.clone(), Mat4::IDENTITY);
/// batch.push(shape, Mat4::from_translation(glam::Vec3::X * 5.0));
///
/// let merged = batch.aggregate(&AtomicBool::new(false)).unwrap();
/// assert_eq!(merged.vertex_count(), 6);
/// assert_eq!(merged.ranges.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBatch {
    kind: MeshKind,
    instances: Vec<(Arc<MeshBuffers>, Mat4)>,
    material_map: Vec<(u32, u32)>,
}

impl MeshBatch {
    /// Creates an empty batch producing buffers of `kind`.
    pub fn new(kind: MeshKind) -> Self {
        Self {
            kind,
            instances: Vec::new(),
            material_map: Vec::new(),
        }
    }

    /// Creates an empty batch of surfaces.
    pub fn surfaces() -> Self {
        Self::new(MeshKind::Surface)
    }

    /// Creates an empty batch of line segments.
    pub fn lines(line_type: LineType) -> Self {
        Self::new(MeshKind::LineSegments {
            line_type,
            line_width: None,
        })
    }

    /// Rewrites group materials through `material_map` while merging.
    pub fn with_material_map(mut self, material_map: Vec<(u32, u32)>) -> Self {
        self.material_map = material_map;
        self
    }

    /// Adds a shape buffer placed by `transform`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer's topology differs from the batch kind.
    pub fn push(&mut self, mesh: Arc<MeshBuffers>, transform: Mat4) -> &mut Self {
        assert!(
            self.kind.same_topology(&mesh.kind),
            "cannot batch {:?} geometry into a {:?} batch",
            mesh.kind,
            self.kind
        );
        self.instances.push((mesh, transform));
        self
    }

    /// Returns the number of instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the batch holds no instances.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Total vertex and index counts of all instances.
    pub fn extents(&self) -> MeshOffset {
        let mut extents = MeshOffset::default();
        for (mesh, _) in &self.instances {
            extents.advance(mesh);
        }
        extents
    }

    /// Merges every instance into one pre-sized buffer.
    ///
    /// The attribute layout follows the first non-empty instance; every
    /// other instance must carry the same optional attributes. The result
    /// has per-vertex colors if any instance does, otherwise the uniform
    /// color of the first non-empty instance, matching [`combine`].
    ///
    /// [`combine`]: super::combine
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Cancelled`] if `cancel` is raised before the last
    /// instance has been written. The partial buffer is discarded.
    pub fn aggregate(&self, cancel: &AtomicBool) -> MeshResult<MeshBuffers> {
        let total = self.instances.len();
        let extents = self.extents();
        let template = self
            .instances
            .iter()
            .map(|(mesh, _)| mesh.as_ref())
            .find(|mesh| !mesh.is_empty());

        let mut dest = match self.kind {
            MeshKind::Surface => MeshBuffers::surface_with_capacity(
                extents.vertex,
                extents.index,
                template.map_or(false, MeshBuffers::has_normals),
                template.map_or(false, MeshBuffers::has_uvs),
            ),
            kind => MeshBuffers {
                kind,
                ..MeshBuffers::lines_with_capacity(extents.vertex)
            },
        };
        // Any per-vertex instance turns the whole destination per-vertex;
        // uniform instances are expanded into it.
        let per_vertex = self
            .instances
            .iter()
            .any(|(mesh, _)| !mesh.is_empty() && matches!(mesh.color, MeshColor::PerVertex(_)));
        if per_vertex {
            dest.color = MeshColor::PerVertex(vec![0.0; dest.position.len()]);
        } else if let Some(MeshColor::Uniform(color)) = template.map(|mesh| &mesh.color) {
            dest.color = MeshColor::Uniform(*color);
        }

        log::debug!(
            "aggregating {total} instances into {} vertices, {} indices",
            extents.vertex,
            extents.index
        );
        let mut offset = MeshOffset::default();
        for (completed, (mesh, transform)) in self.instances.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("aggregation cancelled after {completed} of {total} instances");
                return Err(MeshError::Cancelled { completed, total });
            }
            set_into_with_materials(&mut dest, mesh, transform, offset, &self.material_map);
            offset.advance(mesh);
        }
        log::debug!("aggregated {} ranges", dest.ranges.len());
        Ok(dest)
    }
}

/// Aggregates independent batches in parallel.
///
/// Results are returned in the order of `batches`. A raised `cancel` flag
/// stops every batch that has not finished yet.
pub fn aggregate_batches(batches: &[MeshBatch], cancel: &AtomicBool) -> Vec<MeshResult<MeshBuffers>> {
    batches
        .par_iter()
        .map(|batch| batch.aggregate(cancel))
        .collect()
}
