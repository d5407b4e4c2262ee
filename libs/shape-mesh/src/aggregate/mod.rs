//! # Mesh Aggregation
//!
//! Merges per-shape buffers into combined buffers so that a whole assembly
//! is drawn with few draw calls.
//!
//! ## Merge Modes
//!
//! - [`set_into`]: writes a source into a pre-sized destination at a known
//!   offset, used when the total size of a batch is known up front
//! - [`combine`]: growable merge producing a new buffer from two inputs
//! - [`concat`]: [`combine`] without a placement transform
//!
//! Sources are never mutated: the same shape buffer is typically reused at
//! several placements with different transforms.
//!
//! ## Offsets
//!
//! ```text
//! dest:  [v0 .. vN)            index [i0 .. iM)
//! src:   [w0 .. wK)  ->  [vN .. vN+K)   index values + N, ranges/groups + M
//! ```
//!
//! Line buffers have no index array; their ranges shift by the vertex count.

mod batch;


pub use batch::{aggregate_batches, MeshBatch};

use config::constants::{DEFAULT_MATERIAL_INDEX, POSITION_STRIDE, UV_STRIDE};
use glam::{Mat3, Mat4, Vec3};

use crate::buffers::{IndexBuffer, MeshBuffers, MeshColor, MeshGroup};

/// Write cursor into a pre-sized destination buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshOffset {
    /// First destination vertex to write
    pub vertex: usize,
    /// First destination index entry to write
    pub index: usize,
}

impl MeshOffset {
    /// Creates an offset.
    pub fn new(vertex: usize, index: usize) -> Self {
        Self { vertex, index }
    }

    /// Moves the cursor past the extents of `src`.
    pub fn advance(&mut self, src: &MeshBuffers) {
        self.vertex += src.vertex_count();
        self.index += src.index_len();
    }
}

/// Outcome of [`merge_groups`].
///
/// `Unchanged` tells the renderer that the buffer it already uploaded is
/// still valid; `Rebuilt` carries a new buffer that must be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupRemap<'a> {
    /// The material map was empty; the input buffer is returned as is.
    Unchanged(&'a MeshBuffers),
    /// A copy of the input with rewritten group materials.
    Rebuilt(MeshBuffers),
}

impl GroupRemap<'_> {
    /// Returns true if the renderer has to upload the result.
    #[inline]
    pub fn needs_upload(&self) -> bool {
        matches!(self, Self::Rebuilt(_))
    }

    /// Borrows the resulting buffer.
    pub fn mesh(&self) -> &MeshBuffers {
        match self {
            Self::Unchanged(mesh) => mesh,
            Self::Rebuilt(mesh) => mesh,
        }
    }

    /// Takes the resulting buffer, cloning it if it was unchanged.
    pub fn into_owned(self) -> MeshBuffers {
        match self {
            Self::Unchanged(mesh) => mesh.clone(),
            Self::Rebuilt(mesh) => mesh,
        }
    }
}

/// Merges `src`, placed by `transform`, after `dest` into a new buffer.
///
/// Index values taken from `src` are shifted by the vertex count of `dest`;
/// ranges and groups of `src` are shifted by the index length of `dest`
/// (vertex count for line buffers) and record `transform` as their
/// placement. Neither input is modified.
///
/// # Panics
///
/// Panics if the buffers have different topologies or, when both hold
/// vertices, disagree on the presence of normals or uvs.
///
/// # Example
///
/// ```rust
/// use shape_mesh::{combine, LineType, MeshBuffers, MeshRange, ShapeRef};
/// use glam::{Mat4, Vec3};
///
/// let mut a = MeshBuffers::segment(Vec3::ZERO, Vec3::X, 0, LineType::Solid);
/// a.ranges.push(MeshRange::new(0, 2, ShapeRef(0)));
/// let mut b = MeshBuffers::segment(Vec3::Y, Vec3::Z, 0, LineType::Solid);
/// b.ranges.push(MeshRange::new(0, 2, ShapeRef(1)));
///
/// let merged = combine(&a, &b, &Mat4::IDENTITY);
/// assert_eq!(merged.position.len(), 12);
/// assert_eq!(merged.ranges[1].start, 2);
/// ```
pub fn combine(dest: &MeshBuffers, src: &MeshBuffers, transform: &Mat4) -> MeshBuffers {
    log::trace!(
        "combine {} + {} vertices",
        dest.vertex_count(),
        src.vertex_count()
    );
    merge(dest, src, Some(transform))
}

/// Concatenates two buffers without placing `src`.
///
/// Ranges keep whatever placement they already carry. Concatenating with an
/// empty buffer, on either side, returns the other buffer's content.
pub fn concat(first: &MeshBuffers, second: &MeshBuffers) -> MeshBuffers {
    merge(first, second, None)
}

fn merge(dest: &MeshBuffers, src: &MeshBuffers, transform: Option<&Mat4>) -> MeshBuffers {
    assert_mergeable(dest, src);

    let base_vertex = dest.vertex_count();
    let base_range = dest.range_extent();
    let total_vertices = base_vertex + src.vertex_count();

    let mut position = Vec::with_capacity(dest.position.len() + src.position.len());
    position.extend_from_slice(&dest.position);
    append_points(&mut position, &src.position, transform);

    // An empty side contributes no layout; the other side's is taken whole.
    let (normal, uv) = if dest.is_empty() {
        let normal = src.normal.as_deref().map(|values| {
            let mut out = Vec::with_capacity(values.len());
            append_vectors(&mut out, values, transform);
            out
        });
        (normal, src.uv.clone())
    } else if src.is_empty() {
        (dest.normal.clone(), dest.uv.clone())
    } else {
        (
            merge_optional(dest.normal.as_deref(), src.normal.as_deref(), |out, values| {
                append_vectors(out, values, transform)
            }),
            merge_optional(dest.uv.as_deref(), src.uv.as_deref(), |out, values| {
                out.extend_from_slice(values)
            }),
        )
    };

    let index = match (&dest.index, &src.index) {
        (None, None) => None,
        (dest_index, src_index) => {
            let shift = base_vertex as u32;
            let mut values = Vec::with_capacity(dest.index_len() + src.index_len());
            if let Some(dest_index) = dest_index {
                values.extend(dest_index.iter());
            }
            if let Some(src_index) = src_index {
                values.extend(src_index.iter().map(|i| i + shift));
            }
            Some(IndexBuffer::from_values(values, total_vertices))
        }
    };

    let mut ranges = Vec::with_capacity(dest.ranges.len() + src.ranges.len());
    ranges.extend(dest.ranges.iter().cloned());
    ranges.extend(src.ranges.iter().map(|r| r.shifted(base_range, transform)));

    let base_index = dest.index_len();
    let mut groups = Vec::with_capacity(dest.groups.len() + src.groups.len());
    groups.extend_from_slice(&dest.groups);
    groups.extend(src.groups.iter().map(|g| MeshGroup {
        start: g.start + base_index,
        ..*g
    }));

    MeshBuffers {
        kind: if dest.is_empty() { src.kind } else { dest.kind },
        position,
        normal,
        uv,
        index,
        color: merge_color(dest, src),
        ranges,
        groups,
    }
}

/// Writes `src`, placed by `transform`, into the pre-sized `dest` at `offset`.
///
/// Index values are shifted by `offset.vertex`; the ranges of `src` are
/// appended to `dest` shifted by `offset.index` (`offset.vertex` for line
/// buffers) with `transform` recorded, and its groups are appended shifted
/// by `offset.index`.
///
/// # Panics
///
/// Panics if the topologies differ, if a non-empty `src` disagrees with
/// `dest` on the presence of normals or uvs, if `src` does not fit in
/// `dest` at `offset`, or if a non-empty `src` has per-vertex colors while
/// `dest` is uniformly colored.
pub fn set_into(dest: &mut MeshBuffers, src: &MeshBuffers, transform: &Mat4, offset: MeshOffset) {
    set_into_with_materials(dest, src, transform, offset, &[]);
}

/// [`set_into`] that also rewrites the material of every appended group
/// through `material_map` (`(from, to)` pairs; unmapped materials are kept).
pub fn set_into_with_materials(
    dest: &mut MeshBuffers,
    src: &MeshBuffers,
    transform: &Mat4,
    offset: MeshOffset,
    material_map: &[(u32, u32)],
) {
    assert!(
        dest.kind.same_topology(&src.kind),
        "cannot write {:?} geometry into a {:?} buffer",
        src.kind,
        dest.kind
    );
    if !src.is_empty() {
        assert_same_layout(dest, src);
    }
    assert!(
        offset.vertex + src.vertex_count() <= dest.vertex_count(),
        "source vertices {}..{} exceed destination capacity {}",
        offset.vertex,
        offset.vertex + src.vertex_count(),
        dest.vertex_count()
    );
    assert!(
        offset.index + src.index_len() <= dest.index_len(),
        "source indices {}..{} exceed destination capacity {}",
        offset.index,
        offset.index + src.index_len(),
        dest.index_len()
    );
    log::trace!(
        "set_into vertex {} index {}: {} vertices",
        offset.vertex,
        offset.index,
        src.vertex_count()
    );

    let start = offset.vertex * POSITION_STRIDE;
    write_points(
        &mut dest.position[start..start + src.position.len()],
        &src.position,
        Some(transform),
    );
    if let (Some(out), Some(values)) = (dest.normal.as_mut(), src.normal.as_deref()) {
        write_vectors(&mut out[start..start + values.len()], values, Some(transform));
    }
    if let (Some(out), Some(values)) = (dest.uv.as_mut(), src.uv.as_deref()) {
        let uv_start = offset.vertex * UV_STRIDE;
        out[uv_start..uv_start + values.len()].copy_from_slice(values);
    }
    if let (Some(out), Some(values)) = (dest.index.as_mut(), src.index.as_ref()) {
        let shift = offset.vertex as u32;
        for (k, value) in values.iter().enumerate() {
            out.set(offset.index + k, value + shift);
        }
    }
    match &mut dest.color {
        MeshColor::PerVertex(out) => {
            let values = src.color.expand(src.vertex_count());
            if out.len() == dest.position.len() && values.len() == src.position.len() {
                out[start..start + values.len()].copy_from_slice(&values);
            } else {
                log::warn!(
                    "skipping vertex colors: {} values for {} vertices",
                    values.len() / POSITION_STRIDE,
                    src.vertex_count()
                );
            }
        }
        MeshColor::Uniform(_) => assert!(
            src.is_empty() || matches!(src.color, MeshColor::Uniform(_)),
            "cannot write per-vertex colors into a uniformly colored buffer"
        ),
    }

    let range_offset = if dest.is_surface() {
        offset.index
    } else {
        offset.vertex
    };
    for range in &src.ranges {
        let shifted = range.shifted(range_offset, Some(transform));
        debug_assert!(
            dest.ranges.last().map_or(true, |last| last.end() <= shifted.start),
            "set_into must be called with ascending offsets"
        );
        dest.ranges.push(shifted);
    }
    for group in &src.groups {
        dest.groups.push(MeshGroup {
            start: group.start + offset.index,
            count: group.count,
            material_index: remap_material(group.material_index, material_map),
        });
    }
}

/// Rewrites group materials through `material_map` (`(from, to)` pairs).
///
/// An empty map returns [`GroupRemap::Unchanged`] so the caller can skip
/// re-uploading. Otherwise a new buffer is returned whose groups carry the
/// mapped materials and whose other data is unchanged. A surface without
/// groups is treated as one group spanning its whole index array with the
/// default material.
pub fn merge_groups<'a>(mesh: &'a MeshBuffers, material_map: &[(u32, u32)]) -> GroupRemap<'a> {
    if material_map.is_empty() {
        return GroupRemap::Unchanged(mesh);
    }

    let mut rebuilt = mesh.clone();
    if rebuilt.groups.is_empty() && rebuilt.is_surface() {
        rebuilt
            .groups
            .push(MeshGroup::new(0, mesh.index_len(), DEFAULT_MATERIAL_INDEX));
    }
    for group in &mut rebuilt.groups {
        group.material_index = remap_material(group.material_index, material_map);
    }
    GroupRemap::Rebuilt(rebuilt)
}

fn remap_material(material: u32, material_map: &[(u32, u32)]) -> u32 {
    material_map
        .iter()
        .find(|(from, _)| *from == material)
        .map_or(material, |(_, to)| *to)
}

fn assert_mergeable(dest: &MeshBuffers, src: &MeshBuffers) {
    assert!(
        dest.kind.same_topology(&src.kind),
        "cannot merge {:?} geometry with {:?} geometry",
        src.kind,
        dest.kind
    );
    // An empty side has no attribute data to disagree with.
    if !dest.is_empty() && !src.is_empty() {
        assert_same_layout(dest, src);
    }
}

fn assert_same_layout(dest: &MeshBuffers, src: &MeshBuffers) {
    assert_eq!(
        dest.has_normals(),
        src.has_normals(),
        "merged buffers disagree on normals"
    );
    assert_eq!(dest.has_uvs(), src.has_uvs(), "merged buffers disagree on uvs");
}

fn merge_optional(
    dest: Option<&[f32]>,
    src: Option<&[f32]>,
    append: impl FnOnce(&mut Vec<f32>, &[f32]),
) -> Option<Vec<f32>> {
    match (dest, src) {
        (None, None) => None,
        (Some(dest), None) => Some(dest.to_vec()),
        (dest, Some(src)) => {
            let dest = dest.unwrap_or_default();
            let mut out = Vec::with_capacity(dest.len() + src.len());
            out.extend_from_slice(dest);
            append(&mut out, src);
            Some(out)
        }
    }
}

fn merge_color(dest: &MeshBuffers, src: &MeshBuffers) -> MeshColor {
    if dest.is_empty() {
        return src.color.clone();
    }
    if src.is_empty() {
        return dest.color.clone();
    }
    match (&dest.color, &src.color) {
        (MeshColor::Uniform(color), MeshColor::Uniform(_)) => MeshColor::Uniform(*color),
        (dest_color, src_color) => {
            let mut values = dest_color.expand(dest.vertex_count());
            values.extend(src_color.expand(src.vertex_count()));
            MeshColor::PerVertex(values)
        }
    }
}

fn append_points(out: &mut Vec<f32>, values: &[f32], transform: Option<&Mat4>) {
    let start = out.len();
    out.resize(start + values.len(), 0.0);
    write_points(&mut out[start..], values, transform);
}

fn append_vectors(out: &mut Vec<f32>, values: &[f32], transform: Option<&Mat4>) {
    let start = out.len();
    out.resize(start + values.len(), 0.0);
    write_vectors(&mut out[start..], values, transform);
}

fn write_points(out: &mut [f32], values: &[f32], transform: Option<&Mat4>) {
    match transform {
        Some(matrix) if *matrix != Mat4::IDENTITY => {
            for (dst, src) in out
                .chunks_exact_mut(POSITION_STRIDE)
                .zip(values.chunks_exact(POSITION_STRIDE))
            {
                let point = matrix.transform_point3(Vec3::from_slice(src));
                dst.copy_from_slice(&point.to_array());
            }
        }
        _ => out.copy_from_slice(values),
    }
}

fn write_vectors(out: &mut [f32], values: &[f32], transform: Option<&Mat4>) {
    match transform {
        Some(matrix) if *matrix != Mat4::IDENTITY => {
            let normal_matrix = normal_matrix(matrix);
            for (dst, src) in out
                .chunks_exact_mut(POSITION_STRIDE)
                .zip(values.chunks_exact(POSITION_STRIDE))
            {
                let normal = (normal_matrix * Vec3::from_slice(src)).normalize_or_zero();
                dst.copy_from_slice(&normal.to_array());
            }
        }
        _ => out.copy_from_slice(values),
    }
}

/// Inverse transpose of the linear part, or the linear part itself when it
/// is singular.
fn normal_matrix(matrix: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*matrix);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    }
}
