//! # Range Table
//!
//! Maps a flat buffer position reported by a pick test back to the sub-shape
//! range that contains it. Ranges are ascending and disjoint, so lookups are
//! a binary search.

use config::constants::{SEGMENT_STRIDE, TRIANGLE_STRIDE};

use crate::buffers::{MeshBuffers, MeshRange};

/// Read-only view over the ranges of a buffer.
///
/// # Example
///
/// ```rust
/// use shape_mesh::{MeshRange, RangeTable, ShapeRef};
///
/// let ranges = vec![
///     MeshRange::new(0, 6, ShapeRef(10)),
///     MeshRange::new(6, 3, ShapeRef(11)),
/// ];
/// let table = RangeTable::new(&ranges);
/// let (position, range) = table.find(7).unwrap();
/// assert_eq!(position, 1);
/// assert_eq!(range.shape, ShapeRef(11));
/// assert!(table.find(9).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RangeTable<'a> {
    ranges: &'a [MeshRange],
}

impl<'a> RangeTable<'a> {
    /// Wraps a slice of ascending, disjoint ranges.
    pub fn new(ranges: &'a [MeshRange]) -> Self {
        debug_assert!(
            ranges.windows(2).all(|w| w[0].end() <= w[1].start),
            "ranges must be ascending and disjoint"
        );
        Self { ranges }
    }

    /// Wraps the ranges of `mesh`.
    pub fn of(mesh: &'a MeshBuffers) -> Self {
        Self::new(&mesh.ranges)
    }

    /// Returns the number of ranges.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if the table holds no ranges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the range at `position`.
    #[inline]
    pub fn get(&self, position: usize) -> Option<&'a MeshRange> {
        self.ranges.get(position)
    }

    /// Finds the range containing `flat`, returning its position in the
    /// table and the range itself. Positions outside every range yield `None`.
    pub fn find(&self, flat: usize) -> Option<(usize, &'a MeshRange)> {
        let upper = self.ranges.partition_point(|range| range.start <= flat);
        // Empty ranges contain nothing; the candidate is the last non-empty
        // range starting at or before `flat`.
        let position = self.ranges[..upper]
            .iter()
            .rposition(|range| range.count > 0)?;
        let range = &self.ranges[position];
        range.contains(flat).then_some((position, range))
    }

    /// Finds the range containing triangle number `triangle` of a surface.
    pub fn find_triangle(&self, triangle: usize) -> Option<(usize, &'a MeshRange)> {
        self.find(triangle.checked_mul(TRIANGLE_STRIDE)?)
    }

    /// Finds the range containing segment number `segment` of a line buffer.
    pub fn find_segment(&self, segment: usize) -> Option<(usize, &'a MeshRange)> {
        self.find(segment.checked_mul(SEGMENT_STRIDE)?)
    }

    /// Iterates over the ranges in order.
    pub fn iter(&self) -> std::slice::Iter<'a, MeshRange> {
        self.ranges.iter()
    }
}
