//! # Index Buffer
//!
//! Triangle index storage whose element width is chosen once from the
//! vertex count it addresses.

use std::ops::Range;
use std::slice;

use config::constants::U16_INDEX_VERTEX_LIMIT;
use serde::{Deserialize, Serialize};

/// Index array of a surface buffer.
///
/// Buffers addressing fewer than [`U16_INDEX_VERTEX_LIMIT`] vertices store
/// `u16` values, larger ones store `u32` values. The width never changes
/// after construction; operations that grow a buffer produce a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexBuffer {
    /// Narrow indices for buffers below the vertex limit.
    U16(Vec<u16>),
    /// Wide indices for buffers at or above the vertex limit.
    U32(Vec<u32>),
}

impl Default for IndexBuffer {
    fn default() -> Self {
        Self::U16(Vec::new())
    }
}

impl IndexBuffer {
    /// Returns true if a buffer with `vertex_count` vertices needs `u32` indices.
    #[inline]
    pub fn needs_wide(vertex_count: usize) -> bool {
        vertex_count >= U16_INDEX_VERTEX_LIMIT
    }

    /// Creates a zero-filled index buffer of `len` entries addressing
    /// `vertex_count` vertices.
    pub fn zeroed(len: usize, vertex_count: usize) -> Self {
        if Self::needs_wide(vertex_count) {
            Self::U32(vec![0; len])
        } else {
            Self::U16(vec![0; len])
        }
    }

    /// Builds an index buffer from 32-bit values, narrowing to `u16` when
    /// `vertex_count` allows it.
    ///
    /// Out-of-range values are kept wide rather than truncated, so that
    /// validation can still report them.
    pub fn from_values(values: Vec<u32>, vertex_count: usize) -> Self {
        let fits_narrow = values
            .iter()
            .all(|&v| (v as usize) < U16_INDEX_VERTEX_LIMIT);
        if Self::needs_wide(vertex_count) || !fits_narrow {
            Self::U32(values)
        } else {
            Self::U16(values.into_iter().map(|v| v as u16).collect())
        }
    }

    /// Returns the number of index entries.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U16(values) => values.len(),
            Self::U32(values) => values.len(),
        }
    }

    /// Returns true if there are no index entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the entries are stored as `u32`.
    #[inline]
    pub fn is_wide(&self) -> bool {
        matches!(self, Self::U32(_))
    }

    /// Returns the entry at `position`, widened to `u32`.
    #[inline]
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            Self::U16(values) => values.get(position).map(|&v| u32::from(v)),
            Self::U32(values) => values.get(position).copied(),
        }
    }

    /// Overwrites the entry at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds or if a narrow buffer receives
    /// a value that does not fit in `u16`.
    #[allow(clippy::panic)]
    pub fn set(&mut self, position: usize, value: u32) {
        match self {
            Self::U16(values) => {
                let narrow = u16::try_from(value)
                    .unwrap_or_else(|_| panic!("index {value} does not fit a 16-bit index buffer"));
                values[position] = narrow;
            }
            Self::U32(values) => values[position] = value,
        }
    }

    /// Iterates over all entries as `u32`.
    pub fn iter(&self) -> IndexIter<'_> {
        match self {
            Self::U16(values) => IndexIter::U16(values.iter()),
            Self::U32(values) => IndexIter::U32(values.iter()),
        }
    }

    /// Iterates over the entries in `span`, or returns `None` if the span
    /// reaches past the end of the buffer.
    pub fn iter_span(&self, span: Range<usize>) -> Option<IndexIter<'_>> {
        match self {
            Self::U16(values) => values.get(span).map(|s| IndexIter::U16(s.iter())),
            Self::U32(values) => values.get(span).map(|s| IndexIter::U32(s.iter())),
        }
    }

    /// Copies the entries in `span` into a new buffer of the same width.
    pub fn slice(&self, span: Range<usize>) -> Option<Self> {
        match self {
            Self::U16(values) => values.get(span).map(|s| Self::U16(s.to_vec())),
            Self::U32(values) => values.get(span).map(|s| Self::U32(s.to_vec())),
        }
    }

    /// Returns the largest entry, or `None` for an empty buffer.
    pub fn max_value(&self) -> Option<u32> {
        self.iter().max()
    }

    /// Copies all entries into a `u32` vector.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

/// Iterator over index entries of either width.
#[derive(Debug, Clone)]
pub enum IndexIter<'a> {
    /// Iterating narrow entries.
    U16(slice::Iter<'a, u16>),
    /// Iterating wide entries.
    U32(slice::Iter<'a, u32>),
}

impl Iterator for IndexIter<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        match self {
            Self::U16(iter) => iter.next().map(|&v| u32::from(v)),
            Self::U32(iter) => iter.next().copied(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::U16(iter) => iter.size_hint(),
            Self::U32(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for IndexIter<'_> {}

impl<'a> IntoIterator for &'a IndexBuffer {
    type Item = u32;
    type IntoIter = IndexIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
