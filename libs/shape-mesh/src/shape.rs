//! # Shape Handles
//!
//! Opaque identities for sub-shapes. The engine stores a [`ShapeRef`] in
//! every range and never looks behind it; the kernel objects themselves live
//! in a [`ShapeTable`] owned by the caller.

use serde::{Deserialize, Serialize};

/// Opaque handle to a sub-shape (face, edge or vertex) of the geometry kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeRef(pub u32);

impl ShapeRef {
    /// Returns the raw handle value.
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Append-only table resolving [`ShapeRef`] handles to kernel objects.
///
/// # Example
///
/// ```rust
/// use shape_mesh::ShapeTable;
///
/// let mut table = ShapeTable::new();
/// let face = table.insert("face#1");
/// assert_eq!(table.get(face), Some(&"face#1"));
/// ```
#[derive(Debug, Clone)]
pub struct ShapeTable<S> {
    shapes: Vec<S>,
}

impl<S> Default for ShapeTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ShapeTable<S> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Stores a shape and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the table already holds `u32::MAX + 1` shapes.
    #[allow(clippy::panic)]
    pub fn insert(&mut self, shape: S) -> ShapeRef {
        let id = u32::try_from(self.shapes.len()).unwrap_or_else(|_| panic!("shape table is full"));
        self.shapes.push(shape);
        ShapeRef(id)
    }

    /// Resolves a handle, or returns `None` for a handle from another table.
    pub fn get(&self, shape: ShapeRef) -> Option<&S> {
        self.shapes.get(shape.0 as usize)
    }

    /// Returns the number of stored shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no shape has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over handles and shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeRef, &S)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(id, shape)| (ShapeRef(id as u32), shape))
    }
}
