//! Accessors: transient, non-owning handles into a [`Triangulation`].
//!
//! An accessor is a `(triangulation, level, index)` triple. It is `Copy`,
//! costs three words, and never outlives the triangulation it borrows.
//!
//! - [`TriaAccessor`] is the dimension-agnostic core: identity, comparison and
//!   the three-state lifecycle.
//! - [`StructAccessor`] adds the contract shared by lines, quads and hexes,
//!   selected at runtime through a [`Structure`] tag.
//! - [`CellAccessor`] is the top-dimensional specialization with neighbors and
//!   refinement flags.
//! - [`StructAccessorMut`] / [`CellAccessorMut`] are the only write path into
//!   level storage.

mod cell;
mod mutable;
mod structure;

pub use cell::CellAccessor;
pub use mutable::{CellAccessorMut, StructAccessorMut};
pub use structure::StructAccessor;

use crate::mesh_error::MeshError;
use crate::precondition;
use crate::topology::object_id::{IteratorState, ObjectId};
use crate::topology::triangulation::Triangulation;
use std::fmt;

/// Generic structural accessor: a triangulation reference plus a slot address.
#[derive(Clone, Copy)]
pub struct TriaAccessor<'a, const D: usize> {
    tria: &'a Triangulation<D>,
    id: ObjectId,
}

impl<'a, const D: usize> TriaAccessor<'a, D> {
    #[inline]
    pub fn new(tria: &'a Triangulation<D>, id: ObjectId) -> Self {
        Self { tria, id }
    }

    #[inline]
    pub fn triangulation(&self) -> &'a Triangulation<D> {
        self.tria
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.id.level()
    }

    #[inline]
    pub fn index(&self) -> i32 {
        self.id.index()
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> IteratorState {
        self.id.state()
    }

    /// Repoints this handle at whatever `other` addresses, including its
    /// triangulation.
    #[inline]
    pub fn copy_from(&mut self, other: &Self) {
        self.tria = other.tria;
        self.id = other.id;
    }

    #[inline]
    pub(crate) fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    /// Whether both handles point into the same triangulation.
    #[inline]
    pub fn same_triangulation(&self, other: &Self) -> bool {
        std::ptr::eq(self.tria, other.tria)
    }
}

/// Handles compare by `(level, index)`. Comparing handles of two different
/// triangulations is a precondition violation.
impl<const D: usize> PartialEq for TriaAccessor<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        precondition!(
            self.same_triangulation(other),
            MeshError::CantCompareIterators
        );
        self.id == other.id
    }
}

impl<const D: usize> Eq for TriaAccessor<'_, D> {}

impl<const D: usize> fmt::Debug for TriaAccessor<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TriaAccessor<{D}>({})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_follows_id() {
        let tria = Triangulation::<2>::new();
        let a = TriaAccessor::new(&tria, ObjectId::new(0, 4));
        assert_eq!(a.state(), IteratorState::Valid);
        let end = TriaAccessor::new(&tria, ObjectId::PAST_THE_END);
        assert_eq!(end.state(), IteratorState::PastTheEnd);
        let bad = TriaAccessor::new(&tria, ObjectId::new(2, -3));
        assert_eq!(bad.state(), IteratorState::Invalid);
    }

    #[test]
    fn copy_from_and_equality() {
        let tria = Triangulation::<1>::new();
        let a = TriaAccessor::new(&tria, ObjectId::new(1, 2));
        let mut b = TriaAccessor::new(&tria, ObjectId::new(0, 0));
        assert_ne!(a, b);
        b.copy_from(&a);
        assert_eq!(a, b);
        assert_eq!((b.level(), b.index()), (1, 2));
    }
}
