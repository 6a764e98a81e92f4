//! Filtered traversal over accessors.
//!
//! [`TriaIterator`] wraps an accessor and a filter. Advancing moves the
//! accessor through raw slots until one passes the filter or the traversal
//! runs past the end. The wrapper dereferences to the accessor, so every
//! accessor query is available on the iterator itself, and it implements
//! [`Iterator`] so the usual adapters work:
//!
//! ```
//! use mesh_tria::prelude::*;
//!
//! let tria = Triangulation::<2>::unit_hypercube();
//! let active = tria.active_cells().count();
//! assert_eq!(active, 1);
//! ```

use crate::mesh_error::MeshError;
use crate::precondition;
use crate::topology::accessor::{CellAccessor, StructAccessor};
use crate::topology::object_id::{IteratorState, ObjectId};
use std::fmt;
use std::ops::Deref;

/// Which slots a traversal stops on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IteratorFilter {
    /// Every slot, used or not.
    Raw,
    /// Slots holding a live object.
    Used,
    /// Live objects without children.
    Active,
}

/// Accessors that can step through the slots of a triangulation.
pub trait Traversable: Copy {
    fn id(&self) -> ObjectId;
    /// One raw step forward.
    fn advance(&mut self);
    /// One raw step backward.
    fn retreat(&mut self);
    /// Whether the (valid) current slot satisfies `filter`.
    fn passes(&self, filter: IteratorFilter) -> bool;
}

/// A filtered cursor over accessors of type `A`.
#[derive(Clone, Copy)]
pub struct TriaIterator<A> {
    accessor: A,
    filter: IteratorFilter,
}

pub type CellIterator<'a, const D: usize> = TriaIterator<CellAccessor<'a, D>>;
pub type ObjectIterator<'a, const D: usize> = TriaIterator<StructAccessor<'a, D>>;

impl<A: Traversable> TriaIterator<A> {
    /// Wraps `accessor`, which must be past-the-end or satisfy `filter`.
    pub fn new(accessor: A, filter: IteratorFilter) -> Self {
        precondition!(
            accessor.id().state() != IteratorState::Invalid,
            MeshError::DereferenceInvalidObject(accessor.id())
        );
        precondition!(
            accessor.id().state() != IteratorState::Valid || accessor.passes(filter),
            MeshError::FilterMismatch(accessor.id())
        );
        Self { accessor, filter }
    }

    /// Wraps `accessor` and, if it does not satisfy `filter`, moves forward
    /// to the first slot that does.
    pub fn starting_at(accessor: A, filter: IteratorFilter) -> Self {
        let mut it = Self { accessor, filter };
        if it.state() == IteratorState::Valid && !it.accessor.passes(filter) {
            it.advance();
        }
        it
    }

    #[inline]
    pub fn accessor(&self) -> A {
        self.accessor
    }

    #[inline]
    pub fn filter(&self) -> IteratorFilter {
        self.filter
    }

    #[inline]
    pub fn state(&self) -> IteratorState {
        self.accessor.id().state()
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.state() == IteratorState::PastTheEnd
    }

    /// Moves to the next slot satisfying the filter, or past the end.
    pub fn advance(&mut self) {
        precondition!(
            self.state() == IteratorState::Valid,
            MeshError::AdvanceInvalidObject(self.accessor.id())
        );
        loop {
            self.accessor.advance();
            if self.state() != IteratorState::Valid || self.accessor.passes(self.filter) {
                break;
            }
        }
    }

    /// Moves to the previous slot satisfying the filter. From past-the-end
    /// this is the last such slot; before the first it is past-the-end.
    pub fn retreat(&mut self) {
        precondition!(
            self.state() != IteratorState::Invalid,
            MeshError::AdvanceInvalidObject(self.accessor.id())
        );
        loop {
            self.accessor.retreat();
            if self.state() != IteratorState::Valid || self.accessor.passes(self.filter) {
                break;
            }
        }
    }
}

impl<A> Deref for TriaIterator<A> {
    type Target = A;

    #[inline]
    fn deref(&self) -> &A {
        &self.accessor
    }
}

/// Iterators compare by position; the filter does not take part.
impl<A: PartialEq> PartialEq for TriaIterator<A> {
    fn eq(&self, other: &Self) -> bool {
        self.accessor == other.accessor
    }
}

impl<A: Eq> Eq for TriaIterator<A> {}

impl<A: Traversable> Iterator for TriaIterator<A> {
    type Item = A;

    fn next(&mut self) -> Option<A> {
        if self.state() != IteratorState::Valid {
            return None;
        }
        let current = self.accessor;
        self.advance();
        Some(current)
    }
}

impl<A: Traversable> std::iter::FusedIterator for TriaIterator<A> {}

impl<A: fmt::Debug> fmt::Debug for TriaIterator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriaIterator")
            .field("accessor", &self.accessor)
            .field("filter", &self.filter)
            .finish()
    }
}
