//! `ObjectId`: the `(level, index)` address of a mesh object
//!
//! Every line, quad, hex and cell of a triangulation lives in a slot of a
//! per-level array. An `ObjectId` names that slot. It carries no reference to
//! the owning triangulation, so it is the currency for storing adjacency
//! (the neighbor table is a flat array of `ObjectId`s) and for handing slots
//! from an immutable traversal to a later mutation.
//!
//! The lifecycle state of a handle is a pure function of the two integers:
//! - `(level >= 0, index >= 0)` → [`IteratorState::Valid`]
//! - `(-1, -1)` → [`IteratorState::PastTheEnd`]
//! - anything else → [`IteratorState::Invalid`]

use crate::mesh_error::MeshError;
use crate::precondition;
use std::fmt;

/// State of a handle, derived from its `(level, index)` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IteratorState {
    /// Points to a slot; the slot itself may still be unused.
    Valid,
    /// The past-the-end sentinel `(-1, -1)`.
    PastTheEnd,
    /// Any other combination; must never be dereferenced.
    Invalid,
}

/// Address of one object slot: refinement level plus index within the level.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(C)]
pub struct ObjectId {
    level: i32,
    index: i32,
}

impl ObjectId {
    /// The past-the-end sentinel; also the neighbor-table entry of a boundary face.
    pub const PAST_THE_END: Self = Self {
        level: -1,
        index: -1,
    };

    /// Creates an id from raw integers. Any combination is accepted; use
    /// [`state`](Self::state) to classify it.
    #[inline]
    pub const fn new(level: i32, index: i32) -> Self {
        Self { level, index }
    }

    /// Creates a valid id from unsigned coordinates. Coordinates beyond
    /// `i32::MAX` are a precondition violation and saturate otherwise.
    #[inline]
    pub fn from_slot(level: usize, index: usize) -> Self {
        const MAX: usize = i32::MAX as usize;
        precondition!(
            level <= MAX && index <= MAX,
            MeshError::InvalidIndex {
                index: level.max(index),
                max: MAX,
            }
        );
        Self {
            level: i32::try_from(level).unwrap_or(i32::MAX),
            index: i32::try_from(index).unwrap_or(i32::MAX),
        }
    }

    #[inline]
    pub const fn level(self) -> i32 {
        self.level
    }

    #[inline]
    pub const fn index(self) -> i32 {
        self.index
    }

    /// Classifies the handle.
    #[inline]
    pub const fn state(self) -> IteratorState {
        if self.level >= 0 && self.index >= 0 {
            IteratorState::Valid
        } else if self.level == -1 && self.index == -1 {
            IteratorState::PastTheEnd
        } else {
            IteratorState::Invalid
        }
    }

    #[inline]
    pub const fn is_past_the_end(self) -> bool {
        matches!(self.state(), IteratorState::PastTheEnd)
    }

    /// Unsigned `(level, index)`; only meaningful for valid ids.
    #[inline]
    pub(crate) fn slot(self) -> (usize, usize) {
        (self.level as usize, self.index as usize)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId")
            .field(&self.level)
            .field(&self.index)
            .finish()
    }
}

/// Prints `level.index`, the conventional cell-id notation.
impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.level, self.index)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_classification() {
        assert_eq!(ObjectId::new(0, 0).state(), IteratorState::Valid);
        assert_eq!(ObjectId::new(3, 17).state(), IteratorState::Valid);
        assert_eq!(ObjectId::new(-1, -1).state(), IteratorState::PastTheEnd);
        assert_eq!(ObjectId::new(-1, 0).state(), IteratorState::Invalid);
        assert_eq!(ObjectId::new(0, -1).state(), IteratorState::Invalid);
        assert_eq!(ObjectId::new(-2, -1).state(), IteratorState::Invalid);
    }

    #[test]
    fn past_the_end_constant() {
        assert!(ObjectId::PAST_THE_END.is_past_the_end());
        assert_eq!(ObjectId::PAST_THE_END, ObjectId::new(-1, -1));
    }

    #[test]
    fn ordering_is_level_major() {
        let a = ObjectId::new(0, 9);
        let b = ObjectId::new(1, 0);
        assert!(a < b);
        assert!(ObjectId::new(1, 0) < ObjectId::new(1, 1));
    }

    #[test]
    fn debug_and_display() {
        let id = ObjectId::new(2, 5);
        assert_eq!(format!("{id:?}"), "ObjectId(2, 5)");
        assert_eq!(format!("{id}"), "2.5");
    }

    #[test]
    fn from_slot_roundtrip() {
        let id = ObjectId::from_slot(4, 11);
        assert_eq!(id.slot(), (4, 11));
        assert_eq!((id.level(), id.index()), (4, 11));
    }
}
