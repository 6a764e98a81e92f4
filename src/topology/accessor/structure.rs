//! Read-only accessor for lines, quads and hexes.

use super::TriaAccessor;
use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::precondition;
use crate::structure_check;
use crate::topology::geometry_info::{self, NOT_ON_BOUNDARY};
use crate::topology::iterator::{IteratorFilter, TriaIterator, Traversable};
use crate::topology::level::ObjectStore;
use crate::topology::object_id::{IteratorState, ObjectId};
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;
use std::fmt;

/// Handle to one object of structural kind `kind`.
///
/// The same type serves lines, quads and hexes; operations that only make
/// sense for some kinds (e.g. [`quad`](Self::quad) on a line) are
/// preconditions.
#[derive(Clone, Copy)]
pub struct StructAccessor<'a, const D: usize> {
    base: TriaAccessor<'a, D>,
    kind: Structure,
}

impl<'a, const D: usize> StructAccessor<'a, D> {
    pub fn new(tria: &'a Triangulation<D>, kind: Structure, id: ObjectId) -> Self {
        precondition!(
            kind.dimension() <= D,
            MeshError::NotUsefulForThisDimension {
                structure: kind,
                dim: D,
                what: "storage"
            }
        );
        Self {
            base: TriaAccessor::new(tria, id),
            kind,
        }
    }

    #[inline]
    pub fn kind(&self) -> Structure {
        self.kind
    }

    #[inline]
    pub fn base(&self) -> &TriaAccessor<'a, D> {
        &self.base
    }

    #[inline]
    pub fn triangulation(&self) -> &'a Triangulation<D> {
        self.base.triangulation()
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.base.level()
    }

    #[inline]
    pub fn index(&self) -> i32 {
        self.base.index()
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.base.id()
    }

    #[inline]
    pub fn state(&self) -> IteratorState {
        self.base.state()
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.base.copy_from(&other.base);
        self.kind = other.kind;
    }

    /// Storage for this object's kind on its level.
    pub(crate) fn store(&self) -> &'a ObjectStore {
        precondition!(
            self.state() == IteratorState::Valid,
            MeshError::DereferenceInvalidObject(self.id())
        );
        let (level, _) = self.id().slot();
        self.triangulation().levels[level].objects(self.kind)
    }

    #[inline]
    pub(crate) fn slot_index(&self) -> usize {
        self.id().slot().1
    }

    fn require_used(&self) {
        precondition!(self.used(), MeshError::CellNotUsed(self.id()));
    }

    /// Whether the slot holds a live object.
    pub fn used(&self) -> bool {
        self.store().used[self.slot_index()]
    }

    /// Bounding objects: vertex indices of a line, line indices of a quad,
    /// quad indices of a hex.
    pub fn bounds(&self) -> &'a [usize] {
        self.store().bounds(self.slot_index())
    }

    /// Global index of corner `i`.
    pub fn vertex_index(&self, i: usize) -> usize {
        let n = self.kind.n_vertices();
        precondition!(i < n, MeshError::InvalidIndex { index: i, max: n - 1 });
        let (level, index) = self.id().slot();
        self.triangulation()
            .object_vertex(level, self.kind.dimension(), index, i)
    }

    /// Coordinates of corner `i`.
    pub fn vertex(&self, i: usize) -> Point<D> {
        self.triangulation().vertices[self.vertex_index(i)]
    }

    /// Index of line `i` of this object. A line is its own line `0`.
    pub fn line_index(&self, i: usize) -> usize {
        let n = self.kind.n_lines();
        precondition!(i < n, MeshError::InvalidIndex { index: i, max: n - 1 });
        match self.kind {
            Structure::Line => self.slot_index(),
            Structure::Quad => self.bounds()[i],
            Structure::Hex => {
                let (level, _) = self.id().slot();
                let (face, face_line) = geometry_info::hex_line(i);
                let quads = self.triangulation().levels[level].objects(Structure::Quad);
                quads.bounds(self.bounds()[face])[face_line]
            }
        }
    }

    /// Line `i` of this object, on the same level.
    pub fn line(&self, i: usize) -> TriaIterator<StructAccessor<'a, D>> {
        let id = ObjectId::new(self.level(), self.line_index(i) as i32);
        TriaIterator::new(
            StructAccessor::new(self.triangulation(), Structure::Line, id),
            IteratorFilter::Used,
        )
    }

    /// Index of quad `i` of a hex, or the quad itself.
    pub fn quad_index(&self, i: usize) -> usize {
        match self.kind {
            Structure::Line => {
                precondition!(
                    false,
                    MeshError::NotUsefulForThisDimension {
                        structure: self.kind,
                        dim: D,
                        what: "quads"
                    }
                );
                usize::MAX
            }
            Structure::Quad => {
                precondition!(i == 0, MeshError::InvalidIndex { index: i, max: 0 });
                self.slot_index()
            }
            Structure::Hex => {
                precondition!(i < 6, MeshError::InvalidIndex { index: i, max: 5 });
                self.bounds()[i]
            }
        }
    }

    /// Quad `i` of a hex, on the same level.
    pub fn quad(&self, i: usize) -> TriaIterator<StructAccessor<'a, D>> {
        let id = ObjectId::new(self.level(), self.quad_index(i) as i32);
        TriaIterator::new(
            StructAccessor::new(self.triangulation(), Structure::Quad, id),
            IteratorFilter::Used,
        )
    }

    pub fn user_flag_set(&self) -> bool {
        self.require_used();
        self.store().user_flags[self.slot_index()]
    }

    /// Opaque user token attached to the object, if any.
    pub fn user_pointer(&self) -> Option<usize> {
        self.require_used();
        self.store().user_pointers[self.slot_index()]
    }

    pub fn has_children(&self) -> bool {
        self.store().children[self.slot_index()].is_some()
    }

    pub fn n_children(&self) -> usize {
        if self.has_children() {
            self.kind.n_children()
        } else {
            0
        }
    }

    /// Slot of child `i` on the next level.
    pub fn child_index(&self, i: usize) -> usize {
        let n = self.kind.n_children();
        precondition!(i < n, MeshError::InvalidIndex { index: i, max: n - 1 });
        match self.store().children[self.slot_index()] {
            Some(first) => first + i,
            None => {
                precondition!(false, MeshError::NoChildren(self.id()));
                usize::MAX
            }
        }
    }

    pub fn child(&self, i: usize) -> TriaIterator<StructAccessor<'a, D>> {
        let id = ObjectId::new(self.level() + 1, self.child_index(i) as i32);
        let child = StructAccessor::new(self.triangulation(), self.kind, id);
        structure_check!(
            child.used(),
            MeshError::UnusedCellAsChild {
                parent: self.id(),
                child: id
            }
        );
        TriaIterator::new(child, IteratorFilter::Used)
    }

    /// Slot of the parent on the previous level, `None` on level 0.
    pub fn parent_index(&self) -> Option<usize> {
        self.store().parents[self.slot_index()]
    }

    pub fn parent(&self) -> TriaIterator<StructAccessor<'a, D>> {
        let index = match self.parent_index() {
            Some(p) if self.level() > 0 => p as i32,
            _ => {
                precondition!(false, MeshError::NoParent(self.id()));
                -1
            }
        };
        let id = ObjectId::new(self.level() - 1, index);
        TriaIterator::new(
            StructAccessor::new(self.triangulation(), self.kind, id),
            IteratorFilter::Used,
        )
    }

    /// Boundary indicator of a line (2D, 3D) or quad (3D).
    ///
    /// Cells have material ids instead; their boundary indicator is not
    /// defined.
    pub fn boundary_indicator(&self) -> u8 {
        precondition!(
            self.kind.dimension() < D,
            MeshError::NotUsefulForThisDimension {
                structure: self.kind,
                dim: D,
                what: "boundary indicator"
            }
        );
        self.require_used();
        self.store().material_id[self.slot_index()]
    }

    pub fn at_boundary(&self) -> bool {
        self.boundary_indicator() != NOT_ON_BOUNDARY
    }

    /// Length of the longest diagonal: the length of a line, the larger
    /// diagonal of a quad, the largest space diagonal of a hex.
    pub fn diameter(&self) -> f64 {
        geometry_info::diagonals(self.kind.dimension())
            .iter()
            .map(|&(a, b)| self.vertex(a).distance(&self.vertex(b)))
            .fold(0.0, f64::max)
    }

    /// Arithmetic mean of the corners.
    pub fn center(&self) -> Point<D> {
        Point::mean((0..self.kind.n_vertices()).map(|i| self.vertex(i)))
    }

    /// Moves to the next slot of the same kind in level-major order, crossing
    /// into the next level at the end of a level, and past the end after the
    /// last level. Unused slots are not skipped.
    pub fn advance(&mut self) {
        precondition!(
            self.state() == IteratorState::Valid,
            MeshError::AdvanceInvalidObject(self.id())
        );
        let (level, index) = self.id().slot();
        let next = self.triangulation().slot_at_or_after(self.kind, level, index + 1);
        self.base.set_id(next);
    }

    /// Moves to the previous slot. Retreating from past-the-end lands on the
    /// last slot; retreating from the first slot yields past-the-end.
    pub fn retreat(&mut self) {
        let tria = self.triangulation();
        let prev = match self.state() {
            IteratorState::Valid => {
                let (level, index) = self.id().slot();
                tria.slot_before(self.kind, level, index)
            }
            IteratorState::PastTheEnd => tria.slot_before(self.kind, tria.n_levels(), 0),
            IteratorState::Invalid => {
                precondition!(false, MeshError::AdvanceInvalidObject(self.id()));
                self.id()
            }
        };
        self.base.set_id(prev);
    }
}

impl<const D: usize> Traversable for StructAccessor<'_, D> {
    #[inline]
    fn id(&self) -> ObjectId {
        StructAccessor::id(self)
    }

    #[inline]
    fn advance(&mut self) {
        StructAccessor::advance(self)
    }

    #[inline]
    fn retreat(&mut self) {
        StructAccessor::retreat(self)
    }

    fn passes(&self, filter: IteratorFilter) -> bool {
        match filter {
            IteratorFilter::Raw => true,
            IteratorFilter::Used => self.used(),
            IteratorFilter::Active => self.used() && !self.has_children(),
        }
    }
}

/// Comparing handles of different kinds is a precondition violation.
impl<const D: usize> PartialEq for StructAccessor<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        precondition!(
            self.kind == other.kind,
            MeshError::MixedStructures(self.kind, other.kind)
        );
        self.base == other.base
    }
}

impl<const D: usize> Eq for StructAccessor<'_, D> {}

impl<const D: usize> fmt::Debug for StructAccessor<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.id())
    }
}
