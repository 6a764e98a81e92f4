//! Cell accessor: the top-dimensional objects of a triangulation.
//!
//! Cells add neighbors, material ids and refinement flags to the structural
//! contract of [`StructAccessor`], which they dereference to.

use super::StructAccessor;
use crate::mesh_error::MeshError;
use crate::precondition;
use crate::structure_check;
use crate::topology::geometry_info::GeometryInfo;
use crate::topology::iterator::{IteratorFilter, TriaIterator, Traversable};
use crate::topology::object_id::{IteratorState, ObjectId};
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;
use std::fmt;
use std::ops::Deref;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CellAccessor<'a, const D: usize> {
    object: StructAccessor<'a, D>,
}

impl<'a, const D: usize> CellAccessor<'a, D> {
    pub fn new(tria: &'a Triangulation<D>, id: ObjectId) -> Self {
        Self {
            object: StructAccessor::new(tria, Triangulation::<D>::CELL, id),
        }
    }

    /// The structural view of this cell.
    #[inline]
    pub fn as_object(&self) -> StructAccessor<'a, D> {
        self.object
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.object.copy_from(&other.object);
    }

    fn level_storage(&self) -> &'a crate::topology::level::TriaLevel {
        precondition!(
            self.state() == IteratorState::Valid,
            MeshError::DereferenceInvalidObject(self.id())
        );
        &self.triangulation().levels[self.id().slot().0]
    }

    fn check_face(i: usize) {
        precondition!(
            i < GeometryInfo::<D>::FACES_PER_CELL,
            MeshError::InvalidNeighbor(i)
        );
    }

    /// Raw neighbor-table entry across face `i`; past-the-end on the boundary.
    pub fn neighbor_id(&self, i: usize) -> ObjectId {
        Self::check_face(i);
        self.level_storage().neighbor(self.slot_index(), i)
    }

    /// Level of the neighbor across face `i`, `-1` on the boundary.
    pub fn neighbor_level(&self, i: usize) -> i32 {
        self.neighbor_id(i).level()
    }

    /// Index of the neighbor across face `i`, `-1` on the boundary.
    pub fn neighbor_index(&self, i: usize) -> i32 {
        self.neighbor_id(i).index()
    }

    /// The neighbor across face `i`; past-the-end on the boundary.
    ///
    /// The neighbor is on the same level or coarser, never finer.
    pub fn neighbor(&self, i: usize) -> TriaIterator<CellAccessor<'a, D>> {
        let id = self.neighbor_id(i);
        let neighbor = CellAccessor::new(self.triangulation(), id);
        structure_check!(
            id.is_past_the_end() || neighbor.used(),
            MeshError::UnusedCellAsNeighbor {
                cell: self.id(),
                face: i,
                neighbor: id
            }
        );
        TriaIterator::new(neighbor, IteratorFilter::Used)
    }

    /// Whether face `i` lies on the domain boundary.
    pub fn at_boundary(&self, i: usize) -> bool {
        precondition!(self.used(), MeshError::CellNotUsed(self.id()));
        self.neighbor_index(i) == -1
    }

    /// Whether any face lies on the domain boundary.
    pub fn touches_boundary(&self) -> bool {
        (0..GeometryInfo::<D>::FACES_PER_CELL).any(|i| self.at_boundary(i))
    }

    /// Whether the neighbor across face `i` is on a coarser level.
    pub fn neighbor_is_coarser(&self, i: usize) -> bool {
        precondition!(!self.at_boundary(i), MeshError::InvalidNeighbor(i));
        self.neighbor_level(i) < self.level()
    }

    /// Face number, as seen from the same-level neighbor across face `i`,
    /// of the face shared with this cell.
    pub fn neighbor_of_neighbor(&self, i: usize) -> usize {
        let neighbor = self.neighbor(i);
        precondition!(
            !neighbor.is_end() && neighbor.level() == self.level(),
            MeshError::InvalidNeighbor(i)
        );
        let back = (0..GeometryInfo::<D>::FACES_PER_CELL)
            .find(|&j| neighbor.neighbor_id(j) == self.id());
        structure_check!(
            back.is_some(),
            MeshError::AsymmetricNeighbor {
                cell: self.id(),
                face: i,
                neighbor: neighbor.id(),
            }
        );
        back.unwrap_or(usize::MAX)
    }

    pub fn material_id(&self) -> u8 {
        precondition!(self.used(), MeshError::CellNotUsed(self.id()));
        self.store().material_id[self.slot_index()]
    }

    pub fn refine_flag_set(&self) -> bool {
        precondition!(self.used(), MeshError::CellNotUsed(self.id()));
        let flag = self.level_storage().refine_flags[self.slot_index()];
        structure_check!(
            !flag || self.active(),
            MeshError::FlagOnRefinedCell(self.id())
        );
        flag
    }

    pub fn coarsen_flag_set(&self) -> bool {
        precondition!(self.used(), MeshError::CellNotUsed(self.id()));
        let flag = self.level_storage().coarsen_flags[self.slot_index()];
        structure_check!(
            !flag || self.active(),
            MeshError::FlagOnRefinedCell(self.id())
        );
        flag
    }

    /// A cell is active when it has no children.
    pub fn active(&self) -> bool {
        !self.has_children()
    }

    pub fn child(&self, i: usize) -> TriaIterator<CellAccessor<'a, D>> {
        let id = ObjectId::new(self.level() + 1, self.child_index(i) as i32);
        let child = CellAccessor::new(self.triangulation(), id);
        structure_check!(
            child.used(),
            MeshError::UnusedCellAsChild {
                parent: self.id(),
                child: id
            }
        );
        TriaIterator::new(child, IteratorFilter::Used)
    }

    pub fn parent(&self) -> TriaIterator<CellAccessor<'a, D>> {
        let parent = self.object.parent();
        TriaIterator::new(
            CellAccessor::new(self.triangulation(), parent.id()),
            IteratorFilter::Used,
        )
    }

    /// Index of face `i` among the faces of the cell's level.
    pub fn face_index(&self, i: usize) -> usize {
        precondition!(
            D >= 2,
            MeshError::NotUsefulForThisDimension {
                structure: Structure::Line,
                dim: D,
                what: "face objects"
            }
        );
        Self::check_face(i);
        self.bounds()[i]
    }

    /// Face `i`, a line in 2D and a quad in 3D.
    pub fn face(&self, i: usize) -> TriaIterator<StructAccessor<'a, D>> {
        let index = self.face_index(i);
        let kind = Triangulation::<D>::FACE.unwrap_or(Structure::Line);
        TriaIterator::new(
            StructAccessor::new(
                self.triangulation(),
                kind,
                ObjectId::new(self.level(), index as i32),
            ),
            IteratorFilter::Used,
        )
    }
}

impl<'a, const D: usize> Deref for CellAccessor<'a, D> {
    type Target = StructAccessor<'a, D>;

    #[inline]
    fn deref(&self) -> &StructAccessor<'a, D> {
        &self.object
    }
}

impl<const D: usize> Traversable for CellAccessor<'_, D> {
    #[inline]
    fn id(&self) -> ObjectId {
        self.object.id()
    }

    #[inline]
    fn advance(&mut self) {
        self.object.advance()
    }

    #[inline]
    fn retreat(&mut self) {
        self.object.retreat()
    }

    #[inline]
    fn passes(&self, filter: IteratorFilter) -> bool {
        self.object.passes(filter)
    }
}

impl<const D: usize> fmt::Debug for CellAccessor<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell<{D}>({})", self.id())
    }
}
