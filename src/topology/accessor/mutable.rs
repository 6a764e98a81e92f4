//! Mutable accessors: the write path into level storage.
//!
//! A mutable accessor holds the triangulation exclusively, so no read handle
//! can observe a half-applied change. Use [`accessor`](StructAccessorMut::accessor)
//! for queries while holding one.

use super::{CellAccessor, StructAccessor};
use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::precondition;
use crate::topology::geometry_info::GeometryInfo;
use crate::topology::level::ObjectStore;
use crate::topology::object_id::{IteratorState, ObjectId};
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;
use std::ops::{Deref, DerefMut};

pub struct StructAccessorMut<'a, const D: usize> {
    tria: &'a mut Triangulation<D>,
    kind: Structure,
    id: ObjectId,
}

impl<'a, const D: usize> StructAccessorMut<'a, D> {
    pub fn new(tria: &'a mut Triangulation<D>, kind: Structure, id: ObjectId) -> Self {
        precondition!(
            id.state() == IteratorState::Valid,
            MeshError::DereferenceInvalidObject(id)
        );
        Self { tria, kind, id }
    }

    /// Read-only view of the same object.
    pub fn accessor(&self) -> StructAccessor<'_, D> {
        StructAccessor::new(&*self.tria, self.kind, self.id)
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> Structure {
        self.kind
    }

    fn store_mut(&mut self) -> &mut ObjectStore {
        let (level, _) = self.id.slot();
        self.tria.levels[level].objects_mut(self.kind)
    }

    #[inline]
    fn slot(&self) -> usize {
        self.id.slot().1
    }

    fn require_used(&self) {
        precondition!(self.accessor().used(), MeshError::CellNotUsed(self.id));
    }

    /// Overwrites the bounding objects (vertices, lines or quads).
    pub fn set_bounds(&mut self, bounds: &[usize]) {
        let n = self.kind.n_bounds();
        precondition!(
            bounds.len() == n,
            MeshError::InvalidIndex {
                index: bounds.len(),
                max: n
            }
        );
        let i = self.slot();
        self.store_mut().set_bounds(i, bounds);
    }

    pub fn set_used_flag(&mut self) {
        let i = self.slot();
        self.store_mut().set_used(i, true);
    }

    pub fn clear_used_flag(&mut self) {
        let i = self.slot();
        self.store_mut().set_used(i, false);
    }

    pub fn set_user_flag(&mut self) {
        self.require_used();
        let i = self.slot();
        self.store_mut().user_flags[i] = true;
    }

    pub fn clear_user_flag(&mut self) {
        self.require_used();
        let i = self.slot();
        self.store_mut().user_flags[i] = false;
    }

    pub fn set_user_pointer(&mut self, token: usize) {
        self.require_used();
        let i = self.slot();
        self.store_mut().user_pointers[i] = Some(token);
    }

    pub fn clear_user_pointer(&mut self) {
        self.require_used();
        let i = self.slot();
        self.store_mut().user_pointers[i] = None;
    }

    /// Records `first_child` as the start of this object's child block on
    /// the next level.
    pub fn set_children(&mut self, first_child: usize) {
        self.require_used();
        let i = self.slot();
        self.store_mut().children[i] = Some(first_child);
    }

    pub fn clear_children(&mut self) {
        self.require_used();
        let i = self.slot();
        self.store_mut().children[i] = None;
    }

    pub fn set_boundary_indicator(&mut self, id: u8) {
        precondition!(
            self.kind.dimension() < D,
            MeshError::NotUsefulForThisDimension {
                structure: self.kind,
                dim: D,
                what: "boundary indicator"
            }
        );
        self.require_used();
        let i = self.slot();
        self.store_mut().material_id[i] = id;
    }

    /// Mutable coordinates of corner `i`. Moving a vertex moves it for every
    /// object that shares it.
    pub fn vertex_mut(&mut self, i: usize) -> &mut Point<D> {
        let v = self.accessor().vertex_index(i);
        &mut self.tria.vertices[v]
    }
}

/// Mutable cell accessor. Dereferences to [`StructAccessorMut`] for the
/// structural setters.
pub struct CellAccessorMut<'a, const D: usize> {
    object: StructAccessorMut<'a, D>,
}

impl<'a, const D: usize> CellAccessorMut<'a, D> {
    pub fn new(tria: &'a mut Triangulation<D>, id: ObjectId) -> Self {
        Self {
            object: StructAccessorMut::new(tria, Triangulation::<D>::CELL, id),
        }
    }

    /// Read-only view of the same cell.
    pub fn accessor(&self) -> CellAccessor<'_, D> {
        CellAccessor::new(&*self.object.tria, self.object.id)
    }

    fn level_mut(&mut self) -> &mut crate::topology::level::TriaLevel {
        let (level, _) = self.object.id.slot();
        &mut self.object.tria.levels[level]
    }

    fn require_used_active(&self) {
        let cell = self.accessor();
        precondition!(
            cell.used() && cell.active(),
            MeshError::RefineCellNotActive(self.object.id)
        );
    }

    /// Points face `i` at `neighbor`; past-the-end marks a boundary face.
    pub fn set_neighbor(&mut self, i: usize, neighbor: ObjectId) {
        precondition!(
            i < GeometryInfo::<D>::FACES_PER_CELL,
            MeshError::InvalidNeighbor(i)
        );
        let cell = self.object.slot();
        self.level_mut().set_neighbor(cell, i, neighbor);
    }

    pub fn set_material_id(&mut self, id: u8) {
        self.object.require_used();
        let i = self.object.slot();
        self.object.store_mut().material_id[i] = id;
    }

    /// Flags the cell for refinement. The cell must be used, active and not
    /// flagged for coarsening.
    pub fn set_refine_flag(&mut self) {
        self.require_used_active();
        precondition!(
            !self.accessor().coarsen_flag_set(),
            MeshError::CellFlaggedForCoarsening(self.object.id)
        );
        let i = self.object.slot();
        self.level_mut().refine_flags[i] = true;
    }

    pub fn clear_refine_flag(&mut self) {
        self.require_used_active();
        let i = self.object.slot();
        self.level_mut().refine_flags[i] = false;
    }

    /// Flags the cell for coarsening. The cell must be used, active and not
    /// flagged for refinement.
    pub fn set_coarsen_flag(&mut self) {
        self.require_used_active();
        precondition!(
            !self.accessor().refine_flag_set(),
            MeshError::CellFlaggedForRefinement(self.object.id)
        );
        let i = self.object.slot();
        self.level_mut().coarsen_flags[i] = true;
    }

    pub fn clear_coarsen_flag(&mut self) {
        self.require_used_active();
        let i = self.object.slot();
        self.level_mut().coarsen_flags[i] = false;
    }
}

impl<'a, const D: usize> Deref for CellAccessorMut<'a, D> {
    type Target = StructAccessorMut<'a, D>;

    fn deref(&self) -> &StructAccessorMut<'a, D> {
        &self.object
    }
}

impl<const D: usize> DerefMut for CellAccessorMut<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.object
    }
}
