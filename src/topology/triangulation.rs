//! The triangulation: owner of all levels and vertices.
//!
//! A `Triangulation<D>` is an arena. Level `l` holds every line, quad, hex
//! and cell created by `l` rounds of refinement; vertices are shared by all
//! levels. Read access goes through [`CellAccessor`] / [`StructAccessor`]
//! handles and [`TriaIterator`] traversals; writes go through the mutable
//! accessors or the refinement machinery, both of which need `&mut self`.

use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::precondition;
use crate::topology::accessor::{CellAccessor, CellAccessorMut, StructAccessor, StructAccessorMut};
use crate::topology::geometry_info::{self, QUAD_CORNER_CONVENTION};
use crate::topology::iterator::{CellIterator, IteratorFilter, ObjectIterator, TriaIterator};
use crate::topology::level::{ObjectStore, TriaLevel};
use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;
use serde::{Deserialize, Serialize};

/// Smoothing rules applied by
/// [`prepare_coarsening_and_refinement`](Triangulation::prepare_coarsening_and_refinement)
/// on top of the mandatory 2:1 balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSmoothing {
    /// Refine an unflagged cell when more of its neighbors will be finer
    /// than it than will not.
    pub eliminate_unrefined_islands: bool,
}

/// Runtime configuration of a triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationOptions {
    pub smoothing: MeshSmoothing,
}

/// One coarse cell: its corners in reference order and its material id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellData {
    pub vertices: Vec<usize>,
    #[serde(default)]
    pub material_id: u8,
}

impl CellData {
    pub fn new(vertices: impl Into<Vec<usize>>) -> Self {
        Self {
            vertices: vertices.into(),
            material_id: 0,
        }
    }

    pub fn with_material(mut self, material_id: u8) -> Self {
        self.material_id = material_id;
        self
    }
}

/// A boundary line or quad named by its corners, with the indicator to give it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryData {
    pub vertices: Vec<usize>,
    pub boundary_id: u8,
}

/// Boundary indicators for lower-dimensional objects of the coarse mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubCellData {
    /// Lines; used in 2D and 3D.
    pub boundary_lines: Vec<BoundaryData>,
    /// Quads; used in 3D.
    pub boundary_quads: Vec<BoundaryData>,
}

impl SubCellData {
    pub fn is_empty(&self) -> bool {
        self.boundary_lines.is_empty() && self.boundary_quads.is_empty()
    }
}

/// Hierarchical mesh of lines (`D = 1`), quads (`D = 2`) or hexes (`D = 3`).
#[derive(Clone, Debug)]
pub struct Triangulation<const D: usize> {
    pub(crate) levels: Vec<TriaLevel>,
    pub(crate) vertices: Vec<Point<D>>,
    pub(crate) vertices_used: Vec<bool>,
    /// Every vertex slot below this index is used.
    vertex_cursor: usize,
    options: TriangulationOptions,
}

impl<const D: usize> Default for Triangulation<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize> Triangulation<D> {
    const DIMENSION_OK: () = assert!(
        D >= 1 && D <= 3,
        "triangulations exist in 1, 2 and 3 dimensions"
    );

    /// Structural kind of the cells.
    pub const CELL: Structure = match D {
        1 => Structure::Line,
        2 => Structure::Quad,
        _ => Structure::Hex,
    };

    /// Structural kind of the faces; `None` in 1D, where faces are vertices.
    pub const FACE: Option<Structure> = Self::CELL.face();

    pub fn new() -> Self {
        Self::with_options(TriangulationOptions::default())
    }

    pub fn with_options(options: TriangulationOptions) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::DIMENSION_OK;
        Self {
            levels: Vec::new(),
            vertices: Vec::new(),
            vertices_used: Vec::new(),
            vertex_cursor: 0,
            options,
        }
    }

    #[inline]
    pub fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TriangulationOptions) {
        self.options = options;
    }

    /// Drops every level and vertex. Options are kept.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.vertices.clear();
        self.vertices_used.clear();
        self.vertex_cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Structural kinds present in this triangulation, lowest first.
    pub fn kinds() -> impl Iterator<Item = Structure> {
        (1..=D).filter_map(Structure::from_dimension)
    }

    // --- storage helpers ---------------------------------------------------

    #[inline]
    pub(crate) fn store(&self, level: usize, kind: Structure) -> &ObjectStore {
        self.levels[level].objects(kind)
    }

    #[inline]
    pub(crate) fn store_mut(&mut self, level: usize, kind: Structure) -> &mut ObjectStore {
        self.levels[level].objects_mut(kind)
    }

    /// Number of slots of `kind` on `level`, `0` past the last level.
    pub fn n_raw_objects(&self, kind: Structure, level: usize) -> usize {
        self.levels.get(level).map_or(0, |l| l.objects(kind).len())
    }

    /// First slot at or after `(level, index)` in level-major order.
    pub(crate) fn slot_at_or_after(&self, kind: Structure, level: usize, index: usize) -> ObjectId {
        if index < self.n_raw_objects(kind, level) {
            return ObjectId::from_slot(level, index);
        }
        (level + 1..self.n_levels())
            .find(|&l| self.n_raw_objects(kind, l) > 0)
            .map_or(ObjectId::PAST_THE_END, |l| ObjectId::from_slot(l, 0))
    }

    /// Last slot strictly before `(level, index)`.
    pub(crate) fn slot_before(&self, kind: Structure, level: usize, index: usize) -> ObjectId {
        if index > 0 {
            return ObjectId::from_slot(level, index - 1);
        }
        (0..level.min(self.n_levels()))
            .rev()
            .find(|&l| self.n_raw_objects(kind, l) > 0)
            .map_or(ObjectId::PAST_THE_END, |l| {
                ObjectId::from_slot(l, self.n_raw_objects(kind, l) - 1)
            })
    }

    /// Global vertex of corner `corner` of the `k`-dimensional object
    /// `(level, index)`.
    pub(crate) fn object_vertex(&self, level: usize, k: usize, index: usize, corner: usize) -> usize {
        match k {
            0 => index,
            1 => self.store(level, Structure::Line).bounds(index)[corner],
            2 => {
                let line = self.store(level, Structure::Quad).bounds(index)[corner];
                self.object_vertex(level, 1, line, QUAD_CORNER_CONVENTION[corner])
            }
            _ => {
                let quad = self.store(level, Structure::Hex).bounds(index)[corner / 4];
                self.object_vertex(level, 2, quad, corner % 4)
            }
        }
    }

    /// Corners of a `k`-dimensional object in reference order.
    pub(crate) fn object_corners(&self, level: usize, k: usize, index: usize) -> Vec<usize> {
        (0..1usize << k)
            .map(|c| self.object_vertex(level, k, index, c))
            .collect()
    }

    /// Appends a vertex, reusing the first unused slot if there is one.
    pub(crate) fn allocate_vertex(&mut self, p: Point<D>) -> usize {
        let free = self.vertices_used[self.vertex_cursor..]
            .iter()
            .position(|&u| !u)
            .map(|offset| self.vertex_cursor + offset);
        let v = match free {
            Some(v) => {
                self.vertices[v] = p;
                self.vertices_used[v] = true;
                v
            }
            None => {
                self.vertices.push(p);
                self.vertices_used.push(true);
                self.vertices.len() - 1
            }
        };
        self.vertex_cursor = v + 1;
        v
    }

    /// Marks vertex `v` unused so a later refinement may take its slot.
    pub(crate) fn release_vertex(&mut self, v: usize) {
        self.vertices_used[v] = false;
        self.vertex_cursor = self.vertex_cursor.min(v);
    }

    /// Forgets which vertex slots are free; the next allocation scans from
    /// the start.
    pub(crate) fn reset_vertex_cursor(&mut self) {
        self.vertex_cursor = 0;
    }

    /// Makes sure `level` exists.
    pub(crate) fn ensure_level(&mut self, level: usize) {
        while self.levels.len() <= level {
            self.levels.push(TriaLevel::new(D));
        }
    }

    // --- counts ------------------------------------------------------------

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Size of the vertex array, used or not.
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_used_vertices(&self) -> usize {
        self.vertices_used.iter().filter(|&&u| u).count()
    }

    pub fn n_raw_cells(&self, level: usize) -> usize {
        self.n_raw_objects(Self::CELL, level)
    }

    pub fn n_cells(&self) -> usize {
        self.n_objects(Self::CELL)
    }

    pub fn n_cells_on_level(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, |l| l.cells().n_used())
    }

    pub fn n_active_cells(&self) -> usize {
        self.n_active_objects(Self::CELL)
    }

    pub fn n_active_cells_on_level(&self, level: usize) -> usize {
        self.levels
            .get(level)
            .map_or(0, |l| count_active(l.cells()))
    }

    /// Used objects of `kind` over all levels.
    pub fn n_objects(&self, kind: Structure) -> usize {
        self.levels.iter().map(|l| l.objects(kind).n_used()).sum()
    }

    /// Used objects of `kind` without children.
    pub fn n_active_objects(&self, kind: Structure) -> usize {
        self.levels.iter().map(|l| count_active(l.objects(kind))).sum()
    }

    // --- vertices ----------------------------------------------------------

    /// All vertex coordinates, including unused slots.
    pub fn vertices(&self) -> &[Point<D>] {
        &self.vertices
    }

    pub fn vertex_used(&self, v: usize) -> bool {
        self.vertices_used.get(v).copied().unwrap_or(false)
    }

    // --- handles -----------------------------------------------------------

    /// Handle to cell `id`. Any id is accepted; its state decides what the
    /// handle may do.
    pub fn cell(&self, id: ObjectId) -> CellAccessor<'_, D> {
        CellAccessor::new(self, id)
    }

    pub fn cell_mut(&mut self, id: ObjectId) -> CellAccessorMut<'_, D> {
        CellAccessorMut::new(self, id)
    }

    pub fn object(&self, kind: Structure, id: ObjectId) -> StructAccessor<'_, D> {
        StructAccessor::new(self, kind, id)
    }

    pub fn object_mut(&mut self, kind: Structure, id: ObjectId) -> StructAccessorMut<'_, D> {
        StructAccessorMut::new(self, kind, id)
    }

    // --- cell traversal ----------------------------------------------------

    fn check_level(&self, level: usize) {
        precondition!(
            level < self.n_levels(),
            MeshError::InvalidLevel {
                level,
                n_levels: self.n_levels()
            }
        );
    }

    fn cells_from(&self, level: usize, filter: IteratorFilter) -> CellIterator<'_, D> {
        let start = self.slot_at_or_after(Self::CELL, level, 0);
        TriaIterator::starting_at(CellAccessor::new(self, start), filter)
    }

    fn end_with(&self, filter: IteratorFilter) -> CellIterator<'_, D> {
        TriaIterator::new(CellAccessor::new(self, ObjectId::PAST_THE_END), filter)
    }

    /// First cell slot on `level`, used or not.
    pub fn begin_raw(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level, IteratorFilter::Raw)
    }

    /// First used cell on `level` or later.
    pub fn begin(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level, IteratorFilter::Used)
    }

    /// First active cell on `level` or later.
    pub fn begin_active(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level, IteratorFilter::Active)
    }

    pub fn end(&self) -> CellIterator<'_, D> {
        self.end_with(IteratorFilter::Raw)
    }

    /// End of the used cells on `level`: the first used cell of a later
    /// level, or [`end`](Self::end).
    pub fn end_on_level(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level + 1, IteratorFilter::Used)
    }

    pub fn end_raw_on_level(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level + 1, IteratorFilter::Raw)
    }

    pub fn end_active_on_level(&self, level: usize) -> CellIterator<'_, D> {
        self.check_level(level);
        self.cells_from(level + 1, IteratorFilter::Active)
    }

    /// Last cell slot of the finest level.
    pub fn last_raw(&self) -> CellIterator<'_, D> {
        let mut it = self.end_with(IteratorFilter::Raw);
        it.retreat();
        it
    }

    pub fn last(&self) -> CellIterator<'_, D> {
        let mut it = self.end_with(IteratorFilter::Used);
        it.retreat();
        it
    }

    pub fn last_active(&self) -> CellIterator<'_, D> {
        let mut it = self.end_with(IteratorFilter::Active);
        it.retreat();
        it
    }

    /// All cell slots, level by level.
    pub fn raw_cells(&self) -> CellIterator<'_, D> {
        self.cells_from(0, IteratorFilter::Raw)
    }

    /// All used cells, level by level.
    pub fn cells(&self) -> CellIterator<'_, D> {
        self.cells_from(0, IteratorFilter::Used)
    }

    /// All active cells, level by level.
    pub fn active_cells(&self) -> CellIterator<'_, D> {
        self.cells_from(0, IteratorFilter::Active)
    }

    pub fn cells_on_level(&self, level: usize) -> impl Iterator<Item = CellAccessor<'_, D>> {
        self.cells_from(level, IteratorFilter::Used)
            .take_while(move |c| c.level() == level as i32)
    }

    pub fn active_cells_on_level(&self, level: usize) -> impl Iterator<Item = CellAccessor<'_, D>> {
        self.cells_from(level, IteratorFilter::Active)
            .take_while(move |c| c.level() == level as i32)
    }

    /// Ids of the active cells in traversal order.
    pub fn active_cell_ids(&self) -> Vec<ObjectId> {
        self.active_cells().map(|c| c.id()).collect()
    }

    /// Parallel read-only traversal of the active cells.
    #[cfg(feature = "rayon")]
    pub fn par_active_cells(
        &self,
    ) -> impl rayon::iter::ParallelIterator<Item = CellAccessor<'_, D>> {
        use rayon::prelude::*;
        self.active_cell_ids()
            .into_par_iter()
            .map(move |id| CellAccessor::new(self, id))
    }

    // --- object traversal --------------------------------------------------

    fn objects_from(&self, kind: Structure, level: usize, filter: IteratorFilter) -> ObjectIterator<'_, D> {
        let start = self.slot_at_or_after(kind, level, 0);
        TriaIterator::starting_at(StructAccessor::new(self, kind, start), filter)
    }

    pub fn begin_raw_objects(&self, kind: Structure, level: usize) -> ObjectIterator<'_, D> {
        self.check_level(level);
        self.objects_from(kind, level, IteratorFilter::Raw)
    }

    pub fn begin_objects(&self, kind: Structure, level: usize) -> ObjectIterator<'_, D> {
        self.check_level(level);
        self.objects_from(kind, level, IteratorFilter::Used)
    }

    pub fn begin_active_objects(&self, kind: Structure, level: usize) -> ObjectIterator<'_, D> {
        self.check_level(level);
        self.objects_from(kind, level, IteratorFilter::Active)
    }

    pub fn end_objects(&self, kind: Structure) -> ObjectIterator<'_, D> {
        TriaIterator::new(
            StructAccessor::new(self, kind, ObjectId::PAST_THE_END),
            IteratorFilter::Raw,
        )
    }

    /// All used objects of `kind`, level by level.
    pub fn objects(&self, kind: Structure) -> ObjectIterator<'_, D> {
        self.objects_from(kind, 0, IteratorFilter::Used)
    }

    pub fn active_objects(&self, kind: Structure) -> ObjectIterator<'_, D> {
        self.objects_from(kind, 0, IteratorFilter::Active)
    }

    // --- bulk flag operations ----------------------------------------------

    pub fn clear_user_flags(&mut self) {
        for level in &mut self.levels {
            for kind in Self::kinds() {
                level.objects_mut(kind).user_flags.fill(false);
            }
        }
    }

    pub fn clear_user_pointers(&mut self) {
        for level in &mut self.levels {
            for kind in Self::kinds() {
                level.objects_mut(kind).user_pointers.fill(None);
            }
        }
    }

    /// Refine flags of the active cells, in traversal order.
    pub fn save_refine_flags(&self) -> Vec<bool> {
        self.active_cells().map(|c| c.refine_flag_set()).collect()
    }

    pub fn save_coarsen_flags(&self) -> Vec<bool> {
        self.active_cells().map(|c| c.coarsen_flag_set()).collect()
    }

    /// Restores refine flags saved by [`save_refine_flags`](Self::save_refine_flags).
    /// A cell that receives a refine flag loses its coarsen flag.
    pub fn load_refine_flags(&mut self, flags: &[bool]) -> Result<(), MeshError> {
        let ids = self.checked_flag_targets(flags)?;
        for (id, &flag) in ids.into_iter().zip(flags) {
            let (level, index) = id.slot();
            let level = &mut self.levels[level];
            level.refine_flags[index] = flag;
            if flag {
                level.coarsen_flags[index] = false;
            }
        }
        Ok(())
    }

    /// Restores coarsen flags. A cell that receives a coarsen flag loses its
    /// refine flag.
    pub fn load_coarsen_flags(&mut self, flags: &[bool]) -> Result<(), MeshError> {
        let ids = self.checked_flag_targets(flags)?;
        for (id, &flag) in ids.into_iter().zip(flags) {
            let (level, index) = id.slot();
            let level = &mut self.levels[level];
            level.coarsen_flags[index] = flag;
            if flag {
                level.refine_flags[index] = false;
            }
        }
        Ok(())
    }

    fn checked_flag_targets(&self, flags: &[bool]) -> Result<Vec<ObjectId>, MeshError> {
        let ids = self.active_cell_ids();
        if ids.len() != flags.len() {
            return Err(MeshError::FlagVectorLength {
                expected: ids.len(),
                found: flags.len(),
            });
        }
        Ok(ids)
    }

    /// Clears refine and coarsen flags of every cell.
    pub fn clear_refinement_flags(&mut self) {
        for level in &mut self.levels {
            level.refine_flags.fill(false);
            level.coarsen_flags.fill(false);
        }
    }
}

fn count_active(store: &ObjectStore) -> usize {
    store
        .used
        .iter()
        .zip(&store.children)
        .filter(|&(&u, c)| u && c.is_none())
        .count()
}

/// Corner lists of the faces of a `k`-dimensional object with corners
/// `corners`, in face order.
pub(crate) fn face_vertex_lists(k: usize, corners: &[usize]) -> Vec<Vec<usize>> {
    (0..2 * k)
        .map(|f| {
            geometry_info::face_corners(k, f)
                .into_iter()
                .map(|c| corners[c])
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_triangulation_traverses_nothing() {
        let tria = Triangulation::<2>::new();
        assert!(tria.is_empty());
        assert_eq!(tria.n_levels(), 0);
        assert_eq!(tria.cells().count(), 0);
        assert!(tria.active_cells().is_end());
        assert_eq!(tria.n_active_cells(), 0);
    }

    #[test]
    fn cell_kinds() {
        assert_eq!(Triangulation::<1>::CELL, Structure::Line);
        assert_eq!(Triangulation::<2>::CELL, Structure::Quad);
        assert_eq!(Triangulation::<3>::CELL, Structure::Hex);
        assert_eq!(Triangulation::<1>::FACE, None);
        assert_eq!(Triangulation::<3>::FACE, Some(Structure::Quad));
        assert_eq!(
            Triangulation::<3>::kinds().collect::<Vec<_>>(),
            vec![Structure::Line, Structure::Quad, Structure::Hex]
        );
    }

    #[test]
    fn vertex_slots_are_reused_lowest_first() {
        let mut tria = Triangulation::<2>::unit_hypercube();
        assert_eq!(tria.allocate_vertex(Point::new([2.0, 0.0])), 4);
        tria.release_vertex(3);
        tria.release_vertex(1);
        assert_eq!(tria.allocate_vertex(Point::new([3.0, 0.0])), 1);
        assert_eq!(tria.allocate_vertex(Point::new([4.0, 0.0])), 3);
        assert_eq!(tria.allocate_vertex(Point::new([5.0, 0.0])), 5);
        assert_eq!(tria.n_used_vertices(), 6);
    }

    #[test]
    fn face_vertex_lists_of_a_quad() {
        let faces = face_vertex_lists(2, &[10, 11, 12, 13]);
        assert_eq!(faces, vec![vec![10, 11], vec![11, 12], vec![13, 12], vec![10, 13]]);
    }

    #[test]
    fn options_default_and_serde() {
        let options = TriangulationOptions {
            smoothing: MeshSmoothing {
                eliminate_unrefined_islands: true,
            },
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: TriangulationOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
        let empty: TriangulationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TriangulationOptions::default());
    }
}
