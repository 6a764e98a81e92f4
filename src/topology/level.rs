//! Level storage: flat per-level arrays of mesh objects.
//!
//! A [`TriaLevel`] bundles one [`ObjectStore`] per structural dimension present
//! in the triangulation, plus the arrays only cells carry (refinement flags
//! and the neighbor table). Every array of a store is co-indexed: slot `i` of
//! `used` describes slot `i` of `bounds`, `children`, and so on.
//!
//! # Invariants
//! - Slots never move once assigned; growth only appends.
//! - `n_free` counts the unused slots exactly; every slot below
//!   `free_cursor` is used, so searches for free slots start there.
//! - An unused slot is in its default state (no children, no parent, flags
//!   cleared), so releasing and reusing a slot leaves no stale data behind.
//! - `children[i] == Some(c)` implies slots `c..c + n_children` exist on the
//!   next level.

use crate::topology::geometry_info::NOT_ON_BOUNDARY;
use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;

/// Arrays for all objects of one structural kind on one level.
#[derive(Clone, Debug)]
pub struct ObjectStore {
    kind: Structure,
    /// Bounding objects, `kind.n_bounds()` entries per slot: vertex indices
    /// for lines, same-level line indices for quads, quad indices for hexes.
    bounds: Vec<usize>,
    pub(crate) used: Vec<bool>,
    pub(crate) user_flags: Vec<bool>,
    pub(crate) user_pointers: Vec<Option<usize>>,
    /// Boundary indicator, or material id when the kind is the cell kind.
    pub(crate) material_id: Vec<u8>,
    /// First slot of the child block on the next level.
    pub(crate) children: Vec<Option<usize>>,
    /// Slot of the parent on the previous level.
    pub(crate) parents: Vec<Option<usize>>,
    n_free: usize,
    free_cursor: usize,
}

impl ObjectStore {
    pub fn new(kind: Structure) -> Self {
        Self {
            kind,
            bounds: Vec::new(),
            used: Vec::new(),
            user_flags: Vec::new(),
            user_pointers: Vec::new(),
            material_id: Vec::new(),
            children: Vec::new(),
            parents: Vec::new(),
            n_free: 0,
            free_cursor: 0,
        }
    }

    #[inline]
    pub fn kind(&self) -> Structure {
        self.kind
    }

    /// Number of slots, used or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Number of used slots.
    #[inline]
    pub fn n_used(&self) -> usize {
        self.len() - self.n_free
    }

    /// Sets the used flag of slot `i`, keeping the free-slot bookkeeping.
    pub(crate) fn set_used(&mut self, i: usize, used: bool) {
        match (self.used[i], used) {
            (false, true) => self.n_free -= 1,
            (true, false) => {
                self.n_free += 1;
                self.free_cursor = self.free_cursor.min(i);
            }
            _ => {}
        }
        self.used[i] = used;
    }

    /// Bounding objects of slot `i`.
    #[inline]
    pub fn bounds(&self, i: usize) -> &[usize] {
        let n = self.kind.n_bounds();
        &self.bounds[i * n..(i + 1) * n]
    }

    /// Overwrites the bounding objects of slot `i`.
    #[inline]
    pub(crate) fn set_bounds(&mut self, i: usize, bounds: &[usize]) {
        let n = self.kind.n_bounds();
        debug_assert_eq!(bounds.len(), n);
        self.bounds[i * n..(i + 1) * n].copy_from_slice(bounds);
    }

    /// Appends `n` unused slots and returns the first new index.
    fn grow(&mut self, n: usize) -> usize {
        let first = self.len();
        self.bounds
            .resize((first + n) * self.kind.n_bounds(), usize::MAX);
        self.used.resize(first + n, false);
        self.user_flags.resize(first + n, false);
        self.user_pointers.resize(first + n, None);
        self.material_id.resize(first + n, NOT_ON_BOUNDARY);
        self.children.resize(first + n, None);
        self.parents.resize(first + n, None);
        self.n_free += n;
        first
    }

    /// First index of a run of `n` consecutive unused slots at or after the
    /// cursor, if any, and the first unused slot seen on the way.
    fn scan_free(&self, n: usize) -> (Option<usize>, Option<usize>) {
        let mut first_free = None;
        let mut run = 0;
        for i in self.free_cursor..self.len() {
            if self.used[i] {
                run = 0;
                continue;
            }
            first_free.get_or_insert(i);
            run += 1;
            if run == n {
                return (Some(i + 1 - n), first_free);
            }
        }
        (None, first_free)
    }

    /// First index of a run of `n` consecutive unused slots, if any.
    pub fn find_free_block(&self, n: usize) -> Option<usize> {
        if self.n_free < n {
            return None;
        }
        self.scan_free(n).0
    }

    /// Reserves `n` consecutive slots, reusing unused ones when possible, and
    /// marks them used. Returns the first index.
    pub(crate) fn allocate(&mut self, n: usize) -> usize {
        if self.n_free < n {
            let first = self.grow(n);
            self.mark_allocated(first, n);
            if self.free_cursor == first {
                self.free_cursor = first + n;
            }
            return first;
        }
        let (block, first_free) = self.scan_free(n);
        let first = block.unwrap_or_else(|| self.grow(n));
        self.mark_allocated(first, n);
        self.free_cursor = match first_free {
            Some(f) if f != first => f,
            _ => first + n,
        };
        first
    }

    fn mark_allocated(&mut self, first: usize, n: usize) {
        for slot in first..first + n {
            self.reset(slot);
            self.set_used(slot, true);
        }
    }

    /// Returns slot `i` to the unused default state.
    pub(crate) fn release(&mut self, i: usize) {
        self.set_used(i, false);
        self.reset(i);
    }

    fn reset(&mut self, i: usize) {
        self.user_flags[i] = false;
        self.user_pointers[i] = None;
        self.material_id[i] = NOT_ON_BOUNDARY;
        self.children[i] = None;
        self.parents[i] = None;
        let n = self.kind.n_bounds();
        self.bounds[i * n..(i + 1) * n].fill(usize::MAX);
    }
}

/// All objects on one refinement level.
#[derive(Clone, Debug)]
pub struct TriaLevel {
    /// `objects[k - 1]` holds the objects of structural dimension `k`.
    objects: Vec<ObjectStore>,
    pub(crate) refine_flags: Vec<bool>,
    pub(crate) coarsen_flags: Vec<bool>,
    /// `faces_per_cell` entries per cell; `PAST_THE_END` on the boundary.
    pub(crate) neighbors: Vec<ObjectId>,
}

impl TriaLevel {
    /// Empty level of a `dim`-dimensional triangulation.
    pub fn new(dim: usize) -> Self {
        let objects = (1..=dim)
            .filter_map(Structure::from_dimension)
            .map(ObjectStore::new)
            .collect();
        Self {
            objects,
            refine_flags: Vec::new(),
            coarsen_flags: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Space dimension this level was built for.
    #[inline]
    pub fn dim(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn objects(&self, kind: Structure) -> &ObjectStore {
        &self.objects[kind.dimension() - 1]
    }

    #[inline]
    pub(crate) fn objects_mut(&mut self, kind: Structure) -> &mut ObjectStore {
        &mut self.objects[kind.dimension() - 1]
    }

    /// Store of the top-dimensional objects.
    #[inline]
    pub fn cells(&self) -> &ObjectStore {
        &self.objects[self.dim() - 1]
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells().len()
    }

    /// Reserves `n` consecutive slots of `kind`; for the cell kind the
    /// flag and neighbor arrays grow alongside.
    pub(crate) fn allocate(&mut self, kind: Structure, n: usize) -> usize {
        let dim = self.dim();
        let first = self.objects_mut(kind).allocate(n);
        if kind.dimension() == dim {
            let len = self.objects(kind).len();
            self.refine_flags.resize(len, false);
            self.coarsen_flags.resize(len, false);
            self.neighbors.resize(len * 2 * dim, ObjectId::PAST_THE_END);
            for cell in first..first + n {
                self.reset_cell(cell);
            }
        }
        first
    }

    /// Releases slot `i` of `kind`, clearing cell data for cells.
    pub(crate) fn release(&mut self, kind: Structure, i: usize) {
        self.objects_mut(kind).release(i);
        if kind.dimension() == self.dim() {
            self.reset_cell(i);
        }
    }

    fn reset_cell(&mut self, cell: usize) {
        let fpc = 2 * self.dim();
        self.refine_flags[cell] = false;
        self.coarsen_flags[cell] = false;
        self.neighbors[cell * fpc..(cell + 1) * fpc].fill(ObjectId::PAST_THE_END);
    }

    /// Neighbor-table entry of `cell` across `face`.
    #[inline]
    pub fn neighbor(&self, cell: usize, face: usize) -> ObjectId {
        self.neighbors[cell * 2 * self.dim() + face]
    }

    #[inline]
    pub(crate) fn set_neighbor(&mut self, cell: usize, face: usize, id: ObjectId) {
        let fpc = 2 * self.dim();
        self.neighbors[cell * fpc + face] = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_appends_then_reuses() {
        let mut store = ObjectStore::new(Structure::Line);
        assert_eq!(store.allocate(2), 0);
        assert_eq!(store.allocate(2), 2);
        assert_eq!(store.len(), 4);

        store.release(0);
        store.release(1);
        assert_eq!(store.n_used(), 2);
        assert_eq!(store.find_free_block(2), Some(0));
        assert_eq!(store.allocate(2), 0);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn free_block_needs_consecutive_slots() {
        let mut store = ObjectStore::new(Structure::Quad);
        store.allocate(4);
        store.release(1);
        store.release(3);
        assert_eq!(store.find_free_block(1), Some(1));
        assert_eq!(store.find_free_block(2), None);
        assert_eq!(store.allocate(2), 4);
    }

    #[test]
    fn full_store_appends_without_scanning() {
        let mut store = ObjectStore::new(Structure::Quad);
        for k in 0..100 {
            assert_eq!(store.allocate(4), 4 * k);
        }
        assert_eq!(store.n_free, 0);
        assert_eq!(store.free_cursor, 400);
        assert_eq!(store.n_used(), 400);
    }

    #[test]
    fn cursor_returns_to_the_lowest_released_slot() {
        let mut store = ObjectStore::new(Structure::Line);
        store.allocate(8);
        store.release(5);
        store.release(2);
        assert_eq!(store.free_cursor, 2);
        assert_eq!(store.n_used(), 6);

        assert_eq!(store.allocate(1), 2);
        assert_eq!(store.allocate(1), 5);
        assert_eq!(store.allocate(1), 8);
        assert_eq!(store.n_used(), 9);

        store.set_used(1, false);
        assert_eq!(store.n_used(), 8);
        assert_eq!(store.allocate(1), 1);
    }

    #[test]
    fn released_slot_is_reset() {
        let mut store = ObjectStore::new(Structure::Line);
        let i = store.allocate(1);
        store.set_bounds(i, &[3, 4]);
        store.children[i] = Some(7);
        store.user_flags[i] = true;
        store.material_id[i] = 2;
        store.release(i);
        assert!(!store.used[i]);
        assert_eq!(store.children[i], None);
        assert!(!store.user_flags[i]);
        assert_eq!(store.material_id[i], NOT_ON_BOUNDARY);
        assert_eq!(store.bounds(i), &[usize::MAX, usize::MAX]);
    }

    #[test]
    fn cell_arrays_follow_top_store() {
        let mut level = TriaLevel::new(2);
        assert_eq!(level.dim(), 2);
        let first = level.allocate(Structure::Quad, 4);
        assert_eq!(first, 0);
        assert_eq!(level.n_cells(), 4);
        assert_eq!(level.refine_flags.len(), 4);
        assert_eq!(level.neighbors.len(), 16);
        assert!(level.neighbor(3, 3).is_past_the_end());

        level.set_neighbor(1, 2, ObjectId::new(0, 3));
        assert_eq!(level.neighbor(1, 2), ObjectId::new(0, 3));
        level.release(Structure::Quad, 1);
        assert!(level.neighbor(1, 2).is_past_the_end());

        // lines do not touch cell arrays
        level.allocate(Structure::Line, 3);
        assert_eq!(level.refine_flags.len(), 4);
    }
}
