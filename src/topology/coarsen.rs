//! Coarsening: merging complete sibling families back into their parent.
//!
//! Removing the children of a cell leaves lines, quads and vertices behind
//! that nothing references anymore. They are reclaimed by a mark-and-sweep
//! pass over the whole hierarchy:
//! 1. mark the closure of every used cell;
//! 2. going from quads down to lines, keep child blocks whole (one marked
//!    child keeps all siblings) and mark the closure of every marked object;
//! 3. release everything unmarked and drop child pointers into released
//!    blocks.
//!
//! Trailing levels left without any used object are removed.

use crate::topology::geometry_info;
use crate::topology::lattice;
use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;

/// `marks[level][dim - 1][index]` for the lower-dimensional objects.
type Marks = Vec<Vec<Vec<bool>>>;

impl<const D: usize> Triangulation<D> {
    /// Coarsens every family whose children are all active and flagged,
    /// finest level first. Returns the number of families merged.
    pub(crate) fn execute_coarsening(&mut self) -> usize {
        let n_children = Self::CELL.n_children();
        let mut families = 0;
        for level in (0..self.n_levels().saturating_sub(1)).rev() {
            for cell in 0..self.levels[level].n_cells() {
                let cells = self.levels[level].cells();
                if !cells.used[cell] {
                    continue;
                }
                let Some(first) = cells.children[cell] else {
                    continue;
                };
                let fine = &self.levels[level + 1];
                let flagged = (first..first + n_children).all(|c| {
                    fine.cells().used[c]
                        && fine.cells().children[c].is_none()
                        && fine.coarsen_flags[c]
                });
                if flagged {
                    self.delete_children(level, cell, first);
                    families += 1;
                }
            }
        }
        if families > 0 {
            self.collect_garbage();
        }
        families
    }

    /// Releases the children of `(level, parent)` and points same-level
    /// neighbors of the children at the parent instead.
    fn delete_children(&mut self, level: usize, parent: usize, first: usize) {
        let fine = level + 1;
        let family = first..first + Self::CELL.n_children();
        let parent_id = ObjectId::from_slot(level, parent);
        for child in family.clone() {
            let child_id = ObjectId::from_slot(fine, child);
            for face in 0..2 * D {
                let neighbor = self.levels[fine].neighbor(child, face);
                if neighbor.is_past_the_end() {
                    continue;
                }
                let (nl, ni) = neighbor.slot();
                if nl != fine || family.contains(&ni) {
                    continue;
                }
                for other_face in 0..2 * D {
                    if self.levels[nl].neighbor(ni, other_face) == child_id {
                        self.levels[nl].set_neighbor(ni, other_face, parent_id);
                    }
                }
            }
        }
        for child in family {
            self.levels[fine].release(Self::CELL, child);
        }
        self.store_mut(level, Self::CELL).children[parent] = None;
        log::trace!("coarsened children of {parent_id}");
    }

    /// Releases lower-dimensional objects and vertices no used cell needs.
    pub(crate) fn collect_garbage(&mut self) {
        let n_levels = self.n_levels();
        let mut marks: Marks = self
            .levels
            .iter()
            .map(|l| {
                (1..D)
                    .map(|d| vec![false; l.objects(Structure::of_dimension(d)).len()])
                    .collect()
            })
            .collect();
        let mut vertex_marks = vec![false; self.vertices.len()];

        let cell_closure = lattice::closure(D);
        for level in 0..n_levels {
            for cell in 0..self.levels[level].n_cells() {
                if self.levels[level].cells().used[cell] {
                    self.mark_closure(level, D, cell, &cell_closure, &mut marks, &mut vertex_marks);
                }
            }
        }

        for dim in (1..D).rev() {
            let kind = Structure::of_dimension(dim);
            for level in 0..n_levels {
                let store = self.store(level, kind);
                for object in 0..store.len() {
                    if !store.used[object] {
                        continue;
                    }
                    if let Some(first) = store.children[object] {
                        let block = first..first + kind.n_children();
                        if block.clone().any(|c| marks[level + 1][dim - 1][c]) {
                            for c in block {
                                marks[level + 1][dim - 1][c] = true;
                            }
                        }
                    }
                }
            }
            let closure = lattice::closure(dim);
            for level in 0..n_levels {
                for object in 0..marks[level][dim - 1].len() {
                    if marks[level][dim - 1][object] {
                        self.mark_closure(level, dim, object, &closure, &mut marks, &mut vertex_marks);
                    }
                }
            }
        }

        let mut released = 0usize;
        for level in 0..n_levels {
            for dim in 1..D {
                let kind = Structure::of_dimension(dim);
                for object in 0..marks[level][dim - 1].len() {
                    let store = self.store(level, kind);
                    if !store.used[object] {
                        continue;
                    }
                    let children = store.children[object];
                    if !marks[level][dim - 1][object] {
                        self.levels[level].release(kind, object);
                        released += 1;
                    } else if let Some(first) = children {
                        if !marks[level + 1][dim - 1][first] {
                            self.store_mut(level, kind).children[object] = None;
                        }
                    }
                }
            }
        }
        for (v, marked) in vertex_marks.into_iter().enumerate() {
            if self.vertices_used[v] && !marked {
                self.release_vertex(v);
                released += 1;
            }
        }

        while self.levels.len() > 1
            && self.levels.last().is_some_and(|l| {
                Self::kinds().all(|kind| l.objects(kind).n_used() == 0)
            })
        {
            self.levels.pop();
        }
        log::debug!(
            "released {released} unreferenced objects and vertices, {} levels left",
            self.n_levels()
        );
    }

    fn mark_closure(
        &self,
        level: usize,
        k: usize,
        index: usize,
        closure: &[(usize, geometry_info::Bits)],
        marks: &mut Marks,
        vertex_marks: &mut [bool],
    ) {
        for &(dim, c) in closure {
            let entity = self.sub_entity(level, k, index, c);
            if dim == 0 {
                vertex_marks[entity] = true;
            } else {
                marks[level][dim - 1][entity] = true;
            }
        }
    }
}
