//! Isotropic refinement and flag smoothing.
//!
//! Refining a `k`-dimensional object `O` on level `l` creates, on level
//! `l + 1`:
//! - one vertex at the center of `O`,
//! - the entities interior to `O` of dimensions `1..k` (the center line of a
//!   quad splits into two, a hex gets twelve inner quad halves...),
//! - a block of `2^k` children.
//!
//! Children and interior entities are stitched together through the
//! doubled lattice (see [`lattice`](super::lattice)). A cell is refined only
//! after every lower-dimensional object in its closure, so the children of
//! shared faces exist before they are needed and are shared with the
//! neighbor's children.

use crate::debug_invariants;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::Point;
use crate::topology::geometry_info::{self, Bits, NOT_ON_BOUNDARY};
use crate::topology::lattice::{self, odd_axes};
use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;
use hashbrown::HashMap;

/// What one call to
/// [`execute_coarsening_and_refinement`](Triangulation::execute_coarsening_and_refinement)
/// did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefinementSummary {
    /// Cells that were split.
    pub refined_cells: usize,
    /// Sibling families that were merged back into their parent.
    pub coarsened_families: usize,
    pub n_levels: usize,
    pub n_active_cells: usize,
}

impl<const D: usize> Triangulation<D> {
    /// Flags every active cell for refinement.
    pub fn set_all_refine_flags(&mut self) {
        for level in &mut self.levels {
            let cells = level.cells();
            let active: Vec<usize> = (0..cells.len())
                .filter(|&i| cells.used[i] && cells.children[i].is_none())
                .collect();
            for i in active {
                level.refine_flags[i] = true;
                level.coarsen_flags[i] = false;
            }
        }
    }

    /// Refines every active cell `times` times.
    pub fn refine_global(&mut self, times: usize) {
        for _ in 0..times {
            self.set_all_refine_flags();
            self.execute_coarsening_and_refinement();
        }
    }

    /// Adjusts refine and coarsen flags until they describe a valid
    /// refinement step:
    /// - no face ever separates cells more than one level apart,
    /// - a family is coarsened only if all siblings are flagged and coarsening
    ///   keeps the mesh balanced,
    /// - the smoothing options in effect are applied.
    ///
    /// Refine flags are only ever added and coarsen flags only ever removed,
    /// so the iteration reaches a fixed point. Returns whether any flag
    /// changed.
    pub fn prepare_coarsening_and_refinement(&mut self) -> bool {
        let mut changed_any = false;
        loop {
            let mut changed = self.enforce_level_balance();
            changed |= self.restrict_coarsening();
            if self.options().smoothing.eliminate_unrefined_islands {
                changed |= self.eliminate_unrefined_islands();
            }
            if !changed {
                break;
            }
            changed_any = true;
        }
        changed_any
    }

    /// Applies the refine and coarsen flags: smooths them, coarsens flagged
    /// families finest level first, then refines flagged cells coarsest level
    /// first.
    pub fn execute_coarsening_and_refinement(&mut self) -> RefinementSummary {
        self.prepare_coarsening_and_refinement();
        let coarsened_families = self.execute_coarsening();
        let refined_cells = self.execute_refinement();
        debug_invariants!(
            self.validate_invariants(),
            "after execute_coarsening_and_refinement"
        );
        let summary = RefinementSummary {
            refined_cells,
            coarsened_families,
            n_levels: self.n_levels(),
            n_active_cells: self.n_active_cells(),
        };
        log::debug!(
            "refined {} cells, coarsened {} families: {} levels, {} active cells",
            summary.refined_cells,
            summary.coarsened_families,
            summary.n_levels,
            summary.n_active_cells
        );
        summary
    }

    // --- flag smoothing ----------------------------------------------------

    fn is_active(&self, level: usize, cell: usize) -> bool {
        let cells = self.levels[level].cells();
        cells.used[cell] && cells.children[cell].is_none()
    }

    /// A refine-flagged cell next to a coarser active cell drags it along,
    /// and keeps same-level neighbors from coarsening.
    fn enforce_level_balance(&mut self) -> bool {
        let mut changed = false;
        for level in 0..self.n_levels() {
            for cell in 0..self.levels[level].n_cells() {
                if !self.is_active(level, cell) || !self.levels[level].refine_flags[cell] {
                    continue;
                }
                for face in 0..2 * D {
                    let neighbor = self.levels[level].neighbor(cell, face);
                    if neighbor.is_past_the_end() {
                        continue;
                    }
                    let (nl, ni) = neighbor.slot();
                    if !self.is_active(nl, ni) {
                        continue;
                    }
                    let flags = &mut self.levels[nl];
                    if nl < level && !flags.refine_flags[ni] {
                        flags.refine_flags[ni] = true;
                        flags.coarsen_flags[ni] = false;
                        changed = true;
                    } else if nl == level && flags.coarsen_flags[ni] {
                        flags.coarsen_flags[ni] = false;
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    /// Keeps coarsen flags only on complete, coarsenable families.
    fn restrict_coarsening(&mut self) -> bool {
        let mut changed = false;
        let n_children = Self::CELL.n_children();
        for level in 0..self.n_levels() {
            for cell in 0..self.levels[level].n_cells() {
                if !self.levels[level].cells().used[cell] {
                    continue;
                }
                let children = self.levels[level].cells().children[cell];
                let Some(first) = children else {
                    // coarse cells have no parent to coarsen into
                    if level == 0 && self.levels[0].coarsen_flags[cell] {
                        self.levels[0].coarsen_flags[cell] = false;
                        changed = true;
                    }
                    continue;
                };
                let family = first..first + n_children;
                let children = &self.levels[level + 1];
                if !family.clone().any(|c| children.coarsen_flags[c]) {
                    continue;
                }
                let complete = family
                    .clone()
                    .all(|c| self.is_active(level + 1, c) && children.coarsen_flags[c]);
                if !complete || self.family_blocked(level + 1, first) {
                    for c in family {
                        self.levels[level + 1].coarsen_flags[c] = false;
                    }
                    changed = true;
                }
            }
        }
        changed
    }

    /// Whether an outer same-level neighbor of the family starting at
    /// `first` is refined or about to be.
    fn family_blocked(&self, level: usize, first: usize) -> bool {
        (0..Self::CELL.n_children()).any(|child| {
            let bits = geometry_info::corner_bits(D, child);
            (0..2 * D).any(|face| {
                let (axis, side) = geometry_info::face_axis_side(D, face);
                if bits[axis] != side {
                    return false;
                }
                let neighbor = self.levels[level].neighbor(first + child, face);
                if neighbor.is_past_the_end() || neighbor.level() as usize != level {
                    return false;
                }
                let ni = neighbor.slot().1;
                self.levels[level].cells().children[ni].is_some()
                    || self.levels[level].refine_flags[ni]
            })
        })
    }

    /// Flags active cells most of whose neighbors end up finer.
    fn eliminate_unrefined_islands(&mut self) -> bool {
        let mut changed = false;
        for level in 0..self.n_levels() {
            for cell in 0..self.levels[level].n_cells() {
                if !self.is_active(level, cell) || self.levels[level].refine_flags[cell] {
                    continue;
                }
                let (mut finer, mut not_finer) = (0usize, 0usize);
                for face in 0..2 * D {
                    let neighbor = self.levels[level].neighbor(cell, face);
                    if neighbor.is_past_the_end() {
                        continue;
                    }
                    let (nl, ni) = neighbor.slot();
                    let refined = self.levels[nl].cells().children[ni].is_some()
                        || self.levels[nl].refine_flags[ni];
                    if nl == level && refined {
                        finer += 1;
                    } else {
                        not_finer += 1;
                    }
                }
                if finer > not_finer {
                    self.levels[level].refine_flags[cell] = true;
                    self.levels[level].coarsen_flags[cell] = false;
                    changed = true;
                }
            }
        }
        changed
    }

    // --- execution ---------------------------------------------------------

    fn execute_refinement(&mut self) -> usize {
        let mut refined = 0;
        // cells created in this pass carry no flags
        for level in 0..self.n_levels() {
            let flagged: Vec<usize> = (0..self.levels[level].n_cells())
                .filter(|&c| self.is_active(level, c) && self.levels[level].refine_flags[c])
                .collect();
            for cell in flagged {
                self.refine_cell(level, cell);
                refined += 1;
            }
        }
        refined
    }

    /// Splits one active cell, refining the objects of its closure first.
    pub(crate) fn refine_cell(&mut self, level: usize, cell: usize) {
        for (dim, c) in lattice::closure(D) {
            if dim == 0 {
                continue;
            }
            let object = self.sub_entity(level, D, cell, c);
            let kind = Structure::of_dimension(dim);
            if self.store(level, kind).children[object].is_none() {
                self.refine_object(level, dim, object);
            }
        }
        let first = self.refine_object(level, D, cell);
        self.levels[level].refine_flags[cell] = false;
        self.link_children(level, cell, first);
    }

    /// Creates the center vertex, interior entities and children of the
    /// `k`-dimensional object `(level, index)`, whose faces are already
    /// refined. Returns the first child.
    fn refine_object(&mut self, level: usize, k: usize, index: usize) -> usize {
        let kind = Structure::of_dimension(k);
        self.ensure_level(level + 1);

        let corners = self.object_corners(level, k, index);
        let center = Point::mean(corners.iter().map(|&v| self.vertices[v]));
        let inherited = self.store(level, kind).material_id[index];
        let interior_id = if k == D { NOT_ON_BOUNDARY } else { inherited };

        let mut interior: HashMap<Bits, usize> = HashMap::new();
        let mut center_coord = [0u8; 3];
        center_coord[..k].fill(2);
        interior.insert(center_coord, self.allocate_vertex(center));

        for dim in 1..k {
            let entity_kind = Structure::of_dimension(dim);
            let coords: Vec<Bits> = lattice::lattice(k, 1..=3)
                .filter(|&c| odd_axes(c, k).len() == dim)
                .collect();
            for c in coords {
                let axes = odd_axes(c, k);
                let bounds: Vec<usize> = (0..2 * dim)
                    .map(|face| {
                        let (local_axis, side) = geometry_info::face_axis_side(dim, face);
                        let axis = axes[local_axis];
                        let mut at = c;
                        at[axis] = c[axis] + 2 * side - 1;
                        self.lattice_entity(level, k, index, at, &interior)
                    })
                    .collect();
                let slot = self.levels[level + 1].allocate(entity_kind, 1);
                let store = self.store_mut(level + 1, entity_kind);
                store.set_bounds(slot, &bounds);
                store.material_id[slot] = interior_id;
                interior.insert(c, slot);
            }
        }

        let n_children = kind.n_children();
        let first = self.levels[level + 1].allocate(kind, n_children);
        for child in 0..n_children {
            let bits = geometry_info::corner_bits(k, child);
            let bounds: Vec<usize> = (0..2 * k)
                .map(|face| {
                    let (axis, side) = geometry_info::face_axis_side(k, face);
                    let mut at = [0u8; 3];
                    for i in 0..k {
                        at[i] = if i == axis {
                            2 * bits[i] + 2 * side
                        } else {
                            2 * bits[i] + 1
                        };
                    }
                    self.lattice_entity(level, k, index, at, &interior)
                })
                .collect();
            let store = self.store_mut(level + 1, kind);
            store.set_bounds(first + child, &bounds);
            store.material_id[first + child] = inherited;
            store.parents[first + child] = Some(index);
        }
        self.store_mut(level, kind).children[index] = Some(first);
        log::trace!(
            "refined {kind:?} {} into {n_children} children at {}",
            ObjectId::from_slot(level, index),
            ObjectId::from_slot(level + 1, first)
        );
        first
    }

    /// Entity at doubled-lattice coordinate `at` of an object being refined:
    /// pinned coordinates resolve through the already refined faces, the
    /// rest through the entities created so far.
    fn lattice_entity(
        &self,
        level: usize,
        k: usize,
        index: usize,
        at: Bits,
        interior: &HashMap<Bits, usize>,
    ) -> usize {
        match (0..k).find(|&a| at[a] == 0 || at[a] == 4) {
            Some(axis) => {
                let face = geometry_info::face_no(k, axis, at[axis] / 4);
                let bound = self.store(level, Structure::of_dimension(k)).bounds(index)[face];
                self.refined_entity(level, k - 1, bound, geometry_info::drop_axis(at, axis))
            }
            None => interior
                .get(&at)
                .copied()
                .unwrap_or_else(|| unreachable!("lattice entity {at:?} not created yet")),
        }
    }

    /// Fills the neighbor tables of the children of `(level, parent)` and of
    /// the children of already refined same-level neighbors.
    fn link_children(&mut self, level: usize, parent: usize, first: usize) {
        let fine = level + 1;
        for child in 0..Self::CELL.n_children() {
            let bits = geometry_info::corner_bits(D, child);
            let child_id = ObjectId::from_slot(fine, first + child);
            for face in 0..2 * D {
                let (axis, side) = geometry_info::face_axis_side(D, face);
                if bits[axis] != side {
                    let mut sibling = bits;
                    sibling[axis] = side;
                    let sibling = first + geometry_info::corner_from_bits(D, sibling);
                    self.levels[fine].set_neighbor(
                        first + child,
                        face,
                        ObjectId::from_slot(fine, sibling),
                    );
                    continue;
                }
                let neighbor = self.levels[level].neighbor(parent, face);
                let entry = if neighbor.is_past_the_end() {
                    neighbor
                } else {
                    let (nl, ni) = neighbor.slot();
                    let refined = self.levels[nl].cells().children[ni];
                    match refined {
                        Some(other_first) if nl == level => {
                            let shared = self.store(fine, Self::CELL).bounds(first + child)[face];
                            match self.child_with_face(fine, other_first, shared) {
                                Some((other, other_face)) => {
                                    self.levels[fine].set_neighbor(other, other_face, child_id);
                                    ObjectId::from_slot(fine, other)
                                }
                                None => neighbor,
                            }
                        }
                        _ => neighbor,
                    }
                };
                self.levels[fine].set_neighbor(first + child, face, entry);
            }
        }
    }

    /// The child of the block at `first` that has `face_object` as a face,
    /// with the face number.
    fn child_with_face(&self, level: usize, first: usize, face_object: usize) -> Option<(usize, usize)> {
        let cells = self.store(level, Self::CELL);
        (first..first + Self::CELL.n_children()).find_map(|c| {
            cells
                .bounds(c)
                .iter()
                .position(|&f| f == face_object)
                .map(|face| (c, face))
        })
    }
}
