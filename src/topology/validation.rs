//! Whole-mesh consistency checks.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::geometry_info::NOT_ON_BOUNDARY;
use crate::topology::object_id::ObjectId;
use crate::topology::triangulation::Triangulation;

/// Optional validation toggles for triangulation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangulationValidationOptions {
    /// Children of used cells are used; flags sit only on active cells and
    /// never both at once.
    pub check_hierarchy: bool,
    /// Neighbors are used, never finer, and equal-level neighbors point back.
    pub check_neighbors: bool,
    /// A face is on the boundary exactly when the neighbor table says so.
    pub check_boundary: bool,
    /// Every corner of a used cell is a used vertex.
    pub check_vertices: bool,
}

impl TriangulationValidationOptions {
    /// Enable all checks.
    pub fn all() -> Self {
        Self {
            check_hierarchy: true,
            check_neighbors: true,
            check_boundary: true,
            check_vertices: true,
        }
    }
}

impl Default for TriangulationValidationOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Validates `tria`, returning the first violation found.
pub fn validate_triangulation<const D: usize>(
    tria: &Triangulation<D>,
    options: TriangulationValidationOptions,
) -> Result<(), MeshError> {
    for cell in tria.cells() {
        let id = cell.id();
        if options.check_hierarchy {
            if cell.has_children() {
                for i in 0..Triangulation::<D>::CELL.n_children() {
                    let child = ObjectId::new(id.level() + 1, cell.child_index(i) as i32);
                    if !tria.cell(child).used() {
                        return Err(MeshError::UnusedCellAsChild { parent: id, child });
                    }
                }
            }
            let (level, index) = id.slot();
            let refine = tria.levels[level].refine_flags[index];
            let coarsen = tria.levels[level].coarsen_flags[index];
            if refine && coarsen {
                return Err(MeshError::FlagsNotExclusive(id));
            }
            if (refine || coarsen) && cell.has_children() {
                return Err(MeshError::FlagOnRefinedCell(id));
            }
        }

        for face in 0..2 * D {
            let neighbor = cell.neighbor_id(face);
            if options.check_neighbors && !neighbor.is_past_the_end() {
                check_neighbor(tria, id, face, neighbor)?;
            }
            if options.check_boundary && D >= 2 {
                let on_boundary = cell.face(face).boundary_indicator() != NOT_ON_BOUNDARY;
                if on_boundary != neighbor.is_past_the_end() {
                    return Err(MeshError::BoundaryMismatch { cell: id, face });
                }
            }
        }

        if options.check_vertices {
            for i in 0..Triangulation::<D>::CELL.n_vertices() {
                let vertex = cell.vertex_index(i);
                if !tria.vertex_used(vertex) {
                    return Err(MeshError::UnusedVertex { object: id, vertex });
                }
            }
        }
    }
    Ok(())
}

fn check_neighbor<const D: usize>(
    tria: &Triangulation<D>,
    cell: ObjectId,
    face: usize,
    neighbor: ObjectId,
) -> Result<(), MeshError> {
    let (level, index) = neighbor.slot();
    let other = tria.cell(neighbor);
    if neighbor.state() != crate::topology::object_id::IteratorState::Valid
        || index >= tria.n_raw_cells(level)
        || !other.used()
    {
        return Err(MeshError::UnusedCellAsNeighbor {
            cell,
            face,
            neighbor,
        });
    }
    if neighbor.level() > cell.level() {
        return Err(MeshError::FinerNeighbor {
            cell,
            face,
            neighbor,
        });
    }
    if neighbor.level() == cell.level()
        && !(0..2 * D).any(|j| other.neighbor_id(j) == cell)
    {
        return Err(MeshError::AsymmetricNeighbor {
            cell,
            face,
            neighbor,
        });
    }
    Ok(())
}

impl<const D: usize> DebugInvariants for Triangulation<D> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Triangulation");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        validate_triangulation(self, TriangulationValidationOptions::all()).inspect_err(|e| {
            log::warn!("triangulation invariant violated: {e}");
        })
    }
}
