//! Building level 0 from a list of vertices and cells.
//!
//! Lines, quads and hexes are created on demand from the corner lists of the
//! cells and shared through a lookup keyed by the sorted corner set. A shared
//! object must be seen with the same corner order by every cell that uses
//! it; meshes whose cells disagree have to be reoriented beforehand.

use crate::debug_invariants;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::topology::geometry_info::NOT_ON_BOUNDARY;
use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;
use crate::topology::triangulation::{
    BoundaryData, CellData, SubCellData, Triangulation, face_vertex_lists,
};
use hashbrown::HashMap;

/// Objects created so far, per structural dimension, keyed by sorted corners.
struct ObjectLookup {
    by_corners: Vec<HashMap<Vec<usize>, (usize, Vec<usize>)>>,
}

impl ObjectLookup {
    fn new(dim: usize) -> Self {
        Self {
            by_corners: (0..dim).map(|_| HashMap::new()).collect(),
        }
    }

    fn get(&self, k: usize, corners: &[usize]) -> Option<&(usize, Vec<usize>)> {
        self.by_corners[k - 1].get(&sorted(corners))
    }
}

fn sorted(corners: &[usize]) -> Vec<usize> {
    let mut key = corners.to_vec();
    key.sort_unstable();
    key
}

impl<const D: usize> Triangulation<D> {
    /// Builds the coarse mesh.
    ///
    /// `cells` list their corners in reference order (counter-clockwise for
    /// quads, bottom then top for hexes). Faces used by one cell get boundary
    /// indicator `0`, shared faces `255`; `subcells` overrides indicators of
    /// boundary lines and quads. Vertices no cell uses are kept but marked
    /// unused.
    ///
    /// On error the triangulation is left empty.
    pub fn create_triangulation(
        &mut self,
        vertices: Vec<Point<D>>,
        cells: &[CellData],
        subcells: &SubCellData,
    ) -> Result<(), MeshError> {
        if !self.is_empty() {
            return Err(MeshError::TriangulationNotEmpty);
        }
        let mut tria = Triangulation::with_options(*self.options());
        tria.build_coarse(vertices, cells, subcells)?;
        *self = tria;
        debug_invariants!(self.validate_invariants(), "after create_triangulation");
        log::debug!(
            "created coarse mesh: {} cells, {} used vertices",
            self.n_cells(),
            self.n_used_vertices()
        );
        Ok(())
    }

    fn build_coarse(
        &mut self,
        vertices: Vec<Point<D>>,
        cells: &[CellData],
        subcells: &SubCellData,
    ) -> Result<(), MeshError> {
        let n_vertices = vertices.len();
        let expected = Self::CELL.n_vertices();
        for (cell, data) in cells.iter().enumerate() {
            if data.vertices.len() != expected {
                return Err(MeshError::WrongVertexCount {
                    cell,
                    expected,
                    found: data.vertices.len(),
                });
            }
            if let Some(&vertex) = data.vertices.iter().find(|&&v| v >= n_vertices) {
                return Err(MeshError::InvalidVertexIndex {
                    cell,
                    vertex,
                    n_vertices,
                });
            }
        }

        self.vertices = vertices;
        self.vertices_used = vec![false; n_vertices];
        self.reset_vertex_cursor();
        self.ensure_level(0);

        let mut lookup = ObjectLookup::new(D);
        let mut cell_keys: HashMap<Vec<usize>, usize> = HashMap::new();
        for (cell, data) in cells.iter().enumerate() {
            if let Some(&other) = cell_keys.get(&sorted(&data.vertices)) {
                return Err(MeshError::DuplicateCell(other, cell));
            }
            let index = self.find_or_create(D, &data.vertices, &mut lookup)?;
            cell_keys.insert(sorted(&data.vertices), cell);
            debug_assert_eq!(index, cell);
            self.store_mut(0, Self::CELL).material_id[index] = data.material_id;
            for &v in &data.vertices {
                self.vertices_used[v] = true;
            }
        }

        self.connect_coarse_neighbors(cells.len())?;
        if D >= 2 {
            self.mark_coarse_boundary(cells.len());
            self.apply_subcell_data(subcells, &lookup)?;
        }

        let unused = self.vertices_used.iter().filter(|&&u| !u).count();
        if unused > 0 {
            log::warn!("{unused} vertices are not used by any cell");
        }
        Ok(())
    }

    /// Index of the `k`-dimensional level-0 object with `corners`, creating
    /// it and its faces if needed.
    fn find_or_create(
        &mut self,
        k: usize,
        corners: &[usize],
        lookup: &mut ObjectLookup,
    ) -> Result<usize, MeshError> {
        if sorted(corners).windows(2).any(|w| w[0] == w[1]) {
            return Err(MeshError::DegenerateObject(corners.to_vec()));
        }
        if let Some((index, existing)) = lookup.get(k, corners) {
            if existing.as_slice() != corners {
                return Err(MeshError::InconsistentOrientation {
                    requested: corners.to_vec(),
                    existing: existing.clone(),
                });
            }
            return Ok(*index);
        }

        let bounds = if k == 1 {
            corners.to_vec()
        } else {
            face_vertex_lists(k, corners)
                .iter()
                .map(|face| self.find_or_create(k - 1, face, lookup))
                .collect::<Result<Vec<_>, _>>()?
        };
        let kind = Structure::of_dimension(k);
        let index = self.levels[0].allocate(kind, 1);
        self.store_mut(0, kind).set_bounds(index, &bounds);
        lookup.by_corners[k - 1].insert(sorted(corners), (index, corners.to_vec()));
        Ok(index)
    }

    /// Pairs up cells sharing a face. Faces are vertices in 1D.
    fn connect_coarse_neighbors(&mut self, n_cells: usize) -> Result<(), MeshError> {
        let mut incident: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
        for cell in 0..n_cells {
            for (face, &object) in self.store(0, Self::CELL).bounds(cell).iter().enumerate() {
                incident.entry(object).or_default().push((cell, face));
            }
        }
        for (face_object, cells) in incident {
            match cells.as_slice() {
                [_] => {}
                &[(a, fa), (b, fb)] => {
                    self.levels[0].set_neighbor(a, fa, ObjectId::from_slot(0, b));
                    self.levels[0].set_neighbor(b, fb, ObjectId::from_slot(0, a));
                }
                _ => return Err(MeshError::NonManifoldFace { face: face_object }),
            }
        }
        Ok(())
    }

    /// Gives boundary faces (and, in 3D, their lines) indicator `0`.
    fn mark_coarse_boundary(&mut self, n_cells: usize) {
        let Some(face_kind) = Self::FACE else {
            return;
        };
        for cell in 0..n_cells {
            for face in 0..2 * D {
                if !self.levels[0].neighbor(cell, face).is_past_the_end() {
                    continue;
                }
                let object = self.store(0, Self::CELL).bounds(cell)[face];
                self.store_mut(0, face_kind).material_id[object] = 0;
                if face_kind == Structure::Quad {
                    let lines = self.store(0, Structure::Quad).bounds(object).to_vec();
                    for line in lines {
                        self.store_mut(0, Structure::Line).material_id[line] = 0;
                    }
                }
            }
        }
    }

    fn apply_subcell_data(
        &mut self,
        subcells: &SubCellData,
        lookup: &ObjectLookup,
    ) -> Result<(), MeshError> {
        self.apply_boundary_ids(1, &subcells.boundary_lines, lookup)?;
        if D == 3 {
            self.apply_boundary_ids(2, &subcells.boundary_quads, lookup)?;
        }
        Ok(())
    }

    fn apply_boundary_ids(
        &mut self,
        k: usize,
        objects: &[BoundaryData],
        lookup: &ObjectLookup,
    ) -> Result<(), MeshError> {
        let kind = Structure::of_dimension(k);
        for data in objects {
            if data.boundary_id == NOT_ON_BOUNDARY {
                return Err(MeshError::ReservedBoundaryIndicator);
            }
            let Some(&(index, _)) = lookup.get(k, &data.vertices) else {
                return Err(MeshError::UnknownSubObject(data.vertices.clone()));
            };
            let store = self.store_mut(0, kind);
            if store.material_id[index] == NOT_ON_BOUNDARY {
                return Err(MeshError::InteriorBoundaryIndicator(data.vertices.clone()));
            }
            store.material_id[index] = data.boundary_id;
        }
        Ok(())
    }
}
