//! MeshError: unified error type for mesh-tria.
//!
//! Fallible entry points (coarse-grid creation, flag loading, whole-mesh
//! validation) return it through `Result`. Accessor preconditions are
//! programming errors; they panic with the formatted variant through the
//! [`precondition!`](crate::precondition) macro instead of being returned.

use crate::topology::object_id::ObjectId;
use crate::topology::structure::Structure;
use thiserror::Error;

/// Unified error type for triangulation operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A handle that is not in the `Valid` state was dereferenced.
    #[error("Dereferencing invalid object {0}")]
    DereferenceInvalidObject(ObjectId),
    /// Data of an unused slot was accessed.
    #[error("Object {0} is not used")]
    CellNotUsed(ObjectId),
    /// Local index outside `0..=max`.
    #[error("Invalid index {index}, expected a value in 0..={max}")]
    InvalidIndex { index: usize, max: usize },
    /// Neighbor index outside the faces of the cell.
    #[error("Invalid neighbor index {0}")]
    InvalidNeighbor(usize),
    /// Two handles belonging to different triangulations were compared.
    #[error("Cannot compare handles into different triangulations")]
    CantCompareIterators,
    /// Two handles of different structural kinds were compared.
    #[error("Cannot compare a {0:?} handle with a {1:?} handle")]
    MixedStructures(Structure, Structure),
    /// Operation has no meaning for this structural kind in this space dimension.
    #[error("{structure:?} objects have no {what} in {dim}D triangulations")]
    NotUsefulForThisDimension {
        structure: Structure,
        dim: usize,
        what: &'static str,
    },
    /// Refine/coarsen flag on a cell that is not used and active.
    #[error("Cell {0} must be used and active to carry refinement flags")]
    RefineCellNotActive(ObjectId),
    /// Refine flag requested on a cell already flagged for coarsening.
    #[error("Cell {0} is already flagged for coarsening")]
    CellFlaggedForCoarsening(ObjectId),
    /// Coarsen flag requested on a cell already flagged for refinement.
    #[error("Cell {0} is already flagged for refinement")]
    CellFlaggedForRefinement(ObjectId),
    /// A child handle points to an unused slot.
    #[error("Child {child} of {parent} is not used")]
    UnusedCellAsChild { parent: ObjectId, child: ObjectId },
    /// A neighbor handle points to an unused slot.
    #[error("Neighbor {neighbor} of {cell} across face {face} is not used")]
    UnusedCellAsNeighbor {
        cell: ObjectId,
        face: usize,
        neighbor: ObjectId,
    },
    /// Children requested from an object that has none.
    #[error("Object {0} has no children")]
    NoChildren(ObjectId),
    /// Parent requested from a level-0 object.
    #[error("Object {0} has no parent")]
    NoParent(ObjectId),
    /// Traversal was advanced from a non-valid position.
    #[error("Cannot advance iterator at {0}")]
    AdvanceInvalidObject(ObjectId),
    /// An iterator was created on an object its filter rejects.
    #[error("Object {0} does not satisfy the iterator filter")]
    FilterMismatch(ObjectId),
    /// Level index outside the stored levels.
    #[error("Level {level} out of range ({n_levels} levels)")]
    InvalidLevel { level: usize, n_levels: usize },
    /// `create_triangulation` called on a non-empty triangulation.
    #[error("Triangulation is not empty")]
    TriangulationNotEmpty,
    /// A cell listed the wrong number of vertices.
    #[error("Cell {cell} has {found} vertices, expected {expected}")]
    WrongVertexCount {
        cell: usize,
        expected: usize,
        found: usize,
    },
    /// A cell referenced a vertex that does not exist.
    #[error("Cell {cell} references vertex {vertex}, only {n_vertices} vertices given")]
    InvalidVertexIndex {
        cell: usize,
        vertex: usize,
        n_vertices: usize,
    },
    /// An object would have repeated corners.
    #[error("Degenerate object with corners {0:?}")]
    DegenerateObject(Vec<usize>),
    /// Two cells share the exact same corner set.
    #[error("Cells {0} and {1} are duplicates")]
    DuplicateCell(usize, usize),
    /// A shared object is seen with two incompatible orientations.
    #[error("Object with corners {requested:?} already exists as {existing:?}")]
    InconsistentOrientation {
        requested: Vec<usize>,
        existing: Vec<usize>,
    },
    /// More than two cells share one face.
    #[error("Face {face} is shared by more than two cells")]
    NonManifoldFace { face: usize },
    /// Boundary data names an object that does not exist.
    #[error("No object with corners {0:?}")]
    UnknownSubObject(Vec<usize>),
    /// Boundary data names an interior object.
    #[error("Object with corners {0:?} is not on the boundary")]
    InteriorBoundaryIndicator(Vec<usize>),
    /// Boundary indicator 255 is reserved for interior objects.
    #[error("Boundary indicator 255 is reserved for interior objects")]
    ReservedBoundaryIndicator,
    /// Generator parameters describe no valid box.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Flag vector does not match the number of active cells.
    #[error("Flag vector has {found} entries, expected {expected}")]
    FlagVectorLength { expected: usize, found: usize },
    /// Both refine and coarsen flags set on one cell.
    #[error("Cell {0} is flagged for refinement and coarsening")]
    FlagsNotExclusive(ObjectId),
    /// A flag is set on a cell that is refined.
    #[error("Cell {0} carries a refinement flag but has children")]
    FlagOnRefinedCell(ObjectId),
    /// Neighbor is finer than the cell pointing to it.
    #[error("Neighbor {neighbor} of {cell} across face {face} is on a finer level")]
    FinerNeighbor {
        cell: ObjectId,
        face: usize,
        neighbor: ObjectId,
    },
    /// Equal-level neighbors do not point back at each other.
    #[error("Neighbor {neighbor} of {cell} across face {face} does not point back")]
    AsymmetricNeighbor {
        cell: ObjectId,
        face: usize,
        neighbor: ObjectId,
    },
    /// Face boundary indicator disagrees with the neighbor table.
    #[error("Face {face} of {cell}: boundary indicator disagrees with neighbor table")]
    BoundaryMismatch { cell: ObjectId, face: usize },
    /// A used object references an unused vertex.
    #[error("Object {object} references unused vertex {vertex}")]
    UnusedVertex { object: ObjectId, vertex: usize },
}
