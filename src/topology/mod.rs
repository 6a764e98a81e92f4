//! Hierarchical mesh topology.
//!
//! This module provides the storage and handle types of a triangulation:
//! - [`ObjectId`] and [`Structure`]: addresses and kinds of mesh objects
//! - [`level`]: flat per-level arrays of lines, quads, hexes and cells
//! - [`accessor`]: transient read and write handles into those arrays
//! - [`iterator`]: filtered traversal over the handles
//! - [`Triangulation`]: the owner, with creation, refinement and coarsening
//!
//! Most users build a [`Triangulation`], walk it through
//! [`active_cells`](Triangulation::active_cells) and mark cells through
//! [`cell_mut`](Triangulation::cell_mut) before calling
//! [`execute_coarsening_and_refinement`](Triangulation::execute_coarsening_and_refinement).

pub mod accessor;
mod coarsen;
mod create;
pub mod geometry_info;
pub mod iterator;
mod lattice;
pub mod level;
pub mod object_id;
pub mod refine;
pub mod structure;
pub mod triangulation;
pub mod validation;

pub use accessor::{CellAccessor, CellAccessorMut, StructAccessor, StructAccessorMut, TriaAccessor};
pub use iterator::{CellIterator, IteratorFilter, ObjectIterator, Traversable, TriaIterator};
pub use object_id::{IteratorState, ObjectId};
pub use refine::RefinementSummary;
pub use structure::Structure;
pub use triangulation::{
    BoundaryData, CellData, MeshSmoothing, SubCellData, Triangulation, TriangulationOptions,
};

#[cfg(test)]
mod tests;
