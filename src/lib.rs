#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-tria
//!
//! mesh-tria stores hierarchical, adaptively refined triangulations of lines,
//! quadrilaterals and hexahedra. Cells live in flat per-level arrays; callers
//! reach them through lightweight `Copy` accessors and filtered iterators
//! rather than through references into storage.
//!
//! ## Features
//! - Level-based storage of lines, quads and hexes with parent/child links
//! - Accessors for generic objects and for cells (neighbors, flags, materials)
//! - Raw, used and active traversal across all levels, forward and backward
//! - Isotropic refinement with 2:1 balancing, and coarsening of whole families
//! - Consistency validation behind the [`DebugInvariants`] trait
//!
//! ## Usage
//!
//! ```rust
//! use mesh_tria::prelude::*;
//!
//! let mut tria = Triangulation::<2>::unit_hypercube();
//! tria.refine_global(2);
//! assert_eq!(tria.n_active_cells(), 16);
//! for cell in tria.active_cells() {
//!     assert!(cell.diameter() > 0.0);
//! }
//! ```
//!
//! ## Checked builds
//!
//! Accessor preconditions and post-refinement consistency checks panic in
//! debug builds. Release builds skip them unless the `strict-invariants` or
//! `check-invariants` feature is enabled. The `rayon` feature adds parallel
//! iteration over active cells.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::meshgen::{hyper_cube, subdivided_hyper_rectangle};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::Point;
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::geometry_info::{GeometryInfo, NOT_ON_BOUNDARY};
    pub use crate::topology::validation::{TriangulationValidationOptions, validate_triangulation};
    pub use crate::topology::{
        BoundaryData, CellAccessor, CellAccessorMut, CellData, CellIterator, IteratorFilter,
        IteratorState, MeshSmoothing, ObjectId, ObjectIterator, RefinementSummary, StructAccessor,
        StructAccessorMut, Structure, SubCellData, Traversable, TriaAccessor, TriaIterator,
        Triangulation, TriangulationOptions,
    };
}
