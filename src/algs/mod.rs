//! Algorithms built on top of the triangulation.

pub mod meshgen;
