//! Geometry primitives used by the triangulation.

pub mod point;

pub use point::Point;
