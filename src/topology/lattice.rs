//! Lattice addressing of sub-objects.
//!
//! Every entity in the closure of a `k`-dimensional object has a closure
//! coordinate in `{0, 1, 2}^k`: `0` and `2` pin an axis to its lower or
//! upper side, `1` leaves it free. The number of `1`s is the dimension of the
//! entity (`0` for a vertex, `k` for the object itself).
//!
//! After refinement the same idea applies on the doubled lattice
//! `{0, .., 4}^k`: odd coordinates are free axes, so `(2, 2)` is the new
//! center vertex of a quad, `(1, 2)` the lower half of its vertical center
//! line and `(1, 1)` its first child.
//!
//! Lookups walk through faces: an entity with a pinned axis lies on the face
//! for that axis and side, and a face's local axes are its parent's
//! remaining axes in increasing order.

use crate::topology::geometry_info::{self, Bits};
use crate::topology::structure::Structure;
use crate::topology::triangulation::Triangulation;
use itertools::Itertools;
use std::ops::RangeInclusive;

/// Every coordinate of `{values}^k`, padded to three axes.
pub(crate) fn lattice(k: usize, values: RangeInclusive<u8>) -> impl Iterator<Item = Bits> {
    (0..k)
        .map(move |_| values.clone())
        .multi_cartesian_product()
        .map(move |v| {
            let mut c = [0u8; 3];
            c[..k].copy_from_slice(&v);
            c
        })
}

/// Free axes of a closure coordinate.
pub(crate) fn free_axes(c: Bits, k: usize) -> usize {
    c[..k].iter().filter(|&&x| x == 1).count()
}

/// Odd (free) axes of a doubled-lattice coordinate, in increasing order.
pub(crate) fn odd_axes(c: Bits, k: usize) -> Vec<usize> {
    (0..k).filter(|&a| c[a] % 2 == 1).collect()
}

/// Closure coordinates of all proper sub-entities of a `k`-dimensional
/// object, with their dimension, lowest dimension first. Every entity comes
/// after the entities that bound it.
pub(crate) fn closure(k: usize) -> Vec<(usize, Bits)> {
    let mut closure: Vec<_> = lattice(k, 0..=2)
        .map(|c| (free_axes(c, k), c))
        .filter(|&(d, _)| d < k)
        .collect();
    closure.sort_by_key(|&(d, _)| d);
    closure
}

impl<const D: usize> Triangulation<D> {
    /// The entity at closure coordinate `c` of the `k`-dimensional object
    /// `(level, index)`: a vertex index for dimension 0, otherwise an object
    /// index on `level`.
    pub(crate) fn sub_entity(&self, level: usize, k: usize, index: usize, c: Bits) -> usize {
        if k == 0 {
            return index;
        }
        match (0..k).find(|&a| c[a] != 1) {
            None => index,
            Some(axis) => {
                let face = geometry_info::face_no(k, axis, c[axis] / 2);
                let bound = self.store(level, Structure::of_dimension(k)).bounds(index)[face];
                self.sub_entity(level, k - 1, bound, geometry_info::drop_axis(c, axis))
            }
        }
    }

    /// The entity at doubled-lattice coordinate `c` of the refined
    /// `k`-dimensional object `(level, index)`, on `level + 1` (or a vertex).
    pub(crate) fn refined_entity(&self, level: usize, k: usize, index: usize, c: Bits) -> usize {
        if k == 0 {
            return index;
        }
        let first = self.store(level, Structure::of_dimension(k)).children[index]
            .unwrap_or_else(|| unreachable!("object {index} on level {level} is not refined"));
        let mut bits = [0u8; 3];
        let mut local = [0u8; 3];
        for axis in 0..k {
            bits[axis] = u8::from(c[axis] >= 3);
            local[axis] = c[axis] - 2 * bits[axis];
        }
        let child = first + geometry_info::corner_from_bits(k, bits);
        self.sub_entity(level + 1, k, child, local)
    }
}
