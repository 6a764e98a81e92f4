//! `Point<D>`: vertex coordinates in `D`-dimensional space.
//!
//! Vertices of a triangulation are stored once, in a flat level-independent
//! vector of `Point<D>`; lines, quads and hexes refer to them by index.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Sub};

/// A point (or difference vector) in `D`-dimensional Euclidean space.
#[derive(Copy, Clone, PartialEq)]
pub struct Point<const D: usize> {
    coords: [f64; D],
}

impl<const D: usize> Point<D> {
    /// The origin.
    pub const ORIGIN: Self = Self { coords: [0.0; D] };

    /// Creates a point from its coordinates.
    #[inline]
    pub const fn new(coords: [f64; D]) -> Self {
        Self { coords }
    }

    /// Coordinates as an array.
    #[inline]
    pub const fn coords(&self) -> &[f64; D] {
        &self.coords
    }

    /// Squared Euclidean norm when the point is read as a vector.
    #[inline]
    pub fn square(&self) -> f64 {
        self.coords.iter().map(|c| c * c).sum()
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.square().sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).norm()
    }

    /// Arithmetic mean of a non-empty set of points.
    ///
    /// Returns the origin for an empty input.
    pub fn mean<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut sum = Self::ORIGIN;
        let mut n = 0usize;
        for p in points {
            sum += p;
            n += 1;
        }
        if n == 0 { sum } else { sum / n as f64 }
    }
}

impl<const D: usize> Default for Point<D> {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl<const D: usize> From<[f64; D]> for Point<D> {
    fn from(coords: [f64; D]) -> Self {
        Self::new(coords)
    }
}

impl<const D: usize> fmt::Debug for Point<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Point").field(&self.coords).finish()
    }
}

impl<const D: usize> Index<usize> for Point<D> {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.coords[i]
    }
}

impl<const D: usize> IndexMut<usize> for Point<D> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.coords[i]
    }
}

impl<const D: usize> Add for Point<D> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const D: usize> AddAssign for Point<D> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.coords.iter_mut().zip(rhs.coords) {
            *a += b;
        }
    }
}

impl<const D: usize> Sub for Point<D> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.coords.iter_mut().zip(rhs.coords) {
            *a -= b;
        }
        self
    }
}

impl<const D: usize> Mul<f64> for Point<D> {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        for a in &mut self.coords {
            *a *= rhs;
        }
        self
    }
}

impl<const D: usize> Div<f64> for Point<D> {
    type Output = Self;

    fn div(mut self, rhs: f64) -> Self {
        for a in &mut self.coords {
            *a /= rhs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_norms() {
        let a = Point::new([1.0, 2.0]);
        let b = Point::new([4.0, 6.0]);
        assert_eq!((b - a).square(), 25.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a + b, Point::new([5.0, 8.0]));
        assert_eq!(b * 0.5, Point::new([2.0, 3.0]));
    }

    #[test]
    fn mean_of_unit_square_corners() {
        let corners = [
            Point::new([0.0, 0.0]),
            Point::new([1.0, 0.0]),
            Point::new([1.0, 1.0]),
            Point::new([0.0, 1.0]),
        ];
        assert_eq!(Point::mean(corners), Point::new([0.5, 0.5]));
        assert_eq!(Point::<2>::mean([]), Point::ORIGIN);
    }

    #[test]
    fn debug_format() {
        let p = Point::new([1.5]);
        assert_eq!(format!("{p:?}"), "Point([1.5])");
    }
}
