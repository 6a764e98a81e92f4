//! Structural kinds of mesh objects.

/// The structural kinds a triangulation stores, tagged by their dimension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Structure {
    /// 1D segment bounded by two vertices.
    Line,
    /// 2D tensor-product cell bounded by four lines.
    Quad,
    /// 3D tensor-product cell bounded by six quads.
    Hex,
}

impl Structure {
    /// Returns the kind of the given structural dimension, if there is one.
    pub const fn from_dimension(dim: usize) -> Option<Self> {
        match dim {
            1 => Some(Structure::Line),
            2 => Some(Structure::Quad),
            3 => Some(Structure::Hex),
            _ => None,
        }
    }

    /// Kind of an internal structural dimension known to be 1, 2 or 3.
    pub(crate) fn of_dimension(dim: usize) -> Self {
        Structure::from_dimension(dim)
            .unwrap_or_else(|| unreachable!("structural dimension {dim}"))
    }

    /// Structural dimension (1, 2 or 3).
    pub const fn dimension(self) -> usize {
        match self {
            Structure::Line => 1,
            Structure::Quad => 2,
            Structure::Hex => 3,
        }
    }

    /// Number of bounding objects: vertices of a line, lines of a quad,
    /// quads of a hex.
    pub const fn n_bounds(self) -> usize {
        2 * self.dimension()
    }

    /// Number of corner vertices.
    pub const fn n_vertices(self) -> usize {
        1 << self.dimension()
    }

    /// Number of children produced by isotropic refinement.
    pub const fn n_children(self) -> usize {
        1 << self.dimension()
    }

    /// Number of lines in the closure (a line counts itself).
    pub const fn n_lines(self) -> usize {
        match self {
            Structure::Line => 1,
            Structure::Quad => 4,
            Structure::Hex => 12,
        }
    }

    /// The kind one dimension lower, `None` for lines.
    pub const fn face(self) -> Option<Self> {
        Structure::from_dimension(self.dimension() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(Structure::Line.n_bounds(), 2);
        assert_eq!(Structure::Quad.n_bounds(), 4);
        assert_eq!(Structure::Hex.n_bounds(), 6);
        assert_eq!(Structure::Hex.n_children(), 8);
        assert_eq!(Structure::Quad.n_vertices(), 4);
    }

    #[test]
    fn dimension_roundtrip() {
        for dim in 1..=3 {
            assert_eq!(Structure::from_dimension(dim).unwrap().dimension(), dim);
        }
        assert_eq!(Structure::from_dimension(0), None);
        assert_eq!(Structure::Hex.face(), Some(Structure::Quad));
        assert_eq!(Structure::Line.face(), None);
    }
}
