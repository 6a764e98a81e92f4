//! Reference-cell conventions shared by every structural kind.
//!
//! Objects of structural dimension `k` are unit hypercubes in their own local
//! coordinates. Corners and children are numbered from their axis bits:
//! `(x, y)` walks the quad counter-clockwise (`00, 10, 11, 01`), and a hex
//! stacks the bottom quad (`z = 0`) under the top one (`z = 1`).
//!
//! Faces are named by `(axis, side)`. The face numbering per dimension is:
//! - line: `0: x=0`, `1: x=1` (the two vertices)
//! - quad: `0: y=0`, `1: x=1`, `2: y=1`, `3: x=0`
//! - hex:  `0: z=0`, `1: z=1`, `2: y=0`, `3: x=1`, `4: y=1`, `5: x=0`
//!
//! The local axes of a face are the parent's remaining axes in increasing
//! order. Every table below relies on that.

use std::marker::PhantomData;

/// Boundary indicator reserved for objects in the interior of the domain.
pub const NOT_ON_BOUNDARY: u8 = 255;

/// Axis bits of a corner, padded to three axes.
pub type Bits = [u8; 3];

/// Compile-time counts for cells of dimension `D`.
pub struct GeometryInfo<const D: usize>(PhantomData<[(); D]>);

impl<const D: usize> GeometryInfo<D> {
    pub const VERTICES_PER_CELL: usize = 1 << D;
    pub const FACES_PER_CELL: usize = 2 * D;
    pub const CHILDREN_PER_CELL: usize = 1 << D;
    pub const SUBFACES_PER_FACE: usize = 1 << (D - 1);
    pub const VERTICES_PER_FACE: usize = 1 << (D - 1);
}

/// Corner `i` of a quad is endpoint `QUAD_CORNER_CONVENTION[i]` of line `i`.
pub const QUAD_CORNER_CONVENTION: [usize; 4] = [0, 0, 1, 1];

const QUAD_FACES: [(usize, u8); 4] = [(1, 0), (0, 1), (1, 1), (0, 0)];
const HEX_FACES: [(usize, u8); 6] = [(2, 0), (2, 1), (1, 0), (0, 1), (1, 1), (0, 0)];
const QUAD_CORNER_BITS: [Bits; 4] = [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]];

/// Hex line `i` as `(face, line of that face)`.
const HEX_LINES: [(usize, usize); 12] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 0),
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 3),
    (2, 1),
    (4, 1),
    (4, 3),
];

/// `(axis, side)` of face `face` of a `k`-dimensional object.
pub fn face_axis_side(k: usize, face: usize) -> (usize, u8) {
    match k {
        1 => (0, face as u8),
        2 => QUAD_FACES[face],
        3 => HEX_FACES[face],
        _ => unreachable!("structural dimension {k}"),
    }
}

/// Face number of the `(axis, side)` face of a `k`-dimensional object.
pub fn face_no(k: usize, axis: usize, side: u8) -> usize {
    match k {
        1 => side as usize,
        2 => QUAD_FACES
            .iter()
            .position(|&f| f == (axis, side))
            .unwrap_or_else(|| unreachable!("quad face ({axis}, {side})")),
        3 => HEX_FACES
            .iter()
            .position(|&f| f == (axis, side))
            .unwrap_or_else(|| unreachable!("hex face ({axis}, {side})")),
        _ => unreachable!("structural dimension {k}"),
    }
}

/// Axis bits of corner (or child) `corner` of a `k`-dimensional object.
pub fn corner_bits(k: usize, corner: usize) -> Bits {
    match k {
        1 => [corner as u8, 0, 0],
        2 => QUAD_CORNER_BITS[corner],
        3 => {
            let mut b = QUAD_CORNER_BITS[corner % 4];
            b[2] = (corner / 4) as u8;
            b
        }
        _ => unreachable!("structural dimension {k}"),
    }
}

/// Corner (or child) number from axis bits.
pub fn corner_from_bits(k: usize, bits: Bits) -> usize {
    match k {
        1 => bits[0] as usize,
        2 | 3 => {
            let in_plane = QUAD_CORNER_BITS
                .iter()
                .position(|b| b[0] == bits[0] && b[1] == bits[1])
                .unwrap_or_else(|| unreachable!("corner bits {bits:?}"));
            if k == 3 {
                in_plane + 4 * bits[2] as usize
            } else {
                in_plane
            }
        }
        _ => unreachable!("structural dimension {k}"),
    }
}

/// Removes `axis` from a coordinate triple, shifting the higher axes down.
pub fn drop_axis(c: Bits, axis: usize) -> Bits {
    let mut out = [0u8; 3];
    let mut j = 0;
    for (i, &v) in c.iter().enumerate() {
        if i != axis {
            out[j] = v;
            j += 1;
        }
    }
    out
}

/// Inserts `value` at `axis`, shifting the higher axes up.
pub fn insert_axis(c: Bits, axis: usize, value: u8) -> Bits {
    let mut out = [0u8; 3];
    let mut j = 0;
    for (i, slot) in out.iter_mut().enumerate() {
        if i == axis {
            *slot = value;
        } else {
            *slot = c[j];
            j += 1;
        }
    }
    out
}

/// Local corner numbers of face `face` of a `k`-dimensional object, in the
/// face's own corner order.
pub fn face_corners(k: usize, face: usize) -> Vec<usize> {
    let (axis, side) = face_axis_side(k, face);
    if k == 1 {
        return vec![side as usize];
    }
    (0..1usize << (k - 1))
        .map(|fc| corner_from_bits(k, insert_axis(corner_bits(k - 1, fc), axis, side)))
        .collect()
}

/// Hex line `line` as `(face, line of that face)`.
pub fn hex_line(line: usize) -> (usize, usize) {
    HEX_LINES[line]
}

/// The four space diagonals of a hex and the two diagonals of a quad, as
/// corner pairs.
pub fn diagonals(k: usize) -> &'static [(usize, usize)] {
    match k {
        1 => &[(0, 1)],
        2 => &[(0, 2), (1, 3)],
        3 => &[(0, 6), (1, 7), (2, 4), (3, 5)],
        _ => unreachable!("structural dimension {k}"),
    }
}
