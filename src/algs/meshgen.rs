//! Basic mesh generators for structured boxes.

use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::topology::geometry_info;
use crate::topology::triangulation::{CellData, SubCellData, Triangulation};

fn invalid_geometry(message: impl Into<String>) -> MeshError {
    MeshError::InvalidGeometry(message.into())
}

/// The box `[left, right]^D` as a single cell.
pub fn hyper_cube<const D: usize>(left: f64, right: f64) -> Result<Triangulation<D>, MeshError> {
    subdivided_hyper_rectangle([1; D], Point::new([left; D]), Point::new([right; D]))
}

/// The box spanned by `p1` and `p2`, split into `repetitions[a]` cells along
/// axis `a`. Vertices are numbered with the first axis running fastest.
pub fn subdivided_hyper_rectangle<const D: usize>(
    repetitions: [usize; D],
    p1: Point<D>,
    p2: Point<D>,
) -> Result<Triangulation<D>, MeshError> {
    if repetitions.iter().any(|&n| n == 0) {
        return Err(invalid_geometry("repetitions must be positive"));
    }
    if (0..D).any(|a| p2[a] <= p1[a]) {
        return Err(invalid_geometry(format!(
            "{p2:?} does not lie above {p1:?} along every axis"
        )));
    }

    let mut strides = [1usize; D];
    for a in 1..D {
        strides[a] = strides[a - 1] * (repetitions[a - 1] + 1);
    }
    let n_vertices = strides[D - 1] * (repetitions[D - 1] + 1);

    let mut vertices = Vec::with_capacity(n_vertices);
    for v in 0..n_vertices {
        let mut p = p1;
        for a in 0..D {
            let i = (v / strides[a]) % (repetitions[a] + 1);
            p[a] = p1[a] + (p2[a] - p1[a]) * i as f64 / repetitions[a] as f64;
        }
        vertices.push(p);
    }

    let n_cells: usize = repetitions.iter().product();
    let mut cells = Vec::with_capacity(n_cells);
    for c in 0..n_cells {
        let mut origin = 0;
        let mut rest = c;
        for a in 0..D {
            origin += (rest % repetitions[a]) * strides[a];
            rest /= repetitions[a];
        }
        let corners: Vec<usize> = (0..1usize << D)
            .map(|corner| {
                let bits = geometry_info::corner_bits(D, corner);
                origin + (0..D).map(|a| bits[a] as usize * strides[a]).sum::<usize>()
            })
            .collect();
        cells.push(CellData::new(corners));
    }

    let mut tria = Triangulation::new();
    tria.create_triangulation(vertices, &cells, &SubCellData::default())?;
    Ok(tria)
}

impl<const D: usize> Triangulation<D> {
    /// The unit box `[0, 1]^D` as a single cell.
    pub fn unit_hypercube() -> Self {
        let mut tria = Self::new();
        let vertices = (0..1usize << D)
            .map(|corner| {
                let bits = geometry_info::corner_bits(D, corner);
                let mut p = Point::ORIGIN;
                for a in 0..D {
                    p[a] = f64::from(bits[a]);
                }
                p
            })
            .collect();
        let corners: Vec<usize> = (0..1usize << D).collect();
        // a single cell in reference order cannot fail to build
        if let Err(e) = tria.create_triangulation(vertices, &[CellData::new(corners)], &SubCellData::default()) {
            unreachable!("unit hypercube: {e}");
        }
        tria
    }
}
