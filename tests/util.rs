#![allow(dead_code)]
use mesh_tria::prelude::*;

/// Two unit squares side by side: cell 0 on the left, cell 1 on the right.
pub fn two_squares() -> Triangulation<2> {
    subdivided_hyper_rectangle([2, 1], Point::new([0.0, 0.0]), Point::new([2.0, 1.0])).unwrap()
}

pub fn id(level: i32, index: i32) -> ObjectId {
    ObjectId::new(level, index)
}

/// Every same-level neighbor points back; coarser neighbors are at most one
/// level up.
pub fn assert_neighbors_consistent<const D: usize>(tria: &Triangulation<D>) {
    for cell in tria.active_cells() {
        for face in 0..2 * D {
            if cell.at_boundary(face) {
                continue;
            }
            let neighbor = cell.neighbor(face);
            assert!(
                neighbor.level() >= cell.level() - 1,
                "{:?} face {face}: neighbor {:?} violates 2:1 balance",
                cell,
                neighbor.id()
            );
            if neighbor.level() == cell.level() {
                let back = cell.neighbor_of_neighbor(face);
                assert_eq!(neighbor.neighbor_id(back), cell.id());
            }
        }
    }
}

pub fn assert_valid<const D: usize>(tria: &Triangulation<D>) {
    assert_eq!(
        validate_triangulation(tria, TriangulationValidationOptions::all()),
        Ok(())
    );
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}
