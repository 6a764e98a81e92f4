use crate::algs::meshgen::subdivided_hyper_rectangle;
use crate::geometry::Point;
use crate::mesh_error::MeshError;
use crate::topology::object_id::ObjectId;
use crate::topology::triangulation::Triangulation;
use crate::topology::validation::{TriangulationValidationOptions, validate_triangulation};

fn two_squares() -> Triangulation<2> {
    subdivided_hyper_rectangle([2, 1], Point::new([0.0, 0.0]), Point::new([2.0, 1.0])).unwrap()
}

fn validate(tria: &Triangulation<2>) -> Result<(), MeshError> {
    validate_triangulation(tria, TriangulationValidationOptions::all())
}

#[test]
fn fresh_and_refined_meshes_validate() {
    let mut tria = two_squares();
    assert_eq!(validate(&tria), Ok(()));
    tria.cell_mut(ObjectId::new(0, 0)).set_refine_flag();
    tria.execute_coarsening_and_refinement();
    assert_eq!(validate(&tria), Ok(()));
}

#[test]
fn one_sided_neighbor_is_reported() {
    let mut tria = two_squares();
    tria.cell_mut(ObjectId::new(0, 1))
        .set_neighbor(3, ObjectId::PAST_THE_END);
    assert_eq!(
        validate(&tria),
        Err(MeshError::AsymmetricNeighbor {
            cell: ObjectId::new(0, 0),
            face: 1,
            neighbor: ObjectId::new(0, 1),
        })
    );
}

#[test]
fn boundary_mismatch_is_reported_when_neighbors_are_not_checked() {
    let mut tria = two_squares();
    tria.cell_mut(ObjectId::new(0, 1))
        .set_neighbor(3, ObjectId::PAST_THE_END);
    let options = TriangulationValidationOptions {
        check_neighbors: false,
        ..TriangulationValidationOptions::all()
    };
    assert_eq!(
        validate_triangulation(&tria, options),
        Err(MeshError::BoundaryMismatch {
            cell: ObjectId::new(0, 1),
            face: 3,
        })
    );
}

#[test]
fn both_flags_are_reported() {
    let mut tria = two_squares();
    tria.levels[0].refine_flags[1] = true;
    tria.levels[0].coarsen_flags[1] = true;
    assert_eq!(
        validate(&tria),
        Err(MeshError::FlagsNotExclusive(ObjectId::new(0, 1)))
    );
}

#[test]
fn finer_neighbor_is_reported() {
    let mut tria = two_squares();
    tria.cell_mut(ObjectId::new(0, 0)).set_refine_flag();
    tria.execute_coarsening_and_refinement();
    let child = tria.cell(ObjectId::new(0, 0)).child_index(1);
    tria.cell_mut(ObjectId::new(0, 0))
        .set_neighbor(1, ObjectId::new(1, child as i32));
    assert!(matches!(
        validate(&tria),
        Err(MeshError::FinerNeighbor { face: 1, .. })
    ));
}

#[test]
fn unused_vertex_is_reported() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.vertices_used[2] = false;
    assert_eq!(
        validate(&tria),
        Err(MeshError::UnusedVertex {
            object: ObjectId::new(0, 0),
            vertex: 2,
        })
    );
}
