mod util;

use mesh_tria::prelude::*;
use util::{approx, assert_valid, id};

#[test]
fn unit_square_single_cell() {
    let tria = Triangulation::<2>::unit_hypercube();
    assert_eq!(tria.n_levels(), 1);
    assert_eq!(tria.n_cells(), 1);
    assert_eq!(tria.n_active_cells(), 1);

    let cell = tria.cell(id(0, 0));
    assert!(cell.used());
    assert!(cell.active());
    assert!(!cell.has_children());
    assert_eq!(cell.n_children(), 0);
    assert_eq!(cell.material_id(), 0);
    assert!(cell.touches_boundary());
    for face in 0..4 {
        assert!(cell.at_boundary(face));
        assert!(cell.neighbor(face).is_end());
        assert_eq!(cell.neighbor_index(face), -1);
    }
    assert!(approx(cell.diameter(), 2f64.sqrt()));
    assert_eq!(cell.center(), Point::new([0.5, 0.5]));
    assert_eq!(cell.vertex(2), Point::new([1.0, 1.0]));
}

#[test]
fn refine_once_produces_four_children() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.cell_mut(id(0, 0)).set_refine_flag();
    let summary = tria.execute_coarsening_and_refinement();

    assert_eq!(summary.refined_cells, 1);
    assert_eq!(summary.coarsened_families, 0);
    assert_eq!(summary.n_levels, 2);
    assert_eq!(summary.n_active_cells, 4);
    assert_eq!(tria.n_cells(), 5);
    assert_eq!(tria.n_used_vertices(), 9);
    assert_eq!(tria.n_active_objects(Structure::Line), 12);

    let parent = tria.cell(id(0, 0));
    assert!(!parent.active());
    assert_eq!(parent.n_children(), 4);
    assert!(!parent.refine_flag_set());

    let centers = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
    for (i, c) in centers.into_iter().enumerate() {
        let child = parent.child(i);
        assert!(child.active());
        assert_eq!(child.level(), 1);
        assert_eq!(child.parent().id(), parent.id());
        assert_eq!(child.center(), Point::new(c));
        assert!(approx(child.diameter(), 2f64.sqrt() / 2.0));
    }
    assert_valid(&tria);
}

#[test]
fn children_are_linked_to_siblings() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    let parent = tria.cell(id(0, 0));
    let c0 = parent.child(0);
    assert_eq!(c0.neighbor(1).id(), parent.child(1).id());
    assert_eq!(c0.neighbor(2).id(), parent.child(3).id());
    assert!(c0.at_boundary(0));
    assert!(c0.at_boundary(3));
    assert_eq!(c0.neighbor_of_neighbor(1), 3);
}

#[test]
fn material_ids_are_inherited() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.cell_mut(id(0, 0)).set_material_id(7);
    tria.refine_global(1);
    for cell in tria.active_cells() {
        assert_eq!(cell.material_id(), 7);
    }
}

#[test]
fn boundary_indicators_survive_refinement() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    let face = tria.cell(id(0, 0)).face_index(1);
    tria.object_mut(Structure::Line, id(0, face as i32))
        .set_boundary_indicator(4);
    tria.refine_global(1);
    let right = tria.cell(id(0, 0)).child(1);
    assert_eq!(right.face(1).boundary_indicator(), 4);
    assert_eq!(right.face(0).boundary_indicator(), 0);
    // the line between two siblings is interior
    assert_eq!(right.face(3).boundary_indicator(), NOT_ON_BOUNDARY);
    assert!(!right.face(3).at_boundary());
}

#[test]
fn refine_and_coarsen_flags_exclude_each_other() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    let child = tria.cell(id(0, 0)).child_index(0) as i32;

    tria.cell_mut(id(1, child)).set_refine_flag();
    assert!(tria.cell(id(1, child)).refine_flag_set());
    tria.cell_mut(id(1, child)).clear_refine_flag();
    tria.cell_mut(id(1, child)).set_coarsen_flag();
    assert!(tria.cell(id(1, child)).coarsen_flag_set());
    assert!(!tria.cell(id(1, child)).refine_flag_set());
    tria.cell_mut(id(1, child)).clear_coarsen_flag();
    assert!(!tria.cell(id(1, child)).coarsen_flag_set());
}

#[test]
fn user_flags_and_pointers() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    {
        let mut cell = tria.cell_mut(id(0, 0));
        cell.set_user_flag();
        cell.set_user_pointer(42);
    }
    let cell = tria.cell(id(0, 0));
    assert!(cell.user_flag_set());
    assert_eq!(cell.user_pointer(), Some(42));

    tria.clear_user_flags();
    tria.clear_user_pointers();
    let cell = tria.cell(id(0, 0));
    assert!(!cell.user_flag_set());
    assert_eq!(cell.user_pointer(), None);
}

#[test]
fn set_and_clear_children_round_trip() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    let first = tria.cell(id(0, 0)).child_index(0);

    tria.cell_mut(id(0, 0)).clear_children();
    assert!(tria.cell(id(0, 0)).active());
    tria.cell_mut(id(0, 0)).set_children(first);
    let parent = tria.cell(id(0, 0));
    assert!(parent.has_children());
    assert_eq!(parent.child_index(3), first + 3);
    assert_valid(&tria);
}

#[test]
fn moving_a_vertex_changes_geometry() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    *tria.cell_mut(id(0, 0)).vertex_mut(2) = Point::new([2.0, 2.0]);
    let cell = tria.cell(id(0, 0));
    assert!(approx(cell.diameter(), 8f64.sqrt()));
    assert_eq!(tria.vertices()[cell.vertex_index(2)], Point::new([2.0, 2.0]));
}

#[test]
fn lines_and_quads_of_a_hex() {
    let tria = Triangulation::<3>::unit_hypercube();
    let cell = tria.cell(id(0, 0));
    assert_eq!(tria.n_objects(Structure::Quad), 6);
    assert_eq!(tria.n_objects(Structure::Line), 12);
    assert!(approx(cell.diameter(), 3f64.sqrt()));

    let bottom = cell.quad(0);
    assert_eq!(bottom.kind(), Structure::Quad);
    assert!(bottom.at_boundary());
    for i in 0..4 {
        assert_eq!(bottom.vertex(i)[2], 0.0);
    }
    for i in 0..12 {
        let line = cell.line(i);
        assert!(approx(line.diameter(), 1.0));
        assert_eq!(line.boundary_indicator(), 0);
    }
}

#[test]
fn handles_compare_by_position() {
    let tria = Triangulation::<2>::unit_hypercube();
    let a = tria.cell(id(0, 0));
    let mut b = tria.cell(ObjectId::PAST_THE_END);
    assert_ne!(a, b);
    b.copy_from(&a);
    assert_eq!(a, b);
    assert_eq!(format!("{a:?}"), "Cell<2>(0.0)");
}
