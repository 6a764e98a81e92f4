mod util;

use mesh_tria::prelude::*;
use util::{assert_neighbors_consistent, assert_valid, id, two_squares};

fn flag_family(tria: &mut Triangulation<2>, parent: ObjectId) {
    let level = parent.level() + 1;
    for i in 0..4 {
        let child = tria.cell(parent).child_index(i) as i32;
        tria.cell_mut(id(level, child)).set_coarsen_flag();
    }
}

#[test]
fn refine_then_coarsen_restores_the_coarse_mesh() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    flag_family(&mut tria, id(0, 0));
    let summary = tria.execute_coarsening_and_refinement();

    assert_eq!(summary.coarsened_families, 1);
    assert_eq!(summary.refined_cells, 0);
    assert_eq!(tria.n_levels(), 1);
    assert_eq!(tria.n_cells(), 1);
    assert_eq!(tria.n_active_cells(), 1);
    assert_eq!(tria.n_used_vertices(), 4);
    assert_eq!(tria.n_objects(Structure::Line), 4);
    assert_eq!(tria.n_active_objects(Structure::Line), 4);
    assert!(tria.cell(id(0, 0)).active());
    assert_valid(&tria);
}

#[test]
fn incomplete_family_is_not_coarsened() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    for i in 0..3 {
        let child = tria.cell(id(0, 0)).child_index(i) as i32;
        tria.cell_mut(id(1, child)).set_coarsen_flag();
    }
    tria.prepare_coarsening_and_refinement();
    assert!(tria.active_cells().all(|c| !c.coarsen_flag_set()));
    let summary = tria.execute_coarsening_and_refinement();
    assert_eq!(summary.coarsened_families, 0);
    assert_eq!(tria.n_active_cells(), 4);
}

#[test]
fn coarse_cells_cannot_be_coarsened() {
    let mut tria = two_squares();
    tria.cell_mut(id(0, 0)).set_coarsen_flag();
    assert!(tria.prepare_coarsening_and_refinement());
    assert!(!tria.cell(id(0, 0)).coarsen_flag_set());
    let summary = tria.execute_coarsening_and_refinement();
    assert_eq!(summary.coarsened_families, 0);
    assert_eq!(tria.n_active_cells(), 2);
}

#[test]
fn coarsening_next_to_a_refined_neighbor_is_blocked() {
    let mut tria = two_squares();
    tria.refine_global(1);
    // refine the right family once more at the shared face
    let right_child = tria.cell(id(0, 1)).child_index(0) as i32;
    tria.cell_mut(id(1, right_child)).set_refine_flag();
    flag_family(&mut tria, id(0, 0));
    tria.execute_coarsening_and_refinement();

    assert!(tria.cell(id(0, 0)).has_children());
    assert_neighbors_consistent(&tria);
    assert_valid(&tria);
}

#[test]
fn coarsening_redirects_outer_neighbors() {
    let mut tria = two_squares();
    tria.refine_global(1);
    flag_family(&mut tria, id(0, 0));
    tria.execute_coarsening_and_refinement();

    let left = tria.cell(id(0, 0));
    let right = tria.cell(id(0, 1));
    assert!(left.active());
    assert_eq!(left.neighbor(1).id(), right.id());
    for i in [0, 3] {
        let child = right.child(i);
        assert_eq!(child.neighbor(3).id(), left.id());
        assert!(child.neighbor_is_coarser(3));
    }
    assert_neighbors_consistent(&tria);
    assert_valid(&tria);
}

#[test]
fn released_slots_and_vertices_are_reused() {
    let mut tria = two_squares();
    tria.refine_global(1);
    assert_eq!(tria.n_used_vertices(), 15);
    let first = tria.cell(id(0, 0)).child_index(0);

    flag_family(&mut tria, id(0, 0));
    tria.execute_coarsening_and_refinement();
    // the midpoint of the shared line is still needed on the right
    assert_eq!(tria.n_used_vertices(), 11);
    assert_eq!(tria.n_vertices(), 15);
    assert_eq!(tria.n_raw_cells(1), 8);

    tria.cell_mut(id(0, 0)).set_refine_flag();
    tria.execute_coarsening_and_refinement();
    assert_eq!(tria.cell(id(0, 0)).child_index(0), first);
    assert_eq!(tria.n_raw_cells(1), 8);
    assert_eq!(tria.n_used_vertices(), 15);
    assert_eq!(tria.n_vertices(), 15);
    assert_neighbors_consistent(&tria);
    assert_valid(&tria);
}

#[test]
fn coarsening_two_levels_takes_two_passes() {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(2);
    assert_eq!(tria.n_levels(), 3);

    for cell in tria.active_cell_ids() {
        tria.cell_mut(cell).set_coarsen_flag();
    }
    let summary = tria.execute_coarsening_and_refinement();
    assert_eq!(summary.coarsened_families, 4);
    assert_eq!(summary.n_levels, 2);
    assert_eq!(tria.n_active_cells(), 4);

    for cell in tria.active_cell_ids() {
        tria.cell_mut(cell).set_coarsen_flag();
    }
    tria.execute_coarsening_and_refinement();
    assert_eq!(tria.n_levels(), 1);
    assert_eq!(tria.n_used_vertices(), 4);
    assert_valid(&tria);
}

#[test]
fn hexahedra_coarsen_back() {
    let mut tria = Triangulation::<3>::unit_hypercube();
    tria.refine_global(1);
    for cell in tria.active_cell_ids() {
        tria.cell_mut(cell).set_coarsen_flag();
    }
    tria.execute_coarsening_and_refinement();
    assert_eq!(tria.n_levels(), 1);
    assert_eq!(tria.n_active_cells(), 1);
    assert_eq!(tria.n_used_vertices(), 8);
    assert_eq!(tria.n_objects(Structure::Quad), 6);
    assert_eq!(tria.n_objects(Structure::Line), 12);
    assert_valid(&tria);
}
