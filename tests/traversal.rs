mod util;

use mesh_tria::prelude::*;
use util::id;

/// Unit square refined once, then its first child refined again:
/// 1 + 4 + 4 cells, 7 of them active.
fn graded_square() -> Triangulation<2> {
    let mut tria = Triangulation::<2>::unit_hypercube();
    tria.refine_global(1);
    let first = tria.cell(id(0, 0)).child_index(0) as i32;
    tria.cell_mut(id(1, first)).set_refine_flag();
    tria.execute_coarsening_and_refinement();
    tria
}

fn backward_ids(mut it: CellIterator<'_, 2>) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    while !it.is_end() {
        ids.push(it.id());
        it.retreat();
    }
    ids.reverse();
    ids
}

#[test]
fn forward_traversal_visits_every_cell_once() {
    let tria = graded_square();
    assert_eq!(tria.n_levels(), 3);
    assert_eq!(tria.raw_cells().count(), 9);
    assert_eq!(tria.cells().count(), 9);
    assert_eq!(tria.active_cells().count(), 7);
    assert_eq!(tria.n_active_cells(), 7);

    let levels: Vec<i32> = tria.cells().map(|c| c.level()).collect();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    assert!(tria.active_cells().all(|c| c.active()));
}

#[test]
fn backward_traversal_mirrors_forward() {
    let tria = graded_square();
    let forward: Vec<ObjectId> = tria.cells().map(|c| c.id()).collect();
    assert_eq!(backward_ids(tria.last()), forward);

    let forward_active: Vec<ObjectId> = tria.active_cells().map(|c| c.id()).collect();
    assert_eq!(backward_ids(tria.last_active()), forward_active);
    assert_eq!(tria.active_cell_ids(), forward_active);
}

#[test]
fn last_active_is_on_finest_level() {
    let tria = graded_square();
    let last = tria.last_active();
    assert_eq!(last.level(), 2);
    assert!(last.active());
    let mut next = last;
    next.advance();
    assert_eq!(next, tria.end());
}

#[test]
fn level_ranges() {
    let tria = graded_square();
    assert_eq!(tria.end_on_level(0), tria.begin(1));
    assert_eq!(tria.end_on_level(2), tria.end());
    assert_eq!(tria.cells_on_level(1).count(), 4);
    assert_eq!(tria.active_cells_on_level(1).count(), 3);
    assert_eq!(tria.n_active_cells_on_level(2), 4);
    assert_eq!(tria.n_cells_on_level(0), 1);

    let mut it = tria.begin(1);
    let end = tria.end_on_level(1);
    let mut n = 0;
    while it != end {
        assert_eq!(it.level(), 1);
        n += 1;
        it.advance();
    }
    assert_eq!(n, 4);
}

#[test]
fn begin_active_skips_refined_cells() {
    let tria = graded_square();
    let first = tria.begin_active(0);
    assert_eq!(first.level(), 1);
    assert!(first.active());
    assert_eq!(tria.begin(0).id(), id(0, 0));
    assert_eq!(tria.begin_raw(0).id(), id(0, 0));
}

#[test]
fn objects_follow_the_same_rules() {
    let tria = graded_square();
    let lines = tria.objects(Structure::Line).count();
    assert_eq!(lines, tria.n_objects(Structure::Line));
    let active_lines = tria.active_objects(Structure::Line).count();
    assert_eq!(active_lines, tria.n_active_objects(Structure::Line));
    assert!(tria.active_objects(Structure::Line).all(|l| !l.has_children()));
    assert!(tria.end_objects(Structure::Line).is_end());
}

#[test]
fn raw_traversal_sees_released_slots() {
    let mut tria = util::two_squares();
    tria.refine_global(1);
    for i in 0..4 {
        let child = tria.cell(id(0, 0)).child_index(i) as i32;
        tria.cell_mut(id(1, child)).set_coarsen_flag();
    }
    tria.execute_coarsening_and_refinement();
    assert_eq!(tria.raw_cells().count(), 2 + 8);
    assert_eq!(tria.cells().count(), 2 + 4);
    assert!(tria.raw_cells().any(|c| !c.used()));
}

#[test]
fn raw_traversal_runs_both_ways_over_released_slots() {
    let mut tria = util::two_squares();
    tria.refine_global(1);
    for i in 0..4 {
        let child = tria.cell(id(0, 0)).child_index(i) as i32;
        tria.cell_mut(id(1, child)).set_coarsen_flag();
    }
    tria.execute_coarsening_and_refinement();

    let forward: Vec<ObjectId> = tria.raw_cells().map(|c| c.id()).collect();
    let mut expected = vec![id(0, 0), id(0, 1)];
    expected.extend((0..8).map(|i| id(1, i)));
    assert_eq!(forward, expected);
    let mut sorted = forward.clone();
    sorted.sort();
    assert_eq!(forward, sorted);

    let mut from_end = tria.end();
    from_end.retreat();
    assert_eq!(from_end, tria.last_raw());
    assert_eq!(tria.last_raw().id(), id(1, 7));
    assert_eq!(backward_ids(from_end), forward);

    let unused: Vec<ObjectId> = tria
        .raw_cells()
        .filter(|c| !c.used())
        .map(|c| c.id())
        .collect();
    assert_eq!(unused, (0..4).map(|i| id(1, i)).collect::<Vec<_>>());
}

#[test]
fn empty_triangulation_has_no_cells() {
    let tria = Triangulation::<2>::new();
    assert!(tria.is_empty());
    assert_eq!(tria.cells().count(), 0);
    assert!(tria.last().is_end());
}
