//! Packing-invariant tests for the occupancy matrix
use metric_grid::{GridEntry, GridError, GridMatrix, Position, Scale};

/// Every placed item must occupy exactly its bounding rectangle and every
/// row must stay full width.
fn assert_packing_valid(grid: &GridMatrix) {
    for row in grid.cells() {
        assert_eq!(row.len(), grid.col_count(), "grid lost its rectangular shape");
    }
    for placement in grid.placements() {
        let position = placement.position;
        let scale = placement.scale;
        let mut count = 0;
        for (row, cells) in grid.cells().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.occupant() == Some(placement.item_id) {
                    count += 1;
                    assert!(
                        row >= position.row
                            && row < position.row + scale.rows
                            && col >= position.col
                            && col < position.col + scale.cols,
                        "item {} has a cell at ({}, {}) outside its {} rectangle at {}",
                        placement.item_id,
                        row,
                        col,
                        scale,
                        position
                    );
                }
            }
        }
        assert_eq!(
            count,
            scale.cols * scale.rows,
            "item {} is fragmented",
            placement.item_id
        );
    }
}

#[test]
fn test_allocation_into_empty_grid_grows_one_row() {
    let mut grid = GridMatrix::new(2);
    let placement = grid.insert(Scale::new(1, 1), None).unwrap();
    assert_eq!(placement.position, Position::new(0, 0));
    assert_eq!(grid.row_count(), 1);
    assert_packing_valid(&grid);
}

#[test]
fn test_first_fit_prefers_same_row_over_next_row() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(2, 2), None).unwrap();
    let placement = grid.insert(Scale::new(1, 1), None).unwrap();
    assert_eq!(placement.position, Position::new(0, 2));
    assert_packing_valid(&grid);
}

#[test]
fn test_partial_band_extends_from_last_row() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(1, 1), None).unwrap();
    // Only one row exists; a 2x2 block anchors in it and grows the rest.
    let placement = grid.insert(Scale::new(2, 2), None).unwrap();
    assert_eq!(placement.position, Position::new(0, 1));
    assert_eq!(grid.row_count(), 2);
    assert_packing_valid(&grid);
}

#[test]
fn test_full_last_row_extends_whole_block() {
    let mut grid = GridMatrix::new(2);
    grid.insert(Scale::new(2, 1), None).unwrap();
    let placement = grid.insert(Scale::new(2, 2), None).unwrap();
    assert_eq!(placement.position, Position::new(1, 0));
    assert_eq!(grid.row_count(), 3);
    assert_packing_valid(&grid);
}

#[test]
fn test_remove_leaves_placeholders_and_frees_earliest_slot() {
    let mut grid = GridMatrix::new(2);
    let placement = grid.insert(Scale::new(1, 1), None).unwrap();
    grid.remove(placement.item_id);

    assert!(grid
        .ordered_list()
        .iter()
        .all(|entry| matches!(entry, GridEntry::Empty { .. })));
    assert_eq!(grid.row_count(), 1, "removal must not shrink the grid");

    let again = grid.insert(Scale::new(1, 1), None).unwrap();
    assert_eq!(again.position, Position::new(0, 0));
    assert_ne!(again.item_id, placement.item_id, "ids are never reused");
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(2, 1), None).unwrap();
    let before = grid.clone();
    grid.remove(99);
    assert_eq!(grid, before);
}

#[test]
fn test_move_carries_full_rectangle() {
    let mut grid = GridMatrix::new(4);
    let placement = grid.insert(Scale::new(2, 2), None).unwrap();
    grid.move_to(placement.item_id, Position::new(0, 2)).unwrap();

    assert_eq!(grid.position_of(placement.item_id), Some(Position::new(0, 2)));
    assert_eq!(grid.scale_of(placement.item_id), Some(Scale::new(2, 2)));
    assert_packing_valid(&grid);
}

#[test]
fn test_move_extends_rows_downward() {
    let mut grid = GridMatrix::new(4);
    let placement = grid.insert(Scale::new(2, 2), None).unwrap();
    grid.move_to(placement.item_id, Position::new(1, 0)).unwrap();
    assert_eq!(grid.row_count(), 3);
    assert_packing_valid(&grid);
}

#[test]
fn test_move_rejects_column_overflow_without_mutating() {
    let mut grid = GridMatrix::new(4);
    let placement = grid.insert(Scale::new(2, 2), None).unwrap();
    let before = grid.clone();
    let result = grid.move_to(placement.item_id, Position::new(0, 3));
    assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
    assert_eq!(grid, before);
}

#[test]
fn test_move_rejects_collision_without_mutating() {
    let mut grid = GridMatrix::new(4);
    let first = grid.insert(Scale::new(2, 2), None).unwrap();
    grid.insert(Scale::new(2, 2), None).unwrap();
    let before = grid.clone();
    let result = grid.move_to(first.item_id, Position::new(0, 1));
    assert!(matches!(result, Err(GridError::CellConflict { .. })));
    assert_eq!(grid, before);
}

#[test]
fn test_move_unknown_id_is_noop() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(1, 1), None).unwrap();
    let before = grid.clone();
    grid.move_to(42, Position::new(0, 1)).unwrap();
    assert_eq!(grid, before);
}

#[test]
fn test_swap_equal_scales_exchanges_positions_exactly() {
    let mut grid = GridMatrix::new(3);
    let first = grid.insert(Scale::new(1, 1), None).unwrap();
    let second = grid.insert(Scale::new(1, 1), None).unwrap();

    grid.swap(first.item_id, second.item_id);

    assert_eq!(grid.position_of(first.item_id), Some(second.position));
    assert_eq!(grid.position_of(second.item_id), Some(first.position));
    assert_eq!(grid.scale_of(first.item_id), Some(Scale::new(1, 1)));
    assert_eq!(grid.scale_of(second.item_id), Some(Scale::new(1, 1)));
    assert_packing_valid(&grid);
}

#[test]
fn test_swap_mismatched_shapes_exchanges_footprints() {
    let mut grid = GridMatrix::new(3);
    let large = grid.insert(Scale::new(2, 2), None).unwrap();
    let small = grid.insert(Scale::new(1, 1), None).unwrap();

    grid.swap(small.item_id, large.item_id);

    assert_eq!(grid.rect_of(small.item_id), Some((large.position, large.scale)));
    assert_eq!(grid.rect_of(large.item_id), Some((small.position, small.scale)));
    assert_packing_valid(&grid);
}

#[test]
fn test_swap_with_unknown_id_is_noop() {
    let mut grid = GridMatrix::new(3);
    let placement = grid.insert(Scale::new(2, 1), None).unwrap();
    let before = grid.clone();
    grid.swap(placement.item_id, 77);
    assert_eq!(grid, before);
}

#[test]
fn test_resize_shifts_later_items_and_keeps_rows_above() {
    let mut grid = GridMatrix::new(3);
    let a = grid.insert(Scale::new(2, 1), None).unwrap();
    let b = grid.insert(Scale::new(1, 1), None).unwrap();
    let c = grid.insert(Scale::new(2, 1), None).unwrap();
    let d = grid.insert(Scale::new(1, 1), None).unwrap();
    assert_eq!(c.position, Position::new(1, 0));
    assert_eq!(d.position, Position::new(1, 2));

    grid.resize(c.item_id, Scale::new(3, 1)).unwrap();

    // Row 0 never reflows.
    assert_eq!(grid.position_of(a.item_id), Some(Position::new(0, 0)));
    assert_eq!(grid.position_of(b.item_id), Some(Position::new(0, 2)));
    // The resized item widened in place; the item after it shifted down.
    assert_eq!(grid.rect_of(c.item_id), Some((Position::new(1, 0), Scale::new(3, 1))));
    assert_eq!(grid.position_of(d.item_id), Some(Position::new(2, 0)));
    assert_packing_valid(&grid);
}

#[test]
fn test_resize_unknown_id_is_noop() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(1, 1), None).unwrap();
    let before = grid.clone();
    grid.resize(55, Scale::new(2, 2)).unwrap();
    assert_eq!(grid, before);
}

#[test]
fn test_reconcile_is_idempotent_at_fixed_width() {
    let mut grid = GridMatrix::new(3);
    grid.insert(Scale::new(2, 2), None).unwrap();
    grid.insert(Scale::new(1, 1), None).unwrap();
    grid.insert(Scale::new(2, 1), None).unwrap();

    grid.reconcile(None).unwrap();
    let first_pass = grid.ordered_list();
    grid.reconcile(None).unwrap();
    assert_eq!(grid.ordered_list(), first_pass);
}

#[test]
fn test_reconcile_to_new_width_preserves_identity_and_order() {
    let mut grid = GridMatrix::new(2);
    let a = grid.insert(Scale::new(2, 1), None).unwrap();
    let b = grid.insert(Scale::new(1, 1), None).unwrap();
    let c = grid.insert(Scale::new(1, 1), None).unwrap();

    grid.reconcile(Some(4)).unwrap();

    assert_eq!(grid.col_count(), 4);
    let order: Vec<u32> = grid.placements().iter().map(|p| p.item_id).collect();
    assert_eq!(order, vec![a.item_id, b.item_id, c.item_id]);
    assert_packing_valid(&grid);
}

#[test]
fn test_reconcile_rejects_too_narrow_width_without_mutating() {
    let mut grid = GridMatrix::new(4);
    grid.insert(Scale::new(3, 1), None).unwrap();
    let before = grid.clone();
    let result = grid.reconcile(Some(2));
    assert!(matches!(result, Err(GridError::ScaleTooWide { .. })));
    assert_eq!(grid, before);
}

#[test]
fn test_reconcile_keeps_the_id_counter_monotonic() {
    let mut grid = GridMatrix::new(2);
    let a = grid.insert(Scale::new(1, 1), None).unwrap();
    let b = grid.insert(Scale::new(1, 1), None).unwrap();
    grid.remove(b.item_id);
    grid.reconcile(None).unwrap();

    let fresh = grid.insert(Scale::new(1, 1), None).unwrap();
    assert!(fresh.item_id > b.item_id, "abandoned ids must never be reused");
    assert_eq!(grid.position_of(a.item_id), Some(Position::new(0, 0)));
}

#[test]
fn test_mixed_edit_sequence_never_breaks_invariants() {
    let mut grid = GridMatrix::new(4);
    let a = grid.insert(Scale::new(2, 2), None).unwrap();
    let b = grid.insert(Scale::new(1, 1), None).unwrap();
    let c = grid.insert(Scale::new(2, 1), None).unwrap();
    assert_packing_valid(&grid);

    grid.swap(a.item_id, b.item_id);
    assert_packing_valid(&grid);

    grid.remove(c.item_id);
    assert_packing_valid(&grid);

    let d = grid.insert(Scale::new(3, 1), None).unwrap();
    assert_packing_valid(&grid);

    grid.move_to(b.item_id, Position::new(3, 0)).unwrap();
    assert_packing_valid(&grid);

    grid.resize(d.item_id, Scale::new(1, 1)).unwrap();
    assert_packing_valid(&grid);

    grid.reconcile(Some(3)).unwrap();
    assert_packing_valid(&grid);

    let ids: Vec<u32> = grid.placements().iter().map(|p| p.item_id).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&a.item_id));
    assert!(ids.contains(&b.item_id));
    assert!(ids.contains(&d.item_id));
}
