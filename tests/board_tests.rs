//! Grid and line clear tests

use blockfall::core::line_clear::{clear_rows, detect_full_rows};
use blockfall::core::Grid;
use blockfall::types::{Cell, ColorId, Position};

fn fill_row(grid: &mut Grid, row: usize, color: u8) {
    for col in 0..grid.columns() {
        grid.set_color(row, col, Cell::Filled(ColorId(color)));
    }
}

#[test]
fn test_grid_creation() {
    let grid = Grid::new(24, 10);
    assert_eq!(grid.rows(), 24);
    assert_eq!(grid.columns(), 10);
    assert_eq!(grid.death_line_row(), 23);
    assert_eq!(grid.occupied_count(), 0);
    assert!(grid.cells().iter().all(|c| !c.is_filled()));
}

#[test]
fn test_bounds_are_reported_not_panicked() {
    let grid = Grid::new(20, 10);
    assert!(grid.contains(Position::new(0, 0)));
    assert!(grid.contains(Position::new(19, 9)));
    assert!(!grid.contains(Position::new(-1, 0)));
    assert!(!grid.contains(Position::new(20, 0)));
    assert!(!grid.contains(Position::new(0, 10)));

    assert!(grid.get(Position::new(5, 5)).is_ok());
    let err = grid.get(Position::new(0, -1)).unwrap_err();
    assert_eq!(err.code(), "out_of_bounds");
}

#[test]
#[should_panic(expected = "grid access out of bounds")]
fn test_set_color_out_of_bounds_panics() {
    let mut grid = Grid::new(20, 10);
    grid.set_color(20, 0, Cell::Filled(ColorId(0)));
}

#[test]
fn test_clear_row_shifts_everything_above_down() {
    let mut grid = Grid::new(6, 5);
    fill_row(&mut grid, 1, 0);
    grid.set_color(2, 3, Cell::Filled(ColorId(4)));
    grid.set_color(5, 0, Cell::Filled(ColorId(6)));
    grid.set_color(0, 2, Cell::Filled(ColorId(1)));

    grid.clear_row(1);

    assert_eq!(grid.occupied_count(), 3);
    assert_eq!(grid.color_at(0, 2), Cell::Filled(ColorId(1)));
    assert_eq!(grid.color_at(1, 3), Cell::Filled(ColorId(4)));
    assert_eq!(grid.color_at(4, 0), Cell::Filled(ColorId(6)));
    assert!(grid.row(5).iter().all(|c| !c.is_filled()));
}

#[test]
fn test_detect_only_touched_full_rows() {
    let mut grid = Grid::new(20, 10);
    fill_row(&mut grid, 2, 1);
    fill_row(&mut grid, 5, 1);
    fill_row(&mut grid, 9, 1);

    let touched = [
        Position::new(5, 0),
        Position::new(2, 0),
        Position::new(2, 1),
        Position::new(3, 0),
    ];
    let rows = detect_full_rows(&grid, &touched);
    assert_eq!(rows.as_slice(), &[2, 5]);
}

#[test]
fn test_clearing_two_rows_keeps_the_ones_between() {
    let mut grid = Grid::new(20, 10);
    fill_row(&mut grid, 2, 1);
    fill_row(&mut grid, 5, 1);
    grid.set_color(3, 4, Cell::Filled(ColorId(3)));
    grid.set_color(6, 7, Cell::Filled(ColorId(5)));

    assert_eq!(clear_rows(&mut grid, &[2, 5]), 2);

    assert_eq!(grid.occupied_count(), 2);
    // Row 3 moves down past row 2; row 6 moves down past both.
    assert_eq!(grid.color_at(2, 4), Cell::Filled(ColorId(3)));
    assert_eq!(grid.color_at(4, 7), Cell::Filled(ColorId(5)));
    assert!(!grid.is_row_full(2));
}

#[test]
fn test_settle_writes_piece_colour() {
    let mut grid = Grid::new(20, 10);
    let cells = [
        Position::new(0, 0),
        Position::new(0, 1),
        Position::new(1, 0),
        Position::new(1, 1),
    ];
    grid.settle(&cells, ColorId(3));
    for cell in cells {
        assert!(grid.is_blocked(cell));
        assert_eq!(grid.get(cell).unwrap(), Cell::Filled(ColorId(3)));
    }
    grid.clear();
    assert_eq!(grid.occupied_count(), 0);
}
