//! Grid module - manages the settled cells of the board
//!
//! The grid is `rows × columns` cells, each either empty or filled with a palette colour.
//! Storage is a flat row-major vector; dimensions are fixed at construction.
//! Coordinates are `(row, col)` with row 0 at the bottom and col 0 on the left.
//!
//! Only settled blocks live here. The falling piece and its ghost are overlays owned by
//! the session, so occupancy queries never see the piece that is being tested.

use crate::error::GameError;
use crate::types::{Cell, ColorId, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    death_line_row: usize,
    /// Flat array of cells, row-major order (row * columns + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid with the death line on the top row.
    pub fn new(rows: usize, columns: usize) -> Self {
        assert!(rows > 0 && columns > 0, "grid must have at least one cell");
        Self {
            rows,
            columns,
            death_line_row: rows - 1,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    /// Create an empty grid with an explicit death line.
    pub fn with_death_line(rows: usize, columns: usize, death_line_row: usize) -> Self {
        assert!(death_line_row < rows, "death line must be inside the grid");
        Self {
            death_line_row,
            ..Self::new(rows, columns)
        }
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.columns,
            "grid access out of bounds: (row {row}, col {col}) on a {}x{} grid",
            self.rows,
            self.columns
        );
        row * self.columns + col
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn death_line_row(&self) -> usize {
        self.death_line_row
    }

    /// Whether a signed position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.columns
    }

    /// Check if cell is filled. Panics outside the grid.
    pub fn occupied(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)].is_filled()
    }

    /// Get cell at `(row, col)`. Panics outside the grid.
    pub fn color_at(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Set cell at `(row, col)`. Panics outside the grid.
    pub fn set_color(&mut self, row: usize, col: usize, cell: Cell) {
        let idx = self.index(row, col);
        self.cells[idx] = cell;
    }

    /// Fallible lookup for coordinates that have not been validated.
    pub fn get(&self, pos: Position) -> Result<Cell, GameError> {
        if !self.contains(pos) {
            return Err(GameError::OutOfBounds {
                row: i64::from(pos.row),
                col: i64::from(pos.col),
            });
        }
        Ok(self.color_at(pos.row as usize, pos.col as usize))
    }

    /// Whether a signed position is on the board and filled.
    pub fn is_blocked(&self, pos: Position) -> bool {
        matches!(self.get(pos), Ok(Cell::Filled(_)))
    }

    /// Write a colour at each position. Every position must already be validated.
    pub fn settle(&mut self, cells: &[Position], color: ColorId) {
        for pos in cells {
            self.set_color(pos.row as usize, pos.col as usize, Cell::Filled(color));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        let start = self.index(row, 0);
        self.cells[start..start + self.columns]
            .iter()
            .all(|cell| cell.is_filled())
    }

    /// Remove one row: every row above moves down by one and the top row becomes empty.
    pub fn clear_row(&mut self, row: usize) {
        let start = self.index(row, 0);
        let width = self.columns;

        // copy_within handles the overlapping ranges
        let above = start + width;
        self.cells.copy_within(above.., start);

        let top = (self.rows - 1) * width;
        for cell in &mut self.cells[top..] {
            *cell = Cell::Empty;
        }
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.columns]
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::Empty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(c: u8) -> Cell {
        Cell::Filled(ColorId(c))
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(20, 10);
        assert_eq!(grid.index(0, 0), 0);
        assert_eq!(grid.index(0, 9), 9);
        assert_eq!(grid.index(1, 0), 10);
        assert_eq!(grid.index(19, 9), 199);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_access_past_last_column_panics() {
        let grid = Grid::new(20, 10);
        grid.occupied(0, 10);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_past_top_row_panics() {
        let mut grid = Grid::new(20, 10);
        grid.set_color(20, 0, filled(1));
    }

    #[test]
    fn test_get_reports_out_of_bounds() {
        let grid = Grid::new(20, 10);
        assert!(matches!(
            grid.get(Position::new(-1, 0)),
            Err(GameError::OutOfBounds { row: -1, col: 0 })
        ));
        assert!(matches!(
            grid.get(Position::new(0, 10)),
            Err(GameError::OutOfBounds { row: 0, col: 10 })
        ));
        assert_eq!(grid.get(Position::new(5, 5)).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_clear_row_shifts_rows_above_down() {
        let mut grid = Grid::new(4, 3);
        grid.set_color(0, 0, filled(0));
        grid.set_color(1, 1, filled(1));
        grid.set_color(2, 2, filled(2));
        grid.set_color(3, 0, filled(3));

        grid.clear_row(1);

        assert_eq!(grid.row(0), &[filled(0), Cell::Empty, Cell::Empty]);
        assert_eq!(grid.row(1), &[Cell::Empty, Cell::Empty, filled(2)]);
        assert_eq!(grid.row(2), &[filled(3), Cell::Empty, Cell::Empty]);
        assert_eq!(grid.row(3), &[Cell::Empty; 3]);
    }

    #[test]
    fn test_clear_top_row_only_empties_it() {
        let mut grid = Grid::new(3, 2);
        grid.set_color(2, 0, filled(4));
        grid.set_color(0, 1, filled(4));
        grid.clear_row(2);
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.occupied(0, 1));
    }

    #[test]
    fn test_with_death_line() {
        let grid = Grid::with_death_line(24, 10, 19);
        assert_eq!(grid.death_line_row(), 19);
        assert_eq!(Grid::new(20, 10).death_line_row(), 19);
    }
}
