//! Movement rules - legality of translations, rotations and placements
//!
//! All checks are read-only. Bounds are tested for all four cells before any occupancy test,
//! and nothing here panics for positions off the board. The falling piece is never written
//! into the [`Grid`], so its own cells can't collide with it.

use crate::grid::Grid;
use crate::piece::Piece;
use crate::types::{Direction, Position};

/// Whether every position lies on the board and on an empty cell.
pub fn can_place(grid: &Grid, cells: &[Position]) -> bool {
    if !cells.iter().all(|&pos| grid.contains(pos)) {
        return false;
    }
    !cells.iter().any(|&pos| grid.is_blocked(pos))
}

/// Whether `piece` can move one cell in `direction`.
pub fn can_move(grid: &Grid, piece: &Piece, direction: Direction) -> bool {
    let moved = piece.cells().map(|cell| cell.step(direction));
    can_place(grid, &moved)
}

/// Whether `piece` can rotate into its next state. Kinds without a candidate always can.
pub fn can_rotate(grid: &Grid, piece: &Piece) -> bool {
    match piece.rotation_candidate() {
        Some(cells) => can_place(grid, &cells),
        None => true,
    }
}

/// Where `piece` would come to rest if it fell straight down.
pub fn drop_target(grid: &Grid, piece: &Piece) -> Piece {
    let mut ghost = *piece;
    while can_move(grid, &ghost, Direction::Down) {
        ghost.translate(-1, 0);
    }
    ghost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, ColorId, ShapeKind};

    #[test]
    fn test_walls_block_sideways_moves() {
        let grid = Grid::new(20, 10);
        let mut piece = Piece::new(ShapeKind::O, Position::new(10, 0), ColorId(0));
        assert!(!can_move(&grid, &piece, Direction::Left));
        assert!(can_move(&grid, &piece, Direction::Right));

        piece.translate(0, 8);
        assert!(!can_move(&grid, &piece, Direction::Right));
        assert!(can_move(&grid, &piece, Direction::Left));
    }

    #[test]
    fn test_floor_and_ceiling() {
        let grid = Grid::new(20, 10);
        let floor = Piece::new(ShapeKind::O, Position::new(0, 4), ColorId(0));
        assert!(!can_move(&grid, &floor, Direction::Down));

        let ceiling = Piece::new(ShapeKind::O, Position::new(18, 4), ColorId(0));
        assert!(!can_move(&grid, &ceiling, Direction::Up));
    }

    #[test]
    fn test_settled_cells_block() {
        let mut grid = Grid::new(20, 10);
        grid.set_color(4, 5, Cell::Filled(ColorId(1)));
        let piece = Piece::new(ShapeKind::O, Position::new(5, 4), ColorId(0));
        assert!(!can_move(&grid, &piece, Direction::Down));
        assert!(can_move(&grid, &piece, Direction::Left));
    }

    #[test]
    fn test_rotation_blocked_by_wall() {
        let grid = Grid::new(20, 10);
        // Vertical I against the left wall has no room to lie flat.
        let mut piece = Piece::new(ShapeKind::I, Position::new(10, 1), ColorId(0));
        piece.rotate(true);
        piece.translate(0, -1);
        assert_eq!(piece.anchor().col, 0);
        assert!(!can_rotate(&grid, &piece));
    }

    #[test]
    fn test_o_rotation_is_always_legal() {
        let grid = Grid::new(20, 10);
        let piece = Piece::new(ShapeKind::O, Position::new(0, 8), ColorId(0));
        assert!(can_rotate(&grid, &piece));
    }

    #[test]
    fn test_drop_target_lands_on_stack() {
        let mut grid = Grid::new(20, 10);
        for col in 0..10 {
            grid.set_color(0, col, Cell::Filled(ColorId(1)));
        }
        let piece = Piece::new(ShapeKind::O, Position::new(15, 4), ColorId(0));
        let ghost = drop_target(&grid, &piece);
        assert_eq!(ghost.bottom_row(), 1);
        assert_eq!(ghost.anchor().col, 4);
    }
}
