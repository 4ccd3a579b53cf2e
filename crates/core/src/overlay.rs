//! Overlay painting for the falling piece and its ghost.
//!
//! Neither lives in the grid, so the renderer is told about them separately. The overlay
//! remembers what it painted last frame and only sends the cells that changed; cells it
//! no longer covers are restored from the grid.

use arrayvec::ArrayVec;

use crate::collab::Renderer;
use crate::grid::Grid;
use crate::piece::Piece;
use crate::types::{CellColor, Position};

type Painted = ArrayVec<(Position, CellColor), 8>;

#[derive(Debug, Default, Clone)]
pub(crate) struct Overlay {
    painted: Painted,
}

impl Overlay {
    /// Forget what was painted; the next `paint` draws every overlay cell.
    pub(crate) fn reset(&mut self) {
        self.painted.clear();
    }

    /// Paint `piece` and `ghost` over the grid, sending only changed cells.
    pub(crate) fn paint<R: Renderer>(
        &mut self,
        grid: &Grid,
        piece: Option<&Piece>,
        ghost: Option<&Piece>,
        renderer: &mut R,
    ) {
        let mut next = Painted::new();
        if let Some(piece) = piece {
            for cell in piece.cells() {
                push_cell(&mut next, grid, cell, CellColor::Block(piece.color()));
            }
        }
        if let Some(ghost) = ghost {
            for cell in ghost.cells() {
                push_cell(&mut next, grid, cell, CellColor::Ghost(ghost.color()));
            }
        }

        for &(pos, _) in &self.painted {
            if !next.iter().any(|(p, _)| *p == pos) {
                let (row, col) = (pos.row as usize, pos.col as usize);
                renderer.set_cell_color(row, col, grid.color_at(row, col).into());
            }
        }
        for &(pos, color) in &next {
            if !self.painted.contains(&(pos, color)) {
                renderer.set_cell_color(pos.row as usize, pos.col as usize, color);
            }
        }
        self.painted = next;
    }
}

/// Record an overlay cell; the first claim on a position wins, so the piece hides its ghost.
fn push_cell(next: &mut Painted, grid: &Grid, pos: Position, color: CellColor) {
    if grid.contains(pos) && !next.iter().any(|(p, _)| *p == pos) {
        next.push((pos, color));
    }
}
