//! Line clear - full-row detection and compaction after a lock

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::Position;

/// Full rows among those touched by `cells`, ascending and de-duplicated.
///
/// Only rows a piece just settled into can have become full, so nothing else is scanned.
pub fn detect_full_rows(grid: &Grid, cells: &[Position]) -> ArrayVec<usize, 4> {
    let mut rows: ArrayVec<usize, 4> = ArrayVec::new();
    for pos in cells {
        if pos.row < 0 || pos.row as usize >= grid.rows() {
            continue;
        }
        let row = pos.row as usize;
        if !rows.contains(&row) && grid.is_row_full(row) && !rows.is_full() {
            rows.push(row);
        }
    }
    rows.sort_unstable();
    rows
}

/// Clear `rows` (ascending) from the top down so lower indices stay valid.
///
/// Returns the number of rows removed.
pub fn clear_rows(grid: &mut Grid, rows: &[usize]) -> u32 {
    for &row in rows.iter().rev() {
        grid.clear_row(row);
    }
    rows.len() as u32
}
