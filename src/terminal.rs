//! Terminal front end for the game session.
//!
//! [`TerminalView`] implements the core [`Renderer`]: cell updates are buffered and only
//! the cells that changed since the last [`TerminalView::flush`] are written. Each board cell
//! is drawn two characters wide; row 0 is at the bottom of the well.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::{Feedback, PlayerProgress, Renderer, ShapeInfo};
use crate::types::{CellColor, ColorId, GamePhase, ShapeKind, TipSlot};

const PALETTE: [Color; 7] = [
    Color::Cyan,
    Color::Blue,
    Color::DarkYellow,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
];

const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 1;

fn palette_color(color: ColorId) -> Color {
    PALETTE[usize::from(color.0) % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hud {
    score: u32,
    level: u32,
    best: String,
    tips: [Option<(ShapeKind, ColorId)>; 2],
    phase: GamePhase,
}

pub struct TerminalView {
    rows: usize,
    columns: usize,
    cells: Vec<CellColor>,
    dirty: Vec<bool>,
    hud: Hud,
    hud_dirty: bool,
    full_redraw: bool,
    buf: Vec<u8>,
}

impl TerminalView {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![CellColor::Background; rows * columns],
            dirty: vec![true; rows * columns],
            hud: Hud {
                score: 0,
                level: 0,
                best: String::new(),
                tips: [None; 2],
                phase: GamePhase::Start,
            },
            hud_dirty: true,
            full_redraw: true,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.write_buf()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.write_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next flush to redraw everything (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
        self.hud_dirty = true;
        self.dirty.iter_mut().for_each(|d| *d = true);
    }

    /// Color currently buffered for a board cell
    pub fn cell(&self, row: usize, col: usize) -> Option<CellColor> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + col).copied()
    }

    pub fn pending_cells(&self) -> usize {
        self.dirty.iter().filter(|d| **d).count()
    }

    /// Write pending changes to stdout.
    pub fn flush(&mut self) -> Result<()> {
        self.buf.clear();
        let mut out = std::mem::take(&mut self.buf);
        let encoded = self.encode_into(&mut out);
        self.buf = out;
        encoded?;
        self.write_buf()
    }

    /// Encode pending changes as terminal commands and mark them clean.
    pub fn encode_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.full_redraw {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.encode_frame(out)?;
            self.full_redraw = false;
        }

        for row in 0..self.rows {
            for col in 0..self.columns {
                let idx = row * self.columns + col;
                if !self.dirty[idx] {
                    continue;
                }
                self.dirty[idx] = false;
                let (x, y) = self.screen_pos(row, col);
                out.queue(cursor::MoveTo(x, y))?;
                encode_cell(out, self.cells[idx])?;
            }
        }

        if self.hud_dirty {
            self.encode_hud(out)?;
            self.hud_dirty = false;
        }

        out.queue(ResetColor)?;
        Ok(())
    }

    fn screen_pos(&self, row: usize, col: usize) -> (u16, u16) {
        let x = BOARD_X + (col as u16) * 2;
        let y = BOARD_Y + (self.rows - 1 - row) as u16;
        (x, y)
    }

    fn encode_frame(&self, out: &mut Vec<u8>) -> Result<()> {
        let width = self.columns as u16 * 2;
        let bottom = BOARD_Y + self.rows as u16;
        out.queue(SetForegroundColor(Color::DarkGrey))?;
        for y in BOARD_Y..bottom {
            out.queue(cursor::MoveTo(BOARD_X - 1, y))?;
            out.queue(Print("│"))?;
            out.queue(cursor::MoveTo(BOARD_X + width, y))?;
            out.queue(Print("│"))?;
        }
        out.queue(cursor::MoveTo(BOARD_X - 1, bottom))?;
        out.queue(Print(format!("└{}┘", "─".repeat(width as usize))))?;
        Ok(())
    }

    fn encode_hud(&self, out: &mut Vec<u8>) -> Result<()> {
        let x = BOARD_X + self.columns as u16 * 2 + 4;
        out.queue(SetForegroundColor(Color::White))?;

        let lines = [
            (1, format!("SCORE  {:<10}", self.hud.score)),
            (2, format!("LEVEL  {:<10}", self.hud.level)),
            (3, format!("BEST   {:<30}", self.hud.best)),
            (5, "NEXT".to_string()),
        ];
        for (y, text) in lines {
            out.queue(cursor::MoveTo(x, y))?;
            out.queue(Print(text))?;
        }

        for (slot, tip) in self.hud.tips.iter().enumerate() {
            let top = 6 + slot as u16 * 3;
            for line in 0..2u16 {
                out.queue(cursor::MoveTo(x, top + line))?;
                out.queue(Print(" ".repeat(8)))?;
            }
            if let Some((kind, color)) = tip {
                out.queue(SetForegroundColor(palette_color(*color)))?;
                for (row, col) in kind.preview_cells() {
                    let y = top + 1 - u16::from(row);
                    out.queue(cursor::MoveTo(x + u16::from(col) * 2, y))?;
                    out.queue(Print("██"))?;
                }
                out.queue(SetForegroundColor(Color::White))?;
            }
        }

        let status = match self.hud.phase {
            GamePhase::Start => "ENTER to start",
            GamePhase::Playing => "",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME OVER - ENTER to play again",
        };
        out.queue(cursor::MoveTo(x, 13))?;
        out.queue(Print(format!("{status:<32}")))?;

        out.queue(SetForegroundColor(Color::DarkGrey))?;
        out.queue(cursor::MoveTo(x, 15))?;
        out.queue(Print("←/→ move  ↑/space rotate  ↓ drop"))?;
        out.queue(cursor::MoveTo(x, 16))?;
        out.queue(Print("p pause  r restart  q quit"))?;
        Ok(())
    }

    fn write_buf(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(&self.buf)?;
        stdout.flush()?;
        Ok(())
    }
}

fn encode_cell(out: &mut Vec<u8>, color: CellColor) -> Result<()> {
    match color {
        CellColor::Background => {
            out.queue(SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(" ."))?;
        }
        CellColor::Block(c) => {
            out.queue(SetForegroundColor(palette_color(c)))?;
            out.queue(Print("██"))?;
        }
        CellColor::Ghost(c) => {
            out.queue(SetForegroundColor(palette_color(c)))?;
            out.queue(Print("░░"))?;
        }
    }
    Ok(())
}

impl Renderer for TerminalView {
    fn set_cell_color(&mut self, row: usize, col: usize, color: CellColor) {
        if row >= self.rows || col >= self.columns {
            return;
        }
        let idx = row * self.columns + col;
        if self.cells[idx] != color {
            self.cells[idx] = color;
            self.dirty[idx] = true;
        }
    }

    fn show_tip(&mut self, slot: TipSlot, shape: &ShapeInfo) {
        let index = match slot {
            TipSlot::One => 0,
            TipSlot::Two => 1,
        };
        self.hud.tips[index] = Some((shape.kind(), shape.color()));
        self.hud_dirty = true;
    }

    fn show_progress(&mut self, progress: &PlayerProgress) {
        let best = progress.best();
        self.hud.score = progress.score();
        self.hud.level = progress.level();
        self.hud.best = format!("{} ({} {})", best.score, best.date, best.time);
        self.hud_dirty = true;
    }

    fn show_phase(&mut self, phase: GamePhase) {
        self.hud.phase = phase;
        self.hud_dirty = true;
    }
}

/// Rings the terminal bell when rows are cleared.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Feedback for TerminalBell {
    fn on_line_clear_success(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_cells_are_not_redrawn() {
        let mut view = TerminalView::new(4, 3);
        let mut out = Vec::new();
        view.encode_into(&mut out).unwrap();
        assert_eq!(view.pending_cells(), 0);

        view.set_cell_color(0, 0, CellColor::Background);
        assert_eq!(view.pending_cells(), 0);

        view.set_cell_color(0, 0, CellColor::Block(ColorId(1)));
        view.set_cell_color(3, 2, CellColor::Ghost(ColorId(1)));
        assert_eq!(view.pending_cells(), 2);
        assert_eq!(view.cell(0, 0), Some(CellColor::Block(ColorId(1))));
    }

    #[test]
    fn test_bottom_row_is_drawn_lowest() {
        let view = TerminalView::new(20, 10);
        assert_eq!(view.screen_pos(0, 0), (BOARD_X, BOARD_Y + 19));
        assert_eq!(view.screen_pos(19, 9), (BOARD_X + 18, BOARD_Y));
    }

    #[test]
    fn test_out_of_range_cells_are_ignored() {
        let mut view = TerminalView::new(4, 3);
        view.set_cell_color(4, 0, CellColor::Block(ColorId(0)));
        assert_eq!(view.cell(4, 0), None);
    }
}
