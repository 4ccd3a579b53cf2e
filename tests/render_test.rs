//! Renderer contract: what the session paints matches its state

mod common;

use blockfall::core::{GameConfig, GameSession, MemoryStore, NoFeedback};
use blockfall::types::{CellColor, GamePhase, InputEvent, Position, ShapeKind};

use common::{only_o, preset, Recorder};

type Session = GameSession<Recorder, MemoryStore, NoFeedback>;

fn boot(config: GameConfig, store: MemoryStore) -> Session {
    let mut game = GameSession::new(config, Recorder::default(), store, NoFeedback).unwrap();
    game.boot().unwrap();
    game
}

/// The colour every board cell should show right now.
fn expected(game: &Session, row: usize, col: usize) -> CellColor {
    let grid = game.grid();
    let cell = grid.color_at(row, col);
    if cell.is_filled() {
        return cell.into();
    }
    let pos = Position::new(row as i32, col as i32);
    if let Some(active) = game.active() {
        if active.piece().cells().contains(&pos) {
            return CellColor::Block(active.color());
        }
        if let Some(ghost) = game.ghost() {
            if ghost.cells().contains(&pos) {
                return CellColor::Ghost(active.color());
            }
        }
    }
    CellColor::Background
}

fn assert_screen_matches(game: &Session) {
    let grid = game.grid();
    for row in 0..grid.rows() {
        for col in 0..grid.columns() {
            assert_eq!(
                game.renderer().at(row, col),
                expected(game, row, col),
                "cell ({row}, {col})"
            );
        }
    }
}

#[test]
fn test_boot_paints_the_saved_board() {
    let config = only_o(20);
    let state = preset(&config, 0, |row, col| row == 0 && col % 2 == 0);
    let game = boot(config, MemoryStore::with_state(state));

    assert_screen_matches(&game);
    assert_eq!(game.renderer().tips, [Some(ShapeKind::O), Some(ShapeKind::O)]);
    assert_eq!(game.renderer().scores.last(), Some(&0));
}

#[test]
fn test_piece_and_ghost_follow_moves() {
    let mut game = boot(GameConfig::default().with_seed(99), MemoryStore::new());
    game.handle_input(InputEvent::Start).unwrap();
    assert_eq!(game.renderer().phases.last(), Some(&GamePhase::Playing));
    assert_screen_matches(&game);

    for event in [
        InputEvent::MoveLeft,
        InputEvent::CancelMoveLeft,
        InputEvent::Rotate,
        InputEvent::MoveDown,
        InputEvent::CancelMoveDown,
        InputEvent::MoveRight,
        InputEvent::CancelMoveRight,
    ] {
        game.handle_input(event).unwrap();
        assert_screen_matches(&game);
    }

    for _ in 0..200 {
        game.tick(50).unwrap();
        assert_screen_matches(&game);
    }
}

#[test]
fn test_moves_repaint_only_changed_cells() {
    let mut game = boot(only_o(20), MemoryStore::new());
    game.handle_input(InputEvent::Start).unwrap();

    let before = game.renderer().paints;
    game.handle_input(InputEvent::MoveLeft).unwrap();
    // The O and its ghost each shift by one column: two cells vacated and two newly
    // covered per shape.
    assert_eq!(game.renderer().paints - before, 8);
}

#[test]
fn test_line_clear_repaints_and_updates_hud() {
    let config = only_o(20);
    let state = preset(&config, 0, |row, col| row == 0 && col != 5 && col != 6);
    let mut game = boot(config, MemoryStore::with_state(state));
    game.handle_input(InputEvent::Start).unwrap();

    while game.handle_input(InputEvent::MoveDown).unwrap() {}
    assert_screen_matches(&game);
    assert_eq!(game.renderer().scores.last(), Some(&10));
}

#[test]
fn test_game_over_hides_the_piece() {
    let config = only_o(24).with_death_line(19);
    let state = preset(&config, 0, |row, col| row <= 21 && (col == 5 || col == 6));
    let mut game = boot(config, MemoryStore::with_state(state));
    game.handle_input(InputEvent::Start).unwrap();
    game.handle_input(InputEvent::MoveDown).unwrap();

    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.renderer().phases.last(), Some(&GamePhase::GameOver));
    assert_screen_matches(&game);
}
