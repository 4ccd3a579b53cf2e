//! Key mapping from terminal events to input events.

use crate::types::InputEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to the event it starts.
///
/// Movement keys map to their press event (`MoveLeft`, not `CancelMoveLeft`); releases are
/// the router's business.
pub fn handle_key_event(key: KeyEvent) -> Option<InputEvent> {
    let event = match fold_case(key.code) {
        KeyCode::Left | KeyCode::Char('h' | 'a') => InputEvent::MoveLeft,
        KeyCode::Right | KeyCode::Char('l' | 'd') => InputEvent::MoveRight,
        KeyCode::Down | KeyCode::Char('j' | 's') => InputEvent::MoveDown,
        KeyCode::Up | KeyCode::Char(' ' | 'k' | 'w') => InputEvent::Rotate,

        KeyCode::Enter => InputEvent::Start,
        KeyCode::Esc | KeyCode::Char('p') => InputEvent::TogglePause,
        KeyCode::Char('r') => InputEvent::Restart,
        _ => return None,
    };
    Some(event)
}

/// `q`, `Q` or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match fold_case(key.code) {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn fold_case(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
