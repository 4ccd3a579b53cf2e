//! Press/release router for terminal environments.
//!
//! Turns raw key presses and releases into the session's edge-triggered events. Only one
//! key is held at a time: pressing a new movement key cancels the one that was held, and
//! holding a key does not repeat its event (the session's clocks do the repeating).
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::handle_key_event;
use crate::types::InputEvent;

/// Events produced by one router call
pub type Routed = ArrayVec<InputEvent, 4>;

/// The key currently held down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldKey {
    Left,
    Right,
    Down,
    Rotate,
}

impl HeldKey {
    fn from_event(event: InputEvent) -> Option<Self> {
        match event {
            InputEvent::MoveLeft => Some(HeldKey::Left),
            InputEvent::MoveRight => Some(HeldKey::Right),
            InputEvent::MoveDown => Some(HeldKey::Down),
            InputEvent::Rotate => Some(HeldKey::Rotate),
            _ => None,
        }
    }

    fn press_event(self) -> InputEvent {
        match self {
            HeldKey::Left => InputEvent::MoveLeft,
            HeldKey::Right => InputEvent::MoveRight,
            HeldKey::Down => InputEvent::MoveDown,
            HeldKey::Rotate => InputEvent::Rotate,
        }
    }

    /// Event that ends the hold; rotation has none.
    fn cancel_event(self) -> Option<InputEvent> {
        match self {
            HeldKey::Left => Some(InputEvent::CancelMoveLeft),
            HeldKey::Right => Some(InputEvent::CancelMoveRight),
            HeldKey::Down => Some(InputEvent::CancelMoveDown),
            HeldKey::Rotate => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    held: Option<HeldKey>,
    last_key_time: Instant,
    key_release_timeout_ms: u32,
}

// Terminals without release events resend presses while a key is down (auto-repeat);
// the timeout has to outlast the gap between those resends.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl InputRouter {
    pub fn new() -> Self {
        Self {
            held: None,
            last_key_time: Instant::now(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn held(&self) -> Option<HeldKey> {
        self.held
    }

    /// Route a crossterm key event (press, repeat or release).
    pub fn handle_key(&mut self, key: KeyEvent) -> Routed {
        let Some(event) = handle_key_event(key) else {
            return Routed::new();
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(event),
            KeyEventKind::Release => self.release(event),
        }
    }

    /// A key went down.
    pub fn press(&mut self, event: InputEvent) -> Routed {
        let mut out = Routed::new();
        let Some(key) = HeldKey::from_event(event) else {
            // Session commands pass straight through.
            out.push(event);
            return out;
        };

        self.last_key_time = Instant::now();
        if self.held == Some(key) {
            return out;
        }
        if let Some(cancel) = self.held.and_then(HeldKey::cancel_event) {
            out.push(cancel);
        }
        self.held = Some(key);
        out.push(key.press_event());
        out
    }

    /// A key came up.
    pub fn release(&mut self, event: InputEvent) -> Routed {
        let mut out = Routed::new();
        match HeldKey::from_event(event) {
            Some(key) if self.held == Some(key) => {
                self.held = None;
                if let Some(cancel) = key.cancel_event() {
                    out.push(cancel);
                }
            }
            _ => {}
        }
        out
    }

    /// Release a held key that has not been refreshed within the timeout.
    pub fn update(&mut self) -> Routed {
        let since_last_key = self.last_key_time.elapsed().as_millis();
        if since_last_key > u128::from(self.key_release_timeout_ms) {
            return self.reset();
        }
        Routed::new()
    }

    /// Drop any held key, returning its cancel event.
    pub fn reset(&mut self) -> Routed {
        let mut out = Routed::new();
        if let Some(cancel) = self.held.take().and_then(HeldKey::cancel_event) {
            out.push(cancel);
        }
        out
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}
