//! Terminal runner (default binary).
//!
//! Polls crossterm for keys until the next frame is due, routes them into the session, and
//! advances the session clocks by the real elapsed time once per frame.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use blockfall::core::{BootOutcome, GameSession, Persistence};
use blockfall::host::HostConfig;
use blockfall::input::{should_quit, InputRouter};
use blockfall::terminal::{TerminalBell, TerminalView};
use blockfall::types::FRAME_MS;

type Session = GameSession<TerminalView, Box<dyn Persistence>, TerminalBell>;

fn main() -> Result<()> {
    let host = HostConfig::from_env();
    let config = host.game_config();
    let view = TerminalView::new(usize::from(config.rows), usize::from(config.columns));
    let mut session = GameSession::new(config, view, host.open_store(), TerminalBell)?;

    if let BootOutcome::RecoveredFromCorrupt(err) = session.boot()? {
        eprintln!("blockfall: discarded save {}: {err}", host.save_path.display());
    }

    session.renderer_mut().enter()?;
    let result = run(&mut session);

    // Always try to restore terminal state.
    let _ = session.renderer_mut().exit();
    result
}

fn run(session: &mut Session) -> Result<()> {
    let mut router = InputRouter::new();
    let frame = Duration::from_millis(u64::from(FRAME_MS));
    let mut last_tick = Instant::now();

    loop {
        session.renderer_mut().flush()?;

        // Input with timeout until next frame.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    for input in router.handle_key(key) {
                        session.handle_input(input)?;
                    }
                }
                Event::Resize(_, _) => session.renderer_mut().invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            for input in router.update() {
                session.handle_input(input)?;
            }
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            session.tick(elapsed_ms)?;
        }
    }
}
