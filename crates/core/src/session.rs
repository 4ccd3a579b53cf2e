//! Game session - the state machine tying grid, pieces, scheduler and progress together
//!
//! # Lifecycle
//!
//! ```text
//! Start --start_game--> Playing <--toggle_pause--> Paused
//!                          |
//!                    lock above the death line
//!                    or blocked spawn
//!                          v
//!                       GameOver --start_game / restart--> Playing
//! ```
//!
//! # Lock sequence
//!
//! A Down move that is not legal (from gravity or `MoveDown`) locks the piece:
//!
//! 1. its cells are written into the grid
//! 2. full rows among the touched rows are found; if any, the feedback hook fires,
//!    the rows are cleared from the top down, points are awarded at the level in force
//!    before the clear and the gravity clock is reprogrammed for the new level
//! 3. the whole board is repainted
//! 4. a piece with any cell above the death line ends the game; otherwise the next shape
//!    spawns, and a spawn that overlaps settled cells also ends the game
//! 5. a [`LockEvent`] is recorded and the game is saved
//!
//! # Timing
//!
//! Three clocks drive the piece: gravity (level interval, or the soft-drop interval while
//! down is held) and left/right auto-repeat (idle until their key is pressed). The scheduler
//! only advances while Playing, so pausing keeps every clock's banked time intact.

use arrayvec::ArrayVec;

use crate::collab::{Feedback, Persistence, Renderer};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::Grid;
use crate::line_clear::{clear_rows, detect_full_rows};
use crate::movement::{can_move, can_place, can_rotate, drop_target};
use crate::overlay::Overlay;
use crate::piece::Piece;
use crate::save::SaveState;
use crate::scheduler::{ClockControl, ClockId, FireCount, Scheduler};
use crate::scoring::PlayerProgress;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::spawn::{ShapeInfo, SpawnQueue};
use crate::types::{Direction, GamePhase, InputEvent, LockEvent, TipSlot};

/// What a clock asks the session to do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Gravity,
    RepeatLeft,
    RepeatRight,
}

/// Clocks registered by `arm_clocks`, one per [`SessionAction`]
const SESSION_CLOCKS: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Clocks {
    gravity: ClockId,
    left: ClockId,
    right: ClockId,
}

/// How `boot` found the save slot
#[derive(Debug)]
pub enum BootOutcome {
    /// Nothing saved; a new game is ready.
    Fresh,
    /// Board, progress and shapes were restored.
    Resumed,
    /// The save ended in game over; a new game is ready and the best score was kept.
    RestartedAfterGameOver,
    /// The save was rejected and a new game is ready instead.
    RecoveredFromCorrupt(GameError),
}

pub struct GameSession<R, P, F> {
    config: GameConfig,
    grid: Grid,
    queue: SpawnQueue,
    progress: PlayerProgress,
    scheduler: Scheduler<SessionAction>,
    clocks: Option<Clocks>,
    phase: GamePhase,
    soft_drop: bool,
    overlay: Overlay,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    renderer: R,
    store: P,
    feedback: F,
}

impl<R, P, F> GameSession<R, P, F>
where
    R: Renderer,
    P: Persistence,
    F: Feedback,
{
    /// Create a session in the Start phase with an empty board and three fresh shapes.
    pub fn new(config: GameConfig, renderer: R, store: P, feedback: F) -> Result<Self, GameError> {
        config.validate()?;
        let grid = Grid::with_death_line(
            usize::from(config.rows),
            usize::from(config.columns),
            usize::from(config.death_line_row),
        );
        let queue = SpawnQueue::new(&config)?;
        Ok(Self {
            config,
            grid,
            queue,
            progress: PlayerProgress::new(),
            scheduler: Scheduler::new(),
            clocks: None,
            phase: GamePhase::Start,
            soft_drop: false,
            overlay: Overlay::default(),
            last_event: None,
            renderer,
            store,
            feedback,
        })
    }

    /// Load the save slot and prepare the matching game. The session stays in Start.
    ///
    /// Storage failures other than a corrupt save are returned as errors.
    pub fn boot(&mut self) -> Result<BootOutcome, GameError> {
        let outcome = match self.store.load() {
            Ok(None) => BootOutcome::Fresh,
            Ok(Some(state)) => match state.decode(&self.config) {
                Ok(restored) if restored.game_over => {
                    self.progress = PlayerProgress::with_best(restored.best);
                    self.grid.clear();
                    self.queue.refill();
                    BootOutcome::RestartedAfterGameOver
                }
                Ok(restored) => {
                    self.grid = restored.grid;
                    self.progress = PlayerProgress::restore(restored.score, restored.best);
                    let [active, tip_one, tip_two] = restored.shapes;
                    self.queue.restore(active, tip_one, tip_two);
                    BootOutcome::Resumed
                }
                Err(err) => {
                    self.reset_board();
                    BootOutcome::RecoveredFromCorrupt(err)
                }
            },
            Err(err @ GameError::CorruptSave(_)) => {
                self.reset_board();
                BootOutcome::RecoveredFromCorrupt(err)
            }
            Err(err) => return Err(err),
        };

        self.phase = GamePhase::Start;
        self.repaint_all();
        self.show_hud();
        Ok(outcome)
    }

    /// Leave the start screen, or restart after game over.
    pub fn start_game(&mut self) -> Result<bool, GameError> {
        match self.phase {
            GamePhase::Start => {
                self.set_phase(GamePhase::Playing);
                self.soft_drop = false;
                self.arm_clocks();
                self.repaint_all();
                self.show_hud();
                if !can_place(&self.grid, &self.queue.active().piece().cells()) {
                    self.enter_game_over();
                    self.save()?;
                }
                Ok(true)
            }
            GamePhase::GameOver => {
                self.restart()?;
                Ok(true)
            }
            GamePhase::Playing | GamePhase::Paused => Ok(false),
        }
    }

    /// Clear the board, zero the score, draw three new shapes and play.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.reset_board();
        self.soft_drop = false;
        self.set_phase(GamePhase::Playing);
        self.arm_clocks();
        self.repaint_all();
        self.show_hud();
        self.save()
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Apply one input event. Returns whether it changed anything.
    ///
    /// Movement events are ignored unless the phase is Playing. Key releases are applied
    /// in any phase so a key let go during a pause does not keep repeating afterwards.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<bool, GameError> {
        match event {
            InputEvent::Start => return self.start_game(),
            InputEvent::TogglePause => return Ok(self.toggle_pause()),
            InputEvent::Restart => {
                self.restart()?;
                return Ok(true);
            }
            _ => {}
        }

        if event.is_movement() && self.phase != GamePhase::Playing {
            return Ok(false);
        }
        let Some(clocks) = self.clocks else {
            return Ok(false);
        };

        match event {
            InputEvent::Rotate => Ok(self.try_rotate()),
            InputEvent::MoveLeft => {
                let moved = self.try_shift(Direction::Left);
                self.scheduler.reprogram(
                    clocks.left,
                    self.config.move_repeat_interval_ms,
                    FireCount::Infinite,
                );
                Ok(moved)
            }
            InputEvent::CancelMoveLeft => Ok(self.scheduler.set_count(clocks.left, 0)),
            InputEvent::MoveRight => {
                let moved = self.try_shift(Direction::Right);
                self.scheduler.reprogram(
                    clocks.right,
                    self.config.move_repeat_interval_ms,
                    FireCount::Infinite,
                );
                Ok(moved)
            }
            InputEvent::CancelMoveRight => Ok(self.scheduler.set_count(clocks.right, 0)),
            InputEvent::MoveDown => {
                let moved = self.step_down()?;
                if self.phase == GamePhase::Playing {
                    self.soft_drop = true;
                    self.scheduler.reprogram(
                        clocks.gravity,
                        self.config.soft_drop_interval_ms,
                        FireCount::Infinite,
                    );
                }
                Ok(moved)
            }
            InputEvent::CancelMoveDown => {
                self.soft_drop = false;
                Ok(self
                    .scheduler
                    .set_interval(clocks.gravity, self.progress.gravity_interval_ms()))
            }
            InputEvent::Start | InputEvent::TogglePause | InputEvent::Restart => Ok(false),
        }
    }

    /// Advance the clocks by `elapsed_ms` and run whatever fired.
    ///
    /// Does nothing outside the Playing phase.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<(), GameError> {
        if self.phase != GamePhase::Playing {
            return Ok(());
        }

        // Each clock fires at most once per advance.
        let mut fired: ArrayVec<SessionAction, SESSION_CLOCKS> = ArrayVec::new();
        self.scheduler.advance(elapsed_ms, |_, action| {
            fired.push(*action);
            ClockControl::Keep
        });

        for action in fired {
            // A lock earlier in this tick may have ended the game.
            if self.phase != GamePhase::Playing {
                break;
            }
            match action {
                SessionAction::Gravity => {
                    self.step_down()?;
                }
                SessionAction::RepeatLeft => {
                    self.try_shift(Direction::Left);
                }
                SessionAction::RepeatRight => {
                    self.try_shift(Direction::Right);
                }
            }
        }
        Ok(())
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    /// The falling piece, while one is in play
    pub fn active(&self) -> Option<&ShapeInfo> {
        match self.phase {
            GamePhase::Playing | GamePhase::Paused => Some(self.queue.active()),
            GamePhase::Start | GamePhase::GameOver => None,
        }
    }

    /// Where the falling piece would land
    pub fn ghost(&self) -> Option<Piece> {
        self.active()
            .map(|shape| drop_target(&self.grid, shape.piece()))
    }

    pub fn tip_one(&self) -> &ShapeInfo {
        self.queue.tip_one()
    }

    pub fn tip_two(&self) -> &ShapeInfo {
        self.queue.tip_two()
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// Interval of the gravity clock right now (soft drop included)
    pub fn gravity_interval_ms(&self) -> u32 {
        self.clocks
            .and_then(|clocks| self.scheduler.get(clocks.gravity))
            .map(|clock| clock.interval_ms())
            .unwrap_or_else(|| self.progress.gravity_interval_ms())
    }

    pub fn scheduler(&self) -> &Scheduler<SessionAction> {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Persistent state as it would be written now
    pub fn save_state(&self) -> SaveState {
        SaveState::capture(
            &self.grid,
            &self.progress,
            &self.queue,
            self.phase == GamePhase::GameOver,
        )
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let active = self.active().map(|shape| ActiveSnapshot::from(shape.piece()));
        GameSnapshot {
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            board: GameSnapshot::board_from(&self.grid),
            active,
            ghost: self.ghost().map(|ghost| ghost.cells()),
            tips: [self.queue.tip_one().kind(), self.queue.tip_two().kind()],
            phase: self.phase,
            score: self.progress.score(),
            level: self.progress.level(),
            best_score: self.progress.best().score,
            gravity_interval_ms: self.gravity_interval_ms(),
        }
    }

    fn try_shift(&mut self, direction: Direction) -> bool {
        if !can_move(&self.grid, self.queue.active().piece(), direction) {
            return false;
        }
        let (d_row, d_col) = direction.delta();
        self.queue.active_mut().piece_mut().translate(d_row, d_col);
        self.paint_overlay();
        true
    }

    fn try_rotate(&mut self) -> bool {
        if !can_rotate(&self.grid, self.queue.active().piece()) {
            return false;
        }
        self.queue.active_mut().piece_mut().rotate(true);
        self.paint_overlay();
        true
    }

    /// Move down one row, or lock if that is not legal. Returns whether it moved.
    fn step_down(&mut self) -> Result<bool, GameError> {
        if self.try_shift(Direction::Down) {
            return Ok(true);
        }
        self.lock()?;
        Ok(false)
    }

    fn lock(&mut self) -> Result<(), GameError> {
        let piece = *self.queue.active().piece();
        let cells = piece.cells();
        self.grid.settle(&cells, piece.color());

        let rows = detect_full_rows(&self.grid, &cells);
        let mut points = 0;
        if !rows.is_empty() {
            self.feedback.on_line_clear_success();
            let cleared = clear_rows(&mut self.grid, &rows);
            points = self.progress.award_clear(cleared);
            self.regravity();
            self.renderer.show_progress(&self.progress);
        }

        self.overlay.reset();
        self.repaint_grid();

        let above_death_line = piece.top_row() > self.grid.death_line_row() as i32;
        if above_death_line {
            self.enter_game_over();
        } else {
            self.queue.next_shape();
            if can_place(&self.grid, &self.queue.active().piece().cells()) {
                self.paint_overlay();
            } else {
                self.enter_game_over();
            }
            self.show_tips();
        }

        self.last_event = Some(LockEvent {
            kind: piece.kind(),
            rows_cleared: rows.len() as u32,
            points,
            score: self.progress.score(),
            level: self.progress.level(),
            game_over: self.phase == GamePhase::GameOver,
        });
        self.save()
    }

    /// Point the gravity clock at the current level speed, unless soft drop is held.
    fn regravity(&mut self) {
        if self.soft_drop {
            return;
        }
        if let Some(clocks) = self.clocks {
            self.scheduler
                .set_interval(clocks.gravity, self.progress.gravity_interval_ms());
        }
    }

    fn enter_game_over(&mut self) {
        self.soft_drop = false;
        self.set_phase(GamePhase::GameOver);
        self.overlay
            .paint(&self.grid, None, None, &mut self.renderer);
    }

    fn reset_board(&mut self) {
        self.grid.clear();
        self.progress.reset();
        self.queue.refill();
    }

    fn arm_clocks(&mut self) {
        self.scheduler.clear();
        let gravity = self.scheduler.register(
            self.progress.gravity_interval_ms(),
            FireCount::Infinite,
            SessionAction::Gravity,
        );
        let left = self.scheduler.register(
            self.config.move_repeat_interval_ms,
            0,
            SessionAction::RepeatLeft,
        );
        let right = self.scheduler.register(
            self.config.move_repeat_interval_ms,
            0,
            SessionAction::RepeatRight,
        );
        self.clocks = Some(Clocks {
            gravity,
            left,
            right,
        });
        debug_assert_eq!(self.scheduler.len(), SESSION_CLOCKS);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.renderer.show_phase(phase);
    }

    fn save(&mut self) -> Result<(), GameError> {
        let state = self.save_state();
        self.store.save(&state)
    }

    fn paint_overlay(&mut self) {
        match self.phase {
            GamePhase::Playing | GamePhase::Paused => {
                let piece = self.queue.active().piece();
                let ghost = drop_target(&self.grid, piece);
                self.overlay
                    .paint(&self.grid, Some(piece), Some(&ghost), &mut self.renderer);
            }
            GamePhase::Start | GamePhase::GameOver => {
                self.overlay.paint(&self.grid, None, None, &mut self.renderer);
            }
        }
    }

    fn repaint_grid(&mut self) {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.columns() {
                let cell = self.grid.color_at(row, col);
                self.renderer.set_cell_color(row, col, cell.into());
            }
        }
    }

    fn repaint_all(&mut self) {
        self.overlay.reset();
        self.repaint_grid();
        self.paint_overlay();
    }

    fn show_tips(&mut self) {
        self.renderer.show_tip(TipSlot::One, self.queue.tip_one());
        self.renderer.show_tip(TipSlot::Two, self.queue.tip_two());
    }

    fn show_hud(&mut self) {
        self.show_tips();
        self.renderer.show_progress(&self.progress);
    }
}
