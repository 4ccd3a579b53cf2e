//! Scoring module - line-clear points, level and gravity step functions
//!
//! Level is derived from cumulative score and gravity from level; both are pure step
//! functions with inclusive upper bounds, so progress can always be recomputed from the
//! score alone (which is what a restore does).

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::types::{GRAVITY_FLOOR_MS, GRAVITY_STEPS, LEVEL_STEPS, LEVEL_TAIL, LINE_CLEAR_SCORES};

/// Points for clearing `rows` rows at `level` (the level before the clear).
///
/// A lock touches at most four rows; any other count falls back to the single-row value.
pub fn score_for_clear(rows: u32, level: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    let base = match rows {
        1..=4 => LINE_CLEAR_SCORES[rows as usize],
        _ => LINE_CLEAR_SCORES[1],
    };
    base.saturating_add(level.saturating_mul(rows))
}

/// Level reached at a cumulative score
pub fn level_for_score(score: u32) -> u32 {
    for (max_score, level_base, score_base, per_level) in LEVEL_STEPS {
        if score <= max_score {
            return level_base + (score - score_base) / per_level;
        }
    }
    let (level_base, score_base, per_level) = LEVEL_TAIL;
    level_base + (score - score_base) / per_level
}

/// Gravity interval for a level, in milliseconds
pub fn gravity_interval_ms(level: u32) -> u32 {
    GRAVITY_STEPS
        .iter()
        .find(|(max_level, _)| level <= *max_level)
        .map(|(_, interval)| *interval)
        .unwrap_or(GRAVITY_FLOOR_MS)
}

/// Best score so far with the local date and time it was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u32,
    /// `yyyy/MM/dd`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

impl HighScore {
    /// Stamp `score` with the current local time.
    pub fn now(score: u32) -> Self {
        let now = Local::now();
        Self {
            score,
            date: now.format("%Y/%m/%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
        }
    }
}

impl Default for HighScore {
    fn default() -> Self {
        Self::now(0)
    }
}

/// Score, level and the gravity interval they imply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProgress {
    score: u32,
    level: u32,
    gravity_interval_ms: u32,
    best: HighScore,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self::with_best(HighScore::default())
    }

    /// Fresh progress that remembers an earlier best
    pub fn with_best(best: HighScore) -> Self {
        Self {
            score: 0,
            level: 0,
            gravity_interval_ms: gravity_interval_ms(0),
            best,
        }
    }

    /// Progress restored from a save; level and gravity are recomputed from the score.
    pub fn restore(score: u32, best: HighScore) -> Self {
        let mut progress = Self::with_best(best);
        progress.set_score(score);
        progress
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn gravity_interval_ms(&self) -> u32 {
        self.gravity_interval_ms
    }

    pub fn best(&self) -> &HighScore {
        &self.best
    }

    /// Award a clear of `rows` rows. Returns the points added.
    pub fn award_clear(&mut self, rows: u32) -> u32 {
        let points = score_for_clear(rows, self.level);
        self.set_score(self.score.saturating_add(points));
        points
    }

    /// Zero score and level; the best score survives.
    pub fn reset(&mut self) {
        self.set_score(0);
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = level_for_score(score);
        self.gravity_interval_ms = gravity_interval_ms(self.level);
        if score > self.best.score {
            self.best = HighScore::now(score);
        }
    }
}
