//! Spawn queue - the active shape and two look-ahead tips
//!
//! The queue is a three-deep pipeline: `next_shape` promotes tip one to active, tip two to
//! tip one, and generates a new tip two. Generation draws a colour uniformly from the
//! palette and a kind from the configured distribution, then applies the repeat guard.
//!
//! The generator is a seedable [`StdRng`] so a fixed seed replays the same sequence.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{GameConfig, RepeatGuard, ShapeDistribution};
use crate::error::GameError;
use crate::piece::Piece;
use crate::types::{ColorId, Position, ShapeKind};

/// Draws allowed per generated shape before the guard gives up and keeps the last one.
/// Only reachable when the distribution leaves the guard no alternative kind.
const MAX_REROLLS: usize = 32;

/// A piece together with its colour and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeInfo {
    piece: Piece,
}

impl ShapeInfo {
    pub fn new(kind: ShapeKind, birth: Position, color: ColorId) -> Self {
        Self {
            piece: Piece::new(kind, birth, color),
        }
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn piece_mut(&mut self) -> &mut Piece {
        &mut self.piece
    }

    pub fn color(&self) -> ColorId {
        self.piece.color()
    }

    pub fn kind(&self) -> ShapeKind {
        self.piece.kind()
    }
}

#[derive(Debug, Clone)]
enum KindSampler {
    Uniform,
    Weighted(WeightedIndex<u32>),
}

#[derive(Debug, Clone)]
pub struct SpawnQueue {
    rng: StdRng,
    sampler: KindSampler,
    guard: RepeatGuard,
    palette_size: u8,
    birth: Position,
    active: ShapeInfo,
    tip_one: ShapeInfo,
    tip_two: ShapeInfo,
}

impl SpawnQueue {
    /// Build a queue from `config` and fill all three slots.
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sampler = match config.distribution {
            ShapeDistribution::Uniform => KindSampler::Uniform,
            ShapeDistribution::Weighted(weights) => KindSampler::Weighted(
                WeightedIndex::new(weights)
                    .map_err(|e| GameError::InvalidConfig(format!("shape weights: {e}")))?,
            ),
        };
        if config.palette_size == 0 {
            return Err(GameError::InvalidConfig("palette is empty".into()));
        }

        let birth = config.birth_position();
        let placeholder = ShapeInfo::new(ShapeKind::I, birth, ColorId(0));
        let mut queue = Self {
            rng,
            sampler,
            guard: config.repeat_guard,
            palette_size: config.palette_size,
            birth,
            active: placeholder,
            tip_one: placeholder,
            tip_two: placeholder,
        };
        queue.refill();
        Ok(queue)
    }

    /// Replace all three slots with fresh shapes.
    pub fn refill(&mut self) {
        let active = self.generate(&[]);
        let tip_one = self.generate(&[active.kind()]);
        let tip_two = self.generate(&[active.kind(), tip_one.kind()]);
        self.active = active;
        self.tip_one = tip_one;
        self.tip_two = tip_two;
    }

    /// Put explicit shapes in the slots, each re-created at the birth position.
    pub fn restore(
        &mut self,
        active: (ShapeKind, ColorId),
        tip_one: (ShapeKind, ColorId),
        tip_two: (ShapeKind, ColorId),
    ) {
        self.active = ShapeInfo::new(active.0, self.birth, active.1);
        self.tip_one = ShapeInfo::new(tip_one.0, self.birth, tip_one.1);
        self.tip_two = ShapeInfo::new(tip_two.0, self.birth, tip_two.1);
    }

    /// Shift the pipeline by one and return the new active shape.
    pub fn next_shape(&mut self) -> &ShapeInfo {
        let previous = [self.tip_one.kind(), self.tip_two.kind()];
        let tip_two = self.generate(&previous);
        self.active = self.tip_one;
        self.tip_one = self.tip_two;
        self.tip_two = tip_two;
        &self.active
    }

    pub fn active(&self) -> &ShapeInfo {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ShapeInfo {
        &mut self.active
    }

    pub fn tip_one(&self) -> &ShapeInfo {
        &self.tip_one
    }

    pub fn tip_two(&self) -> &ShapeInfo {
        &self.tip_two
    }

    pub fn birth(&self) -> Position {
        self.birth
    }

    /// Generate a shape that will follow `previous` (oldest first).
    fn generate(&mut self, previous: &[ShapeKind]) -> ShapeInfo {
        let color = ColorId(self.rng.gen_range(0..self.palette_size));
        let mut kind = self.sample_kind();
        for _ in 0..MAX_REROLLS {
            if !self.rejects(kind, previous) {
                break;
            }
            kind = self.sample_kind();
        }
        ShapeInfo::new(kind, self.birth, color)
    }

    fn sample_kind(&mut self) -> ShapeKind {
        let index = match &self.sampler {
            KindSampler::Uniform => self.rng.gen_range(0..ShapeKind::ALL.len()),
            KindSampler::Weighted(weights) => weights.sample(&mut self.rng),
        };
        ShapeKind::ALL[index]
    }

    fn rejects(&self, kind: ShapeKind, previous: &[ShapeKind]) -> bool {
        match self.guard {
            RepeatGuard::Off => false,
            RepeatGuard::NoTriple => previous.len() == 2 && previous.iter().all(|&k| k == kind),
            RepeatGuard::NoDouble => previous.iter().any(|&k| k == kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(queue: &SpawnQueue) -> [ShapeKind; 3] {
        [
            queue.active().kind(),
            queue.tip_one().kind(),
            queue.tip_two().kind(),
        ]
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let config = GameConfig::default().with_seed(7);
        let mut a = SpawnQueue::new(&config).unwrap();
        let mut b = SpawnQueue::new(&config).unwrap();
        for _ in 0..50 {
            assert_eq!(a.next_shape(), b.next_shape());
        }
    }

    #[test]
    fn test_next_shape_shifts_pipeline() {
        let mut queue = SpawnQueue::new(&GameConfig::default().with_seed(1)).unwrap();
        let tip_one = *queue.tip_one();
        let tip_two = *queue.tip_two();
        let active = *queue.next_shape();
        assert_eq!(active, tip_one);
        assert_eq!(*queue.tip_one(), tip_two);
    }

    #[test]
    fn test_shapes_spawn_at_birth_with_palette_colours() {
        let config = GameConfig::default().with_seed(3);
        let mut queue = SpawnQueue::new(&config).unwrap();
        for _ in 0..100 {
            let shape = queue.next_shape();
            assert_eq!(shape.piece().anchor(), config.birth_position());
            assert!(shape.color().0 < config.palette_size);
        }
    }

    #[test]
    fn test_weighted_distribution_honours_zero_weights() {
        let config = GameConfig::default()
            .with_seed(11)
            .with_repeat_guard(RepeatGuard::Off)
            .with_distribution(ShapeDistribution::Weighted([0, 0, 0, 5, 0, 5, 0]));
        let mut queue = SpawnQueue::new(&config).unwrap();
        for _ in 0..100 {
            let kind = queue.next_shape().kind();
            assert!(matches!(kind, ShapeKind::O | ShapeKind::T), "{kind:?}");
        }
    }

    #[test]
    fn test_no_double_guard_never_repeats() {
        let config = GameConfig::default()
            .with_seed(5)
            .with_distribution(ShapeDistribution::Uniform)
            .with_repeat_guard(RepeatGuard::NoDouble);
        let mut queue = SpawnQueue::new(&config).unwrap();
        let mut last = queue.tip_two().kind();
        for _ in 0..200 {
            queue.next_shape();
            let newest = queue.tip_two().kind();
            assert_ne!(newest, last);
            last = newest;
        }
    }

    #[test]
    fn test_no_triple_guard_never_three_in_a_row() {
        let config = GameConfig::default()
            .with_seed(9)
            .with_distribution(ShapeDistribution::Weighted([1, 0, 0, 1, 0, 0, 0]));
        let mut queue = SpawnQueue::new(&config).unwrap();
        for _ in 0..200 {
            let [a, b, c] = kinds(&queue);
            assert!(!(a == b && b == c), "{a:?} {b:?} {c:?}");
            queue.next_shape();
        }
    }

    #[test]
    fn test_guard_gives_up_when_only_one_kind_is_possible() {
        let config = GameConfig::default()
            .with_seed(2)
            .with_distribution(ShapeDistribution::Weighted([0, 0, 0, 1, 0, 0, 0]));
        let mut queue = SpawnQueue::new(&config).unwrap();
        assert_eq!(kinds(&queue), [ShapeKind::O; 3]);
        assert_eq!(queue.next_shape().kind(), ShapeKind::O);
    }

    #[test]
    fn test_restore_uses_birth_position() {
        let mut queue = SpawnQueue::new(&GameConfig::default().with_seed(4)).unwrap();
        queue.restore(
            (ShapeKind::Z, ColorId(1)),
            (ShapeKind::I, ColorId(2)),
            (ShapeKind::T, ColorId(3)),
        );
        assert_eq!(kinds(&queue), [ShapeKind::Z, ShapeKind::I, ShapeKind::T]);
        assert_eq!(queue.tip_one().color(), ColorId(2));
        assert_eq!(queue.active().piece().anchor(), queue.birth());
    }
}
