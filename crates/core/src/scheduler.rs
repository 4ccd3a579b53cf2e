//! Scheduler - a cooperative registry of periodic clocks
//!
//! The owner calls [`Scheduler::advance`] once per frame with the elapsed time. Each live
//! clock accumulates that time; when the accumulator reaches the interval the clock fires
//! once, the interval is subtracted (overshoot carries into the next period) and a finite
//! fire count is decremented. A clock with no fires left is inert: it neither accumulates
//! nor fires until it is reprogrammed or removed.
//!
//! Actions are plain values. `advance` hands each due action to a callback instead of
//! running code stored in the registry, so nothing can mutate the registry mid-iteration;
//! the callback may only ask for the firing clock itself to be removed.
//!
//! # Example
//!
//! ```
//! use blockfall_core::scheduler::{ClockControl, FireCount, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register(100, FireCount::Infinite, "gravity");
//!
//! let mut fired = Vec::new();
//! for dt in [100, 100, 100, 50] {
//!     scheduler.advance(dt, |_, action| {
//!         fired.push(*action);
//!         ClockControl::Keep
//!     });
//! }
//! assert_eq!(fired.len(), 3);
//! ```

/// Identity of a registered clock; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(u64);

impl ClockId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// How many more times a clock may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireCount {
    Infinite,
    Remaining(u32),
}

impl FireCount {
    pub fn is_exhausted(self) -> bool {
        self == FireCount::Remaining(0)
    }
}

/// Signed counts: negative means forever.
impl From<i32> for FireCount {
    fn from(count: i32) -> Self {
        if count < 0 {
            FireCount::Infinite
        } else {
            FireCount::Remaining(count as u32)
        }
    }
}

/// What the firing callback wants done with the clock that just fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockControl {
    Keep,
    Remove,
}

#[derive(Debug, Clone)]
pub struct Clock<A> {
    id: ClockId,
    elapsed_ms: u32,
    interval_ms: u32,
    remaining: FireCount,
    action: A,
}

impl<A> Clock<A> {
    pub fn id(&self) -> ClockId {
        self.id
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn remaining(&self) -> FireCount {
        self.remaining
    }

    pub fn action(&self) -> &A {
        &self.action
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    clocks: Vec<Clock<A>>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            clocks: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a clock and return its id.
    pub fn register(
        &mut self,
        interval_ms: u32,
        count: impl Into<FireCount>,
        action: A,
    ) -> ClockId {
        self.next_id += 1;
        let id = ClockId(self.next_id);
        self.clocks.push(Clock {
            id,
            elapsed_ms: 0,
            interval_ms,
            remaining: count.into(),
            action,
        });
        id
    }

    /// Remove a clock. Returns false if it was not registered.
    pub fn unregister(&mut self, id: ClockId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.clocks.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Set interval and count and restart the accumulator.
    pub fn reprogram(&mut self, id: ClockId, interval_ms: u32, count: impl Into<FireCount>) -> bool {
        match self.clock_mut(id) {
            Some(clock) => {
                clock.interval_ms = interval_ms;
                clock.remaining = count.into();
                clock.elapsed_ms = 0;
                true
            }
            None => false,
        }
    }

    /// Change the interval. The accumulator restarts when the interval actually changes,
    /// so a shorter interval can't fire immediately on time banked under the longer one.
    pub fn set_interval(&mut self, id: ClockId, interval_ms: u32) -> bool {
        match self.clock_mut(id) {
            Some(clock) => {
                if clock.interval_ms != interval_ms {
                    clock.interval_ms = interval_ms;
                    clock.elapsed_ms = 0;
                }
                true
            }
            None => false,
        }
    }

    /// Change the remaining count, keeping the accumulator.
    pub fn set_count(&mut self, id: ClockId, count: impl Into<FireCount>) -> bool {
        match self.clock_mut(id) {
            Some(clock) => {
                clock.remaining = count.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ClockId) -> Option<&Clock<A>> {
        self.clocks.iter().find(|clock| clock.id == id)
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    pub fn clear(&mut self) {
        self.clocks.clear();
    }

    /// Advance every live clock by `elapsed_ms` and report each due clock to `on_fire`.
    ///
    /// A clock fires at most once per call. Returns the number of fires.
    pub fn advance<F>(&mut self, elapsed_ms: u32, mut on_fire: F) -> usize
    where
        F: FnMut(ClockId, &A) -> ClockControl,
    {
        let mut fired = 0;
        let mut index = 0;
        while index < self.clocks.len() {
            let clock = &mut self.clocks[index];
            if clock.remaining.is_exhausted() {
                index += 1;
                continue;
            }

            clock.elapsed_ms = clock.elapsed_ms.saturating_add(elapsed_ms);
            if clock.elapsed_ms < clock.interval_ms {
                index += 1;
                continue;
            }

            clock.elapsed_ms -= clock.interval_ms;
            if let FireCount::Remaining(n) = clock.remaining {
                clock.remaining = FireCount::Remaining(n - 1);
            }
            fired += 1;

            match on_fire(clock.id, &clock.action) {
                ClockControl::Keep => index += 1,
                // The last clock now sits at `index`; visit it before moving on.
                ClockControl::Remove => {
                    self.clocks.swap_remove(index);
                }
            }
        }
        fired
    }

    fn position(&self, id: ClockId) -> Option<usize> {
        self.clocks.iter().position(|clock| clock.id == id)
    }

    fn clock_mut(&mut self, id: ClockId) -> Option<&mut Clock<A>> {
        self.clocks.iter_mut().find(|clock| clock.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(scheduler: &mut Scheduler<&'static str>, dt: u32) -> Vec<&'static str> {
        let mut fired = Vec::new();
        scheduler.advance(dt, |_, action| {
            fired.push(*action);
            ClockControl::Keep
        });
        fired
    }

    #[test]
    fn test_overshoot_carries_over() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(100, -1, "tick");

        assert_eq!(tick(&mut scheduler, 100).len(), 1);
        assert_eq!(tick(&mut scheduler, 100).len(), 1);
        assert_eq!(tick(&mut scheduler, 100).len(), 1);
        assert_eq!(tick(&mut scheduler, 50).len(), 0);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 50);

        assert_eq!(tick(&mut scheduler, 70).len(), 1);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 20);
    }

    #[test]
    fn test_fires_at_most_once_per_advance() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(100, FireCount::Infinite, "tick");
        assert_eq!(tick(&mut scheduler, 350).len(), 1);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 250);
    }

    #[test]
    fn test_finite_count_runs_down_then_goes_inert() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(10, 2, "twice");
        assert_eq!(tick(&mut scheduler, 10), vec!["twice"]);
        assert_eq!(tick(&mut scheduler, 10), vec!["twice"]);
        assert_eq!(scheduler.get(id).unwrap().remaining(), FireCount::Remaining(0));
        assert!(tick(&mut scheduler, 10).is_empty());
        // Inert clocks do not accumulate time.
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 0);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_zero_count_clock_is_inert_until_reprogrammed() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(150, 0, "repeat");
        assert!(tick(&mut scheduler, 1000).is_empty());

        assert!(scheduler.reprogram(id, 150, FireCount::Infinite));
        assert!(tick(&mut scheduler, 149).is_empty());
        assert_eq!(tick(&mut scheduler, 1), vec!["repeat"]);
    }

    #[test]
    fn test_ids_are_unique_and_survive_removal() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.register(10, -1, "a");
        let b = scheduler.register(10, -1, "b");
        let c = scheduler.register(10, -1, "c");
        assert!(a < b && b < c);

        assert!(scheduler.unregister(a));
        assert!(!scheduler.unregister(a));
        assert_eq!(scheduler.get(c).unwrap().action(), &"c");
        assert_eq!(scheduler.get(b).unwrap().action(), &"b");

        let d = scheduler.register(10, -1, "d");
        assert!(d > c);
    }

    #[test]
    fn test_removal_during_advance_revisits_swapped_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.register(10, -1, "first");
        scheduler.register(10, -1, "second");
        scheduler.register(10, -1, "last");

        let mut fired = Vec::new();
        scheduler.advance(10, |_, action| {
            fired.push(*action);
            if *action == "first" {
                ClockControl::Remove
            } else {
                ClockControl::Keep
            }
        });

        fired.sort_unstable();
        assert_eq!(fired, vec!["first", "last", "second"]);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_interval_change_resets_accumulator() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(690, -1, "gravity");
        assert!(tick(&mut scheduler, 600).is_empty());

        scheduler.set_interval(id, 40);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 0);
        assert!(tick(&mut scheduler, 30).is_empty());
        assert_eq!(tick(&mut scheduler, 10).len(), 1);

        // Same interval keeps banked time.
        tick(&mut scheduler, 25);
        scheduler.set_interval(id, 40);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 25);
    }

    #[test]
    fn test_set_count_keeps_elapsed() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.register(100, -1, "x");
        tick(&mut scheduler, 60);
        scheduler.set_count(id, 0);
        assert_eq!(scheduler.get(id).unwrap().elapsed_ms(), 60);
        assert!(tick(&mut scheduler, 100).is_empty());
    }
}
