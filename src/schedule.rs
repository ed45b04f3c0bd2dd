//! Tick-based deferred task scheduling.
//!
//! Replaces engine-style "invoke after N seconds" callbacks with an explicit
//! queue of `(fire_at_tick, task)` pairs drained once per physics tick. The
//! queue is single-threaded and cooperative: tasks only ever fire from the
//! same logical thread that advances the tick counter.

/// A queue of tasks scheduled to fire at (or after) a given physics tick.
///
/// Tasks are plain values; whoever drains the queue decides what each task
/// means. Draining returns every task whose fire tick has been reached,
/// preserving insertion order among tasks due at the same time.
///
/// # Example
///
/// ```rust
/// use contact_character_controller::schedule::TickScheduler;
///
/// let mut timers: TickScheduler<&str> = TickScheduler::new();
/// timers.schedule(5, "later");
/// timers.schedule(2, "soon");
///
/// assert!(timers.drain_due(1).is_empty());
/// assert_eq!(timers.drain_due(2), vec!["soon"]);
/// assert_eq!(timers.drain_due(10), vec!["later"]);
/// ```
#[derive(Debug, Clone)]
pub struct TickScheduler<T> {
    entries: Vec<(u64, T)>,
}

impl<T> Default for TickScheduler<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> TickScheduler<T> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire once `now_tick >= fire_at_tick`.
    pub fn schedule(&mut self, fire_at_tick: u64, task: T) {
        self.entries.push((fire_at_tick, task));
    }

    /// Remove and return every task whose fire tick is `<= now_tick`.
    ///
    /// Tasks that are not yet due stay queued.
    pub fn drain_due(&mut self, now_tick: u64) -> Vec<T> {
        let (due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|(fire_at, _)| *fire_at <= now_tick);
        self.entries = pending;
        due.into_iter().map(|(_, task)| task).collect()
    }

    /// Number of tasks still queued.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tasks are queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convert a duration in seconds to a whole number of physics ticks.
///
/// Rounds up so a timer never fires early, and always spans at least one
/// tick so "fire later" can never mean "fire now".
pub fn ticks_for(seconds: f32, tick_duration: f32) -> u64 {
    if tick_duration <= 0.0 {
        return 1;
    }
    ((seconds / tick_duration).ceil() as u64).max(1)
}
