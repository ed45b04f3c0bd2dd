//! Roll state and timing policy.
//!
//! A roll is a timed locomotion state: once started it locks facing and
//! overrides horizontal input while grounded, ends on whichever of the
//! animation-complete signal or the fallback timer arrives first, and gates
//! re-entry behind a cooldown strictly longer than the roll itself.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::schedule::{ticks_for, TickScheduler};
use crate::state::Facing;

/// Deferred roll transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RollTask {
    /// Fallback end-of-roll. Carries the generation of the roll it belongs
    /// to so a stale timer never ends a newer roll.
    End { generation: u32 },
    /// Re-enable rolling after the cooldown.
    ResetCooldown,
}

/// Time-gated roll state for one character.
///
/// `end_roll` may be invoked early by an external animation-complete signal
/// or late by the scheduled fallback; whichever arrives first wins and the
/// other is a no-op.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct RollState {
    rolling: bool,
    can_roll: bool,
    generation: u32,
    #[reflect(ignore)]
    timers: TickScheduler<RollTask>,
}

impl Default for RollState {
    fn default() -> Self {
        Self {
            rolling: false,
            can_roll: true,
            generation: 0,
            timers: TickScheduler::new(),
        }
    }
}

impl RollState {
    /// Whether a roll is currently in progress.
    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// Whether the cooldown allows a new roll.
    #[inline]
    pub fn can_roll(&self) -> bool {
        self.can_roll
    }

    /// Attempt to start a roll at `now_tick`.
    ///
    /// Requires: grounded, not already rolling, cooldown elapsed, and
    /// horizontal speed beyond the facing-signed threshold. On success the
    /// fallback end timer and the cooldown reset are scheduled and `true`
    /// is returned.
    pub fn try_start(
        &mut self,
        grounded: bool,
        horizontal_speed: f32,
        facing: Facing,
        config: &ControllerConfig,
        now_tick: u64,
        tick_duration: f32,
    ) -> bool {
        if !grounded || self.rolling || !self.can_roll {
            return false;
        }

        let fast_enough = match facing {
            Facing::Right => horizontal_speed > config.roll_threshold,
            Facing::Left => horizontal_speed < -config.roll_threshold,
        };
        if !fast_enough {
            return false;
        }

        self.rolling = true;
        self.generation = self.generation.wrapping_add(1);
        self.timers.schedule(
            now_tick + ticks_for(config.roll_duration, tick_duration),
            RollTask::End {
                generation: self.generation,
            },
        );

        self.can_roll = false;
        self.timers.schedule(
            now_tick + ticks_for(config.roll_cooldown, tick_duration),
            RollTask::ResetCooldown,
        );

        true
    }

    /// End the current roll. Idempotent.
    ///
    /// Call this from the animation-complete signal; the scheduled fallback
    /// covers rolls interrupted before the animation finishes, such as
    /// rolling off a ledge.
    pub fn end_roll(&mut self) {
        self.rolling = false;
    }

    /// Fire every timer due at `now_tick`. Called once per physics tick.
    pub fn advance(&mut self, now_tick: u64) {
        for task in self.timers.drain_due(now_tick) {
            match task {
                RollTask::End { generation } if generation == self.generation => self.end_roll(),
                RollTask::End { .. } => {}
                RollTask::ResetCooldown => self.can_roll = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 50.0;

    fn start(roll: &mut RollState, now_tick: u64) -> bool {
        roll.try_start(
            true,
            10.0,
            Facing::Right,
            &ControllerConfig::default(),
            now_tick,
            DT,
        )
    }

    // ==================== Guard Tests ====================

    #[test]
    fn roll_requires_grounded() {
        let mut roll = RollState::default();
        let config = ControllerConfig::default();
        assert!(!roll.try_start(false, 10.0, Facing::Right, &config, 1, DT));
        assert!(!roll.is_rolling());
    }

    #[test]
    fn roll_requires_not_already_rolling() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 1));
        assert!(!start(&mut roll, 2));
    }

    #[test]
    fn roll_requires_cooldown_elapsed() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 1));
        roll.end_roll();
        // Still inside the 1s cooldown window.
        assert!(!roll.can_roll());
        assert!(!start(&mut roll, 10));
    }

    #[test]
    fn roll_requires_facing_signed_speed() {
        let config = ControllerConfig::default();

        // Too slow in the facing direction.
        let mut roll = RollState::default();
        assert!(!roll.try_start(true, 2.0, Facing::Right, &config, 1, DT));

        // Fast, but opposite to facing.
        let mut roll = RollState::default();
        assert!(!roll.try_start(true, -10.0, Facing::Right, &config, 1, DT));
        assert!(!roll.try_start(true, 10.0, Facing::Left, &config, 1, DT));

        // Fast leftward while facing left.
        let mut roll = RollState::default();
        assert!(roll.try_start(true, -10.0, Facing::Left, &config, 1, DT));
    }

    #[test]
    fn roll_threshold_is_exclusive() {
        let config = ControllerConfig::default();
        let mut roll = RollState::default();
        assert!(!roll.try_start(true, config.roll_threshold, Facing::Right, &config, 1, DT));
        assert!(roll.try_start(true, config.roll_threshold + 0.01, Facing::Right, &config, 1, DT));
    }

    // ==================== Timer Tests ====================

    #[test]
    fn fallback_timer_ends_roll() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 0));

        // 0.6s at 50Hz = 30 ticks
        roll.advance(29);
        assert!(roll.is_rolling());

        roll.advance(30);
        assert!(!roll.is_rolling());
    }

    #[test]
    fn cooldown_resets_after_window() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 0));

        // 1.0s at 50Hz = 50 ticks
        roll.advance(49);
        assert!(!roll.can_roll());

        roll.advance(50);
        assert!(roll.can_roll());
        assert!(start(&mut roll, 50));
    }

    #[test]
    fn end_roll_twice_is_harmless() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 0));

        // Animation-complete signal, then the fallback timer.
        roll.end_roll();
        assert!(!roll.is_rolling());
        roll.advance(30);
        assert!(!roll.is_rolling());

        roll.end_roll();
        assert!(!roll.is_rolling());
    }

    #[test]
    fn stale_end_timer_skips_newer_roll() {
        let mut roll = RollState::default();
        assert!(start(&mut roll, 0));

        // An external signal ends the first roll, and a second roll starts
        // while the first roll's fallback timer (tick 30) is still queued.
        roll.end_roll();
        roll.can_roll = true;
        assert!(start(&mut roll, 10));

        // The stale timer fires mid-roll and must not end the newer roll.
        roll.advance(30);
        assert!(roll.is_rolling());

        // The second roll's own timer (tick 40) still works.
        roll.advance(40);
        assert!(!roll.is_rolling());
    }
}
