//! Movement intent buffering.
//!
//! Input runs at whatever rate the render loop gives it; physics runs on the
//! fixed tick. `MovementIntent` is the buffer between the two cadences: the
//! axis value is overwritten freely, while jump and roll requests latch until
//! the tick that consumes them, then get cleared in `FixedPostUpdate`. Input
//! sampling never touches physics state directly.

use bevy::prelude::*;

/// Buffered movement intents for one character.
///
/// # Example
///
/// ```rust
/// use contact_character_controller::intent::MovementIntent;
///
/// let mut intent = MovementIntent::default();
/// intent.set_horizontal(0.7);
/// intent.request_jump();
///
/// assert_eq!(intent.horizontal(), 0.7);
/// assert!(intent.jump_requested());
///
/// // The tick consumed the one-shots; the axis persists.
/// intent.clear_one_shots();
/// assert!(!intent.jump_requested());
/// assert_eq!(intent.horizontal(), 0.7);
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct MovementIntent {
    horizontal: f32,
    jump_requested: bool,
    roll_requested: bool,
}

impl MovementIntent {
    /// Set the horizontal axis value, clamped to `[-1, 1]`.
    ///
    /// Call at any rate; only the value present at the physics tick matters.
    pub fn set_horizontal(&mut self, axis: f32) {
        self.horizontal = axis.clamp(-1.0, 1.0);
    }

    /// The buffered horizontal axis value.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.horizontal
    }

    /// Latch a jump request until the next physics tick consumes it.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Latch a roll request until the next physics tick consumes it.
    pub fn request_roll(&mut self) {
        self.roll_requested = true;
    }

    /// Whether a jump request is pending.
    #[inline]
    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Whether a roll request is pending.
    #[inline]
    pub fn roll_requested(&self) -> bool {
        self.roll_requested
    }

    /// Clear the one-shot requests after the tick consumed them.
    ///
    /// The axis value is deliberately left alone; held movement keys stay
    /// held across ticks.
    pub fn clear_one_shots(&mut self) {
        self.jump_requested = false;
        self.roll_requested = false;
    }
}
