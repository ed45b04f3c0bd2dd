//! Facing, per-tick movement results, and state marker components.
//!
//! `MovementResult` is the controller's only output surface: one immutable
//! value per physics tick, consumed by downstream systems and discarded.
//! The marker components mirror the latest result so gameplay code can use
//! plain query filters instead of reading the result directly.

use bevy::prelude::*;

/// Logical left/right orientation of a character.
///
/// Facing decides which collider edge counts as "front" versus "back" and
/// biases the airborne input checks. It flips only when horizontal input
/// opposes the current facing and the character is not mid-roll.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Signed direction multiplier: `1.0` facing right, `-1.0` facing left.
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// The opposite facing.
    #[inline]
    pub fn flipped(&self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// What happened during one physics tick.
///
/// Produced fresh by [`CharacterController::step`](crate::controller::CharacterController::step)
/// every tick and overwritten on the actor entity; there is no history.
/// `velocity` is the post-integration velocity assignment. A jump impulse is
/// reported separately by the tick output and lands on top of it during the
/// physics step.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct MovementResult {
    /// Bottom contact plus an active ground sensor.
    pub is_grounded: bool,
    /// Front contact plus an active front wall sensor.
    pub is_on_wall: bool,
    /// A jump impulse was issued this tick.
    pub jumped: bool,
    /// A roll started this tick.
    pub rolled: bool,
    /// The velocity assigned to the rigid body this tick.
    pub velocity: Vec2,
}

impl Default for MovementResult {
    fn default() -> Self {
        Self {
            is_grounded: false,
            is_on_wall: false,
            jumped: false,
            rolled: false,
            velocity: Vec2::ZERO,
        }
    }
}

/// Marker component present while the latest tick reported grounded.
///
/// Mutually exclusive with [`Airborne`]. Synced by
/// [`sync_state_markers`](crate::systems::sync_state_markers).
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component present while the latest tick reported airborne.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component present while the latest tick reported wall contact
/// on the facing side.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct OnWall;

/// Coarse locomotion state for the display layer.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Idle,
    Running,
}

/// Animator-facing view of the latest [`MovementResult`].
///
/// This is the crate's half of the display boundary: each tick the cues are
/// rewritten from the result and the sampled horizontal input, and the
/// display layer reads them however it likes. `jumped`/`rolled` are one-shot
/// triggers latched until taken, so a display layer running slower than the
/// physics tick never misses one.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct AnimationCues {
    /// Idle below the input deadzone, running above it.
    pub motion: Motion,
    /// Latest grounded state.
    pub grounded: bool,
    /// Latest facing-side wall contact state.
    pub wall_slide: bool,
    /// Vertical velocity, for airborne blend trees.
    pub air_speed_y: f32,
    jumped: bool,
    rolled: bool,
}

/// Input magnitude below which the character animates as idle.
const RUN_DEADZONE: f32 = 0.1;

impl AnimationCues {
    /// Rewrite the cues from this tick's result and sampled horizontal input.
    pub fn apply(&mut self, result: &MovementResult, horizontal_input: f32) {
        self.motion = if horizontal_input.abs() > RUN_DEADZONE {
            Motion::Running
        } else {
            Motion::Idle
        };
        self.grounded = result.is_grounded;
        self.wall_slide = result.is_on_wall;
        self.air_speed_y = result.velocity.y;
        self.jumped |= result.jumped;
        self.rolled |= result.rolled;
    }

    /// Take the jump trigger, clearing it.
    pub fn take_jumped(&mut self) -> bool {
        std::mem::take(&mut self.jumped)
    }

    /// Take the roll trigger, clearing it.
    pub fn take_rolled(&mut self) -> bool {
        std::mem::take(&mut self.rolled)
    }
}
