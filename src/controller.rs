//! The per-tick movement state machine.
//!
//! [`CharacterController::step`] is the orchestrator: once per fixed physics
//! tick it reads the classified contact state, the edge sensors, the roll
//! state, the buffered intent, and the current rigid-body velocity, and
//! produces the velocity assignment, an optional jump impulse, and the
//! gravity scale for the integrator, plus a [`MovementResult`] for the
//! display layer. It is a pure function of its inputs and the controller's
//! own facing; nothing here can fail.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::contact::ContactState;
use crate::intent::MovementIntent;
use crate::roll::RollState;
use crate::sensor::EdgeSensors;
use crate::state::{Facing, MovementResult};

/// Orchestrating state for one character: facing plus the tick counter
/// driving the roll timers.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CharacterController {
    facing: Facing,
    tick: u64,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            facing: Facing::Right,
            tick: 0,
        }
    }
}

/// Everything a tick asks of the physics integrator, plus the result the
/// display layer consumes. `result.velocity` is the velocity assignment;
/// the impulse, when present, is applied on top of it by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub result: MovementResult,
    pub impulse: Option<Vec2>,
    pub gravity_scale: f32,
}

impl CharacterController {
    /// Create a controller with the given initial facing.
    pub fn with_facing(facing: Facing) -> Self {
        Self {
            facing,
            ..Default::default()
        }
    }

    /// The current facing.
    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Ticks stepped so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one physics tick.
    ///
    /// The evaluation order is fixed: derive grounded, pick the gravity
    /// scale, arbitrate jump over roll, compute the horizontal target,
    /// flip facing, then integrate toward the target by at most
    /// `acceleration * dt`.
    pub fn step(
        &mut self,
        intent: &MovementIntent,
        contacts: ContactState,
        sensors: &EdgeSensors,
        roll: &mut RollState,
        velocity: Vec2,
        config: &ControllerConfig,
        dt: f32,
    ) -> TickOutput {
        self.tick += 1;
        roll.advance(self.tick);

        let grounded = sensors.grounded(contacts);
        let on_wall = sensors.on_wall(contacts);

        // Zeroing gravity while grounded keeps the character from creeping
        // down slopes it is standing still on.
        let gravity_scale = if grounded { 0.0 } else { 1.0 };

        let mut accel = config.acceleration;
        if !grounded {
            accel *= config.air_acceleration_multiplier;
        }

        let horizontal = intent.horizontal();
        let mut jumped = false;
        let mut rolled = false;
        let mut impulse = None;

        // Jump wins over roll; a tick never does both.
        if intent.jump_requested() && grounded {
            impulse = Some(Vec2::new(0.0, config.jump_force));
            jumped = true;
        } else if intent.roll_requested() {
            rolled = roll.try_start(grounded, velocity.x, self.facing, config, self.tick, dt);
        }

        let mut target_x = 0.0;
        if roll.is_rolling() && grounded {
            // Rolling overrides input: full speed in the facing direction,
            // never slower than the character already moves.
            target_x = config.run_speed * config.roll_speed_multiplier * self.facing.sign();
            if target_x.abs() < velocity.x.abs() {
                target_x = velocity.x;
            }
        } else if !grounded {
            // Airborne input only counts when it opposes facing or outruns
            // the current speed; otherwise hold speed by freezing the
            // acceleration for this tick.
            let opposes = (horizontal < 0.0 && self.facing == Facing::Right)
                || (horizontal > 0.0 && self.facing == Facing::Left);
            let outruns = match self.facing {
                Facing::Right => horizontal > velocity.x / config.run_speed,
                Facing::Left => horizontal < velocity.x / config.run_speed,
            };
            if opposes || outruns {
                target_x = horizontal * config.run_speed;
            } else {
                accel = 0.0;
            }
        } else {
            target_x = horizontal * config.run_speed;
        }

        // Facing flips against opposing input, but a roll locks it.
        if !roll.is_rolling() {
            if horizontal > 0.0 && self.facing == Facing::Left {
                self.facing = Facing::Right;
            } else if horizontal < 0.0 && self.facing == Facing::Right {
                self.facing = Facing::Left;
            }
        }

        // Horizontal-only control: the target's vertical component mirrors
        // the current velocity, so gravity and jumps pass through untouched.
        let target = Vec2::new(target_x, velocity.y);
        let new_velocity = move_towards(velocity, target, accel * dt);

        TickOutput {
            result: MovementResult {
                is_grounded: grounded,
                is_on_wall: on_wall,
                jumped,
                rolled,
                velocity: new_velocity,
            },
            impulse,
            gravity_scale,
        }
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance < f32::EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}
