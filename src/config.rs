//! Controller configuration.

use bevy::prelude::*;

/// Tuning parameters for a character controller.
///
/// All values are plain data; the controller never mutates them. Durations
/// are in seconds, speeds in world units per second, the jump force is an
/// impulse magnitude handed to the physics integrator.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ControllerConfig {
    /// Upward impulse magnitude applied on jump.
    pub jump_force: f32,

    /// Target horizontal speed at full input.
    pub run_speed: f32,

    /// Roll target speed as a multiple of `run_speed`.
    pub roll_speed_multiplier: f32,

    /// Minimum facing-signed horizontal speed required to start a roll.
    pub roll_threshold: f32,

    /// Fallback roll duration in case no animation-complete signal arrives.
    pub roll_duration: f32,

    /// Cooldown before the next roll may start. Must be strictly longer
    /// than `roll_duration`.
    pub roll_cooldown: f32,

    /// How fast velocity moves toward its target (units/second^2).
    pub acceleration: f32,

    /// Acceleration multiplier while airborne, in `[0, 1]`.
    /// Zero disables air control entirely.
    pub air_acceleration_multiplier: f32,

    /// Distance past a collider edge a contact point must clear to be
    /// classified to that edge.
    pub edge_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            jump_force: 300.0,
            run_speed: 200.0,
            roll_speed_multiplier: 2.0,
            roll_threshold: 3.5,
            roll_duration: 0.6,
            roll_cooldown: 1.0,
            acceleration: 12.0,
            air_acceleration_multiplier: 0.0,
            edge_threshold: 0.1,
        }
    }
}

impl ControllerConfig {
    /// Config tuned for a responsive player character.
    pub fn player() -> Self {
        Self::default()
    }

    /// Config for AI-controlled characters: gentler acceleration, no rolling.
    pub fn ai() -> Self {
        Self {
            acceleration: 8.0,
            roll_threshold: f32::INFINITY,
            ..Default::default()
        }
    }

    /// Builder: set run speed.
    pub fn with_run_speed(mut self, run_speed: f32) -> Self {
        self.run_speed = run_speed;
        self
    }

    /// Builder: set acceleration.
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Builder: set jump impulse magnitude.
    pub fn with_jump_force(mut self, jump_force: f32) -> Self {
        self.jump_force = jump_force;
        self
    }

    /// Builder: set roll duration and cooldown together.
    ///
    /// The cooldown must outlast the duration, otherwise a roll could start
    /// while the previous fallback timer is still pending.
    pub fn with_roll_timing(mut self, duration: f32, cooldown: f32) -> Self {
        debug_assert!(cooldown > duration, "roll cooldown must outlast roll duration");
        self.roll_duration = duration;
        self.roll_cooldown = cooldown;
        self
    }

    /// Builder: set the roll speed threshold.
    pub fn with_roll_threshold(mut self, threshold: f32) -> Self {
        self.roll_threshold = threshold;
        self
    }

    /// Builder: set the airborne acceleration multiplier.
    pub fn with_air_acceleration_multiplier(mut self, multiplier: f32) -> Self {
        self.air_acceleration_multiplier = multiplier.clamp(0.0, 1.0);
        self
    }

    /// Builder: set the contact classification edge threshold.
    pub fn with_edge_threshold(mut self, threshold: f32) -> Self {
        self.edge_threshold = threshold;
        self
    }
}
