//! # `contact_character_controller`
//!
//! A 2D platformer character controller driven by contact classification.
//!
//! This crate turns per-tick input intents (move, jump, roll) into
//! deterministic rigid-body velocity updates, while tracking the character's
//! environment through two cooperating senses:
//! - Raw collision contact points are classified into directional flags
//!   (top/bottom/front/back) relative to the character's facing, robust to
//!   rounded-corner contact noise
//! - Dedicated edge sensor volumes confirm grounded/on-wall decisions so a
//!   glancing contact never passes for standing on the ground
//!
//! On top of that sensing sit time-gated rolls with a cooldown, jump
//! arbitration, air-control rules that never decelerate the character, and a
//! per-tick [`MovementResult`](state::MovementResult) for the display layer.
//!
//! ## Architecture
//!
//! The controller is split along its natural seams:
//! 1. A physics backend ([`backend::CharacterPhysicsBackend`]) owns the
//!    engine binding; Rapier2D ships behind the `rapier2d` feature
//! 2. Sensing (contact classification + overlap counters) runs first each
//!    fixed update, so the state machine never reads stale contacts
//! 3. [`controller::CharacterController::step`] is a pure function from
//!    sensed state + buffered intent + current velocity to the tick's
//!    velocity assignment, impulse, and gravity scale
//!
//! ## Usage
//!
//! ```rust
//! use contact_character_controller::prelude::*;
//!
//! // Components for a player-controlled character
//! let controller = CharacterController::default();
//! let config = ControllerConfig::player();
//! let intent = MovementIntent::default();
//! ```
//!
//! With the Rapier2D backend:
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_rapier2d::prelude::*;
//! use contact_character_controller::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
//!     .add_plugins(ContactControllerPlugin::<Rapier2dBackend>::default())
//!     .run();
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod contact;
pub mod controller;
pub mod intent;
pub mod roll;
pub mod schedule;
pub mod sensor;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::ControllerConfig;
    pub use crate::contact::{ContactState, ContactTracker};
    pub use crate::controller::CharacterController;
    pub use crate::intent::MovementIntent;
    pub use crate::roll::RollState;
    pub use crate::sensor::{EdgeSensors, SensorRole};
    pub use crate::state::{
        Airborne, AnimationCues, Facing, Grounded, Motion, MovementResult, OnWall,
    };
    pub use crate::ContactControllerPlugin;

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{
        Rapier2dBackend, Rapier2dCharacterBundle, SensorVolume, SensorVolumeBundle,
    };
}

/// Main plugin for the character controller.
///
/// Generic over a physics backend `B` which provides the actuator operations
/// and the sensing systems for its engine.
///
/// Each fixed update runs sensing before driving, so contact and sensor
/// events are fully applied before the tick reads them; one-shot intents are
/// cleared afterwards in `FixedPostUpdate`.
pub struct ContactControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for ContactControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for ContactControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ControllerConfig>();
        app.register_type::<contact::ContactState>();
        app.register_type::<contact::ContactTracker>();
        app.register_type::<controller::CharacterController>();
        app.register_type::<intent::MovementIntent>();
        app.register_type::<roll::RollState>();
        app.register_type::<sensor::EdgeSensors>();
        app.register_type::<sensor::OverlapCounter>();
        app.register_type::<sensor::SensorRole>();
        app.register_type::<state::AnimationCues>();
        app.register_type::<state::Facing>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::OnWall>();
        app.register_type::<state::Motion>();
        app.register_type::<state::MovementResult>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Sensing must land before the tick reads it
        app.configure_sets(
            FixedUpdate,
            (systems::ControllerSet::Sense, systems::ControllerSet::Drive).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::drive_characters::<B>,
                systems::sync_state_markers,
                systems::update_animation_cues,
            )
                .chain()
                .in_set(systems::ControllerSet::Drive),
        );

        // Consumed one-shot intents reset at end of fixed update
        app.add_systems(FixedPostUpdate, systems::reset_intents);
    }
}
