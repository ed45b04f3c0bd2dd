//! Physics backend abstraction.
//!
//! The controller never talks to a physics engine directly. Everything it
//! needs from the integrator goes through this trait: read the current
//! velocity, write the post-tick velocity, apply the jump impulse, and set
//! the gravity scale. The backend's plugin installs whatever sensing systems
//! feed [`ContactTracker`](crate::contact::ContactTracker) and
//! [`EdgeSensors`](crate::sensor::EdgeSensors) from the engine's collision
//! and trigger events.

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// Implement this to drive the character controller with a physics engine.
/// See the `rapier` module's `Rapier2dBackend` for the reference
/// implementation (behind the `rapier2d` feature).
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The plugin that sets up this backend, including its sensing systems
    /// in [`ControllerSet::Sense`](crate::systems::ControllerSet::Sense).
    fn plugin() -> impl Plugin;

    /// Current linear velocity of an entity's rigid body.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Assign the rigid body's linear velocity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an instantaneous impulse on top of the assigned velocity.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Set the gravity scale applied to the rigid body by the integrator.
    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32);

    /// Fixed physics timestep in seconds.
    fn get_fixed_timestep(world: &World) -> f32;
}

/// Empty plugin for backends that need no additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
