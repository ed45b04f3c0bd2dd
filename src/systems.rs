//! Core controller systems.
//!
//! `drive_characters` is the fixed-tick heart: it snapshots each actor's
//! components, runs the movement state machine, and pushes the outputs
//! through the physics backend. The smaller systems downstream fan the
//! per-tick [`MovementResult`] out to marker components and animation cues,
//! and `reset_intents` closes the tick by clearing consumed one-shots.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::ControllerConfig;
use crate::contact::{ContactState, ContactTracker};
use crate::controller::CharacterController;
use crate::intent::MovementIntent;
use crate::roll::RollState;
use crate::sensor::EdgeSensors;
use crate::state::{Airborne, AnimationCues, Grounded, MovementResult, OnWall};

/// Fixed-update phases of the controller.
///
/// Backend sensing systems run in [`Sense`](ControllerSet::Sense) so the
/// tick's contact and sensor reads are never stale; the state machine and
/// its fan-out run in [`Drive`](ControllerSet::Drive).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    Sense,
    Drive,
}

/// Step every character one physics tick and apply the outputs.
///
/// Actors missing any required component simply don't match the query and
/// are skipped; there is no error path here.
pub fn drive_characters<B: CharacterPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let staged: Vec<(
        Entity,
        CharacterController,
        ControllerConfig,
        MovementIntent,
        ContactState,
        EdgeSensors,
        RollState,
    )> = world
        .query::<(
            Entity,
            &CharacterController,
            &ControllerConfig,
            &MovementIntent,
            &ContactTracker,
            &EdgeSensors,
            &RollState,
        )>()
        .iter(world)
        .map(|(entity, controller, config, intent, tracker, sensors, roll)| {
            (
                entity,
                controller.clone(),
                *config,
                intent.clone(),
                tracker.state(),
                sensors.clone(),
                roll.clone(),
            )
        })
        .collect();

    for (entity, mut controller, config, intent, contacts, sensors, mut roll) in staged {
        let velocity = B::get_velocity(world, entity);

        let output = controller.step(&intent, contacts, &sensors, &mut roll, velocity, &config, dt);

        B::set_velocity(world, entity, output.result.velocity);
        if let Some(impulse) = output.impulse {
            B::apply_impulse(world, entity, impulse);
        }
        B::set_gravity_scale(world, entity, output.gravity_scale);

        if let Some(mut stored) = world.get_mut::<CharacterController>(entity) {
            *stored = controller;
        }
        if let Some(mut stored) = world.get_mut::<RollState>(entity) {
            *stored = roll;
        }
        world.entity_mut(entity).insert(output.result);
    }
}

/// Mirror the latest [`MovementResult`] onto marker components.
pub fn sync_state_markers(
    mut commands: Commands,
    q_results: Query<(
        Entity,
        &MovementResult,
        Has<Grounded>,
        Has<Airborne>,
        Has<OnWall>,
    )>,
) {
    for (entity, result, has_grounded, has_airborne, has_on_wall) in &q_results {
        if result.is_grounded && !has_grounded {
            debug!("landed: velocity={}", result.velocity);
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !result.is_grounded && (has_grounded || !has_airborne) {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
        }

        if result.is_on_wall && !has_on_wall {
            commands.entity(entity).insert(OnWall);
        } else if !result.is_on_wall && has_on_wall {
            commands.entity(entity).remove::<OnWall>();
        }
    }
}

/// Rewrite animation cues from the latest result and the sampled input.
pub fn update_animation_cues(
    mut q_cues: Query<(&MovementResult, &MovementIntent, &mut AnimationCues)>,
) {
    for (result, intent, mut cues) in &mut q_cues {
        cues.apply(result, intent.horizontal());
    }
}

/// Clear consumed one-shot intents at the end of each fixed update.
pub fn reset_intents(mut q_intents: Query<&mut MovementIntent>) {
    for mut intent in &mut q_intents {
        intent.clear_one_shots();
    }
}
