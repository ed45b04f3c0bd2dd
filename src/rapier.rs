//! Rapier2D physics backend implementation.
//!
//! Enable with the `rapier2d` feature. This backend owns the engine binding
//! the core stays ignorant of: it harvests narrow-phase contact points into
//! each actor's [`ContactTracker`], routes sensor-collider enter/exit events
//! into [`EdgeSensors`], keeps wall sensor volumes on the facing side, and
//! implements the actuator half of [`CharacterPhysicsBackend`] on Rapier's
//! `Velocity`, `ExternalImpulse`, and `GravityScale` components.

use bevy::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use bevy_rapier2d::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::config::ControllerConfig;
use crate::contact::ContactTracker;
use crate::controller::CharacterController;
use crate::sensor::{EdgeSensors, SensorRole};
use crate::systems::ControllerSet;

/// Rapier2D backend for the character controller.
pub struct Rapier2dBackend;

impl CharacterPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // Fallback: apply as a velocity change if no ExternalImpulse
            vel.linvel += impulse;
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut gravity) = world.get_mut::<GravityScale>(entity) {
            if gravity.0 != scale {
                gravity.0 = scale;
            }
        }
    }

    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&dt| dt > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Plugin installing the Rapier-side sensing systems.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SensorVolume>();
        app.add_systems(
            FixedUpdate,
            (
                mirror_wall_sensors,
                route_sensor_events,
                update_contact_trackers,
            )
                .chain()
                .in_set(ControllerSet::Sense),
        );
    }
}

/// A sensor collider feeding one of an actor's logical edge sensors.
///
/// Spawn this on a child entity of the actor with a `Collider`; the bundle
/// below wires up the Rapier pieces. `offset` is the local position while
/// the actor faces right; wall sensor volumes are mirrored across the
/// vertical axis when the actor flips, the way the original rig turned the
/// whole character around.
#[derive(Component, Reflect, Debug, Clone, Copy)]
pub struct SensorVolume {
    /// The actor whose [`EdgeSensors`] this volume feeds.
    pub actor: Entity,
    /// Which logical sensor the volume belongs to.
    pub role: SensorRole,
    /// Local position while the actor faces right.
    pub offset: Vec2,
}

impl SensorVolume {
    /// The local position for the current facing.
    pub fn offset_for(&self, facing: crate::state::Facing) -> Vec2 {
        match self.role {
            SensorRole::Ground => self.offset,
            SensorRole::FrontWall | SensorRole::BackWall => {
                Vec2::new(self.offset.x * facing.sign(), self.offset.y)
            }
        }
    }
}

/// Everything a sensor volume child entity needs.
#[derive(Bundle)]
pub struct SensorVolumeBundle {
    pub volume: SensorVolume,
    pub collider: Collider,
    pub sensor: Sensor,
    pub active_events: ActiveEvents,
    pub transform: Transform,
}

impl SensorVolumeBundle {
    /// Build a sensor volume for `actor` with the given collider shape.
    pub fn new(actor: Entity, role: SensorRole, offset: Vec2, collider: Collider) -> Self {
        Self {
            volume: SensorVolume {
                actor,
                role,
                offset,
            },
            collider,
            sensor: Sensor,
            active_events: ActiveEvents::COLLISION_EVENTS,
            transform: Transform::from_translation(offset.extend(0.0)),
        }
    }
}

/// Physics components for a character's rigid body.
#[derive(Bundle)]
pub struct Rapier2dCharacterBundle {
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    pub impulse: ExternalImpulse,
    pub gravity_scale: GravityScale,
    pub locked_axes: LockedAxes,
    pub active_events: ActiveEvents,
}

impl Rapier2dCharacterBundle {
    /// Dynamic body with rotation locked, the usual platformer setup.
    ///
    /// Rotation lock matters beyond feel: contact classification assumes the
    /// collider's local frame is a pure translation of world space.
    pub fn rotation_locked() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::zero(),
            impulse: ExternalImpulse::default(),
            gravity_scale: GravityScale(1.0),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            active_events: ActiveEvents::COLLISION_EVENTS,
        }
    }
}

/// Keep wall sensor volumes on the side matching the actor's facing.
pub fn mirror_wall_sensors(
    q_controllers: Query<&CharacterController>,
    mut q_volumes: Query<(&SensorVolume, &mut Transform)>,
) {
    for (volume, mut transform) in &mut q_volumes {
        let Ok(controller) = q_controllers.get(volume.actor) else {
            continue;
        };
        let target = volume.offset_for(controller.facing());
        if transform.translation.truncate() != target {
            transform.translation.x = target.x;
            transform.translation.y = target.y;
        }
    }
}

/// Route sensor collider enter/exit events into the owning actor's counters.
pub fn route_sensor_events(
    mut events: EventReader<CollisionEvent>,
    q_volumes: Query<&SensorVolume>,
    mut q_sensors: Query<&mut EdgeSensors>,
) {
    for event in events.read() {
        let (e1, e2, flags, entered) = match event {
            CollisionEvent::Started(e1, e2, flags) => (*e1, *e2, *flags, true),
            CollisionEvent::Stopped(e1, e2, flags) => (*e1, *e2, *flags, false),
        };
        if !flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }

        for (volume_entity, other) in [(e1, e2), (e2, e1)] {
            let Ok(volume) = q_volumes.get(volume_entity) else {
                continue;
            };
            // The actor's own body overlapping its sensors is not a signal.
            if other == volume.actor {
                continue;
            }
            let Ok(mut sensors) = q_sensors.get_mut(volume.actor) else {
                continue;
            };
            let counter = sensors.counter_mut(volume.role);
            if entered {
                counter.on_enter();
            } else {
                counter.on_exit();
            }
        }
    }
}

/// Harvest this tick's narrow-phase contact points into each tracker.
///
/// Runs every fixed update so the classifier's view covers enter, stay, and
/// exit alike: an actor with live contact pairs gets a fresh batch, an actor
/// with none gets cleared.
pub fn update_contact_trackers(
    rapier: ReadRapierContext,
    mut q_actors: Query<(
        Entity,
        &GlobalTransform,
        &Collider,
        &ControllerConfig,
        &CharacterController,
        &mut ContactTracker,
    )>,
) {
    let context = rapier.single();

    for (entity, transform, collider, config, controller, mut tracker) in &mut q_actors {
        // Single rectangular collider assumed; anything else is skipped.
        let Some(cuboid) = collider.as_cuboid() else {
            continue;
        };
        let center = transform.translation().truncate();
        let bounds = Rect::from_center_half_size(center, cuboid.half_extents());

        tracker.begin_update();
        let mut touching = false;
        for pair in context.contact_pairs_with(entity) {
            if !pair.has_any_active_contact() {
                continue;
            }
            touching = true;
            let actor_is_first = pair.collider1() == entity;
            for manifold in pair.manifolds() {
                for point in manifold.points() {
                    // Rotation is locked, so collider-local space is a pure
                    // translation of world space.
                    let local = if actor_is_first {
                        point.local_p1()
                    } else {
                        point.local_p2()
                    };
                    tracker.push_point(center + local);
                }
            }
        }

        if touching {
            tracker.commit(bounds, controller.facing(), config.edge_threshold);
        } else {
            tracker.clear_contacts();
        }
    }
}
