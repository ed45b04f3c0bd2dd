//! Integration tests for the character controller.
//!
//! These drive the full plugin through a deterministic test backend instead
//! of a physics engine: the backend stores velocity, impulses, and gravity
//! scale on a plain component, so every tick's effect is directly checkable.

use bevy::prelude::*;
use contact_character_controller::backend::{CharacterPhysicsBackend, NoOpBackendPlugin};
use contact_character_controller::prelude::*;

const DT: f32 = 1.0 / 50.0;
const EPSILON: f32 = 1e-4;

/// Rigid-body stand-in recording everything the controller asks for.
#[derive(Component, Default)]
struct TestBody {
    velocity: Vec2,
    gravity_scale: f32,
    impulses: Vec<Vec2>,
}

struct TestBackend;

impl CharacterPhysicsBackend for TestBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<TestBody>(entity)
            .map(|body| body.velocity)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.velocity = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.impulses.push(impulse);
            // Unit mass: the impulse lands directly on velocity.
            body.velocity += impulse;
        }
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut body) = world.get_mut::<TestBody>(entity) {
            body.gravity_scale = scale;
        }
    }

    fn get_fixed_timestep(_world: &World) -> f32 {
        DT
    }
}

fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(ContactControllerPlugin::<TestBackend>::default());
    app
}

fn spawn_character(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            CharacterController::default(),
            ControllerConfig::default(),
            MovementIntent::default(),
            ContactTracker::default(),
            EdgeSensors::default(),
            RollState::default(),
            AnimationCues::default(),
            TestBody::default(),
        ))
        .id()
}

/// Collider bounds used by the synthetic contact batches.
fn bounds() -> Rect {
    Rect::from_center_half_size(Vec2::ZERO, Vec2::new(0.5, 1.0))
}

/// Feed a bottom contact and a ground sensor overlap, as landing would.
fn make_grounded(app: &mut App, entity: Entity) {
    let facing = app
        .world()
        .get::<CharacterController>(entity)
        .unwrap()
        .facing();
    let mut tracker = app.world_mut().get_mut::<ContactTracker>(entity).unwrap();
    tracker.begin_update();
    tracker.push_point(Vec2::new(0.0, -1.2));
    tracker.commit(bounds(), facing, 0.1);

    let mut sensors = app.world_mut().get_mut::<EdgeSensors>(entity).unwrap();
    if !sensors.ground.active() {
        sensors.ground.on_enter();
    }
}

/// Drop all contacts and sensor overlaps, as walking off a ledge would.
fn make_airborne(app: &mut App, entity: Entity) {
    let mut tracker = app.world_mut().get_mut::<ContactTracker>(entity).unwrap();
    tracker.clear_contacts();

    let mut sensors = app.world_mut().get_mut::<EdgeSensors>(entity).unwrap();
    if sensors.ground.active() {
        sensors.ground.on_exit();
    }
}

fn set_velocity(app: &mut App, entity: Entity, velocity: Vec2) {
    app.world_mut()
        .get_mut::<TestBody>(entity)
        .unwrap()
        .velocity = velocity;
}

/// Run one physics tick: fixed update plus the one-shot intent reset.
fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedPostUpdate);
}

fn body<'a>(app: &'a App, entity: Entity) -> &'a TestBody {
    app.world().get::<TestBody>(entity).unwrap()
}

// ==================== Grounded Movement Tests ====================

#[test]
fn grounded_run_accelerates_toward_run_speed() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_grounded(&mut app, character);

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(1.0);
    tick(&mut app);

    // One tick from rest moves velocity by acceleration * dt = 12 / 50.
    let body = body(&app, character);
    assert!((body.velocity.x - 0.24).abs() < EPSILON);
    assert_eq!(body.velocity.y, 0.0);
    assert_eq!(body.gravity_scale, 0.0);
    assert!(body.impulses.is_empty());

    let result = app.world().get::<MovementResult>(character).unwrap();
    assert!(result.is_grounded);
    assert!(!result.jumped);
    assert!(!result.rolled);
}

#[test]
fn grounded_zeroes_gravity_airborne_restores_it() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);

    make_grounded(&mut app, character);
    tick(&mut app);
    assert_eq!(body(&app, character).gravity_scale, 0.0);

    make_airborne(&mut app, character);
    tick(&mut app);
    assert_eq!(body(&app, character).gravity_scale, 1.0);
}

// ==================== Jump Tests ====================

#[test]
fn jump_applies_impulse_once() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_grounded(&mut app, character);

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_jump();
    tick(&mut app);

    assert_eq!(body(&app, character).impulses, vec![Vec2::new(0.0, 300.0)]);
    assert!(app.world().get::<MovementResult>(character).unwrap().jumped);

    // The request was consumed; the next tick must not jump again.
    tick(&mut app);
    assert_eq!(body(&app, character).impulses.len(), 1);
    assert!(!app.world().get::<MovementResult>(character).unwrap().jumped);
}

#[test]
fn airborne_jump_request_is_dropped() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_airborne(&mut app, character);

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_jump();
    tick(&mut app);

    assert!(body(&app, character).impulses.is_empty());

    // Landing afterwards must not replay the stale request.
    make_grounded(&mut app, character);
    tick(&mut app);
    assert!(body(&app, character).impulses.is_empty());
}

// ==================== Roll Tests ====================

#[test]
fn roll_drives_toward_roll_speed_without_input() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_grounded(&mut app, character);
    set_velocity(&mut app, character, Vec2::new(50.0, 0.0));

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_roll();
    tick(&mut app);

    assert!(app.world().get::<MovementResult>(character).unwrap().rolled);
    assert!(app.world().get::<RollState>(character).unwrap().is_rolling());

    // Second tick, zero input: the roll still accelerates forward.
    let before = body(&app, character).velocity.x;
    tick(&mut app);
    let after = body(&app, character).velocity.x;
    assert!((after - (before + 0.24)).abs() < EPSILON);
}

#[test]
fn roll_rejected_within_cooldown() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_grounded(&mut app, character);
    set_velocity(&mut app, character, Vec2::new(50.0, 0.0));

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_roll();
    tick(&mut app);
    assert!(app.world().get::<MovementResult>(character).unwrap().rolled);

    // End the roll early via the animation-complete signal, then request
    // again inside the 1s cooldown window.
    app.world_mut()
        .get_mut::<RollState>(character)
        .unwrap()
        .end_roll();
    set_velocity(&mut app, character, Vec2::new(50.0, 0.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_roll();
    tick(&mut app);
    assert!(!app.world().get::<MovementResult>(character).unwrap().rolled);

    // Past the cooldown (50 ticks at 50Hz) a new roll goes through.
    for _ in 0..50 {
        set_velocity(&mut app, character, Vec2::new(50.0, 0.0));
        tick(&mut app);
    }
    set_velocity(&mut app, character, Vec2::new(50.0, 0.0));
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .request_roll();
    tick(&mut app);
    assert!(app.world().get::<MovementResult>(character).unwrap().rolled);
}

// ==================== Airborne Movement Tests ====================

#[test]
fn airborne_speed_holds_against_weak_input() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_airborne(&mut app, character);
    set_velocity(&mut app, character, Vec2::new(100.0, -5.0));

    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(0.2);
    tick(&mut app);

    // 0.2 < 100/200, so the input neither opposes nor outruns: hold speed.
    let body = body(&app, character);
    assert_eq!(body.velocity.x, 100.0);
    assert_eq!(body.velocity.y, -5.0);
}

// ==================== Marker and Cue Tests ====================

#[test]
fn markers_follow_grounded_transitions() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);

    make_grounded(&mut app, character);
    tick(&mut app);
    assert!(app.world().get::<Grounded>(character).is_some());
    assert!(app.world().get::<Airborne>(character).is_none());

    make_airborne(&mut app, character);
    tick(&mut app);
    assert!(app.world().get::<Grounded>(character).is_none());
    assert!(app.world().get::<Airborne>(character).is_some());
}

#[test]
fn animation_cues_track_motion_and_triggers() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);
    make_grounded(&mut app, character);

    {
        let mut intent = app
            .world_mut()
            .get_mut::<MovementIntent>(character)
            .unwrap();
        intent.set_horizontal(1.0);
        intent.request_jump();
    }
    tick(&mut app);

    let mut cues = app.world_mut().get_mut::<AnimationCues>(character).unwrap();
    assert_eq!(cues.motion, Motion::Running);
    assert!(cues.grounded);
    assert!(cues.take_jumped());
    assert!(!cues.take_rolled());

    // Back to idle with no input.
    app.world_mut()
        .get_mut::<MovementIntent>(character)
        .unwrap()
        .set_horizontal(0.0);
    tick(&mut app);
    let cues = app.world().get::<AnimationCues>(character).unwrap();
    assert_eq!(cues.motion, Motion::Idle);
}

#[test]
fn facing_flip_reclassifies_front_and_back() {
    let mut app = create_test_app();
    let character = spawn_character(&mut app);

    // Contact on the world-left edge while facing right: that's "back".
    make_grounded(&mut app, character);
    {
        let mut tracker = app.world_mut().get_mut::<ContactTracker>(character).unwrap();
        tracker.begin_update();
        tracker.push_point(Vec2::new(0.0, -1.2));
        tracker.push_point(Vec2::new(-0.6, 0.0));
        tracker.commit(bounds(), Facing::Right, 0.1);
    }
    assert!(!app
        .world()
        .get::<ContactTracker>(character)
        .unwrap()
        .state()
        .front);

    // The identical physical contact is "front" once facing left.
    {
        let mut tracker = app.world_mut().get_mut::<ContactTracker>(character).unwrap();
        tracker.begin_update();
        tracker.push_point(Vec2::new(0.0, -1.2));
        tracker.push_point(Vec2::new(-0.6, 0.0));
        tracker.commit(bounds(), Facing::Left, 0.1);
    }
    assert!(app
        .world()
        .get::<ContactTracker>(character)
        .unwrap()
        .state()
        .front);
}
