//! Behavioural test: control events steer the father through the plugin.
//!
//! Events are triggered straight into the world, the same way
//! `collect_control_input` delivers them from Bevy's input resources.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::MutexGuard;

use bevy::prelude::*;
use brood::{CameraController, ControlEvent, ControlKey, GameConfig, PlayerBody, PlayerController};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::{headless_app, place_rock, run_frames, spawn_leader};
use thread_safe_app::{SharedApp, ThreadSafeApp};

const START: Vec3 = Vec3::new(0.0, 0.5, 0.0);

#[derive(Debug, Clone)]
struct FlightFixture {
    app: SharedApp,
    leader: Entity,
    camera: Entity,
}

impl FlightFixture {
    /// The father standing at the origin with a follow camera and no scenery.
    fn bootstrap() -> Self {
        let mut app = headless_app(GameConfig::default());
        let world = app.world_mut();
        let leader = spawn_leader(world, START);
        let camera = world.spawn((CameraController, Transform::default())).id();
        let fixture = Self {
            app: SharedApp::new(app),
            leader,
            camera,
        };
        // Starts the manual clock; the first frame has no elapsed time.
        fixture.run(1);
        fixture
    }

    fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        self.app.lock()
    }

    fn run(&self, frames: usize) {
        run_frames(&mut self.app_guard(), frames);
    }

    fn send(&self, event: ControlEvent) {
        self.app_guard().world_mut().trigger(event);
    }

    fn body(&self) -> PlayerBody {
        self.app_guard()
            .world()
            .get::<PlayerBody>(self.leader)
            .cloned()
            .unwrap_or_else(|| panic!("leader should have a body"))
    }

    fn translation_of(&self, entity: Entity) -> Vec3 {
        self.app_guard()
            .world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
            .unwrap_or_else(|| panic!("{entity:?} should have a transform"))
    }

    fn orbit_distance(&self) -> f32 {
        self.app_guard()
            .world()
            .resource::<PlayerController>()
            .camera()
            .distance
    }
}

fn walking_forward(scenario: &mut Scenario<FlightFixture>) {
    scenario.when("forward is held for ten frames", |ctx| {
        ctx.before_each(|state| {
            state.send(ControlEvent::KeyDown(ControlKey::Forward));
            state.run(10);
        });

        ctx.then("the father walks away from the camera", |state| {
            let position = state.body().position;
            assert!(position.z < -2.0, "expected progress along -Z, got {position:?}");
            assert!(position.x.abs() < 1e-3, "expected no drift, got {position:?}");
        });

        ctx.then("his transform mirrors the body", |state| {
            let translation = state.translation_of(state.leader);
            assert!(translation.distance(state.body().position) < 1e-5);
        });

        ctx.then("the camera keeps its orbit distance", |state| {
            let gap = state
                .translation_of(state.camera)
                .distance(state.body().position);
            assert!((gap - state.orbit_distance()).abs() < 1e-3, "gap {gap}");
        });
    });
}

fn blocked_by_boulder(scenario: &mut Scenario<FlightFixture>) {
    scenario.when("a tall boulder stands straight ahead", |ctx| {
        ctx.before_each(|state| {
            place_rock(state.app_guard().world_mut(), 0.0, -2.0, 1.2);
            state.send(ControlEvent::KeyDown(ControlKey::Forward));
            state.run(20);
        });

        ctx.then("the father stops short of it", |state| {
            let position = state.body().position;
            assert!(position.z > -2.0 + 1.2, "walked into the boulder: {position:?}");
        });
    });
}

fn jumping(scenario: &mut Scenario<FlightFixture>) {
    scenario.when("jump is pressed once", |ctx| {
        ctx.before_each(|state| {
            state.send(ControlEvent::KeyDown(ControlKey::Jump));
            state.run(3);
        });

        ctx.then("the father leaves the ground", |state| {
            assert!(state.body().position.y > START.y);
        });
    });

    scenario.when("jump is pressed and time passes", |ctx| {
        ctx.before_each(|state| {
            state.send(ControlEvent::KeyDown(ControlKey::Jump));
            state.run(80);
        });

        ctx.then("he glides back down and lands", |state| {
            let body = state.body();
            assert!((body.position.y - START.y).abs() < 1e-4, "{body:?}");
            assert_eq!(body.airborne_jumps(), 0);
            assert!(!body.flap().is_active());
        });
    });
}

fn losing_focus(scenario: &mut Scenario<FlightFixture>) {
    scenario.when("focus is lost while walking", |ctx| {
        ctx.before_each(|state| {
            state.send(ControlEvent::KeyDown(ControlKey::Forward));
            state.run(5);
            state.send(ControlEvent::FocusLost);
        });

        ctx.then("the father stops where he was", |state| {
            let before = state.body().position;
            state.run(5);
            let after = state.body().position;
            assert!(before.distance(after) < 1e-5, "{before:?} -> {after:?}");
        });
    });
}

#[test]
fn father_answers_control_events() {
    run_serial(&rspec::given(
        "the father standing in an empty meadow",
        FlightFixture::bootstrap(),
        |scenario: &mut Scenario<FlightFixture>| {
            scenario.before_each(|state| *state = FlightFixture::bootstrap());
            walking_forward(scenario);
            blocked_by_boulder(scenario);
            jumping(scenario);
            losing_focus(scenario);
        },
    ));
}
