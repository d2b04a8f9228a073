//! Shared fixtures for brood integration tests.
//!
//! Everything here builds headless apps: no window, no renderer, and a
//! manually advanced clock so each `update` moves the simulation by a known
//! amount.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use brood::{
    BroodPlugin, Duckling, GameConfig, Guardians, Obstacle, ObstacleKind, ObstacleRegistry,
    PlayerBody, ProgressTracker, WorldSettings, BEACON_ID, GUARDIANS, LEADER_ID,
};

pub use brood::vector_math::ground_distance;

/// Simulated seconds per frame in headless apps.
pub const FRAME_SECONDS: f32 = 0.05;

/// World settings small enough to spawn quickly, with no scenery.
#[must_use]
pub fn bare_world(ducklings: u32, seed: u64) -> WorldSettings {
    WorldSettings {
        total_ducklings: ducklings,
        spawn_half_extent: 30.0,
        rocks: 0,
        trees: 0,
        bushes: 0,
        seed: Some(seed),
        ..WorldSettings::default()
    }
}

/// Builds an app running [`BroodPlugin`] on `MinimalPlugins`.
///
/// Every `update` after the first advances time by [`FRAME_SECONDS`]; the
/// first one only starts the clock.
#[must_use]
pub fn headless_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    config.insert_into(&mut app);
    app.add_plugins(BroodPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        FRAME_SECONDS,
    )));
    app
}

/// Runs `frames` updates.
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Spawns a bare leader actor at `position` without wings or meshes.
pub fn spawn_leader(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((
            LEADER_ID,
            PlayerBody::at(position),
            Transform::from_translation(position),
        ))
        .id()
}

/// Spawns the beacon actor at `position`.
pub fn spawn_beacon(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((BEACON_ID, Transform::from_translation(position)))
        .id()
}

/// Spawns an idle duckling bound to the default guardians.
pub fn spawn_duckling(world: &mut World, position: Vec3, speed: f32) -> Entity {
    spawn_duckling_with(world, position, speed, GUARDIANS)
}

/// Spawns an idle duckling bound to `guardians`.
pub fn spawn_duckling_with(
    world: &mut World,
    position: Vec3,
    speed: f32,
    guardians: Guardians,
) -> Entity {
    world
        .spawn((
            Duckling::new(position, speed, guardians, 100.0),
            Transform::from_translation(position),
        ))
        .id()
}

/// Sets the rescue total on the app's tracker.
///
/// # Panics
/// Panics if the total was already set or `total` is zero.
pub fn set_total(world: &mut World, total: u32) {
    world
        .resource_mut::<ProgressTracker>()
        .set_total(total)
        .unwrap_or_else(|err| panic!("progress total rejected: {err}"));
}

/// Registers a solid rock sitting on the ground.
pub fn place_rock(world: &mut World, x: f32, z: f32, radius: f32) {
    world
        .resource_mut::<ObstacleRegistry>()
        .push(Obstacle::solid(ObstacleKind::Rock, Vec3::new(x, radius, z), radius));
}

/// Current state label of the duckling on `entity`.
///
/// # Panics
/// Panics if `entity` carries no [`Duckling`].
#[must_use]
pub fn duckling_label(world: &World, entity: Entity) -> &'static str {
    world
        .get::<Duckling>(entity)
        .unwrap_or_else(|| panic!("{entity:?} is not a duckling"))
        .state()
        .label()
}
