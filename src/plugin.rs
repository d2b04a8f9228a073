//! Bevy plugin wiring the simulation into the schedule.
//!
//! Every frame runs, in order: input collection, the player controller,
//! the wing flap, the ducklings and the completion check. The ordering
//! guarantees ducklings observe the leader's already-advanced position.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info};

use crate::actor::{ActorId, ActorPose, ActorPoses};
use crate::camera::CameraController;
use crate::components::{NestSite, SimRng, Wing};
use crate::config::{CameraSettings, DucklingSettings, FrameSettings, PlayerSettings, WorldSettings};
use crate::duckling::{Duckling, Surroundings, Transition};
use crate::input::collect_control_input;
use crate::obstacle::ObstacleRegistry;
use crate::player::{ControlEvent, PlayerBody, PlayerController};
use crate::progress::ProgressTracker;

/// Raised when a duckling reaches the nest and is counted.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DucklingRescued {
    /// The duckling that arrived.
    pub duckling: Entity,
    /// Rescued count including this duckling.
    pub found: u32,
    /// Ducklings in the brood.
    pub total: u32,
}

/// Raised once when the last duckling is home.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroodComplete {
    /// Ducklings rescued, which is all of them.
    pub total: u32,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn apply_control_event(
    event: On<ControlEvent>,
    mut controller: ResMut<PlayerController>,
    settings: Res<CameraSettings>,
) {
    controller.handle(*event.event(), &settings);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_rescue(event: On<DucklingRescued>) {
    let DucklingRescued { found, total, .. } = event.event();
    info!("Duckling safe! {found}/{total}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_complete(event: On<BroodComplete>) {
    info!("All {} ducklings are home!", event.event().total);
}

/// Advances the leader and moves the follow camera.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
#[expect(
    clippy::too_many_arguments,
    reason = "Each parameter is a distinct Bevy resource or query the controller reads."
)]
pub fn player_controller_system(
    time: Res<Time>,
    frame: Res<FrameSettings>,
    settings: Res<PlayerSettings>,
    camera_settings: Res<CameraSettings>,
    obstacles: Res<ObstacleRegistry>,
    mut controller: ResMut<PlayerController>,
    mut players: Query<(&mut PlayerBody, &mut Transform)>,
    mut cameras: Query<&mut Transform, (With<CameraController>, Without<PlayerBody>)>,
) {
    let Ok((mut body, mut transform)) = players.single_mut() else {
        return;
    };
    let dt = frame.clamp_delta(time.delta_secs());
    let report = controller.step(&mut body, dt, &obstacles, &settings);
    if let Some(kind) = report.jump {
        debug!("{kind:?} jump, {} airborne flaps used", body.airborne_jumps());
    }
    transform.translation = body.position;
    transform.rotation = body.orientation;

    let pose = controller.camera_pose(&body, &camera_settings);
    for mut camera in &mut cameras {
        *camera = pose.transform();
    }
}

/// Poses the leader's wings from the flap timer.
pub fn wing_flap_system(
    players: Query<&PlayerBody>,
    mut wings: Query<&mut Transform, With<Wing>>,
) {
    let Ok(body) = players.single() else {
        return;
    };
    let rotation = Quat::from_rotation_x(body.wing_angle());
    for mut wing in &mut wings {
        wing.rotation = rotation;
    }
}

/// Advances every duckling that is not yet safe.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
#[expect(
    clippy::too_many_arguments,
    reason = "Each parameter is a distinct Bevy resource or query the agents read."
)]
pub fn duckling_system(
    mut commands: Commands,
    time: Res<Time>,
    frame: Res<FrameSettings>,
    settings: Res<DucklingSettings>,
    obstacles: Res<ObstacleRegistry>,
    nest: Res<NestSite>,
    mut rng: ResMut<SimRng>,
    mut progress: ResMut<ProgressTracker>,
    actors: Query<(&ActorId, &Transform), Without<Duckling>>,
    mut ducklings: Query<(Entity, &mut Duckling, &mut Transform)>,
    mut poses: Local<ActorPoses>,
) {
    poses.clear();
    for (id, transform) in &actors {
        poses.insert(*id, ActorPose::from(transform));
    }
    let env = Surroundings {
        actors: &*poses,
        obstacles: &obstacles,
        nest: nest.center,
        settings: &settings,
    };
    let dt = frame.clamp_delta(time.delta_secs());

    for (entity, mut duckling, mut transform) in &mut ducklings {
        if duckling.is_safe() {
            continue;
        }
        let change = duckling.update(dt, &mut rng.0, &env, &mut progress);
        transform.translation = duckling.position();
        transform.rotation = duckling.orientation();
        if change == Some(Transition::ReachedNest { counted: true }) {
            commands.trigger(DucklingRescued {
                duckling: entity,
                found: progress.found(),
                total: progress.total(),
            });
        }
    }
}

/// Announces completion once every duckling is home.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn progress_check_system(
    mut commands: Commands,
    progress: Res<ProgressTracker>,
    mut announced: Local<bool>,
) {
    let complete = progress.all_found();
    if complete && !*announced {
        commands.trigger(BroodComplete {
            total: progress.total(),
        });
    }
    *announced = complete;
}

/// Bevy plugin installing the simulation resources, observers and systems.
///
/// Settings resources already present (for example from
/// [`crate::config::GameConfig::insert_into`]) are kept; missing ones fall
/// back to their defaults.
#[derive(Default)]
pub struct BroodPlugin;

impl Plugin for BroodPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DucklingSettings>()
            .init_resource::<PlayerSettings>()
            .init_resource::<CameraSettings>()
            .init_resource::<WorldSettings>()
            .init_resource::<FrameSettings>()
            .init_resource::<ObstacleRegistry>()
            .init_resource::<ProgressTracker>()
            .init_resource::<PlayerController>()
            .init_resource::<NestSite>()
            .init_resource::<SimRng>();

        app.add_observer(apply_control_event)
            .add_observer(log_rescue)
            .add_observer(log_complete);

        app.add_systems(
            Update,
            (
                collect_control_input,
                player_controller_system,
                wing_flap_system,
                duckling_system,
                progress_check_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(BroodPlugin);
        let world = app.world();
        assert!(world.contains_resource::<ObstacleRegistry>());
        assert!(world.contains_resource::<ProgressTracker>());
        assert!(world.contains_resource::<PlayerController>());
        assert!(world.contains_resource::<SimRng>());
        app.update();
    }

    #[rstest]
    fn preinserted_settings_are_kept() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(CameraSettings {
            initial_distance: 12.0,
            ..Default::default()
        });
        app.add_plugins(BroodPlugin);
        let controller = app.world().resource::<PlayerController>();
        assert!((controller.camera().distance - 12.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn control_events_reach_the_controller() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(BroodPlugin);
        app.world_mut()
            .trigger(ControlEvent::KeyDown(crate::player::ControlKey::Forward));
        assert!(app.world().resource::<PlayerController>().intent().forward);
    }
}
