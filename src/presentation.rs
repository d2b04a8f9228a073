//! Presentation layer: camera, light, placeholder meshes and window focus.
//!
//! `PresentationPlugin` gives the headless simulation something to look at.
//! It stays a passive observer of simulation state; the only thing it feeds
//! back is [`ControlEvent::FocusLost`] when the primary window loses focus.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use log::debug;

use crate::camera::CameraController;
use crate::components::{Beacon, Leader, Wing};
use crate::config::WorldSettings;
use crate::duckling::Duckling;
use crate::input::collect_control_input;
use crate::obstacle::{ObstacleKind, ObstacleRegistry};
use crate::player::ControlEvent;

/// Spawns the follow camera unless one already exists.
pub fn spawn_camera(mut commands: Commands, cameras: Query<(), With<CameraController>>) {
    if !cameras.is_empty() {
        return;
    }
    commands.spawn((
        Camera3d::default(),
        CameraController,
        Transform::from_xyz(0.0, 3.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Spawns a single sun.
pub fn spawn_light(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Mesh standing in for an obstacle record, with its translation.
fn obstacle_mesh(kind: ObstacleKind, position: Vec3, radius: f32, top: f32) -> (Mesh, Vec3, Color) {
    match kind {
        ObstacleKind::Rock => (Sphere::new(radius).into(), position, Color::srgb(0.5, 0.5, 0.5)),
        ObstacleKind::Tree => (
            Cylinder::new(radius, top).into(),
            Vec3::new(position.x, top * 0.5, position.z),
            Color::srgb(0.25, 0.45, 0.15),
        ),
        ObstacleKind::Bush => (Sphere::new(radius).into(), position, Color::srgb(0.2, 0.55, 0.2)),
        ObstacleKind::Nest => (
            Cylinder::new(radius, 0.2).into(),
            position,
            Color::srgb(0.55, 0.4, 0.25),
        ),
        ObstacleKind::Pond => (
            Cylinder::new(radius, 0.02).into(),
            position,
            Color::srgb(0.2, 0.4, 0.8),
        ),
        ObstacleKind::Other => (Cuboid::from_length(radius * 2.0).into(), position, Color::WHITE),
    }
}

/// Attaches primitive meshes to the ground, scenery and actors.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
#[expect(
    clippy::too_many_arguments,
    reason = "Each parameter is a distinct Bevy resource or query the meshes are built from."
)]
pub fn spawn_placeholders(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    world: Res<WorldSettings>,
    registry: Res<ObstacleRegistry>,
    leaders: Query<Entity, With<Leader>>,
    beacons: Query<Entity, With<Beacon>>,
    ducklings: Query<Entity, With<Duckling>>,
    wings: Query<Entity, With<Wing>>,
) {
    let size = world.ground_size;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.6, 0.25))),
        Transform::default(),
    ));

    for (_, obstacle) in registry.iter() {
        let (mesh, translation, color) = obstacle_mesh(
            obstacle.kind,
            obstacle.position,
            obstacle.bounding_radius,
            obstacle.top(),
        );
        commands.spawn((
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(color)),
            Transform::from_translation(translation),
        ));
    }

    let mut dress = |entity: Entity, mesh: Mesh, color: Color| {
        commands
            .entity(entity)
            .insert((Mesh3d(meshes.add(mesh)), MeshMaterial3d(materials.add(color))));
    };
    for entity in &leaders {
        dress(entity, Sphere::new(0.5).into(), Color::srgb(0.45, 0.3, 0.15));
    }
    for entity in &wings {
        dress(entity, Cuboid::new(0.4, 0.08, 0.5).into(), Color::srgb(0.4, 0.25, 0.1));
    }
    for entity in &beacons {
        dress(entity, Sphere::new(0.5).into(), Color::srgb(0.85, 0.8, 0.7));
    }
    for entity in &ducklings {
        dress(entity, Sphere::new(0.25).into(), Color::srgb(1.0, 0.85, 0.2));
    }
    debug!("placeholder meshes attached");
}

/// Turns loss of primary-window focus into [`ControlEvent::FocusLost`].
pub fn forward_focus_loss(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut was_focused: Local<bool>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if *was_focused && !window.focused {
        commands.trigger(ControlEvent::FocusLost);
    }
    *was_focused = window.focused;
}

/// Bevy plugin owning camera setup and placeholder rendering.
#[derive(Default)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_light, spawn_placeholders));
        app.add_systems(Update, forward_focus_loss.before(collect_control_input));
    }
}
