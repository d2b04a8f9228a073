//! Third-person orbit camera.
//!
//! The camera circles the player on a sphere described by `yaw`, `pitch` and
//! `distance`. Its orientation is independent of the player's body: pointer
//! motion turns the camera, and only forward/backward movement turns the body
//! to match it.
use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;

use crate::config::CameraSettings;

/// Polar angles are kept this far from the poles so the offset never
/// degenerates onto the vertical axis.
const POLE_EPSILON: f32 = 1.0e-6;

/// Marker component for the camera that follows the player.
///
/// The player controller system writes the orbit pose into the
/// [`Transform`] of the single entity carrying this marker.
///
/// # Examples
///
/// ```ignore
/// fn spawn_camera(mut commands: Commands) {
///     commands.spawn((Camera3d::default(), CameraController));
/// }
/// ```
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraController;

/// Where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera faces.
    pub look_at: Vec3,
}

impl CameraPose {
    /// Transform placing a camera at this pose with `+Y` up.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_at, Vec3::Y)
    }
}

/// Spherical orbit state around the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal angle around the player in radians.
    pub yaw: f32,
    /// Elevation in radians; positive looks down on the player.
    pub pitch: f32,
    /// Distance from the player.
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

impl OrbitCamera {
    /// Initial orbit taken from `settings`, clamped into its ranges.
    #[must_use]
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            yaw: settings.initial_yaw,
            pitch: settings
                .initial_pitch
                .clamp(settings.min_pitch, settings.max_pitch),
            distance: settings
                .initial_distance
                .clamp(settings.min_distance, settings.max_distance),
        }
    }

    /// Applies pointer motion in pixels.
    ///
    /// Moving right turns the camera left around the player; moving down
    /// raises the pitch. Pitch stays inside the configured range.
    pub fn look(&mut self, delta: Vec2, settings: &CameraSettings) {
        self.yaw -= delta.x * settings.mouse_sensitivity;
        self.pitch = (self.pitch + delta.y * settings.mouse_sensitivity)
            .clamp(settings.min_pitch, settings.max_pitch);
    }

    /// Applies a scroll of `lines`; positive values zoom in.
    pub fn zoom(&mut self, lines: f32, settings: &CameraSettings) {
        self.distance = (self.distance - lines * settings.zoom_sensitivity)
            .clamp(settings.min_distance, settings.max_distance);
    }

    /// Offset from the player's position to the camera.
    ///
    /// # Examples
    /// ```
    /// use brood::camera::OrbitCamera;
    /// let camera = OrbitCamera { yaw: 0.0, pitch: 0.0, distance: 5.0 };
    /// let offset = camera.offset();
    /// assert!((offset.z - 5.0).abs() < 1e-5);
    /// assert!(offset.y.abs() < 1e-5);
    /// ```
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        let polar = (FRAC_PI_2 - self.pitch).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let (sin_polar, cos_polar) = polar.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(sin_polar * sin_yaw, cos_polar, sin_polar * cos_yaw) * self.distance
    }

    /// Unit ground-plane direction the camera looks along.
    #[must_use]
    pub fn flat_forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(-sin_yaw, 0.0, -cos_yaw)
    }

    /// `up × forward`: the ground-plane axis to the camera's left when
    /// seen from behind, matching the strafe convention of the controls.
    #[must_use]
    pub fn flat_right(&self) -> Vec3 {
        Vec3::Y.cross(self.flat_forward())
    }

    /// Camera pose for a player standing at `player`.
    #[must_use]
    pub fn pose(&self, player: Vec3, settings: &CameraSettings) -> CameraPose {
        CameraPose {
            position: player + self.offset(),
            look_at: player + Vec3::Y * settings.look_height,
        }
    }
}
