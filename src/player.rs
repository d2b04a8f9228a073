//! Player movement, flight and the control state feeding it.
//!
//! Input arrives as [`ControlEvent`]s and is folded into a
//! [`PlayerController`]. Once per frame [`PlayerController::step`] integrates
//! a [`PlayerBody`]: camera-relative walking, jumping, a bounded number of
//! airborne flaps, gliding, obstacle blocking and the ground clamp.
use std::f32::consts::PI;

use bevy::prelude::*;
use log::debug;

use crate::camera::{CameraPose, OrbitCamera};
use crate::config::{CameraSettings, PlayerSettings};
use crate::constants::INPUT_EPSILON_SQ;
use crate::obstacle::{BodyExtent, ObstacleRegistry};
use crate::vector_math::rotate_towards;

/// Logical control bound to one or more physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    /// Walk away from the camera.
    Forward,
    /// Walk towards the camera.
    Backward,
    /// Step left.
    StrafeLeft,
    /// Step right.
    StrafeRight,
    /// Jump or flap.
    Jump,
}

/// Platform-neutral input event.
///
/// Triggered globally; the plugin's observer folds each one into the
/// [`PlayerController`] before the next movement step.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// A control was pressed.
    KeyDown(ControlKey),
    /// A control was released.
    KeyUp(ControlKey),
    /// Pointer motion in pixels since the last event.
    LookDelta(Vec2),
    /// Scroll in lines; positive zooms in.
    Zoom(f32),
    /// Pointer capture was gained (`true`) or lost (`false`).
    PointerCapture(bool),
    /// The window lost keyboard focus.
    FocusLost,
}

/// Movement keys currently held plus a pending jump request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per movement control; the jump flag is a one-shot request."
)]
pub struct MoveIntent {
    /// Forward is held.
    pub forward: bool,
    /// Backward is held.
    pub backward: bool,
    /// Strafe left is held.
    pub strafe_left: bool,
    /// Strafe right is held.
    pub strafe_right: bool,
    /// Consumed by the next controller step whether or not it is honoured.
    pub jump: bool,
}

impl MoveIntent {
    /// Records a key press.
    pub fn press(&mut self, key: ControlKey) {
        match key {
            ControlKey::Forward => self.forward = true,
            ControlKey::Backward => self.backward = true,
            ControlKey::StrafeLeft => self.strafe_left = true,
            ControlKey::StrafeRight => self.strafe_right = true,
            ControlKey::Jump => self.jump = true,
        }
    }

    /// Records a key release. Releasing jump does not cancel a pending
    /// request.
    pub fn release(&mut self, key: ControlKey) {
        match key {
            ControlKey::Forward => self.forward = false,
            ControlKey::Backward => self.backward = false,
            ControlKey::StrafeLeft => self.strafe_left = false,
            ControlKey::StrafeRight => self.strafe_right = false,
            ControlKey::Jump => {}
        }
    }

    /// Drops every held flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the body should turn to the camera heading.
    #[must_use]
    pub const fn turns_body(&self) -> bool {
        self.forward || self.backward
    }

    /// Unnormalised ground-plane input for the given camera axes.
    ///
    /// Strafing left adds `right`, strafing right subtracts it; see
    /// [`OrbitCamera::flat_right`].
    #[must_use]
    pub fn direction(&self, forward: Vec3, right: Vec3) -> Vec3 {
        let mut input = Vec3::ZERO;
        if self.forward {
            input += forward;
        }
        if self.backward {
            input -= forward;
        }
        if self.strafe_left {
            input += right;
        }
        if self.strafe_right {
            input -= right;
        }
        input
    }
}

/// Countdown driving the cosmetic wing flap.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlapTimer {
    remaining: f32,
    duration: f32,
    angle: f32,
}

impl FlapTimer {
    /// Restarts the flap.
    pub fn start(&mut self, duration: f32) {
        self.duration = duration.max(f32::EPSILON);
        self.remaining = self.duration;
    }

    /// Whether a flap is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Current wing angle in radians; zero when idle.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances the flap and returns the new wing angle.
    ///
    /// The angle follows a half sine over the duration, peaking at
    /// `peak_angle`, and drops back to zero once the timer expires.
    pub fn tick(&mut self, dt: f32, peak_angle: f32) -> f32 {
        if !self.is_active() {
            self.angle = 0.0;
            return self.angle;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.angle = 0.0;
        } else {
            let progress = (self.duration - self.remaining) / self.duration;
            self.angle = (progress * PI).sin() * peak_angle;
        }
        self.angle
    }
}

/// Which kind of jump a request produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Taken from the ground.
    Ground,
    /// A flap while airborne; counts against the airborne limit.
    Airborne,
}

/// What happened during one controller step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The honoured jump, if any.
    pub jump: Option<JumpKind>,
    /// The body touched down this step after being airborne.
    pub landed: bool,
    /// Horizontal movement was discarded by an obstacle.
    pub blocked: bool,
}

/// Simulated state of the player-controlled leader.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerBody {
    /// Origin of the body, halfway up its height.
    pub position: Vec3,
    /// Facing; forward is the body's local -Z.
    pub orientation: Quat,
    /// Upward speed, negative while falling.
    pub vertical_velocity: f32,
    airborne_jumps: u32,
    flap: FlapTimer,
}

impl PlayerBody {
    /// A body at rest at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            vertical_velocity: 0.0,
            airborne_jumps: 0,
            flap: FlapTimer::default(),
        }
    }

    /// Whether the body stands on the ground.
    #[must_use]
    pub fn on_ground(&self, settings: &PlayerSettings) -> bool {
        self.position.y <= settings.ground_y + settings.ground_epsilon
    }

    /// Flaps used since the body last touched the ground.
    #[must_use]
    pub const fn airborne_jumps(&self) -> u32 {
        self.airborne_jumps
    }

    /// Flap animation state.
    #[must_use]
    pub const fn flap(&self) -> &FlapTimer {
        &self.flap
    }

    /// Cosmetic wing angle for the current frame.
    #[must_use]
    pub const fn wing_angle(&self) -> f32 {
        self.flap.angle()
    }

    /// Attempts a jump.
    ///
    /// Grounded jumps are always honoured. Airborne jumps are honoured while
    /// fewer than `max_airborne_jumps` have been used since the last landing.
    pub fn try_jump(&mut self, grounded: bool, settings: &PlayerSettings) -> Option<JumpKind> {
        let kind = if grounded {
            JumpKind::Ground
        } else if self.airborne_jumps < settings.max_airborne_jumps {
            self.airborne_jumps += 1;
            JumpKind::Airborne
        } else {
            return None;
        };
        self.vertical_velocity = settings.jump_strength;
        self.flap.start(settings.flap_duration);
        Some(kind)
    }

    fn extent(settings: &PlayerSettings) -> BodyExtent {
        BodyExtent {
            radius: settings.body_radius,
            height: settings.body_height,
        }
    }
}

/// Control state shared between input handling and the movement step.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerController {
    intent: MoveIntent,
    pointer_captured: bool,
    camera: OrbitCamera,
}

impl FromWorld for PlayerController {
    fn from_world(world: &mut World) -> Self {
        let settings = world
            .get_resource::<CameraSettings>()
            .cloned()
            .unwrap_or_default();
        Self::new(&settings)
    }
}

impl PlayerController {
    /// A controller with no keys held and the camera at its initial orbit.
    #[must_use]
    pub fn new(camera: &CameraSettings) -> Self {
        Self {
            intent: MoveIntent::default(),
            pointer_captured: false,
            camera: OrbitCamera::from_settings(camera),
        }
    }

    /// Held keys and pending jump.
    #[must_use]
    pub const fn intent(&self) -> &MoveIntent {
        &self.intent
    }

    /// Whether the pointer currently drives the orbit.
    #[must_use]
    pub const fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Current orbit.
    #[must_use]
    pub const fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Folds one input event into the control state.
    ///
    /// Pointer motion only turns the camera while the pointer is captured.
    /// Losing capture or focus drops every held key but keeps the orbit.
    pub fn handle(&mut self, event: ControlEvent, settings: &CameraSettings) {
        match event {
            ControlEvent::KeyDown(key) => self.intent.press(key),
            ControlEvent::KeyUp(key) => self.intent.release(key),
            ControlEvent::LookDelta(delta) => {
                if self.pointer_captured {
                    self.camera.look(delta, settings);
                }
            }
            ControlEvent::Zoom(lines) => self.camera.zoom(lines, settings),
            ControlEvent::PointerCapture(true) => self.pointer_captured = true,
            ControlEvent::PointerCapture(false) | ControlEvent::FocusLost => {
                if self.pointer_captured || self.intent != MoveIntent::default() {
                    debug!("control focus lost; releasing held keys");
                }
                self.pointer_captured = false;
                self.intent.clear();
            }
        }
    }

    /// Horizontal velocity requested by the held keys.
    #[must_use]
    pub fn desired_velocity(&self, settings: &PlayerSettings) -> Vec3 {
        let input = self
            .intent
            .direction(self.camera.flat_forward(), self.camera.flat_right());
        if input.length_squared() > INPUT_EPSILON_SQ {
            input.normalize() * settings.move_speed
        } else {
            Vec3::ZERO
        }
    }

    /// Advances `body` by `dt` seconds.
    pub fn step(
        &mut self,
        body: &mut PlayerBody,
        dt: f32,
        obstacles: &ObstacleRegistry,
        settings: &PlayerSettings,
    ) -> StepReport {
        let mut report = StepReport::default();
        let grounded = body.on_ground(settings);
        if grounded {
            body.airborne_jumps = 0;
            body.vertical_velocity = 0.0;
        }

        if self.intent.turns_body() {
            let forward = self.camera.flat_forward();
            let heading = Quat::from_rotation_y(forward.x.atan2(forward.z));
            body.orientation =
                rotate_towards(body.orientation, heading, settings.rotation_speed * dt);
        }
        let horizontal = self.desired_velocity(settings);

        if self.intent.jump {
            report.jump = body.try_jump(grounded, settings);
            self.intent.jump = false;
        }

        if !grounded {
            let gliding = !body.flap.is_active() && body.vertical_velocity <= 0.0;
            let factor = if gliding {
                settings.glide_gravity_factor
            } else {
                1.0
            };
            body.vertical_velocity += settings.gravity * factor * dt;
        }

        let velocity = horizontal + Vec3::Y * body.vertical_velocity;
        let mut next = body.position + velocity * dt;
        if horizontal != Vec3::ZERO
            && obstacles.blocks_body(
                next,
                PlayerBody::extent(settings),
                settings.obstacle_clearance,
            )
        {
            next.x = body.position.x;
            next.z = body.position.z;
            report.blocked = true;
        }

        if next.y < settings.ground_y {
            next.y = settings.ground_y;
        }
        body.position = next;
        if body.on_ground(settings) {
            if !body.flap.is_active() {
                body.position.y = settings.ground_y;
                body.vertical_velocity = 0.0;
            }
            body.airborne_jumps = 0;
            report.landed = !grounded;
        }

        body.flap.tick(dt, settings.flap_peak_angle);
        report
    }

    /// Camera pose following `body`.
    #[must_use]
    pub fn camera_pose(&self, body: &PlayerBody, settings: &CameraSettings) -> CameraPose {
        self.camera.pose(body.position, settings)
    }
}
