//! Runtime settings resources and JSON configuration loading.
//!
//! Every settings struct defaults to the values in [`crate::constants`] and
//! deserialises with `#[serde(default)]`, so a configuration file only needs
//! to name the values it changes.
use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    CAMERA_DISTANCE, CAMERA_LOOK_HEIGHT, CAMERA_MAX_DISTANCE, CAMERA_MAX_PITCH,
    CAMERA_MIN_DISTANCE, CAMERA_MIN_PITCH, CAMERA_PITCH, CAMERA_YAW, DUCKLING_BASE_SPEED,
    DUCKLING_BODY_RADIUS, DUCKLING_COLLECTION_RADIUS, DUCKLING_FOLLOW_DISTANCE,
    DUCKLING_FOLLOW_SPEED_FACTOR, DUCKLING_GROUND_HEIGHT, DUCKLING_IDLE_SPEED_FACTOR,
    DUCKLING_MIN_NEST_DISTANCE, DUCKLING_RETARGET_MAX_SECS, DUCKLING_RETARGET_MIN_SECS,
    DUCKLING_RETURN_SPEED_FACTOR, DUCKLING_SPAWN_HALF_EXTENT, DUCKLING_SPEED_VARIATION_MAX,
    DUCKLING_SPEED_VARIATION_MIN, DUCKLING_WANDER_ARRIVAL_DISTANCE, DUCKLING_WANDER_RADIUS,
    FLAP_DURATION, FLAP_PEAK_ANGLE, GLIDE_GRAVITY_FACTOR, GRAVITY, GROUND_EPSILON, GROUND_SIZE,
    GROUND_Y, JUMP_STRENGTH, MAX_AIRBORNE_JUMPS, MAX_DELTA_SECONDS, MOTHER_HEIGHT,
    MOUSE_SENSITIVITY, NEST_POSITION, NEST_RADIUS, NEST_RETURN_RADIUS, NEST_SAFE_RADIUS,
    NEST_SETTLE_JITTER, OBSTACLE_CLEARANCE, PLAYER_BODY_HEIGHT, PLAYER_BODY_RADIUS,
    PLAYER_MOVE_SPEED, PLAYER_ROTATION_SPEED, PLAYER_START, POND_POSITION, POND_RADIUS,
    TOTAL_DUCKLINGS, TURN_BLEND_FACTOR, WORLD_HALF_EXTENT, ZOOM_SENSITIVITY,
};

/// Failure while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its allowed range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field.
        field: &'static str,
        /// What the value must satisfy.
        reason: &'static str,
    },
}

const fn ensure(condition: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

/// Juvenile agent tuning.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DucklingSettings {
    /// Walking speed before the per-duckling multiplier.
    pub base_speed: f32,
    /// Range the per-duckling speed multiplier is drawn from.
    pub speed_variation: (f32, f32),
    /// Half-width of the square new wander targets are drawn from.
    pub wander_radius: f32,
    /// Range the wander retarget timer is drawn from, in seconds.
    pub retarget_secs: (f32, f32),
    /// Fraction of the duckling speed used while wandering.
    pub idle_speed_factor: f32,
    /// Distance at which a wander target counts as reached.
    pub wander_arrival_distance: f32,
    /// Gap a follower keeps behind the leader.
    pub follow_distance: f32,
    /// Speed multiplier while following.
    pub follow_speed_factor: f32,
    /// Speed multiplier while walking home.
    pub return_speed_factor: f32,
    /// Leader distance that turns an idle duckling into a follower.
    pub collection_radius: f32,
    /// Nest distance that turns a follower into a returner.
    pub nest_return_radius: f32,
    /// Nest distance at which a returner is safe.
    pub nest_safe_radius: f32,
    /// Half-width of the square a safe duckling settles within.
    pub nest_jitter: f32,
    /// Collision radius of a duckling.
    pub body_radius: f32,
    /// Wander targets are clamped to `±world_half_extent`.
    pub world_half_extent: f32,
    /// Orientation blend applied per update call.
    pub turn_blend: f32,
}

impl Default for DucklingSettings {
    fn default() -> Self {
        Self {
            base_speed: DUCKLING_BASE_SPEED,
            speed_variation: (DUCKLING_SPEED_VARIATION_MIN, DUCKLING_SPEED_VARIATION_MAX),
            wander_radius: DUCKLING_WANDER_RADIUS,
            retarget_secs: (DUCKLING_RETARGET_MIN_SECS, DUCKLING_RETARGET_MAX_SECS),
            idle_speed_factor: DUCKLING_IDLE_SPEED_FACTOR,
            wander_arrival_distance: DUCKLING_WANDER_ARRIVAL_DISTANCE,
            follow_distance: DUCKLING_FOLLOW_DISTANCE,
            follow_speed_factor: DUCKLING_FOLLOW_SPEED_FACTOR,
            return_speed_factor: DUCKLING_RETURN_SPEED_FACTOR,
            collection_radius: DUCKLING_COLLECTION_RADIUS,
            nest_return_radius: NEST_RETURN_RADIUS,
            nest_safe_radius: NEST_SAFE_RADIUS,
            nest_jitter: NEST_SETTLE_JITTER,
            body_radius: DUCKLING_BODY_RADIUS,
            world_half_extent: WORLD_HALF_EXTENT,
            turn_blend: TURN_BLEND_FACTOR,
        }
    }
}

impl DucklingSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.base_speed > 0.0, "ducklings.base_speed", "must be positive")?;
        ensure(
            0.0 < self.speed_variation.0 && self.speed_variation.0 < self.speed_variation.1,
            "ducklings.speed_variation",
            "must be a positive, non-empty range",
        )?;
        ensure(
            0.0 < self.retarget_secs.0 && self.retarget_secs.0 < self.retarget_secs.1,
            "ducklings.retarget_secs",
            "must be a positive, non-empty range",
        )?;
        ensure(self.wander_radius > 0.0, "ducklings.wander_radius", "must be positive")?;
        ensure(
            self.nest_safe_radius > 0.0 && self.nest_safe_radius < self.nest_return_radius,
            "ducklings.nest_safe_radius",
            "must be positive and inside nest_return_radius",
        )?;
        ensure(
            self.collection_radius > 0.0,
            "ducklings.collection_radius",
            "must be positive",
        )?;
        ensure(self.nest_jitter >= 0.0, "ducklings.nest_jitter", "must not be negative")?;
        ensure(
            0.0 < self.turn_blend && self.turn_blend <= 1.0,
            "ducklings.turn_blend",
            "must be in (0, 1]",
        )
    }
}

/// Player movement and flight tuning.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Horizontal walking speed.
    pub move_speed: f32,
    /// Vertical acceleration, negative pulls down.
    pub gravity: f32,
    /// Upward velocity given by a jump.
    pub jump_strength: f32,
    /// Length of one wing flap, in seconds.
    pub flap_duration: f32,
    /// Wing rotation at the top of a flap, in radians.
    pub flap_peak_angle: f32,
    /// Jumps allowed before touching the ground again.
    pub max_airborne_jumps: u32,
    /// Gravity multiplier while gliding down between flaps.
    pub glide_gravity_factor: f32,
    /// Body turn rate in radians per second.
    pub rotation_speed: f32,
    /// Height of the body centre when standing.
    pub ground_y: f32,
    /// Band above `ground_y` that still counts as standing.
    pub ground_epsilon: f32,
    /// Collision radius of the body.
    pub body_radius: f32,
    /// Height of the body, used to clear obstacles.
    pub body_height: f32,
    /// Margin needed to pass over an obstacle's top.
    pub obstacle_clearance: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            move_speed: PLAYER_MOVE_SPEED,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            flap_duration: FLAP_DURATION,
            flap_peak_angle: FLAP_PEAK_ANGLE,
            max_airborne_jumps: MAX_AIRBORNE_JUMPS,
            glide_gravity_factor: GLIDE_GRAVITY_FACTOR,
            rotation_speed: PLAYER_ROTATION_SPEED,
            ground_y: GROUND_Y,
            ground_epsilon: GROUND_EPSILON,
            body_radius: PLAYER_BODY_RADIUS,
            body_height: PLAYER_BODY_HEIGHT,
            obstacle_clearance: OBSTACLE_CLEARANCE,
        }
    }
}

impl PlayerSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.move_speed > 0.0, "player.move_speed", "must be positive")?;
        ensure(self.gravity < 0.0, "player.gravity", "must pull downwards")?;
        ensure(self.jump_strength > 0.0, "player.jump_strength", "must be positive")?;
        ensure(self.flap_duration > 0.0, "player.flap_duration", "must be positive")?;
        ensure(
            0.0 < self.glide_gravity_factor && self.glide_gravity_factor <= 1.0,
            "player.glide_gravity_factor",
            "must be in (0, 1]",
        )?;
        ensure(self.body_height > 0.0, "player.body_height", "must be positive")?;
        ensure(self.body_radius >= 0.0, "player.body_radius", "must not be negative")
    }
}

/// Orbit camera tuning.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Starting orbit yaw, in radians.
    pub initial_yaw: f32,
    /// Starting orbit pitch, in radians.
    pub initial_pitch: f32,
    /// Starting distance from the look-at point.
    pub initial_distance: f32,
    /// Lowest pitch the orbit may reach.
    pub min_pitch: f32,
    /// Highest pitch the orbit may reach.
    pub max_pitch: f32,
    /// Closest zoom.
    pub min_distance: f32,
    /// Furthest zoom.
    pub max_distance: f32,
    /// Radians of orbit per pixel of pointer motion.
    pub mouse_sensitivity: f32,
    /// Distance change per scrolled line.
    pub zoom_sensitivity: f32,
    /// Height above the player the camera aims at.
    pub look_height: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            initial_yaw: CAMERA_YAW,
            initial_pitch: CAMERA_PITCH,
            initial_distance: CAMERA_DISTANCE,
            min_pitch: CAMERA_MIN_PITCH,
            max_pitch: CAMERA_MAX_PITCH,
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            look_height: CAMERA_LOOK_HEIGHT,
        }
    }
}

impl CameraSettings {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.min_pitch <= self.max_pitch,
            "camera.min_pitch",
            "must not exceed max_pitch",
        )?;
        ensure(
            0.0 < self.min_distance && self.min_distance <= self.max_distance,
            "camera.min_distance",
            "must be positive and not exceed max_distance",
        )
    }
}

/// Layout of the world created at startup.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Ducklings to scatter and rescue.
    pub total_ducklings: u32,
    /// Half-width of the square ducklings spawn in.
    pub spawn_half_extent: f32,
    /// Closest a duckling may spawn to the nest.
    pub min_nest_distance: f32,
    /// Height ducklings stand at.
    pub duckling_height: f32,
    /// Nest centre.
    pub nest_position: [f32; 3],
    /// Footprint radius of the nest obstacle.
    pub nest_radius: f32,
    /// Height of the mother standing at the nest.
    pub mother_height: f32,
    /// Where the father starts.
    pub player_start: [f32; 3],
    /// Pond centre.
    pub pond_position: [f32; 3],
    /// Footprint radius of the pond.
    pub pond_radius: f32,
    /// Edge length of the ground plane.
    pub ground_size: f32,
    /// Rocks scattered as scenery.
    pub rocks: u32,
    /// Trees scattered as scenery.
    pub trees: u32,
    /// Bushes scattered as scenery.
    pub bushes: u32,
    /// Seed for every random draw; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            total_ducklings: TOTAL_DUCKLINGS,
            spawn_half_extent: DUCKLING_SPAWN_HALF_EXTENT,
            min_nest_distance: DUCKLING_MIN_NEST_DISTANCE,
            duckling_height: DUCKLING_GROUND_HEIGHT,
            nest_position: NEST_POSITION,
            nest_radius: NEST_RADIUS,
            mother_height: MOTHER_HEIGHT,
            player_start: PLAYER_START,
            pond_position: POND_POSITION,
            pond_radius: POND_RADIUS,
            ground_size: GROUND_SIZE,
            rocks: 20,
            trees: 30,
            bushes: 40,
            seed: None,
        }
    }
}

impl WorldSettings {
    /// Nest centre as a vector.
    #[must_use]
    pub const fn nest(&self) -> Vec3 {
        Vec3::from_array(self.nest_position)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.total_ducklings > 0,
            "world.total_ducklings",
            "must be positive",
        )?;
        ensure(
            self.spawn_half_extent > 0.0,
            "world.spawn_half_extent",
            "must be positive",
        )?;
        ensure(
            self.min_nest_distance >= 0.0,
            "world.min_nest_distance",
            "must not be negative",
        )?;
        ensure(self.ground_size > 0.0, "world.ground_size", "must be positive")
    }
}

/// Frame pacing limits.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Largest frame delta fed into the simulation.
    ///
    /// Clamps large frame hitches so actors cannot jump extreme distances
    /// during lag spikes.
    pub max_delta_seconds: f32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            max_delta_seconds: MAX_DELTA_SECONDS,
        }
    }
}

impl FrameSettings {
    /// Clamps a raw frame delta into `[0, max_delta_seconds]`.
    #[must_use]
    pub fn clamp_delta(&self, delta: f32) -> f32 {
        // Guard against non-positive limits to avoid zero or reversed motion.
        let limit = self.max_delta_seconds.max(f32::EPSILON);
        delta.clamp(0.0, limit)
    }
}

/// All settings, as read from a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Duckling tuning.
    pub ducklings: DucklingSettings,
    /// Player tuning.
    pub player: PlayerSettings,
    /// Camera tuning.
    pub camera: CameraSettings,
    /// World layout.
    pub world: WorldSettings,
    /// Frame pacing.
    pub frame: FrameSettings,
}

impl GameConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    ///
    /// # Examples
    /// ```
    /// use brood::config::GameConfig;
    /// let config = GameConfig::from_json_str(r#"{ "world": { "total_ducklings": 3 } }"#)?;
    /// assert_eq!(config.world.total_ducklings, 3);
    /// assert_eq!(config.player, Default::default());
    /// # Ok::<(), brood::config::ConfigError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`GameConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let json = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Validates every section.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ducklings.validate()?;
        self.player.validate()?;
        self.camera.validate()?;
        self.world.validate()
    }

    /// Inserts every section as a resource.
    pub fn insert_into(self, app: &mut App) {
        app.insert_resource(self.ducklings)
            .insert_resource(self.player)
            .insert_resource(self.camera)
            .insert_resource(self.world)
            .insert_resource(self.frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = GameConfig::from_json_str(r#"{ "player": { "max_airborne_jumps": 2 } }"#)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(config.player.max_airborne_jumps, 2);
        assert_eq!(config.player.jump_strength, JUMP_STRENGTH);
        assert_eq!(config.ducklings, DucklingSettings::default());
    }

    #[rstest]
    #[case::zero_total(r#"{ "world": { "total_ducklings": 0 } }"#, "world.total_ducklings")]
    #[case::glide_above_one(r#"{ "player": { "glide_gravity_factor": 1.5 } }"#, "player.glide_gravity_factor")]
    #[case::inverted_pitch(r#"{ "camera": { "min_pitch": 1.0, "max_pitch": 0.0 } }"#, "camera.min_pitch")]
    #[case::safe_outside_return(r#"{ "ducklings": { "nest_safe_radius": 4.0 } }"#, "ducklings.nest_safe_radius")]
    #[case::empty_retarget(r#"{ "ducklings": { "retarget_secs": [3.0, 3.0] } }"#, "ducklings.retarget_secs")]
    fn invalid_values_are_rejected(#[case] json: &str, #[case] expected_field: &str) {
        match GameConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            GameConfig::load("/nonexistent/brood.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[rstest]
    #[case::hitch(1.5, 0.1)]
    #[case::normal(0.016, 0.016)]
    #[case::negative(-0.5, 0.0)]
    fn frame_delta_is_clamped(#[case] raw: f32, #[case] expected: f32) {
        let frame = FrameSettings::default();
        assert!((frame.clamp_delta(raw) - expected).abs() < 1e-6);
    }
}
