//! Gameplay tuning constants used across systems.
//!
//! These are the defaults behind the settings resources in
//! [`crate::config`]. Several of them were tuned against per-call blending
//! rather than time-scaled smoothing, so changing the frame pacing changes
//! how they feel.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_8, TAU};

// --- Ducklings ---

/// Base walking speed before the per-duckling variation is applied.
pub const DUCKLING_BASE_SPEED: f32 = 1.0;
/// Lower bound of the speed multiplier rolled at spawn.
pub const DUCKLING_SPEED_VARIATION_MIN: f32 = 0.8;
/// Upper bound (exclusive) of the speed multiplier rolled at spawn.
pub const DUCKLING_SPEED_VARIATION_MAX: f32 = 1.2;
/// Half-width of the square a new wander target is picked from.
pub const DUCKLING_WANDER_RADIUS: f32 = 5.0;
/// Shortest time before an idle duckling picks a new wander target.
pub const DUCKLING_RETARGET_MIN_SECS: f32 = 2.0;
/// Longest time before an idle duckling picks a new wander target.
pub const DUCKLING_RETARGET_MAX_SECS: f32 = 6.0;
/// Speed multiplier while wandering.
pub const DUCKLING_IDLE_SPEED_FACTOR: f32 = 0.6;
/// Distance at which a wander target counts as reached.
pub const DUCKLING_WANDER_ARRIVAL_DISTANCE: f32 = 0.5;
/// Gap kept between a following duckling and its leader.
pub const DUCKLING_FOLLOW_DISTANCE: f32 = 1.5;
/// Speed multiplier while following.
pub const DUCKLING_FOLLOW_SPEED_FACTOR: f32 = 1.1;
/// Speed multiplier while heading into the nest.
pub const DUCKLING_RETURN_SPEED_FACTOR: f32 = 1.0;
/// How close the leader must come for an idle duckling to start following.
pub const DUCKLING_COLLECTION_RADIUS: f32 = 2.0;
/// Distance to the nest centre at which a follower breaks off and returns.
pub const NEST_RETURN_RADIUS: f32 = 3.5;
/// Distance to the nest centre at which a returning duckling is safe.
pub const NEST_SAFE_RADIUS: f32 = 0.5;
/// Per-axis jitter applied when a duckling settles in the nest.
pub const NEST_SETTLE_JITTER: f32 = 0.75;
/// Collision radius of a duckling body.
pub const DUCKLING_BODY_RADIUS: f32 = 0.25;
/// Squared steering length below which an idle duckling does not move.
pub const STEERING_EPSILON_SQ: f32 = 0.01;
/// Squared direction length below which no re-orientation happens.
pub const ORIENTATION_EPSILON_SQ: f32 = 0.001;
/// Fraction of the remaining rotation applied per orientation update.
pub const TURN_BLEND_FACTOR: f32 = 0.1;

// --- World ---

/// Wander targets are clamped to `[-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT]`.
pub const WORLD_HALF_EXTENT: f32 = 95.0;
/// Side length of the square ground plane.
pub const GROUND_SIZE: f32 = 200.0;
/// Number of ducklings scattered at game start.
pub const TOTAL_DUCKLINGS: u32 = 66;
/// Half-width of the square ducklings are spawned in.
pub const DUCKLING_SPAWN_HALF_EXTENT: f32 = 80.0;
/// Minimum ground-plane distance between a spawn point and the nest.
pub const DUCKLING_MIN_NEST_DISTANCE: f32 = 10.0;
/// Rendering height of a duckling on flat ground.
pub const DUCKLING_GROUND_HEIGHT: f32 = 0.25;
/// Centre of the nest.
pub const NEST_POSITION: [f32; 3] = [10.0, 0.1, -5.0];
/// Footprint radius of the nest ring.
pub const NEST_RADIUS: f32 = 2.5;
/// Height the mother sits at inside the nest.
pub const MOTHER_HEIGHT: f32 = 0.5;
/// Where the player starts.
pub const PLAYER_START: [f32; 3] = [0.0, 0.5, 5.0];
/// Centre of the pond.
pub const POND_POSITION: [f32; 3] = [-30.0, 0.01, 20.0];
/// Radius of the pond.
pub const POND_RADIUS: f32 = 15.0;

// --- Player ---

/// Horizontal walking speed in units per second.
pub const PLAYER_MOVE_SPEED: f32 = 5.0;
/// Downward acceleration applied while airborne.
pub const GRAVITY: f32 = -9.8 * 2.0;
/// Vertical speed granted by a jump or flap.
pub const JUMP_STRENGTH: f32 = 6.0;
/// Length of a wing flap in seconds.
pub const FLAP_DURATION: f32 = 0.3;
/// Peak wing angle reached halfway through a flap.
pub const FLAP_PEAK_ANGLE: f32 = FRAC_PI_3;
/// Flaps allowed before the player has to land again.
pub const MAX_AIRBORNE_JUMPS: u32 = 10;
/// Gravity multiplier while gliding down between flaps.
pub const GLIDE_GRAVITY_FACTOR: f32 = 0.3;
/// Body turn rate in radians per second.
pub const PLAYER_ROTATION_SPEED: f32 = TAU;
/// Height of the player's origin when standing on the ground.
pub const GROUND_Y: f32 = 0.5;
/// Tolerance used when deciding whether the player stands on the ground.
pub const GROUND_EPSILON: f32 = 0.01;
/// Collision radius of the player body.
pub const PLAYER_BODY_RADIUS: f32 = 0.5;
/// Height of the player body.
pub const PLAYER_BODY_HEIGHT: f32 = 1.0;
/// Clearance needed to pass over the top of an obstacle.
pub const OBSTACLE_CLEARANCE: f32 = 0.1;
/// Squared input length below which the player counts as standing still.
pub const INPUT_EPSILON_SQ: f32 = 0.01;

// --- Camera ---

/// Initial horizontal orbit angle.
pub const CAMERA_YAW: f32 = 0.0;
/// Initial vertical orbit angle, slightly looking down.
pub const CAMERA_PITCH: f32 = FRAC_PI_8;
/// Lowest pitch, limits looking up.
pub const CAMERA_MIN_PITCH: f32 = -FRAC_PI_4;
/// Highest pitch, limits looking down.
pub const CAMERA_MAX_PITCH: f32 = FRAC_PI_2 - 0.1;
/// Initial orbit distance, the length of the `(0, 3, 7)` offset.
pub const CAMERA_DISTANCE: f32 = 7.615_773;
/// Closest zoom.
pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
/// Farthest zoom.
pub const CAMERA_MAX_DISTANCE: f32 = 20.0;
/// Radians of orbit per pixel of pointer motion.
pub const MOUSE_SENSITIVITY: f32 = 0.002;
/// Distance change per scrolled line.
pub const ZOOM_SENSITIVITY: f32 = 0.5;
/// Pixel-precise scroll deltas are converted to lines with this ratio.
pub const SCROLL_PIXELS_PER_LINE: f32 = 100.0;
/// Height above the player's origin the camera aims at.
pub const CAMERA_LOOK_HEIGHT: f32 = 1.0;

// --- Frame pacing ---

/// Largest frame delta fed into the simulation.
pub const MAX_DELTA_SECONDS: f32 = 0.1;
