//! Ground-plane vector helpers and orientation primitives.
//!
//! Gameplay distances ignore the vertical axis: `y` is rendering height.
//! Agents face along their local `+Z` axis ([`FORWARD`]).
use bevy::math::{Quat, Vec2, Vec3};

/// Local forward axis of every actor model.
pub const FORWARD: Vec3 = Vec3::Z;

/// Projects a position onto the ground plane as `(x, z)`.
///
/// # Examples
/// ```
/// use bevy::math::{Vec2, Vec3};
/// use brood::vector_math::ground;
/// assert_eq!(ground(Vec3::new(1.0, 7.0, -2.0)), Vec2::new(1.0, -2.0));
/// ```
#[must_use]
pub const fn ground(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Returns `to - from` with the vertical component zeroed.
#[must_use]
pub fn ground_offset(from: Vec3, to: Vec3) -> Vec3 {
    let offset = to - from;
    Vec3::new(offset.x, 0.0, offset.z)
}

/// Euclidean distance between two points, ignoring height.
///
/// # Examples
/// ```
/// use bevy::math::Vec3;
/// use brood::vector_math::ground_distance;
/// let d = ground_distance(Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, -2.0, 4.0));
/// assert!((d - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    ground(a).distance(ground(b))
}

/// Squared ground-plane distance between two points.
#[must_use]
pub fn ground_distance_squared(a: Vec3, b: Vec3) -> f32 {
    ground(a).distance_squared(ground(b))
}

/// Normalises the ground-plane part of `vector`.
///
/// Returns `None` when the vector is not finite or its squared ground length
/// does not exceed `min_length_squared`, so callers never steer along an
/// undefined direction.
///
/// # Examples
/// ```
/// use bevy::math::Vec3;
/// use brood::vector_math::try_ground_normalize;
/// let dir = try_ground_normalize(Vec3::new(3.0, 9.0, 4.0), 0.01).unwrap();
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// assert_eq!(dir.y, 0.0);
/// assert!(try_ground_normalize(Vec3::new(0.01, 1.0, 0.0), 0.01).is_none());
/// ```
#[must_use]
pub fn try_ground_normalize(vector: Vec3, min_length_squared: f32) -> Option<Vec3> {
    let flat = Vec3::new(vector.x, 0.0, vector.z);
    if !flat.is_finite() || flat.length_squared() <= min_length_squared {
        return None;
    }
    flat.try_normalize()
}

/// Unit rotation taking [`FORWARD`] onto `direction`.
///
/// Returns `None` for degenerate directions.
#[must_use]
pub fn heading_towards(direction: Vec3) -> Option<Quat> {
    let unit = direction.try_normalize()?;
    Some(Quat::from_rotation_arc(FORWARD, unit))
}

/// Rotation that makes an actor at `from` face `to` horizontally.
#[must_use]
pub fn face_on_ground(from: Vec3, to: Vec3) -> Option<Quat> {
    heading_towards(ground_offset(from, to))
}

/// Blends `current` a fixed fraction of the way towards facing `direction`.
///
/// The blend is proportional per call rather than scaled by elapsed time, so
/// the effective turn rate depends on the frame rate. Directions whose
/// squared length is below `min_length_squared` leave `current` untouched.
#[must_use]
pub fn blend_towards(current: Quat, direction: Vec3, factor: f32, min_length_squared: f32) -> Quat {
    if direction.length_squared() <= min_length_squared {
        return current;
    }
    heading_towards(direction).map_or(current, |target| current.slerp(target, factor))
}

/// Rotates `current` towards `target` by at most `max_angle` radians.
///
/// Reaches `target` exactly once the remaining angle fits in one step.
#[must_use]
pub fn rotate_towards(current: Quat, target: Quat, max_angle: f32) -> Quat {
    let remaining = current.angle_between(target);
    if remaining <= f32::EPSILON {
        return target;
    }
    let t = (max_angle / remaining).clamp(0.0, 1.0);
    current.slerp(target, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case::along_x(Vec3::X)]
    #[case::along_neg_z(Vec3::NEG_Z)]
    #[case::diagonal(Vec3::new(1.0, 0.0, 1.0))]
    fn heading_maps_forward_onto_direction(#[case] direction: Vec3) {
        let rotation = heading_towards(direction).unwrap_or_else(|| panic!("valid direction"));
        let rotated = rotation * FORWARD;
        let expected = direction.normalize();
        assert_relative_eq!(rotated.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn heading_rejects_zero_direction() {
        assert!(heading_towards(Vec3::ZERO).is_none());
    }

    #[test]
    fn blend_moves_a_tenth_of_the_way() {
        let current = Quat::IDENTITY;
        let blended = blend_towards(current, Vec3::X, 0.1, 0.001);
        assert_relative_eq!(current.angle_between(blended), FRAC_PI_2 * 0.1, epsilon = 1e-4);
    }

    #[test]
    fn blend_ignores_tiny_directions() {
        let current = Quat::from_rotation_y(0.3);
        let blended = blend_towards(current, Vec3::new(0.01, 0.0, 0.0), 0.1, 0.001);
        assert_eq!(blended, current);
    }

    #[rstest]
    #[case::partial_step(PI, 0.5, 0.5)]
    #[case::overshoot_clamps(0.2, 1.0, 0.2)]
    fn rotate_towards_limits_step(#[case] target_angle: f32, #[case] step: f32, #[case] moved: f32) {
        let target = Quat::from_rotation_y(target_angle * 0.999);
        let result = rotate_towards(Quat::IDENTITY, target, step);
        assert_relative_eq!(
            Quat::IDENTITY.angle_between(result),
            moved.min(target_angle * 0.999),
            epsilon = 1e-3
        );
    }

    #[test]
    fn ground_distance_ignores_height() {
        let a = Vec3::new(0.0, 100.0, 0.0);
        let b = Vec3::new(0.0, -100.0, 1.0);
        assert_relative_eq!(ground_distance(a, b), 1.0);
        assert_relative_eq!(ground_distance_squared(a, b), 1.0);
    }

    #[test]
    fn try_normalize_rejects_nan() {
        assert!(try_ground_normalize(Vec3::new(f32::NAN, 0.0, 1.0), 0.0).is_none());
    }
}
