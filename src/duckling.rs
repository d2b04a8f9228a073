//! Juvenile agent state machine.
//!
//! A duckling wanders until the leader comes close, follows the leader until
//! it is near the nest, walks into the nest, and stays there. Transitions
//! only move forward (`Idle → Following → Returning → Safe`); the single
//! exception is a follower whose leader can no longer be resolved, which
//! drops back to `Idle`.
//!
//! Collision reactions differ by state: a blocked wanderer picks a new
//! wander target at once, while a blocked follower or returner just skips
//! the move for that frame. Both policies are kept as tuned.
use bevy::prelude::*;
use log::{debug, warn};
use rand::Rng;

use crate::actor::{ActorId, ActorLookup, Guardians};
use crate::config::DucklingSettings;
use crate::constants::{ORIENTATION_EPSILON_SQ, STEERING_EPSILON_SQ};
use crate::obstacle::{ObstacleId, ObstacleRegistry};
use crate::progress::ProgressTracker;
use crate::vector_math::{
    blend_towards, face_on_ground, ground_distance, ground_offset, try_ground_normalize,
};

/// Behavioural state, carrying only the data that state needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DucklingState {
    /// Wandering between random nearby points.
    Idle {
        /// Point currently walked towards.
        wander_target: Vec3,
        /// Seconds until a new wander target is picked.
        retarget_in: f32,
    },
    /// Trailing the leader.
    Following {
        /// Whom to trail.
        leader: ActorId,
    },
    /// Walking into the nest.
    Returning {
        /// Where home is.
        nest: Vec3,
    },
    /// Home. Terminal.
    Safe {
        /// The nest it settled in.
        nest: Vec3,
    },
}

impl DucklingState {
    /// Short name used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::Following { .. } => "following",
            Self::Returning { .. } => "returning",
            Self::Safe { .. } => "safe",
        }
    }
}

/// A state change made by [`Duckling::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The leader came within the collection radius.
    StartedFollowing,
    /// The leader could not be resolved; back to wandering.
    LeaderLost,
    /// Close enough to the nest to walk in alone.
    StartedReturning,
    /// Arrived. `counted` reports whether the tracker accepted the rescue.
    ReachedNest {
        /// Whether the tracker accepted the rescue.
        counted: bool,
    },
}

/// Everything a duckling reads from the world during an update.
#[derive(Clone, Copy)]
pub struct Surroundings<'a> {
    /// Current poses of the leader and beacon.
    pub actors: &'a dyn ActorLookup,
    /// Scenery that blocks movement.
    pub obstacles: &'a ObstacleRegistry,
    /// Centre of the nest.
    pub nest: Vec3,
    /// Tuning shared by every duckling.
    pub settings: &'a DucklingSettings,
}

/// A juvenile agent.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Duckling {
    position: Vec3,
    orientation: Quat,
    speed: f32,
    state: DucklingState,
    guardians: Guardians,
    body: Option<ObstacleId>,
}

/// Uniform draw from `[low, high)`, or `low` for an empty range.
fn draw<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Uniform draw from `[-half_width, half_width]`.
fn draw_symmetric<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> f32 {
    if half_width > 0.0 {
        rng.gen_range(-half_width..=half_width)
    } else {
        0.0
    }
}

impl Duckling {
    /// Creates an idle duckling with a fixed speed.
    ///
    /// The first wander target is the spawn point itself, so the duckling
    /// picks a real one on its first update.
    #[must_use]
    pub const fn new(position: Vec3, speed: f32, guardians: Guardians, retarget_in: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            speed,
            state: DucklingState::Idle {
                wander_target: position,
                retarget_in,
            },
            guardians,
            body: None,
        }
    }

    /// Creates an idle duckling with randomised speed and retarget timer.
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec3,
        guardians: Guardians,
        settings: &DucklingSettings,
        rng: &mut R,
    ) -> Self {
        let (slowest, fastest) = settings.speed_variation;
        let speed = settings.base_speed * draw(rng, slowest, fastest);
        let retarget_in = draw(rng, 0.0, settings.retarget_secs.1);
        Self::new(position, speed, guardians, retarget_in)
    }

    /// Marks `id` as this duckling's own record in the obstacle registry so
    /// collision checks skip it.
    #[must_use]
    pub const fn with_body(mut self, id: ObstacleId) -> Self {
        self.body = Some(id);
        self
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current orientation.
    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Walking speed fixed at spawn.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Current behavioural state.
    #[must_use]
    pub const fn state(&self) -> &DucklingState {
        &self.state
    }

    /// The actor being followed; `Some` exactly while following.
    #[must_use]
    pub const fn follow_target(&self) -> Option<ActorId> {
        match self.state {
            DucklingState::Following { leader } => Some(leader),
            _ => None,
        }
    }

    /// Where the duckling is heading: the wander point while idle, the nest
    /// centre once returning. Followers steer by the leader instead.
    #[must_use]
    pub const fn target_position(&self) -> Option<Vec3> {
        match self.state {
            DucklingState::Idle { wander_target, .. } => Some(wander_target),
            DucklingState::Following { .. } => None,
            DucklingState::Returning { nest } | DucklingState::Safe { nest } => Some(nest),
        }
    }

    /// Whether the duckling has reached the nest.
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self.state, DucklingState::Safe { .. })
    }

    #[cfg(test)]
    pub(crate) const fn in_state(mut self, state: DucklingState) -> Self {
        self.state = state;
        self
    }

    /// Advances the duckling by `dt` seconds.
    ///
    /// Entering `Safe` records exactly one rescue on `progress`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        env: &Surroundings<'_>,
        progress: &mut ProgressTracker,
    ) -> Option<Transition> {
        let transition = match self.state {
            DucklingState::Idle {
                wander_target,
                retarget_in,
            } => self.update_idle(wander_target, retarget_in, dt, rng, env),
            DucklingState::Following { leader } => self.update_following(leader, dt, env),
            DucklingState::Returning { nest } => self.update_returning(nest, dt, rng, env, progress),
            DucklingState::Safe { .. } => None,
        };
        if let Some(change) = transition {
            debug!(
                "duckling at {:?} -> {} ({change:?})",
                self.position,
                self.state.label()
            );
        }
        transition
    }

    fn update_idle<R: Rng + ?Sized>(
        &mut self,
        mut wander_target: Vec3,
        mut retarget_in: f32,
        dt: f32,
        rng: &mut R,
        env: &Surroundings<'_>,
    ) -> Option<Transition> {
        let settings = env.settings;
        let leader = self.guardians.leader;
        if let Some(pose) = env.actors.pose(leader) {
            if ground_distance(pose.position, self.position) < settings.collection_radius {
                self.state = DucklingState::Following { leader };
                return Some(Transition::StartedFollowing);
            }
        }

        retarget_in -= dt;
        if retarget_in <= 0.0
            || ground_distance(self.position, wander_target) < settings.wander_arrival_distance
        {
            (wander_target, retarget_in) = self.pick_wander_target(rng, settings);
        }

        let steering = ground_offset(self.position, wander_target);
        if let Some(direction) = try_ground_normalize(steering, STEERING_EPSILON_SQ) {
            let step = direction * settings.idle_speed_factor * self.speed * dt;
            let candidate = self.position + step;
            if self.is_blocked(candidate, env) {
                (wander_target, retarget_in) = self.pick_wander_target(rng, settings);
            } else {
                self.position = candidate;
            }
            self.turn_towards(direction, settings);
        }

        self.state = DucklingState::Idle {
            wander_target,
            retarget_in,
        };
        None
    }

    fn pick_wander_target<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &DucklingSettings,
    ) -> (Vec3, f32) {
        let bound = settings.world_half_extent.abs();
        let x = self.position.x + draw_symmetric(rng, settings.wander_radius);
        let z = self.position.z + draw_symmetric(rng, settings.wander_radius);
        let target = Vec3::new(x.clamp(-bound, bound), self.position.y, z.clamp(-bound, bound));
        let (soonest, latest) = settings.retarget_secs;
        (target, draw(rng, soonest, latest))
    }

    fn update_following(
        &mut self,
        leader: ActorId,
        dt: f32,
        env: &Surroundings<'_>,
    ) -> Option<Transition> {
        let settings = env.settings;
        let Some(pose) = env.actors.pose(leader) else {
            warn!("duckling lost track of leader {leader:?}; wandering again");
            self.state = DucklingState::Idle {
                wander_target: self.position,
                retarget_in: 0.0,
            };
            return Some(Transition::LeaderLost);
        };

        if ground_distance(self.position, env.nest) < settings.nest_return_radius {
            self.state = DucklingState::Returning { nest: env.nest };
            return Some(Transition::StartedReturning);
        }

        let offset = ground_offset(self.position, pose.position);
        let distance = offset.length();
        if distance > settings.follow_distance && distance > 0.0 {
            let direction = offset / distance;
            let candidate =
                self.position + direction * settings.follow_speed_factor * self.speed * dt;
            if !self.is_blocked(candidate, env) {
                self.position = candidate;
            }
            self.turn_towards(direction, settings);
        }
        None
    }

    fn update_returning<R: Rng + ?Sized>(
        &mut self,
        nest: Vec3,
        dt: f32,
        rng: &mut R,
        env: &Surroundings<'_>,
        progress: &mut ProgressTracker,
    ) -> Option<Transition> {
        let settings = env.settings;
        let offset = ground_offset(self.position, nest);
        if offset.length_squared() < settings.nest_safe_radius * settings.nest_safe_radius {
            return Some(self.settle(nest, rng, env, progress));
        }

        let direction = offset.try_normalize()?;
        let candidate = self.position + direction * settings.return_speed_factor * self.speed * dt;
        if !self.is_blocked(candidate, env) {
            self.position = candidate;
        }
        self.turn_towards(direction, settings);
        None
    }

    fn settle<R: Rng + ?Sized>(
        &mut self,
        nest: Vec3,
        rng: &mut R,
        env: &Surroundings<'_>,
        progress: &mut ProgressTracker,
    ) -> Transition {
        let jitter = env.settings.nest_jitter;
        self.position = Vec3::new(
            nest.x + draw_symmetric(rng, jitter),
            self.position.y,
            nest.z + draw_symmetric(rng, jitter),
        );

        let facing = env
            .actors
            .pose(self.guardians.beacon)
            .and_then(|beacon| face_on_ground(self.position, beacon.position));
        match facing {
            Some(rotation) => self.orientation = rotation,
            None => debug!("rescued duckling has no beacon to face; keeping orientation"),
        }

        self.state = DucklingState::Safe { nest };
        let counted = progress.record_found();
        debug!(
            "duckling settled at {:?} ({}/{})",
            self.position,
            progress.found(),
            progress.total()
        );
        Transition::ReachedNest { counted }
    }

    fn is_blocked(&self, candidate: Vec3, env: &Surroundings<'_>) -> bool {
        env.obstacles
            .blocks_agent(candidate, env.settings.body_radius, self.body)
    }

    fn turn_towards(&mut self, direction: Vec3, settings: &DucklingSettings) {
        self.orientation = blend_towards(
            self.orientation,
            direction,
            settings.turn_blend,
            ORIENTATION_EPSILON_SQ,
        );
    }
}
