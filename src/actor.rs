//! Tracked actors that ducklings steer by.
//!
//! The leader (the player-controlled father) and the beacon (the mother at
//! the nest) are identified by [`ActorId`]. Ducklings never hold references
//! to them; they resolve poses through an [`ActorLookup`] each frame, which
//! lets a missing actor degrade into a fallback instead of a dangling
//! reference.
use bevy::prelude::*;
use hashbrown::HashMap;
use serde::Serialize;

/// Stable identifier of a tracked actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActorId(pub u32);

impl From<u32> for ActorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Read-only snapshot of an actor's placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

impl ActorPose {
    /// Pose at `position` with the identity orientation.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

impl From<&Transform> for ActorPose {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            orientation: transform.rotation,
        }
    }
}

/// The two actors every duckling is bound to at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guardians {
    /// Actor a collected duckling follows.
    pub leader: ActorId,
    /// Actor a rescued duckling turns to face.
    pub beacon: ActorId,
}

/// Resolves actor identifiers to their current pose.
#[cfg_attr(test, mockall::automock)]
pub trait ActorLookup {
    /// Current pose of `id`, or `None` if the actor is unavailable.
    fn pose(&self, id: ActorId) -> Option<ActorPose>;

    /// Whether `id` currently resolves.
    fn contains(&self, id: ActorId) -> bool {
        self.pose(id).is_some()
    }
}

/// Per-frame table of actor poses.
///
/// Rebuilt after the player controller has run so that every duckling in a
/// frame observes the leader's already-advanced position.
#[derive(Debug, Default, Clone)]
pub struct ActorPoses {
    poses: HashMap<ActorId, ActorPose>,
}

impl ActorPoses {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or replaces the pose of `id`.
    pub fn insert(&mut self, id: ActorId, pose: ActorPose) {
        self.poses.insert(id, pose);
    }

    /// Forgets `id`, returning its last pose.
    pub fn remove(&mut self, id: ActorId) -> Option<ActorPose> {
        self.poses.remove(&id)
    }

    /// Drops every entry while keeping the allocation.
    pub fn clear(&mut self) {
        self.poses.clear();
    }

    /// Number of known actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether no actor is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl ActorLookup for ActorPoses {
    fn pose(&self, id: ActorId) -> Option<ActorPose> {
        self.poses.get(&id).copied()
    }
}

impl FromIterator<(ActorId, ActorPose)> for ActorPoses {
    fn from_iter<I: IntoIterator<Item = (ActorId, ActorPose)>>(iter: I) -> Self {
        Self {
            poses: iter.into_iter().collect(),
        }
    }
}
