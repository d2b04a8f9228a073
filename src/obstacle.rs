//! Static obstacle registry and circle-based collision queries.
//!
//! The registry is filled once by world setup and is append-only afterwards.
//! Consumers borrow it read-only (`Res<ObstacleRegistry>`); it is never
//! cloned per consumer.
//!
//! Collision is reactive and instantaneous: a candidate position is tested
//! against every participating obstacle and the first overlap rejects the
//! move. There is no sweep, so a fast mover can step across a thin obstacle
//! in a single frame.
use bevy::prelude::*;
use serde::Serialize;

use crate::vector_math::ground_distance_squared;

/// Index of an obstacle inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObstacleId(pub u32);

/// What an obstacle represents in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObstacleKind {
    /// Boulder scenery.
    Rock,
    /// Tall tree scenery.
    Tree,
    /// Low bush scenery.
    Bush,
    /// The nest ducklings are returned to.
    Nest,
    /// The pond beside the nest.
    Pond,
    /// Anything else, including agent bodies registered by callers.
    Other,
}

/// A placed object with a circular footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Centre of the object; `x`/`z` give the footprint, `y` its middle.
    pub position: Vec3,
    /// Footprint radius. Non-positive radii never collide.
    pub bounding_radius: f32,
    /// Whether the object takes part in collision at all.
    pub collidable: bool,
    /// What the object represents.
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// A collidable obstacle.
    #[must_use]
    pub const fn solid(kind: ObstacleKind, position: Vec3, bounding_radius: f32) -> Self {
        Self {
            position,
            bounding_radius,
            collidable: true,
            kind,
        }
    }

    /// A decorative object that never blocks movement.
    #[must_use]
    pub const fn decorative(kind: ObstacleKind, position: Vec3, bounding_radius: f32) -> Self {
        Self {
            position,
            bounding_radius,
            collidable: false,
            kind,
        }
    }

    /// Whether this record takes part in collision checks.
    #[must_use]
    pub fn participates(&self) -> bool {
        self.collidable && self.bounding_radius > 0.0
    }

    /// Height of the obstacle's top.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.position.y + self.bounding_radius
    }

    /// Whether a circle of `radius` at `point` overlaps the footprint.
    #[must_use]
    pub fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        let reach = radius + self.bounding_radius;
        ground_distance_squared(point, self.position) < reach * reach
    }
}

/// Vertical extent of a body that can pass over short obstacles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyExtent {
    /// Footprint radius.
    pub radius: f32,
    /// Full body height; the origin sits halfway up.
    pub height: f32,
}

impl BodyExtent {
    /// Height of the body's base for an origin at `origin_y`.
    #[must_use]
    pub fn base(&self, origin_y: f32) -> f32 {
        origin_y - self.height * 0.5
    }
}

/// Append-only list of placed objects.
#[derive(Resource, Debug, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle and returns its identifier.
    pub fn push(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = ObstacleId(u32::try_from(self.obstacles.len()).unwrap_or(u32::MAX));
        self.obstacles.push(obstacle);
        id
    }

    /// Looks up an obstacle by identifier.
    #[must_use]
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        usize::try_from(id.0).ok().and_then(|index| self.obstacles.get(index))
    }

    /// Iterates over every record with its identifier.
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        (0_u32..).map(ObstacleId).zip(self.obstacles.iter())
    }

    /// Number of records, collidable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    fn participants(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        self.iter().filter(|(_, obstacle)| obstacle.participates())
    }

    /// First obstacle overlapping a circle of `radius` at `candidate`.
    ///
    /// `exclude` skips the caller's own record when it is registered.
    #[must_use]
    pub fn first_blocking(
        &self,
        candidate: Vec3,
        radius: f32,
        exclude: Option<ObstacleId>,
    ) -> Option<ObstacleId> {
        self.participants()
            .filter(|(id, _)| Some(*id) != exclude)
            .find(|(_, obstacle)| obstacle.overlaps(candidate, radius))
            .map(|(id, _)| id)
    }

    /// Whether a ground-bound agent moving to `candidate` would collide.
    #[must_use]
    pub fn blocks_agent(&self, candidate: Vec3, radius: f32, exclude: Option<ObstacleId>) -> bool {
        self.first_blocking(candidate, radius, exclude).is_some()
    }

    /// Whether a body moving to `candidate` collides with an obstacle it
    /// cannot clear.
    ///
    /// A footprint overlap only blocks while the body's base is below the
    /// obstacle's top minus `clearance`, so the body can walk or fly over
    /// short obstacles.
    #[must_use]
    pub fn blocks_body(&self, candidate: Vec3, body: BodyExtent, clearance: f32) -> bool {
        let base = body.base(candidate.y);
        self.participants().any(|(_, obstacle)| {
            obstacle.overlaps(candidate, body.radius) && base < obstacle.top() - clearance
        })
    }
}
