//! World setup: landmarks, scattered scenery, the two guardians and the
//! ducklings.
//!
//! Runs once, before the frame loop, with exclusive world access. Anything
//! that would leave the simulation unable to run is reported as a
//! [`SpawnError`] instead of surfacing later inside a frame.
use bevy::prelude::*;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;

use crate::actor::{ActorId, Guardians};
use crate::components::{Beacon, Leader, NestSite, SimRng, Wing};
use crate::config::{DucklingSettings, WorldSettings};
use crate::duckling::Duckling;
use crate::obstacle::{Obstacle, ObstacleKind, ObstacleRegistry};
use crate::player::PlayerBody;
use crate::progress::{ProgressError, ProgressTracker};
use crate::vector_math::ground_distance;

/// Identifier of the player-controlled father.
pub const LEADER_ID: ActorId = ActorId(0);
/// Identifier of the mother at the nest.
pub const BEACON_ID: ActorId = ActorId(1);
/// Actors every spawned duckling is bound to.
pub const GUARDIANS: Guardians = Guardians {
    leader: LEADER_ID,
    beacon: BEACON_ID,
};

/// Sampling attempts per duckling before the spawn area counts as
/// exhausted.
const DUCKLING_SPAWN_ATTEMPTS: u32 = 1_000;
/// Sideways distance of each wing from the body centre.
const WING_OFFSET: f32 = 0.45;

/// World setup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// A required actor was not registered.
    #[error("actor {0:?} is missing after setup")]
    MissingActor(ActorId),
    /// The progress tracker rejected the brood size.
    #[error(transparent)]
    Progress(#[from] ProgressError),
    /// Too few admissible spawn points were found.
    #[error("placed only {placed} of {requested} ducklings outside the nest exclusion")]
    SpawnAreaExhausted {
        /// Ducklings actually placed.
        placed: u32,
        /// Ducklings asked for.
        requested: u32,
    },
}

/// What [`spawn_world`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSummary {
    /// The father.
    pub leader: Entity,
    /// The mother at the nest.
    pub beacon: Entity,
    /// Ducklings placed.
    pub ducklings: u32,
    /// Registry records, landmarks included.
    pub obstacles: usize,
}

/// Scattered scenery kinds and how each is sized.
#[derive(Debug, Clone, Copy)]
enum Scenery {
    Rock,
    Tree,
    Bush,
}

impl Scenery {
    const fn kind(self) -> ObstacleKind {
        match self {
            Self::Rock => ObstacleKind::Rock,
            Self::Tree => ObstacleKind::Tree,
            Self::Bush => ObstacleKind::Bush,
        }
    }

    const fn attempts_per_item(self) -> u32 {
        match self {
            Self::Rock => 3,
            Self::Tree | Self::Bush => 5,
        }
    }

    /// Footprint radius and centre height of a freshly sized item.
    fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> (f32, f32) {
        match self {
            Self::Rock => {
                let radius = rng.gen_range(1.0..3.0) * 0.5;
                (radius, radius)
            }
            Self::Tree => {
                let scale: f32 = rng.gen_range(0.75..1.25);
                let radius = 0.36 * scale;
                (radius, 4.0 * scale - radius)
            }
            Self::Bush => {
                let scale: f32 = rng.gen_range(0.7..1.3);
                let radius = 0.6 * scale;
                (radius, 0.5 * radius)
            }
        }
    }
}

/// Circle on the ground no scenery may overlap.
#[derive(Debug, Clone, Copy)]
struct Exclusion {
    center: Vec3,
    radius: f32,
}

impl Exclusion {
    fn admits(&self, position: Vec3, radius: f32) -> bool {
        ground_distance(position, self.center) > self.radius + radius
    }
}

fn scatter<R: Rng + ?Sized>(
    registry: &mut ObstacleRegistry,
    rng: &mut R,
    scenery: Scenery,
    count: u32,
    ground_size: f32,
    exclusions: &[Exclusion],
) -> u32 {
    let max_attempts = count.saturating_mul(scenery.attempts_per_item());
    let mut placed = 0;
    let mut attempts = 0;
    while placed < count && attempts < max_attempts {
        attempts += 1;
        let (radius, height) = scenery.sample(rng);
        let span = (ground_size - 2.0 * radius).max(0.0);
        let x = (rng.gen::<f32>() - 0.5) * span;
        let z = (rng.gen::<f32>() - 0.5) * span;
        let position = Vec3::new(x, height, z);
        if exclusions.iter().all(|zone| zone.admits(position, radius)) {
            registry.push(Obstacle::solid(scenery.kind(), position, radius));
            placed += 1;
        }
    }
    if placed < count {
        warn!("placed {placed} of {count} {scenery:?} after {max_attempts} attempts");
    }
    placed
}

/// Registers the landmarks and scatters scenery around them.
fn place_scenery<R: Rng + ?Sized>(
    registry: &mut ObstacleRegistry,
    rng: &mut R,
    settings: &WorldSettings,
) {
    let nest = Exclusion {
        center: settings.nest(),
        radius: settings.nest_radius,
    };
    let pond = Exclusion {
        center: Vec3::from_array(settings.pond_position),
        radius: settings.pond_radius,
    };
    registry.push(Obstacle::decorative(ObstacleKind::Nest, nest.center, nest.radius));
    registry.push(Obstacle::decorative(ObstacleKind::Pond, pond.center, pond.radius));

    let exclusions = [pond, nest];
    for (scenery, count) in [
        (Scenery::Rock, settings.rocks),
        (Scenery::Tree, settings.trees),
        (Scenery::Bush, settings.bushes),
    ] {
        scatter(registry, rng, scenery, count, settings.ground_size, &exclusions);
    }
}

/// Uniform point in the spawn square at least the minimum distance from
/// the nest and clear of every collidable obstacle.
fn sample_duckling_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    settings: &WorldSettings,
    registry: &ObstacleRegistry,
    body_radius: f32,
) -> Option<Vec3> {
    let half = settings.spawn_half_extent.abs();
    if half <= 0.0 {
        return None;
    }
    let nest = settings.nest();
    (0..DUCKLING_SPAWN_ATTEMPTS).find_map(|_| {
        let candidate = Vec3::new(
            rng.gen_range(-half..half),
            settings.duckling_height,
            rng.gen_range(-half..half),
        );
        let admitted = ground_distance(candidate, nest) >= settings.min_nest_distance
            && !registry.blocks_agent(candidate, body_radius, None);
        admitted.then_some(candidate)
    })
}

fn verify_guardians(world: &mut World) -> Result<(), SpawnError> {
    let mut actors = world.query::<&ActorId>();
    let present: Vec<ActorId> = actors.iter(world).copied().collect();
    for id in [GUARDIANS.leader, GUARDIANS.beacon] {
        if !present.contains(&id) {
            return Err(SpawnError::MissingActor(id));
        }
    }
    Ok(())
}

/// Builds the playable world.
///
/// Sets the rescue total first so a misconfigured tracker fails before any
/// entity exists.
///
/// # Errors
/// Returns [`SpawnError::Progress`] if the tracker rejects the total,
/// [`SpawnError::MissingActor`] if a guardian cannot be resolved after
/// spawning, and [`SpawnError::SpawnAreaExhausted`] if no duckling position
/// outside the nest exclusion can be found.
pub fn spawn_world(world: &mut World, settings: &WorldSettings) -> Result<WorldSummary, SpawnError> {
    world.init_resource::<ObstacleRegistry>();
    world.init_resource::<ProgressTracker>();
    world.init_resource::<DucklingSettings>();
    world.init_resource::<SimRng>();
    world
        .resource_mut::<ProgressTracker>()
        .set_total(settings.total_ducklings)?;
    world.insert_resource(NestSite {
        center: settings.nest(),
    });

    world.resource_scope(|world, mut rng: Mut<SimRng>| {
        let mut registry = world.resource_mut::<ObstacleRegistry>();
        place_scenery(&mut registry, &mut rng.0, settings);
    });

    let start = Vec3::from_array(settings.player_start);
    let leader = world
        .spawn((
            Leader,
            LEADER_ID,
            PlayerBody::at(start),
            Transform::from_translation(start),
        ))
        .with_children(|wings| {
            for wing in [Wing::Left, Wing::Right] {
                wings.spawn((wing, Transform::from_xyz(wing.side() * WING_OFFSET, 0.1, 0.0)));
            }
        })
        .id();
    let nest = settings.nest();
    let beacon = world
        .spawn((
            Beacon,
            BEACON_ID,
            Transform::from_xyz(nest.x, settings.mother_height, nest.z),
        ))
        .id();
    verify_guardians(world)?;

    let duckling_settings = world.resource::<DucklingSettings>().clone();
    let requested = settings.total_ducklings;
    world.resource_scope(|world, mut rng: Mut<SimRng>| {
        for placed in 0..requested {
            let position = sample_duckling_spawn(
                &mut rng.0,
                settings,
                world.resource::<ObstacleRegistry>(),
                duckling_settings.body_radius,
            )
            .ok_or(SpawnError::SpawnAreaExhausted { placed, requested })?;
            let duckling = Duckling::spawn(position, GUARDIANS, &duckling_settings, &mut rng.0);
            world.spawn((duckling, Transform::from_translation(position)));
        }
        Ok::<(), SpawnError>(())
    })?;

    let obstacles = world.resource::<ObstacleRegistry>().len();
    info!("world ready: {requested} ducklings, {obstacles} obstacles");
    Ok(WorldSummary {
        leader,
        beacon,
        ducklings: requested,
        obstacles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn seeded_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimRng::seeded(Some(7)));
        world
    }

    fn small_world() -> WorldSettings {
        WorldSettings {
            total_ducklings: 5,
            ..Default::default()
        }
    }

    #[rstest]
    fn spawns_actors_ducklings_and_scenery(mut seeded_world: World) {
        let settings = small_world();
        let summary = spawn_world(&mut seeded_world, &settings).unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(summary.ducklings, 5);
        assert_eq!(seeded_world.resource::<ProgressTracker>().total(), 5);

        let mut ducklings = seeded_world.query::<&Duckling>();
        let positions: Vec<Vec3> = ducklings.iter(&seeded_world).map(Duckling::position).collect();
        assert_eq!(positions.len(), 5);
        for position in positions {
            assert!(ground_distance(position, settings.nest()) >= settings.min_nest_distance);
            assert!(position.x.abs() <= settings.spawn_half_extent);
        }

        let leader = seeded_world.entity(summary.leader);
        assert!(leader.contains::<Leader>());
        assert_eq!(leader.get::<ActorId>(), Some(&LEADER_ID));
        let mut wings = seeded_world.query::<&Wing>();
        assert_eq!(wings.iter(&seeded_world).count(), 2);
    }

    #[rstest]
    fn landmarks_are_decorative_and_scenery_avoids_them(mut seeded_world: World) {
        let settings = small_world();
        spawn_world(&mut seeded_world, &settings).unwrap_or_else(|e| panic!("{e}"));
        let registry = seeded_world.resource::<ObstacleRegistry>();

        let kinds: Vec<ObstacleKind> = registry.iter().take(2).map(|(_, o)| o.kind).collect();
        assert_eq!(kinds, vec![ObstacleKind::Nest, ObstacleKind::Pond]);
        assert!(registry.iter().take(2).all(|(_, o)| !o.collidable));

        let pond = Vec3::from_array(settings.pond_position);
        for (_, obstacle) in registry.iter().skip(2) {
            assert!(obstacle.collidable);
            let reach = obstacle.bounding_radius;
            assert!(ground_distance(obstacle.position, pond) > settings.pond_radius + reach);
            assert!(ground_distance(obstacle.position, settings.nest()) > settings.nest_radius + reach);
        }
        assert!(registry.len() > 2);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(8)]
    #[case(13)]
    fn ducklings_never_start_inside_scenery(#[case] seed: u64) {
        let mut world = World::new();
        world.insert_resource(SimRng::seeded(Some(seed)));
        let settings = WorldSettings::default();
        spawn_world(&mut world, &settings).unwrap_or_else(|e| panic!("{e}"));

        let radius = world.resource::<DucklingSettings>().body_radius;
        let mut ducklings = world.query::<&Duckling>();
        let positions: Vec<Vec3> = ducklings.iter(&world).map(Duckling::position).collect();
        assert_eq!(positions.len(), settings.total_ducklings as usize);
        let registry = world.resource::<ObstacleRegistry>();
        for position in positions {
            assert_eq!(
                registry.first_blocking(position, radius, None),
                None,
                "duckling spawned stuck at {position:?}"
            );
        }
    }

    #[rstest]
    fn crowded_spawn_area_is_reported(mut seeded_world: World) {
        seeded_world.init_resource::<ObstacleRegistry>();
        seeded_world
            .resource_mut::<ObstacleRegistry>()
            .push(Obstacle::solid(ObstacleKind::Rock, Vec3::ZERO, 20.0));
        let settings = WorldSettings {
            total_ducklings: 2,
            spawn_half_extent: 5.0,
            nest_position: [40.0, 0.1, 0.0],
            rocks: 0,
            trees: 0,
            bushes: 0,
            ..Default::default()
        };
        assert_eq!(
            spawn_world(&mut seeded_world, &settings),
            Err(SpawnError::SpawnAreaExhausted {
                placed: 0,
                requested: 2
            })
        );
    }

    #[rstest]
    fn second_setup_is_rejected_by_the_tracker(mut seeded_world: World) {
        let settings = small_world();
        spawn_world(&mut seeded_world, &settings).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            spawn_world(&mut seeded_world, &settings),
            Err(SpawnError::Progress(ProgressError::TotalAlreadySet { current: 5 }))
        );
    }

    #[rstest]
    fn zero_ducklings_fail_before_spawning(mut seeded_world: World) {
        let settings = WorldSettings {
            total_ducklings: 0,
            ..Default::default()
        };
        assert_eq!(
            spawn_world(&mut seeded_world, &settings),
            Err(SpawnError::Progress(ProgressError::ZeroTotal))
        );
        assert!(seeded_world.resource::<ObstacleRegistry>().is_empty());
    }

    #[rstest]
    fn unreachable_spawn_distance_is_reported(mut seeded_world: World) {
        let settings = WorldSettings {
            total_ducklings: 3,
            spawn_half_extent: 1.0,
            min_nest_distance: 500.0,
            ..Default::default()
        };
        assert_eq!(
            spawn_world(&mut seeded_world, &settings),
            Err(SpawnError::SpawnAreaExhausted {
                placed: 0,
                requested: 3
            })
        );
    }
}
