//! ECS marker components and shared resources.
//! Tags the leader, beacon and wing entities, and holds the nest location and
//! the simulation's random source.
use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::config::WorldSettings;
use crate::constants::NEST_POSITION;

/// The player-controlled father the ducklings follow.
#[derive(Component, Debug, Default, Clone, Copy, Serialize)]
pub struct Leader;

/// The mother waiting at the nest; rescued ducklings face her.
#[derive(Component, Debug, Default, Clone, Copy, Serialize)]
pub struct Beacon;

/// One of the leader's two wings, animated while flapping.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Wing {
    /// Wing on the body's left.
    Left,
    /// Wing on the body's right.
    Right,
}

impl Wing {
    /// Sideways offset sign of the wing relative to the body.
    #[must_use]
    pub const fn side(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Where rescued ducklings are heading.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct NestSite {
    /// Nest centre on the ground.
    pub center: Vec3,
}

impl FromWorld for NestSite {
    fn from_world(world: &mut World) -> Self {
        let center = world
            .get_resource::<WorldSettings>()
            .map_or(Vec3::from_array(NEST_POSITION), WorldSettings::nest);
        Self { center }
    }
}

/// Random source shared by every simulation system.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SimRng(pub StdRng);

impl SimRng {
    /// Seeded for reproducible runs, or from OS entropy.
    #[must_use]
    pub fn seeded(seed: Option<u64>) -> Self {
        Self(seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64))
    }
}

impl FromWorld for SimRng {
    fn from_world(world: &mut World) -> Self {
        Self::seeded(world.get_resource::<WorldSettings>().and_then(|s| s.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn equal_seeds_draw_equal_sequences() {
        let mut a = SimRng::seeded(Some(42));
        let mut b = SimRng::seeded(Some(42));
        let xs: Vec<u32> = (0..8).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn nest_site_follows_world_settings() {
        let mut world = World::new();
        world.insert_resource(WorldSettings {
            nest_position: [1.0, 0.0, 2.0],
            ..Default::default()
        });
        assert_eq!(NestSite::from_world(&mut world).center, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(
            NestSite::from_world(&mut World::new()).center,
            Vec3::new(10.0, 0.1, -5.0)
        );
    }
}
