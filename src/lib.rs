#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the core of a duckling-rescue game.
//! Re-exports the simulation types, systems and plugin for the binary and
//! tests.
pub mod actor;
pub mod camera;
pub mod components;
pub mod config;
pub mod constants;
pub mod duckling;
pub mod input;
pub mod logging;
pub mod obstacle;
pub mod player;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod progress;
pub mod spawn_world;
pub mod vector_math;

// Re-export commonly used items
pub use actor::{ActorId, ActorLookup, ActorPose, ActorPoses, Guardians};
pub use camera::{CameraController, CameraPose, OrbitCamera};
pub use components::{Beacon, Leader, NestSite, SimRng, Wing};
pub use config::{
    CameraSettings, ConfigError, DucklingSettings, FrameSettings, GameConfig, PlayerSettings,
    WorldSettings,
};
pub use duckling::{Duckling, DucklingState, Surroundings, Transition};
pub use logging::init as init_logging;
pub use obstacle::{BodyExtent, Obstacle, ObstacleId, ObstacleKind, ObstacleRegistry};
pub use player::{
    ControlEvent, ControlKey, FlapTimer, JumpKind, MoveIntent, PlayerBody, PlayerController,
    StepReport,
};
pub use plugin::{BroodComplete, BroodPlugin, DucklingRescued};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use progress::{ProgressError, ProgressTracker};
pub use spawn_world::{spawn_world, SpawnError, WorldSummary, BEACON_ID, GUARDIANS, LEADER_ID};

pub mod prelude {
    //! Prelude exports used in documentation examples and tests.
    //!
    //! ```rust,no_run
    //! use brood::prelude::*;
    //! ```

    pub use crate::BroodPlugin;
    pub use crate::ControlEvent;
    pub use crate::ControlKey;
    pub use crate::Duckling;
    pub use crate::DucklingState;
    pub use crate::GameConfig;
    pub use crate::ObstacleRegistry;
    pub use crate::PlayerBody;
    pub use crate::PlayerController;
    pub use crate::ProgressTracker;
    pub use crate::spawn_world;
}
