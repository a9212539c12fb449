//! delve-core: procedural dungeon floor-plan generation
//!
//! Partitions a level grid, places ordinary and required special rooms,
//! builds their floor/wall/door/tunnel geometry and decor, merges them into
//! one structure, and derives a navigation grid for patrolling agents.
//!
//! The crate is pure apart from loading configuration files: all randomness
//! flows through an injected, seeded [`LevelRng`].

pub mod agent;
pub mod config;
pub mod dungeon;
pub mod error;

mod consts;
mod rng;

pub use config::{BspConfig, DungeonConfig, LevelConfig, RequiredRoom, RoomKindConfig, RoomPlacementConfig};
pub use consts::*;
pub use error::{ConfigError, GenerationError};
pub use rng::LevelRng;
