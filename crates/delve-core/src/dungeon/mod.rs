//! Dungeon system
//!
//! Contains the grid primitives, room placement and geometry, merging,
//! navigation, and the level/dungeon generation pipeline.

mod coord;
mod decor;
mod generation;
mod geometry;
mod level;
mod merge;
mod navigation;
mod partition;
mod placement;
mod rect;
mod room;
mod tile;
mod topology;

pub use coord::{Coord, CoordKey, Side};
pub use decor::{DecorCatalog, DecorDefinition, DecorItem, DecorTag};
pub use generation::{build_room, generate_level};
pub use geometry::{apply_special_tiles, fill_floor, generate_decor, generate_walls};
pub use level::Level;
pub use merge::{merge, repair_corners, seam_walls};
pub use navigation::NavigationGrid;
pub use partition::{NodeId, PartitionNode, PartitionTree};
pub use placement::{CandidateSource, PositionCache, place_required_room, place_rooms_in_leaves};
pub use rect::Region;
pub use room::{Room, RoomConfig, RoomKind};
pub use tile::{Tile, TileKind, TileMap, WallFaces, WallPlacement};
pub use topology::{Dungeon, LiftLink};
