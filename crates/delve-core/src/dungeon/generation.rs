//! Level generation pipeline
//!
//! partition → leaf rooms → required rooms → per-room geometry → merge

use strum::IntoEnumIterator;

use crate::config::{DungeonConfig, LevelConfig};
use crate::error::GenerationError;
use crate::rng::LevelRng;

use super::geometry::{apply_special_tiles, fill_floor, generate_decor, generate_walls};
use super::level::Level;
use super::merge::merge;
use super::partition::PartitionTree;
use super::placement::{PositionCache, place_required_room, place_rooms_in_leaves};
use super::rect::Region;
use super::room::{Room, RoomConfig};
use super::tile::TileKind;

/// Generate one level
///
/// Required rooms that find no position are recorded in
/// [`Level::placement_failures`]; configuration gaps are errors.
pub fn generate_level(
    level_config: &LevelConfig,
    config: &DungeonConfig,
    rng: &mut LevelRng,
) -> Result<Level, GenerationError> {
    let grid_size = level_config.grid_size;
    let mut level = Level::new(level_config.index, grid_size);

    // One cell of margin keeps every wall inside the grid
    let root = Region::new(1, 1, grid_size - 2, grid_size - 2);
    let tree = PartitionTree::build(root, &config.bsp, rng);

    let mut rooms = place_rooms_in_leaves(&tree.leaves(), &level_config.placement(&config.bsp), rng);
    let leaf_rooms = rooms.len();

    let mut cache = PositionCache::from_rooms(&rooms);
    for required in &level_config.required_rooms {
        let room_config = RoomConfig::from(config.room_kind(required.kind)?);
        for _ in 0..required.count {
            match place_required_room(
                required.kind,
                room_config,
                config.special_room_size,
                &rooms,
                grid_size,
                &mut cache,
                rng,
            ) {
                Some(room) => rooms.push(room),
                None => level.placement_failures.push(required.kind),
            }
        }
    }

    for room in &mut rooms {
        build_room(room, config, rng)?;
    }

    level.merged = merge(&rooms);
    level.rooms = rooms;

    // Every tile kind the level uses must resolve to an asset
    for kind in TileKind::iter() {
        if level.tiles().count(kind) > 0 {
            config.tile_asset(kind)?;
        }
    }

    tracing::debug!(
        level = level.index,
        leaf_rooms,
        special_rooms = level.rooms.len() - leaf_rooms,
        failures = level.placement_failures.len(),
        tiles = level.tiles().len(),
        decor = level.decor().len(),
        "generated level"
    );
    Ok(level)
}

/// Run the geometry stages on one room
pub fn build_room(room: &mut Room, config: &DungeonConfig, rng: &mut LevelRng) -> Result<(), GenerationError> {
    fill_floor(room);
    generate_walls(&mut room.tiles);
    apply_special_tiles(room);
    let decor_probability = config.room_kind(room.kind)?.decor_probability;
    generate_decor(room, &config.decor, decor_probability, rng)?;
    Ok(())
}
