//! Room geometry: floor, walls, doors, tunnels and decor
//!
//! Walls are derived from floor adjacency alone, so the same pass serves a
//! single room and a merged footprint.

use crate::consts::TUNNEL_FLIP;
use crate::error::ConfigError;
use crate::rng::LevelRng;

use super::coord::{Coord, Side};
use super::decor::{DecorCatalog, DecorDefinition, DecorItem, DecorTag};
use super::room::Room;
use super::tile::{Tile, TileKind, TileMap, WallFaces, WallPlacement};

/// Put a floor tile on every cell of the room rectangle
pub fn fill_floor(room: &mut Room) {
    for c in room.region().cells() {
        room.tiles.set_floor(c);
    }
}

/// Surround every floor tile with walls on its non-floor sides
///
/// Cells that already hold a tile are left alone, so doors and tunnels
/// survive and a wall keeps the facing it was first given.
pub fn generate_walls(tiles: &mut TileMap) -> usize {
    let mut placed = 0;
    for cell in tiles.floor_cells() {
        for (side, neighbor) in cell.neighbors() {
            if tiles.is_floor(neighbor) {
                continue;
            }
            if tiles.place_wall(neighbor, side) == WallPlacement::Placed {
                placed += 1;
            }
        }
    }
    placed
}

/// Replace the door and tunnel side midpoints with opening tiles
pub fn apply_special_tiles(room: &mut Room) {
    if let Some(side) = room.config.door_side {
        let tile = opening(TileKind::Door, room.side_midpoint(side), side, 0);
        room.tiles.set_opening(tile);
    }
    if let Some(side) = room.config.tunnel_side {
        // Tunnels are modelled facing north/west; flip the other two
        let flip = match side {
            Side::South | Side::East => TUNNEL_FLIP,
            Side::North | Side::West => 0,
        };
        let tile = opening(TileKind::Tunnel, room.side_midpoint(side), side, flip);
        room.tiles.set_opening(tile);
    }
}

fn opening(kind: TileKind, c: Coord, side: Side, extra_rotation: u16) -> Tile {
    Tile {
        kind,
        rotation: (side.wall_rotation() + extra_rotation) % 360,
        faces: WallFaces::empty(),
        ..Tile::wall(c, side)
    }
}

/// Decor placement class of a floor tile
fn classify(tiles: &TileMap, c: Coord) -> Option<DecorTag> {
    let mut all_floor = true;
    for (_, n) in c.neighbors() {
        match tiles.kind_at(n) {
            Some(TileKind::Wall) => return Some(DecorTag::Edge),
            Some(TileKind::Floor) => {}
            _ => all_floor = false,
        }
    }
    all_floor.then_some(DecorTag::Center)
}

fn place(room: &mut Room, def: &DecorDefinition, c: Coord, rng: &mut LevelRng) {
    let rotation = rng.choose(&def.rotations).copied().unwrap_or(0.0);
    room.decor.push(DecorItem {
        type_id: def.id.clone(),
        x: c.x,
        z: c.z,
        rotation,
        asset_ref: def.asset.clone(),
    });
}

/// Scatter decor over the room's floor
///
/// A treasure room always gets the catalog's treasure chest first. The rest
/// of the room is decorated only if the `decor_probability` roll succeeds;
/// each free tile is then offered to the matching catalog types in order.
pub fn generate_decor(
    room: &mut Room,
    catalog: &DecorCatalog,
    decor_probability: f64,
    rng: &mut LevelRng,
) -> Result<(), ConfigError> {
    let mut pool: Vec<Coord> = room
        .tiles
        .floor_cells()
        .into_iter()
        .filter(|&c| room.decor_at(c).is_none())
        .collect();

    if room.config.is_treasure_room {
        let chest = catalog.treasure().ok_or(ConfigError::MissingTreasureDecor)?;
        if !pool.is_empty() {
            let c = pool.remove(rng.rn2(pool.len() as u32) as usize);
            place(room, chest, c, rng);
        }
    }

    if !rng.chance(decor_probability) {
        return Ok(());
    }

    for c in pool {
        let Some(tag) = classify(&room.tiles, c) else {
            continue;
        };
        let chosen = catalog
            .with_tag(tag)
            .find(|def| rng.chance(def.probability));
        if let Some(def) = chosen {
            place(room, def, c, rng);
        }
    }

    tracing::trace!(x = room.origin_x, z = room.origin_z, items = room.decor.len(), "decorated room");
    Ok(())
}
