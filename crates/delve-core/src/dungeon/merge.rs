//! Merging room footprints into one level structure
//!
//! Rooms placed independently may touch or overlap. The merged room takes
//! the union of their floors, keeps their doors and tunnels, and derives a
//! fresh set of walls around the combined outline.

use super::coord::{Coord, Side};
use super::geometry::generate_walls;
use super::rect::Region;
use super::room::{Room, RoomConfig, RoomKind};
use super::tile::{TileMap, WallPlacement};

/// Merge rooms into a single room; `None` if there is nothing to merge
pub fn merge(rooms: &[Room]) -> Option<Room> {
    let bounds = rooms
        .iter()
        .map(Room::region)
        .reduce(|acc, r| acc.union(&r))?;

    let mut tiles = TileMap::new();
    for room in rooms {
        for c in room.tiles.floor_cells() {
            tiles.set_floor(c);
        }
    }
    for room in rooms {
        for tile in room.tiles.iter().filter(|t| t.kind.is_opening()) {
            tiles.set_opening(*tile);
        }
    }

    let walls = generate_walls(&mut tiles);
    let repaired = repair_corners(&mut tiles, bounds.expand(1));

    let mut merged = Room::with_kind(
        bounds,
        RoomKind::Normal,
        RoomConfig {
            is_merged: true,
            ..RoomConfig::default()
        },
    );
    merged.tiles = tiles;

    for item in rooms.iter().flat_map(|r| r.decor.iter()) {
        let c = item.coord();
        if merged.tiles.is_floor(c) && merged.decor_at(c).is_none() {
            merged.decor.push(item.clone());
        }
    }

    tracing::debug!(
        rooms = rooms.len(),
        tiles = merged.tiles.len(),
        walls,
        repaired,
        decor = merged.decor.len(),
        "merged rooms"
    );
    Some(merged)
}

/// Close off concave seams where floor meets a cell on two axes
///
/// A cell with floor on a horizontal and a vertical neighbor needs a wall
/// facing each of those floors; the plain wall pass only gives it one.
/// Returns the number of walls placed or extended.
pub fn repair_corners(tiles: &mut TileMap, area: Region) -> usize {
    let mut changed = 0;
    for c in area.cells() {
        if tiles.is_floor(c) {
            continue;
        }
        let floor_sides: Vec<Side> = c
            .neighbors()
            .filter(|&(_, n)| tiles.is_floor(n))
            .map(|(side, _)| side)
            .collect();
        let horizontal = floor_sides.iter().any(|s| s.is_vertical());
        let vertical = floor_sides.iter().any(|s| !s.is_vertical());
        if !(horizontal && vertical) {
            continue;
        }
        for side in floor_sides {
            // Facing is the direction from the floor towards this cell
            if tiles.ensure_wall_facing(c, side.opposite()) != WallPlacement::Kept {
                changed += 1;
            }
        }
    }
    changed
}

/// Cells of `tiles` whose walls face more than one direction
pub fn seam_walls(tiles: &TileMap) -> Vec<Coord> {
    tiles
        .iter()
        .filter(|t| t.faces.bits().count_ones() > 1)
        .map(|t| t.coord())
        .collect()
}
