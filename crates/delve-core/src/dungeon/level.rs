//! Generated level structure

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::decor::DecorItem;
use super::rect::Region;
use super::room::{Room, RoomKind};
use super::tile::{TileKind, TileMap};

static NO_TILES: TileMap = TileMap::new();

/// One generated dungeon level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    /// Level index: 0 is the top, deeper levels are negative
    pub index: i32,
    pub grid_size: i32,
    /// Rooms in generation order: leaf rooms, then special rooms
    pub rooms: Vec<Room>,
    /// Union of all rooms, `None` for a level without rooms
    pub merged: Option<Room>,
    /// Required room kinds that found no free position
    pub placement_failures: Vec<RoomKind>,
}

impl Level {
    pub fn new(index: i32, grid_size: i32) -> Self {
        Self {
            index,
            grid_size,
            ..Self::default()
        }
    }

    /// Tiles of the merged level
    pub fn tiles(&self) -> &TileMap {
        match &self.merged {
            Some(merged) => &merged.tiles,
            None => &NO_TILES,
        }
    }

    /// Decor of the merged level
    pub fn decor(&self) -> &[DecorItem] {
        self.merged
            .as_ref()
            .map(|m| m.decor.as_slice())
            .unwrap_or_default()
    }

    pub fn rooms_of_kind(&self, kind: RoomKind) -> impl Iterator<Item = (usize, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.kind == kind)
    }

    /// Index of the first room of `kind`, in generation order
    pub fn first_room_of_kind(&self, kind: RoomKind) -> Option<usize> {
        self.rooms_of_kind(kind).map(|(i, _)| i).next()
    }

    pub fn room_count(&self, kind: RoomKind) -> usize {
        self.rooms_of_kind(kind).count()
    }

    /// Text dump of the level, one row per line
    ///
    /// Special rooms are labelled at their center with their kind's symbol.
    pub fn render_ascii(&self) -> String {
        let mut area = Region::new(0, 0, self.grid_size, self.grid_size);
        if let Some(merged) = &self.merged {
            area = area.union(&merged.region().expand(1));
        }

        let decor: HashSet<Coord> = self.decor().iter().map(DecorItem::coord).collect();
        let labels: HashMap<Coord, char> = self
            .rooms
            .iter()
            .filter(|r| r.is_special())
            .map(|r| (r.center(), r.kind.symbol()))
            .collect();

        let tiles = self.tiles();
        let mut out = String::with_capacity(((area.width + 1) * area.height) as usize);
        for z in area.z..area.bottom() {
            for x in area.x..area.right() {
                let c = Coord::new(x, z);
                let ch = match tiles.get(c) {
                    Some(_) if decor.contains(&c) => '*',
                    Some(tile) if tile.kind == TileKind::Floor => {
                        labels.get(&c).copied().unwrap_or('.')
                    }
                    Some(tile) => tile.kind.symbol(),
                    None => ' ',
                };
                out.push(ch);
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::merge::merge;
    use crate::dungeon::geometry::{fill_floor, generate_walls};

    fn level_with(rooms: Vec<Room>) -> Level {
        let mut level = Level::new(0, 8);
        level.rooms = rooms;
        level.merged = merge(&level.rooms);
        level
    }

    fn built(x: i32, z: i32, w: i32, h: i32) -> Room {
        let mut room = Room::new(x, z, w, h);
        fill_floor(&mut room);
        generate_walls(&mut room.tiles);
        room
    }

    #[test]
    fn test_empty_level_views() {
        let level = Level::new(-1, 10);
        assert!(level.tiles().is_empty());
        assert!(level.decor().is_empty());
        assert_eq!(level.first_room_of_kind(RoomKind::Lift), None);
    }

    #[test]
    fn test_render_ascii() {
        let level = level_with(vec![built(1, 1, 3, 2)]);
        let text = level.render_ascii();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], " ###");
        assert_eq!(lines[1], "#...#");
        assert_eq!(lines[2], "#...#");
        assert_eq!(lines[3], " ###");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_render_labels_special_rooms() {
        let mut lift = built(1, 1, 3, 3);
        lift.kind = RoomKind::Lift;
        let level = level_with(vec![lift]);
        let text = level.render_ascii();
        assert_eq!(text.lines().nth(2), Some("#.L.#"));
        assert_eq!(level.first_room_of_kind(RoomKind::Lift), Some(0));
        assert_eq!(level.tiles().count(TileKind::Floor), 9);
    }
}
