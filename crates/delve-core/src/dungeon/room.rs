//! Room kinds and the room structure
//!
//! A room starts as a bare rectangle; the geometry builder fills in its tiles
//! and decor. A merged room carries the union of several rooms' geometry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::coord::{Coord, Side};
use super::decor::DecorItem;
use super::rect::Region;
use super::tile::TileMap;
use crate::config::RoomKindConfig;

/// Room kinds: ordinary leaf rooms and the required special rooms
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomKind {
    /// Ordinary room placed inside a partition leaf
    #[default]
    Normal,
    /// Level entrance
    Entrance,
    /// Level exit
    Exit,
    /// Lift to the neighbouring level
    Lift,
    /// Treasure vault, always holds a chest
    Treasure,
    /// Boss lair
    Boss,
}

impl RoomKind {
    /// Kinds placed by anchor search rather than by leaf
    pub const fn is_special(self) -> bool {
        !matches!(self, RoomKind::Normal)
    }

    /// Display character for the room's label in text dumps
    pub const fn symbol(self) -> char {
        match self {
            RoomKind::Normal => ' ',
            RoomKind::Entrance => 'E',
            RoomKind::Exit => 'X',
            RoomKind::Lift => 'L',
            RoomKind::Treasure => 'T',
            RoomKind::Boss => 'B',
        }
    }
}

/// Per-room options recognised by the geometry builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub door_side: Option<Side>,
    pub tunnel_side: Option<Side>,
    pub is_treasure_room: bool,
    pub is_boss_room: bool,
    /// Set on the synthetic room produced by merging
    pub is_merged: bool,
}

impl From<&RoomKindConfig> for RoomConfig {
    fn from(kind: &RoomKindConfig) -> Self {
        Self {
            door_side: kind.door_side,
            tunnel_side: kind.tunnel_side,
            is_treasure_room: kind.is_treasure_room,
            is_boss_room: kind.is_boss_room,
            is_merged: false,
        }
    }
}

/// A room rectangle plus its generated geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Room {
    pub origin_x: i32,
    pub origin_z: i32,
    pub width: i32,
    pub height: i32,
    pub kind: RoomKind,
    pub config: RoomConfig,
    pub tiles: TileMap,
    pub decor: Vec<DecorItem>,
}

impl Room {
    /// Create a new ordinary room with no geometry
    pub fn new(origin_x: i32, origin_z: i32, width: i32, height: i32) -> Self {
        Self {
            origin_x,
            origin_z,
            width,
            height,
            ..Self::default()
        }
    }

    /// Create a room of a specific kind
    pub fn with_kind(region: Region, kind: RoomKind, config: RoomConfig) -> Self {
        Self {
            kind,
            config,
            ..Self::new(region.x, region.z, region.width, region.height)
        }
    }

    pub const fn region(&self) -> Region {
        Region::new(self.origin_x, self.origin_z, self.width, self.height)
    }

    /// Check if this room's rectangle overlaps another's
    pub const fn overlaps(&self, other: &Room) -> bool {
        self.region().overlaps(&other.region())
    }

    /// Get center cell of room
    pub const fn center(&self) -> Coord {
        Coord::new(self.origin_x + self.width / 2, self.origin_z + self.height / 2)
    }

    /// Check if a cell is inside the room rectangle
    pub const fn contains(&self, c: Coord) -> bool {
        self.region().contains_cell(c)
    }

    /// Cell just outside the midpoint of a boundary side
    pub const fn side_midpoint(&self, side: Side) -> Coord {
        match side {
            Side::North => Coord::new(self.origin_x + self.width / 2, self.origin_z - 1),
            Side::South => Coord::new(self.origin_x + self.width / 2, self.origin_z + self.height),
            Side::West => Coord::new(self.origin_x - 1, self.origin_z + self.height / 2),
            Side::East => Coord::new(self.origin_x + self.width, self.origin_z + self.height / 2),
        }
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    /// Decor standing on a cell, if any
    pub fn decor_at(&self, c: Coord) -> Option<&DecorItem> {
        self.decor.iter().find(|d| d.x == c.x && d.z == c.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_overlap() {
        let a = Room::new(0, 0, 3, 3);
        assert!(!a.overlaps(&Room::new(3, 0, 3, 3)));
        assert!(a.overlaps(&Room::new(2, 2, 3, 3)));
    }

    #[test]
    fn test_side_midpoints() {
        let room = Room::new(10, 20, 4, 6);
        assert_eq!(room.side_midpoint(Side::North), Coord::new(12, 19));
        assert_eq!(room.side_midpoint(Side::South), Coord::new(12, 26));
        assert_eq!(room.side_midpoint(Side::West), Coord::new(9, 23));
        assert_eq!(room.side_midpoint(Side::East), Coord::new(14, 23));
        for side in [Side::North, Side::South, Side::East, Side::West] {
            assert!(!room.contains(room.side_midpoint(side)));
        }
    }

    #[test]
    fn test_room_kind_flags() {
        assert!(!RoomKind::Normal.is_special());
        assert!(RoomKind::Lift.is_special());
        assert_eq!(RoomKind::Treasure.to_string(), "treasure");
    }

    #[test]
    fn test_config_from_kind() {
        let kind = RoomKindConfig {
            tunnel_side: Some(Side::East),
            ..RoomKindConfig::default()
        };
        let config = RoomConfig::from(&kind);
        assert_eq!(config.tunnel_side, Some(Side::East));
        assert!(!config.is_merged);
    }
}
