//! Map tiles and the per-room tile map

use std::collections::BTreeMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::coord::{Coord, CoordKey, Side};

/// Tile kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum TileKind {
    Floor = 0,
    Wall = 1,
    Door = 2,
    Tunnel = 3,
}

impl TileKind {
    /// Doors and tunnels replace walls and survive every wall pass
    pub const fn is_opening(&self) -> bool {
        matches!(self, TileKind::Door | TileKind::Tunnel)
    }

    /// Display character for text dumps
    pub const fn symbol(&self) -> char {
        match self {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Door => '+',
            TileKind::Tunnel => '=',
        }
    }
}

bitflags! {
    /// Boundary sides a wall tile closes off
    ///
    /// A bit is set for every side of the room on which this wall stands, i.e.
    /// the direction from the abutting floor cell to the wall.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WallFaces: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

impl WallFaces {
    pub const fn from_side(side: Side) -> Self {
        match side {
            Side::North => WallFaces::NORTH,
            Side::East => WallFaces::EAST,
            Side::South => WallFaces::SOUTH,
            Side::West => WallFaces::WEST,
        }
    }
}

impl Serialize for WallFaces {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WallFaces {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(WallFaces::from_bits_truncate(bits))
    }
}

/// One grid cell of level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub x: i32,
    pub z: i32,
    /// Visual orientation in degrees, a multiple of 90
    pub rotation: u16,
    /// Room boundary this wall/door/tunnel belongs to
    pub side: Option<Side>,
    /// Every boundary side this tile closes off (walls only)
    pub faces: WallFaces,
}

impl Tile {
    pub const fn floor(c: Coord) -> Self {
        Self {
            kind: TileKind::Floor,
            x: c.x,
            z: c.z,
            rotation: 0,
            side: None,
            faces: WallFaces::empty(),
        }
    }

    pub const fn wall(c: Coord, side: Side) -> Self {
        Self {
            kind: TileKind::Wall,
            x: c.x,
            z: c.z,
            rotation: side.wall_rotation(),
            side: Some(side),
            faces: WallFaces::from_side(side),
        }
    }

    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.z)
    }

    pub const fn faces_side(&self, side: Side) -> bool {
        self.faces.contains(WallFaces::from_side(side))
    }
}

/// Outcome of a wall placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPlacement {
    /// A new wall tile was written
    Placed,
    /// An existing wall gained a facing
    Extended,
    /// Cell holds floor, a door/tunnel, or a wall already facing this side
    Kept,
}

/// Tiles keyed by packed coordinate, one tile per cell
///
/// Iteration is in key order so every pass over the map is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    tiles: BTreeMap<CoordKey, Tile>,
}

impl TileMap {
    pub const fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, c: Coord) -> Option<&Tile> {
        self.tiles.get(&c.key())
    }

    pub fn kind_at(&self, c: Coord) -> Option<TileKind> {
        self.get(c).map(|t| t.kind)
    }

    pub fn is_floor(&self, c: Coord) -> bool {
        self.kind_at(c) == Some(TileKind::Floor)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Coordinates of every floor tile, in map order
    pub fn floor_cells(&self) -> Vec<Coord> {
        self.of_kind(TileKind::Floor).map(Tile::coord).collect()
    }

    pub fn of_kind(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(move |t| t.kind == kind)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Write a floor tile; floor never displaces a door or tunnel
    pub fn set_floor(&mut self, c: Coord) {
        match self.kind_at(c) {
            Some(kind) if kind.is_opening() => {}
            _ => {
                self.tiles.insert(c.key(), Tile::floor(c));
            }
        }
    }

    /// Write a door or tunnel tile, replacing whatever is there
    pub fn set_opening(&mut self, tile: Tile) {
        debug_assert!(tile.kind.is_opening());
        self.tiles.insert(tile.coord().key(), tile);
    }

    /// Place a wall on `side` at `c` unless a tile already occupies the cell
    pub fn place_wall(&mut self, c: Coord, side: Side) -> WallPlacement {
        if self.tiles.contains_key(&c.key()) {
            return WallPlacement::Kept;
        }
        self.tiles.insert(c.key(), Tile::wall(c, side));
        WallPlacement::Placed
    }

    /// Ensure a wall at `c` faces `side`, adding the facing to an existing wall
    pub fn ensure_wall_facing(&mut self, c: Coord, side: Side) -> WallPlacement {
        match self.tiles.get_mut(&c.key()) {
            None => {
                self.tiles.insert(c.key(), Tile::wall(c, side));
                WallPlacement::Placed
            }
            Some(tile) if tile.kind == TileKind::Wall && !tile.faces_side(side) => {
                tile.faces |= WallFaces::from_side(side);
                WallPlacement::Extended
            }
            Some(_) => WallPlacement::Kept,
        }
    }
}
