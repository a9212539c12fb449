//! Grid coordinates and directions
//!
//! Grid cells are addressed by signed `(x, z)` pairs so that walls may sit one
//! cell outside the level origin. Maps are keyed by a packed [`CoordKey`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// An integer grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub z: i32,
}

impl Coord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The neighboring cell one step towards `side`
    pub const fn step(self, side: Side) -> Self {
        let (dx, dz) = side.offset();
        Self::new(self.x + dx, self.z + dz)
    }

    /// The four cardinal neighbors, in [`Side::iter`] order
    pub fn neighbors(self) -> impl Iterator<Item = (Side, Coord)> {
        Side::iter().map(move |side| (side, self.step(side)))
    }

    pub const fn key(self) -> CoordKey {
        CoordKey::pack(self.x, self.z)
    }
}

/// Packed coordinate: `x` in the high 32 bits, `z` in the low 32 bits
///
/// Ordering of keys sorts by `z` first within a column of equal `x`, which is
/// only used to make map iteration deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoordKey(u64);

impl CoordKey {
    pub const fn pack(x: i32, z: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (z as u32 as u64))
    }

    pub const fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub const fn z(self) -> i32 {
        self.0 as u32 as i32
    }

    pub const fn coord(self) -> Coord {
        Coord::new(self.x(), self.z())
    }
}

impl From<Coord> for CoordKey {
    fn from(c: Coord) -> Self {
        c.key()
    }
}

/// Boundary side of a room, also used as a cardinal direction
///
/// North is towards negative `z`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// Unit step `(dx, dz)`
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::East => (1, 0),
            Side::South => (0, 1),
            Side::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }

    /// East/west boundaries run along `z`
    pub const fn is_vertical(self) -> bool {
        matches!(self, Side::East | Side::West)
    }

    /// Wall rotation in degrees for a wall on this side
    pub const fn wall_rotation(self) -> u16 {
        if self.is_vertical() { 90 } else { 0 }
    }
}
