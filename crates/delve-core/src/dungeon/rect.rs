//! Axis-aligned regions in grid-cell units
//!
//! A region covers the half-open cell ranges `x..x+width` and `z..z+height`.

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// A rectangle of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    /// Left x coordinate
    pub x: i32,
    /// Top z coordinate
    pub z: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, z: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            z,
            width,
            height,
        }
    }

    /// One past the rightmost column
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom row
    pub const fn bottom(&self) -> i32 {
        self.z + self.height
    }

    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if the region has positive area
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub const fn contains_cell(&self, c: Coord) -> bool {
        c.x >= self.x && c.x < self.right() && c.z >= self.z && c.z < self.bottom()
    }

    /// Check if this region contains another
    pub const fn contains(&self, other: &Region) -> bool {
        self.x <= other.x
            && self.z <= other.z
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Exact overlap test: both axis intervals intersect
    pub const fn overlaps(&self, other: &Region) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.z < other.bottom()
            && self.bottom() > other.z
    }

    /// Smallest region containing both
    pub fn union(&self, other: &Region) -> Region {
        let x = self.x.min(other.x);
        let z = self.z.min(other.z);
        Region::new(
            x,
            z,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - z,
        )
    }

    /// Grow by `n` cells on every side
    pub const fn expand(&self, n: i32) -> Region {
        Region::new(self.x - n, self.z - n, self.width + 2 * n, self.height + 2 * n)
    }

    /// The four corner cells, clockwise from top-left
    pub const fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(self.x, self.z),
            Coord::new(self.right() - 1, self.z),
            Coord::new(self.right() - 1, self.bottom() - 1),
            Coord::new(self.x, self.bottom() - 1),
        ]
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.z..self.bottom()).flat_map(move |z| (self.x..self.right()).map(move |x| Coord::new(x, z)))
    }
}
