//! Walkable-cell grid for agent movement

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use super::coord::{Coord, CoordKey};
use super::decor::{DecorCatalog, DecorItem};
use super::level::Level;
use super::tile::{TileKind, TileMap};
use crate::error::GenerationError;

/// Set of walkable cells
///
/// A cell is walkable when it holds a floor tile and either no decor or a
/// decor type that does not block navigation. The grid is a snapshot; it is
/// rebuilt from scratch whenever the level changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationGrid {
    walkable: HashSet<CoordKey>,
}

impl NavigationGrid {
    /// Build the grid for a level's merged geometry
    pub fn build(level: &Level, catalog: &DecorCatalog) -> Result<Self, GenerationError> {
        let grid = Self::from_tiles(level.tiles(), level.decor(), catalog)?;
        tracing::debug!(level = level.index, walkable = grid.len(), "built navigation grid");
        Ok(grid)
    }

    /// Build the grid from raw tiles and decor
    pub fn from_tiles(
        tiles: &TileMap,
        decor: &[DecorItem],
        catalog: &DecorCatalog,
    ) -> Result<Self, GenerationError> {
        let mut blocking = HashMap::with_capacity(decor.len());
        for item in decor {
            let def = catalog
                .get(&item.type_id)
                .ok_or_else(|| GenerationError::MissingCatalogEntry(item.type_id.clone()))?;
            blocking.insert(item.coord().key(), def.blocks_navigation);
        }

        let walkable = tiles
            .of_kind(TileKind::Floor)
            .map(|t| t.coord().key())
            .filter(|key| !blocking.get(key).copied().unwrap_or(false))
            .collect();
        Ok(Self { walkable })
    }

    pub fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.walkable.contains(&CoordKey::pack(x, z))
    }

    /// Walkable cells adjacent to `(x, z)`, north, east, south, west
    pub fn neighbors(&self, x: i32, z: i32) -> Vec<Coord> {
        Coord::new(x, z)
            .neighbors()
            .map(|(_, n)| n)
            .filter(|n| self.is_walkable(n.x, n.z))
            .collect()
    }

    /// Every walkable cell, sorted
    pub fn walkable_cells(&self) -> Vec<Coord> {
        let mut cells: Vec<Coord> = self.walkable.iter().map(|k| k.coord()).collect();
        cells.sort_unstable();
        cells
    }

    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }
}
