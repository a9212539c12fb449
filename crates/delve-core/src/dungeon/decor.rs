//! Decor catalog and placed decor items

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::coord::Coord;

/// Placement and theme tags carried by a decor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecorTag {
    /// Stands against a wall
    Edge,
    /// Stands in open floor
    Center,
    /// Guaranteed chest of a treasure room
    Treasure,
    Prop,
    Furniture,
}

/// One decor type in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorDefinition {
    pub id: String,
    /// Asset reference handed through to the renderer
    pub asset: String,
    /// Chance that an offered tile accepts this type
    pub probability: f64,
    pub tags: Vec<DecorTag>,
    /// Excludes the tile from the navigation grid
    pub blocks_navigation: bool,
    /// Allowed rotations in degrees
    pub rotations: Vec<f32>,
}

impl DecorDefinition {
    pub fn has_tag(&self, tag: DecorTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Ordered decor catalog; order decides which type wins a tile first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecorCatalog {
    entries: Vec<DecorDefinition>,
}

impl DecorCatalog {
    pub fn new(entries: Vec<DecorDefinition>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DecorDefinition] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&DecorDefinition> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// Types offered to a tile carrying `tag`, in catalog order
    pub fn with_tag(&self, tag: DecorTag) -> impl Iterator<Item = &DecorDefinition> {
        self.entries.iter().filter(move |d| d.has_tag(tag))
    }

    /// The chest type used for treasure rooms
    pub fn treasure(&self) -> Option<&DecorDefinition> {
        self.with_tag(DecorTag::Treasure).next()
    }
}

impl Default for DecorCatalog {
    fn default() -> Self {
        fn def(
            id: &str,
            probability: f64,
            tags: &[DecorTag],
            blocks_navigation: bool,
            rotations: &[f32],
        ) -> DecorDefinition {
            DecorDefinition {
                id: id.to_string(),
                asset: format!("{id}.glb"),
                probability,
                tags: tags.to_vec(),
                blocks_navigation,
                rotations: rotations.to_vec(),
            }
        }

        use DecorTag::*;
        Self::new(vec![
            def("chest", 0.3, &[Treasure, Center], true, &[0.0, 45.0, 90.0]),
            def("barrel", 0.15, &[Prop, Edge], true, &[0.0, 90.0, 180.0, 270.0]),
            def("bed", 0.1, &[Furniture, Edge], true, &[0.0, 90.0]),
            def("closet", 0.08, &[Furniture, Edge], true, &[0.0, 90.0]),
            def("table", 0.12, &[Furniture, Center], true, &[0.0, 45.0, 90.0]),
            def("blocks", 0.2, &[Prop, Edge], false, &[0.0]),
        ])
    }
}

/// A decor item standing on a floor tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorItem {
    pub type_id: String,
    pub x: i32,
    pub z: i32,
    /// Degrees; not restricted to multiples of 90
    pub rotation: f32,
    pub asset_ref: String,
}

impl DecorItem {
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.z)
    }
}
