//! Generation configuration
//!
//! Every table has a `Default` carrying the stock three-level dungeon, so a
//! JSON file only needs to list the values it changes.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::agent::AgentType;
use crate::consts::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE, ROOM_PADDING, ROOM_SIZE_JITTER, SPECIAL_ROOM_SIZE};
use crate::dungeon::{DecorCatalog, RoomKind, Side, TileKind};
use crate::error::ConfigError;

/// Binary space partitioning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BspConfig {
    /// Smallest width/height a leaf may be cut down to
    pub min_leaf_size: i32,
    /// Probability that a splittable node is split
    pub split_chance: f64,
    /// Optional cap on tree depth
    pub max_depth: Option<u32>,
    /// Cells kept free between a leaf's border and its room
    pub padding: i32,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            min_leaf_size: 8,
            split_chance: 0.8,
            max_depth: None,
            padding: ROOM_PADDING,
        }
    }
}

/// How many rooms of a special kind a level must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredRoom {
    pub kind: RoomKind,
    pub count: u32,
}

impl RequiredRoom {
    pub const fn new(kind: RoomKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Settings for one dungeon level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level index: 0 is the top, deeper levels are negative
    pub index: i32,
    pub grid_size: i32,
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub room_min_size: i32,
    pub room_max_size: i32,
    /// Required special rooms, placed in this order
    pub required_rooms: Vec<RequiredRoom>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            index: 0,
            grid_size: DEFAULT_GRID_SIZE,
            min_rooms: 5,
            max_rooms: 8,
            room_min_size: 4,
            room_max_size: 8,
            required_rooms: Vec::new(),
        }
    }
}

impl LevelConfig {
    /// Leaf room placement settings for this level
    pub fn placement(&self, bsp: &BspConfig) -> RoomPlacementConfig {
        RoomPlacementConfig {
            room_min_size: self.room_min_size,
            room_max_size: self.room_max_size,
            size_jitter: ROOM_SIZE_JITTER,
            padding: bsp.padding,
            min_rooms: self.min_rooms,
            max_rooms: self.max_rooms,
        }
    }
}

/// Settings used when fitting rooms into partition leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPlacementConfig {
    pub room_min_size: i32,
    pub room_max_size: i32,
    /// Rooms grow by `0..size_jitter` past the minimum
    pub size_jitter: i32,
    pub padding: i32,
    pub min_rooms: usize,
    pub max_rooms: usize,
}

impl Default for RoomPlacementConfig {
    fn default() -> Self {
        LevelConfig::default().placement(&BspConfig::default())
    }
}

/// Per room-kind options and probabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomKindConfig {
    pub door_side: Option<Side>,
    pub tunnel_side: Option<Side>,
    pub is_treasure_room: bool,
    pub is_boss_room: bool,
    /// Chance that a room of this kind is decorated at all
    pub decor_probability: f64,
    /// Per-tile chance that an agent spawns in a room of this kind
    pub agent_probability: f64,
}

fn default_room_kinds() -> HashMap<RoomKind, RoomKindConfig> {
    let kind = |decor_probability, agent_probability| RoomKindConfig {
        decor_probability,
        agent_probability,
        ..RoomKindConfig::default()
    };

    let mut kinds = HashMap::new();
    kinds.insert(
        RoomKind::Entrance,
        RoomKindConfig {
            door_side: Some(Side::South),
            ..kind(0.3, 0.1)
        },
    );
    kinds.insert(
        RoomKind::Exit,
        RoomKindConfig {
            door_side: Some(Side::North),
            ..kind(0.8, 0.0)
        },
    );
    kinds.insert(
        RoomKind::Lift,
        RoomKindConfig {
            tunnel_side: Some(Side::East),
            ..kind(0.2, 0.2)
        },
    );
    kinds.insert(
        RoomKind::Treasure,
        RoomKindConfig {
            is_treasure_room: true,
            ..kind(0.9, 0.7)
        },
    );
    kinds.insert(
        RoomKind::Boss,
        RoomKindConfig {
            is_boss_room: true,
            ..kind(0.6, 0.0)
        },
    );
    kinds.insert(RoomKind::Normal, kind(0.5, 0.4));
    kinds
}

fn default_tile_assets() -> HashMap<TileKind, String> {
    let mut tiles = HashMap::new();
    tiles.insert(TileKind::Floor, "floor.glb".to_string());
    tiles.insert(TileKind::Wall, "wall_x.glb".to_string());
    tiles.insert(TileKind::Door, "door.glb".to_string());
    tiles.insert(TileKind::Tunnel, "wall_to_tunnel.glb".to_string());
    tiles
}

fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            index: 0,
            min_rooms: 5,
            max_rooms: 8,
            room_min_size: 4,
            room_max_size: 8,
            required_rooms: vec![
                RequiredRoom::new(RoomKind::Entrance, 1),
                RequiredRoom::new(RoomKind::Lift, 1),
            ],
            ..LevelConfig::default()
        },
        LevelConfig {
            index: -1,
            min_rooms: 6,
            max_rooms: 10,
            room_min_size: 4,
            room_max_size: 7,
            required_rooms: vec![
                RequiredRoom::new(RoomKind::Lift, 1),
                RequiredRoom::new(RoomKind::Treasure, 1),
            ],
            ..LevelConfig::default()
        },
        LevelConfig {
            index: -2,
            min_rooms: 4,
            max_rooms: 7,
            room_min_size: 5,
            room_max_size: 9,
            required_rooms: vec![
                RequiredRoom::new(RoomKind::Exit, 1),
                RequiredRoom::new(RoomKind::Boss, 1),
            ],
            ..LevelConfig::default()
        },
    ]
}

/// Complete generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub levels: Vec<LevelConfig>,
    pub bsp: BspConfig,
    /// Side length of required special rooms
    pub special_room_size: i32,
    pub room_kinds: HashMap<RoomKind, RoomKindConfig>,
    pub decor: DecorCatalog,
    /// Asset reference for each tile kind
    pub tiles: HashMap<TileKind, String>,
    pub agents: Vec<AgentType>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            bsp: BspConfig::default(),
            special_room_size: SPECIAL_ROOM_SIZE,
            room_kinds: default_room_kinds(),
            decor: DecorCatalog::default(),
            tiles: default_tile_assets(),
            agents: AgentType::defaults(),
        }
    }
}

impl DungeonConfig {
    /// Load and validate a configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn level(&self, index: i32) -> Result<&LevelConfig, ConfigError> {
        self.levels
            .iter()
            .find(|l| l.index == index)
            .ok_or(ConfigError::UnknownLevel(index))
    }

    pub fn room_kind(&self, kind: RoomKind) -> Result<&RoomKindConfig, ConfigError> {
        self.room_kinds
            .get(&kind)
            .ok_or(ConfigError::MissingRoomKind(kind))
    }

    pub fn tile_asset(&self, kind: TileKind) -> Result<&str, ConfigError> {
        self.tiles
            .get(&kind)
            .map(String::as_str)
            .ok_or(ConfigError::MissingTileAsset(kind))
    }

    /// Check every value the generator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::invalid("levels", "at least one level is required"));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if self.levels[..i].iter().any(|l| l.index == level.index) {
                return Err(ConfigError::invalid(
                    "levels.index",
                    format!("duplicate level index {}", level.index),
                ));
            }
            level.validate()?;
        }

        let bsp = &self.bsp;
        if !(1..=MAX_GRID_SIZE).contains(&bsp.min_leaf_size) {
            return Err(ConfigError::invalid(
                "bsp.min_leaf_size",
                format!("must be within [1, {MAX_GRID_SIZE}]"),
            ));
        }
        if !(0.0..=1.0).contains(&bsp.split_chance) {
            return Err(ConfigError::invalid("bsp.split_chance", "must be within [0, 1]"));
        }
        if !(0..=MAX_GRID_SIZE).contains(&bsp.padding) {
            return Err(ConfigError::invalid(
                "bsp.padding",
                format!("must be within [0, {MAX_GRID_SIZE}]"),
            ));
        }
        if !(1..=MAX_GRID_SIZE).contains(&self.special_room_size) {
            return Err(ConfigError::invalid(
                "special_room_size",
                format!("must be within [1, {MAX_GRID_SIZE}]"),
            ));
        }

        for kind in RoomKind::iter() {
            let settings = self.room_kind(kind)?;
            if !(0.0..=1.0).contains(&settings.decor_probability)
                || !(0.0..=1.0).contains(&settings.agent_probability)
            {
                return Err(ConfigError::invalid(
                    format!("room_kinds.{kind}"),
                    "probabilities must be within [0, 1]",
                ));
            }
        }
        for kind in TileKind::iter() {
            self.tile_asset(kind)?;
        }

        for (i, decor) in self.decor.entries().iter().enumerate() {
            let field = format!("decor.{}", decor.id);
            if self.decor.entries()[..i].iter().any(|d| d.id == decor.id) {
                return Err(ConfigError::invalid(field, "duplicate decor id"));
            }
            if !(0.0..=1.0).contains(&decor.probability) {
                return Err(ConfigError::invalid(field, "probability must be within [0, 1]"));
            }
            if decor.rotations.is_empty() {
                return Err(ConfigError::invalid(field, "at least one rotation is required"));
            }
        }
        let needs_treasure = self.levels.iter().any(|l| {
            l.required_rooms.iter().any(|r| {
                r.count > 0
                    && self
                        .room_kinds
                        .get(&r.kind)
                        .is_some_and(|k| k.is_treasure_room)
            })
        });
        if needs_treasure && self.decor.treasure().is_none() {
            return Err(ConfigError::MissingTreasureDecor);
        }

        for agent in &self.agents {
            let field = format!("agents.{}", agent.id);
            if agent.floor_range.0 > agent.floor_range.1 {
                return Err(ConfigError::invalid(field, "floor_range must be ordered low to high"));
            }
            if agent.scale <= 0.0 {
                return Err(ConfigError::invalid(field, "scale must be positive"));
            }
        }

        Ok(())
    }
}

impl LevelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("levels[{}].{}", self.index, name);
        if !(3..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::invalid(
                field("grid_size"),
                format!("must be within [3, {MAX_GRID_SIZE}]"),
            ));
        }
        if !(1..=self.grid_size).contains(&self.room_min_size) {
            return Err(ConfigError::invalid(
                field("room_min_size"),
                "must be within [1, grid_size]",
            ));
        }
        if !(self.room_min_size..=self.grid_size).contains(&self.room_max_size) {
            return Err(ConfigError::invalid(
                field("room_max_size"),
                "must be within [room_min_size, grid_size]",
            ));
        }
        if self.max_rooms < self.min_rooms {
            return Err(ConfigError::invalid(field("max_rooms"), "must not be below min_rooms"));
        }
        if self.required_rooms.iter().any(|r| !r.kind.is_special()) {
            return Err(ConfigError::invalid(
                field("required_rooms"),
                "only special room kinds can be required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DungeonConfig::default();
        config.validate().unwrap();
        assert_eq!(config.levels.len(), 3);
        assert_eq!(config.level(-1).unwrap().max_rooms, 10);
        assert_eq!(
            config.room_kind(RoomKind::Lift).unwrap().tunnel_side,
            Some(Side::East)
        );
        assert_eq!(config.tile_asset(TileKind::Door).unwrap(), "door.glb");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DungeonConfig::from_json_str(r#"{ "bsp": { "split_chance": 0.5 } }"#).unwrap();
        assert_eq!(config.bsp.split_chance, 0.5);
        assert_eq!(config.bsp.min_leaf_size, 8);
        assert_eq!(config.levels.len(), 3);
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&DungeonConfig::default()).unwrap();
        let config = DungeonConfig::from_json_str(&json).unwrap();
        assert_eq!(config.special_room_size, SPECIAL_ROOM_SIZE);
        assert_eq!(config.decor, DecorCatalog::default());
    }

    #[test]
    fn test_unknown_level() {
        let config = DungeonConfig::default();
        assert!(matches!(config.level(-7), Err(ConfigError::UnknownLevel(-7))));
    }

    #[test]
    fn test_missing_tile_asset_fails_fast() {
        let mut config = DungeonConfig::default();
        config.tiles.remove(&TileKind::Tunnel);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingTileAsset(TileKind::Tunnel))
        ));
    }

    #[test]
    fn test_missing_treasure_decor_fails_fast() {
        let mut config = DungeonConfig::default();
        config.decor = DecorCatalog::new(
            config
                .decor
                .entries()
                .iter()
                .filter(|d| d.id != "chest")
                .cloned()
                .collect(),
        );
        assert!(matches!(config.validate(), Err(ConfigError::MissingTreasureDecor)));
    }

    #[test]
    fn test_invalid_split_chance() {
        let err = DungeonConfig::from_json_str(r#"{ "bsp": { "split_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "bsp.split_chance"));
    }

    #[test]
    fn test_oversized_settings_are_rejected() {
        let err = DungeonConfig::from_json_str(r#"{ "bsp": { "min_leaf_size": 1500000000 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "bsp.min_leaf_size"));

        let err = DungeonConfig::from_json_str(r#"{ "special_room_size": 2000000000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "special_room_size"));

        let mut config = DungeonConfig::default();
        config.levels[0].grid_size = MAX_GRID_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = DungeonConfig::default();
        config.levels[0].room_max_size = config.levels[0].grid_size + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DungeonConfig::from_json_str("{ levels: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_level_index() {
        let mut config = DungeonConfig::default();
        config.levels[1].index = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = DungeonConfig::load_from_file(Path::new("/nonexistent/delve.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
