//! Dungeon topology: the stack of levels and the lifts joining them

use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::error::{ConfigError, GenerationError};
use crate::rng::LevelRng;

use super::generation::generate_level;
use super::level::Level;
use super::navigation::NavigationGrid;
use super::room::RoomKind;

/// Lift connection between two consecutive levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiftLink {
    /// Upper level index
    pub from_level: i32,
    /// Index of the lift room in the upper level's room list
    pub from_room: usize,
    /// Lower level index
    pub to_level: i32,
    pub to_room: usize,
}

/// A fully generated dungeon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    pub seed: u64,
    /// Levels from the top (index 0) downward
    pub levels: Vec<Level>,
    pub lifts: Vec<LiftLink>,
}

impl Dungeon {
    /// Validate `config` and generate every configured level from `seed`
    ///
    /// One RNG is threaded through all levels in top-down order, so the seed
    /// determines the whole dungeon.
    pub fn generate(config: &DungeonConfig, seed: u64) -> Result<Self, GenerationError> {
        config.validate()?;

        let mut order: Vec<_> = config.levels.iter().collect();
        order.sort_by(|a, b| b.index.cmp(&a.index));

        let mut rng = LevelRng::new(seed);
        let levels = order
            .into_iter()
            .map(|level_config| generate_level(level_config, config, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        let lifts = link_lifts(&levels);
        tracing::debug!(seed, levels = levels.len(), lifts = lifts.len(), "generated dungeon");
        Ok(Self { seed, levels, lifts })
    }

    pub fn level(&self, index: i32) -> Option<&Level> {
        self.levels.iter().find(|l| l.index == index)
    }

    /// Lift leading down from `index`
    pub fn lift_down(&self, index: i32) -> Option<&LiftLink> {
        self.lifts.iter().find(|l| l.from_level == index)
    }

    /// Lift leading up from `index`
    pub fn lift_up(&self, index: i32) -> Option<&LiftLink> {
        self.lifts.iter().find(|l| l.to_level == index)
    }

    /// Navigation grid for one level
    pub fn navigation(&self, index: i32, config: &DungeonConfig) -> Result<NavigationGrid, GenerationError> {
        let level = self.level(index).ok_or(ConfigError::UnknownLevel(index))?;
        NavigationGrid::build(level, &config.decor)
    }
}

/// Pair the first lift room of each level with the next level's
fn link_lifts(levels: &[Level]) -> Vec<LiftLink> {
    let mut lifts = Vec::new();
    for pair in levels.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        match (
            upper.first_room_of_kind(RoomKind::Lift),
            lower.first_room_of_kind(RoomKind::Lift),
        ) {
            (Some(from_room), Some(to_room)) => lifts.push(LiftLink {
                from_level: upper.index,
                from_room,
                to_level: lower.index,
                to_room,
            }),
            _ => tracing::warn!(
                upper = upper.index,
                lower = lower.index,
                "levels have no lift pair to link"
            ),
        }
    }
    lifts
}
