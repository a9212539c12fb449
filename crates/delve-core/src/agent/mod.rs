//! Agent system
//!
//! Agent types, the per-agent Idle/Patrol controller, and the manager that
//! spawns agents into rooms and ticks them.

mod controller;
mod manager;

pub use controller::{Agent, AgentEvent, AgentId, AgentState};
pub use manager::AgentManager;

use serde::{Deserialize, Serialize};

/// An agent type from the configuration catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentType {
    pub id: String,
    /// Asset reference handed through to the renderer
    pub asset: String,
    pub scale: f32,
    /// Inclusive range of level indices this type appears on
    pub floor_range: (i32, i32),
}

impl AgentType {
    pub fn new(id: &str, floor_range: (i32, i32)) -> Self {
        Self {
            id: id.to_string(),
            asset: format!("{id}.glb"),
            scale: 1.0,
            floor_range,
        }
    }

    /// Check if this type may spawn on the given level
    pub fn spawns_on(&self, level_index: i32) -> bool {
        (self.floor_range.0..=self.floor_range.1).contains(&level_index)
    }

    /// The stock agent catalog
    pub fn defaults() -> Vec<AgentType> {
        vec![
            AgentType::new("ghoul", (-2, 0)),
            AgentType::new("maniac", (-1, 0)),
        ]
    }
}
