//! Agent spawning and bookkeeping

use hashbrown::HashSet;

use super::AgentType;
use super::controller::{Agent, AgentEvent, AgentId};
use crate::config::DungeonConfig;
use crate::dungeon::{Coord, Level, NavigationGrid, Room};
use crate::error::ConfigError;
use crate::rng::LevelRng;

/// Owns every agent of a level
#[derive(Debug, Clone, Default)]
pub struct AgentManager {
    agents: Vec<Agent>,
    last_id: AgentId,
}

impl AgentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer every free floor tile of `room` to the spawn roll
    ///
    /// A tile is free when it is walkable, carries no decor of the room, and
    /// holds no agent yet. Each successful roll spawns an agent of a type
    /// chosen uniformly among those allowed on `level_index`. Returns the
    /// number of agents spawned.
    pub fn spawn_in_room(
        &mut self,
        room: &Room,
        nav: &NavigationGrid,
        types: &[AgentType],
        level_index: i32,
        probability: f64,
        rng: &mut LevelRng,
    ) -> usize {
        let eligible: Vec<&AgentType> = types.iter().filter(|t| t.spawns_on(level_index)).collect();
        if eligible.is_empty() {
            return 0;
        }

        let occupied: HashSet<Coord> = self.agents.iter().map(Agent::position).collect();
        let mut spawned = 0;
        for c in room.tiles.floor_cells() {
            if room.decor_at(c).is_some() || !nav.is_walkable(c.x, c.z) || occupied.contains(&c) {
                continue;
            }
            if !rng.chance(probability) {
                continue;
            }
            let Some(agent_type) = rng.choose(&eligible) else {
                continue;
            };
            self.last_id = self.last_id.next();
            let agent = Agent::new(self.last_id, &agent_type.id, c, rng);
            self.agents.push(agent);
            spawned += 1;
        }

        tracing::debug!(
            x = room.origin_x,
            z = room.origin_z,
            kind = %room.kind,
            spawned,
            "spawned agents in room"
        );
        spawned
    }

    /// Spawn agents into every room of a level
    ///
    /// Each room uses its kind's `agent_probability`.
    pub fn spawn_in_level(
        &mut self,
        level: &Level,
        nav: &NavigationGrid,
        config: &DungeonConfig,
        rng: &mut LevelRng,
    ) -> Result<usize, ConfigError> {
        let mut spawned = 0;
        for room in &level.rooms {
            let probability = config.room_kind(room.kind)?.agent_probability;
            spawned += self.spawn_in_room(room, nav, &config.agents, level.index, probability, rng);
        }
        Ok(spawned)
    }

    /// Tick every agent, returning the number whose dwell expired
    pub fn update_all(&mut self, dt: f32, nav: &NavigationGrid, rng: &mut LevelRng) -> usize {
        self.agents
            .iter_mut()
            .map(|agent| agent.update(dt, nav, rng))
            .filter(|event| *event != AgentEvent::None)
            .count()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        tracing::debug!("cleared all agents");
    }
}
