//! Idle/Patrol agent controller

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{IDLE_MIN, IDLE_SPAN};
use crate::dungeon::{Coord, NavigationGrid};
use crate::rng::LevelRng;

/// Unique agent identifier within an [`AgentManager`](super::AgentManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn next(self) -> Self {
        AgentId(self.0 + 1)
    }
}

/// Behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgentState {
    /// Standing still until the dwell expires
    #[default]
    Idle,
    /// Holding a target cell; the controller never moves the agent
    Patrol,
}

/// What happened during one controller update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    /// Dwell still running
    None,
    /// Picked a neighboring cell and started patrolling
    TargetSelected(Coord),
    /// No walkable neighbor; stays idle with a fresh dwell
    Stranded,
    /// Patrol dwell expired
    ReturnedToIdle,
}

/// A single agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub type_id: String,
    pub x: i32,
    pub z: i32,
    pub state: AgentState,
    /// Time spent in the current state
    pub state_timer: f32,
    /// Dwell after which the current state ends
    pub idle_duration: f32,
    pub target: Option<Coord>,
}

fn random_dwell(rng: &mut LevelRng) -> f32 {
    rng.unit_range(IDLE_MIN as f64, IDLE_SPAN as f64) as f32
}

impl Agent {
    /// Create an idle agent at `pos` with a fresh dwell
    pub fn new(id: AgentId, type_id: &str, pos: Coord, rng: &mut LevelRng) -> Self {
        Self {
            id,
            type_id: type_id.to_string(),
            x: pos.x,
            z: pos.z,
            state: AgentState::Idle,
            state_timer: 0.0,
            idle_duration: random_dwell(rng),
            target: None,
        }
    }

    pub const fn position(&self) -> Coord {
        Coord::new(self.x, self.z)
    }

    /// Advance the state timer by `dt` and act on an expired dwell
    pub fn update(&mut self, dt: f32, nav: &NavigationGrid, rng: &mut LevelRng) -> AgentEvent {
        self.state_timer += dt;
        if self.state_timer < self.idle_duration {
            return AgentEvent::None;
        }

        match self.state {
            AgentState::Idle => match self.select_target(nav, rng) {
                Some(target) => AgentEvent::TargetSelected(target),
                None => AgentEvent::Stranded,
            },
            AgentState::Patrol => {
                self.set_state(AgentState::Idle);
                self.target = None;
                self.idle_duration = random_dwell(rng);
                AgentEvent::ReturnedToIdle
            }
        }
    }

    /// Pick a walkable neighbor uniformly and start patrolling towards it
    ///
    /// With no walkable neighbor the agent stays idle, loses its target and
    /// restarts its dwell.
    pub fn select_target(&mut self, nav: &NavigationGrid, rng: &mut LevelRng) -> Option<Coord> {
        let candidates = nav.neighbors(self.x, self.z);
        self.target = rng.choose(&candidates).copied();

        match self.target {
            Some(_) => self.set_state(AgentState::Patrol),
            None => {
                tracing::warn!(agent = self.id.0, x = self.x, z = self.z, "agent has no walkable neighbor");
                self.set_state(AgentState::Idle);
                self.state_timer = 0.0;
            }
        }
        self.idle_duration = random_dwell(rng);
        self.target
    }

    /// Switch state; a no-op when already in `state`
    pub fn set_state(&mut self, state: AgentState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.state_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{DecorCatalog, Region, TileMap};

    fn open_floor(region: Region) -> NavigationGrid {
        let mut tiles = TileMap::new();
        for c in region.cells() {
            tiles.set_floor(c);
        }
        NavigationGrid::from_tiles(&tiles, &[], &DecorCatalog::default()).unwrap()
    }

    #[test]
    fn test_dwell_range() {
        let mut rng = LevelRng::new(42);
        for i in 0..200 {
            let agent = Agent::new(AgentId(i), "ghoul", Coord::new(0, 0), &mut rng);
            assert!((3.0..8.0).contains(&agent.idle_duration));
            assert_eq!(agent.state, AgentState::Idle);
        }
    }

    #[test]
    fn test_idle_to_patrol() {
        let mut rng = LevelRng::new(42);
        let nav = open_floor(Region::new(0, 0, 3, 3));
        let mut agent = Agent::new(AgentId(1), "ghoul", Coord::new(1, 1), &mut rng);

        assert_eq!(agent.update(1.0, &nav, &mut rng), AgentEvent::None);
        assert_eq!(agent.state_timer, 1.0);

        let event = agent.update(10.0, &nav, &mut rng);
        let AgentEvent::TargetSelected(target) = event else {
            panic!("expected a target, got {event:?}");
        };
        assert_eq!(agent.state, AgentState::Patrol);
        assert_eq!(agent.target, Some(target));
        assert_eq!(agent.state_timer, 0.0);
        assert!(nav.neighbors(1, 1).contains(&target));
        // Patrol never moves the agent
        assert_eq!(agent.position(), Coord::new(1, 1));
    }

    #[test]
    fn test_patrol_returns_to_idle() {
        let mut rng = LevelRng::new(7);
        let nav = open_floor(Region::new(0, 0, 3, 3));
        let mut agent = Agent::new(AgentId(1), "maniac", Coord::new(0, 0), &mut rng);
        agent.select_target(&nav, &mut rng).unwrap();
        assert_eq!(agent.state, AgentState::Patrol);

        assert_eq!(agent.update(10.0, &nav, &mut rng), AgentEvent::ReturnedToIdle);
        assert_eq!(agent.state, AgentState::Idle);
        assert_eq!(agent.target, None);
        assert_eq!(agent.state_timer, 0.0);
    }

    #[test]
    fn test_stranded_agent_stays_idle() {
        let mut rng = LevelRng::new(42);
        let nav = open_floor(Region::new(5, 5, 1, 1));
        let mut agent = Agent::new(AgentId(1), "ghoul", Coord::new(5, 5), &mut rng);
        agent.target = Some(Coord::new(5, 6));

        assert_eq!(agent.update(8.0, &nav, &mut rng), AgentEvent::Stranded);
        assert_eq!(agent.state, AgentState::Idle);
        assert_eq!(agent.target, None);
        assert_eq!(agent.state_timer, 0.0);
        assert!((3.0..8.0).contains(&agent.idle_duration));
    }

    #[test]
    fn test_unbuilt_grid_strands_agent() {
        let mut rng = LevelRng::new(42);
        let mut agent = Agent::new(AgentId(1), "ghoul", Coord::new(0, 0), &mut rng);
        assert_eq!(agent.select_target(&NavigationGrid::default(), &mut rng), None);
        assert_eq!(agent.state, AgentState::Idle);
    }

    #[test]
    fn test_set_state_same_state_is_noop() {
        let mut rng = LevelRng::new(42);
        let mut agent = Agent::new(AgentId(1), "ghoul", Coord::new(0, 0), &mut rng);
        agent.state_timer = 2.5;
        agent.set_state(AgentState::Idle);
        assert_eq!(agent.state_timer, 2.5);
        agent.set_state(AgentState::Patrol);
        assert_eq!(agent.state_timer, 0.0);
        assert_eq!(AgentState::Patrol.to_string(), "patrol");
    }
}
