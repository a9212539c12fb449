//! Room placement
//!
//! Ordinary rooms are fitted one per partition leaf. Required special rooms
//! are placed afterwards by an anchor-first search over the whole grid.

use hashbrown::HashSet;

use crate::config::RoomPlacementConfig;
use crate::consts::{ANCHOR_MARGIN, SPECIAL_ROOM_RANDOM_TRIALS};
use crate::rng::LevelRng;

use super::coord::{Coord, CoordKey};
use super::rect::Region;
use super::room::{Room, RoomConfig, RoomKind};

/// Cells known to be taken: origins of placed rooms and rejected probes
///
/// Checked before the exact overlap test so repeated probes at a known-bad
/// spot are rejected without scanning the room list.
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    occupied: HashSet<CoordKey>,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with the origins of already placed rooms
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut cache = Self::new();
        for room in rooms {
            cache.insert(room.region().corners()[0]);
        }
        cache
    }

    pub fn insert(&mut self, c: Coord) {
        self.occupied.insert(c.key());
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.occupied.contains(&c.key())
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}

/// Source of candidate origins for a special room, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Fixed positions near the grid corners and edge midpoints
    Anchors,
    /// Uniform draws inside the anchor margin
    RandomTrials(u32),
}

impl CandidateSource {
    /// The default search: anchors, then a fixed number of random trials
    pub const SEARCH: [CandidateSource; 2] = [
        CandidateSource::Anchors,
        CandidateSource::RandomTrials(SPECIAL_ROOM_RANDOM_TRIALS),
    ];

    /// Produce this source's candidate origins
    ///
    /// Random trials draw from `rng` as they are produced, so stopping early
    /// consumes fewer draws.
    fn candidates<'a>(
        self,
        grid_size: i32,
        room_size: i32,
        rng: &'a mut LevelRng,
    ) -> Box<dyn Iterator<Item = Coord> + 'a> {
        let max_pos = grid_size - room_size - 1;
        match self {
            CandidateSource::Anchors => Box::new(anchors(grid_size, max_pos).into_iter()),
            CandidateSource::RandomTrials(trials) => Box::new((0..trials).map(move |_| {
                let x = rng.offset(ANCHOR_MARGIN, max_pos - ANCHOR_MARGIN);
                let z = rng.offset(ANCHOR_MARGIN, max_pos - ANCHOR_MARGIN);
                Coord::new(x, z)
            })),
        }
    }
}

fn anchors(grid_size: i32, max_pos: i32) -> [Coord; 6] {
    let m = ANCHOR_MARGIN;
    let mid = grid_size / 2 - 2;
    [
        Coord::new(m, m),
        Coord::new(m, max_pos),
        Coord::new(max_pos, m),
        Coord::new(max_pos, max_pos),
        Coord::new(mid, m),
        Coord::new(m, mid),
    ]
}

/// Fit one room into each leaf large enough to hold it
///
/// Leaves that cannot hold a padded room are skipped. At most `max_rooms`
/// rooms are returned.
pub fn place_rooms_in_leaves(
    leaves: &[Region],
    config: &RoomPlacementConfig,
    rng: &mut LevelRng,
) -> Vec<Room> {
    let mut rooms = Vec::new();

    for leaf in leaves {
        if rooms.len() >= config.max_rooms {
            break;
        }
        if leaf.width < config.room_min_size || leaf.height < config.room_min_size {
            continue;
        }
        if let Some(region) = fit_room(leaf, config, rng) {
            rooms.push(Room::with_kind(region, RoomKind::Normal, RoomConfig::default()));
        }
    }

    if rooms.len() < config.min_rooms {
        tracing::debug!(
            placed = rooms.len(),
            min_rooms = config.min_rooms,
            "fewer leaf rooms than requested"
        );
    }
    rooms
}

/// Room rectangle inside `leaf`, or `None` when the padded leaf is too small
fn fit_room(leaf: &Region, config: &RoomPlacementConfig, rng: &mut LevelRng) -> Option<Region> {
    let pad = config.padding;
    let max_width = leaf.width - pad * 2;
    let max_height = leaf.height - pad * 2;
    if max_width < config.room_min_size || max_height < config.room_min_size {
        return None;
    }

    let mut size = |limit: i32| {
        rng.offset(config.room_min_size, config.size_jitter)
            .min(config.room_max_size)
            .min(limit)
    };
    let width = size(max_width);
    let height = size(max_height);

    let x = rng.offset(leaf.x + pad, max_width - width + 1);
    let z = rng.offset(leaf.z + pad, max_height - height + 1);
    Some(Region::new(x, z, width, height))
}

/// Place one square special room of `room_size` cells per side
///
/// Candidates come from [`CandidateSource::SEARCH`]. A candidate must leave
/// one cell between the room and the grid border for its walls. Rejected
/// probes are remembered in `cache`; the accepted origin is added to it too.
pub fn place_required_room(
    kind: RoomKind,
    config: RoomConfig,
    room_size: i32,
    existing: &[Room],
    grid_size: i32,
    cache: &mut PositionCache,
    rng: &mut LevelRng,
) -> Option<Room> {
    let interior = Region::new(0, 0, grid_size, grid_size).expand(-1);

    for source in CandidateSource::SEARCH {
        for origin in source.candidates(grid_size, room_size, rng) {
            let region = Region::new(origin.x, origin.z, room_size, room_size);
            if !interior.contains(&region) {
                continue;
            }
            if is_available(region, existing, cache) {
                cache.insert(origin);
                tracing::debug!(%kind, x = origin.x, z = origin.z, ?source, "placed special room");
                return Some(Room::with_kind(region, kind, config));
            }
        }
    }

    tracing::warn!(%kind, grid_size, "could not find a position for special room");
    None
}

/// Cache check on the four corners, then the exact overlap test
fn is_available(region: Region, existing: &[Room], cache: &mut PositionCache) -> bool {
    if region.corners().iter().any(|&c| cache.contains(c)) {
        return false;
    }
    if existing.iter().any(|room| room.region().overlaps(&region)) {
        cache.insert(Coord::new(region.x, region.z));
        return false;
    }
    true
}
