use delve_core::agent::AgentManager;
use delve_core::dungeon::{
    Dungeon, Level, NavigationGrid, Region, RoomKind, Side, TileKind, generate_level,
};
use delve_core::{DungeonConfig, LevelRng};

const SEEDS: [u64; 6] = [0, 1, 7, 42, 1234, 987_654_321];

fn levels(seed: u64) -> (DungeonConfig, Dungeon) {
    let config = DungeonConfig::default();
    let dungeon = Dungeon::generate(&config, seed).expect("default config generates");
    (config, dungeon)
}

fn assert_level_invariants(level: &Level, config: &DungeonConfig) {
    let grid = Region::new(0, 0, level.grid_size, level.grid_size);
    let tiles = level.tiles();

    for (i, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[i + 1..] {
            assert!(
                !a.overlaps(b),
                "level {}: {:?} overlaps {:?}",
                level.index,
                a.region(),
                b.region()
            );
        }
        for c in a.tiles.floor_cells() {
            let kind = tiles.kind_at(c);
            assert!(
                kind == Some(TileKind::Floor) || kind.is_some_and(|k| k.is_opening()),
                "room floor at {c:?} lost in merge"
            );
        }
        for opening in a.tiles.iter().filter(|t| t.kind.is_opening()) {
            assert_eq!(tiles.kind_at(opening.coord()), Some(opening.kind));
        }
    }

    for tile in tiles.iter() {
        assert!(grid.contains_cell(tile.coord()), "tile {tile:?} outside the grid");
    }

    // The footprint is closed: every floor neighbor holds some tile
    for c in tiles.floor_cells() {
        for (side, n) in c.neighbors() {
            assert!(tiles.get(n).is_some(), "floor at {c:?} open towards {side}");
        }
    }

    for wall in tiles.of_kind(TileKind::Wall) {
        assert!(
            wall.coord().neighbors().any(|(_, n)| tiles.is_floor(n)),
            "wall {wall:?} has no floor neighbor"
        );
    }

    for item in level.decor() {
        assert!(tiles.is_floor(item.coord()), "decor {item:?} off the floor");
        assert!(config.decor.get(&item.type_id).is_some());
    }

    let nav = NavigationGrid::build(level, &config.decor).expect("decor resolves");
    for c in nav.walkable_cells() {
        assert!(tiles.is_floor(c));
        if let Some(item) = level.decor().iter().find(|d| d.coord() == c) {
            assert!(!config.decor.get(&item.type_id).unwrap().blocks_navigation);
        }
        for n in nav.neighbors(c.x, c.z) {
            assert!(nav.is_walkable(n.x, n.z));
            assert_ne!(n, c);
        }
    }
}

#[test]
fn test_default_dungeon_invariants() {
    for seed in SEEDS {
        let (config, dungeon) = levels(seed);
        assert_eq!(dungeon.levels.len(), 3);
        for level in &dungeon.levels {
            assert_level_invariants(level, &config);
        }
    }
}

#[test]
fn test_same_seed_same_dungeon() {
    let (_, a) = levels(77);
    let (_, b) = levels(77);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );

    let (_, c) = levels(78);
    assert_ne!(
        serde_json::to_string(&a.levels).unwrap(),
        serde_json::to_string(&c.levels).unwrap()
    );
}

#[test]
fn test_required_rooms_are_placed_or_recorded() {
    for seed in SEEDS {
        let (config, dungeon) = levels(seed);
        for level in &dungeon.levels {
            let level_config = config.level(level.index).unwrap();
            for required in &level_config.required_rooms {
                let placed = level.room_count(required.kind);
                let failed = level
                    .placement_failures
                    .iter()
                    .filter(|k| **k == required.kind)
                    .count();
                assert_eq!(placed + failed, required.count as usize);
            }
        }
    }
}

#[test]
fn test_special_room_features() {
    for seed in SEEDS {
        let (_, dungeon) = levels(seed);
        for level in &dungeon.levels {
            for room in &level.rooms {
                match room.kind {
                    RoomKind::Treasure => {
                        assert!(room.decor.iter().any(|d| d.type_id == "chest"));
                    }
                    RoomKind::Entrance => {
                        let door = room.side_midpoint(Side::South);
                        assert_eq!(level.tiles().kind_at(door), Some(TileKind::Door));
                    }
                    RoomKind::Exit => {
                        let door = room.side_midpoint(Side::North);
                        assert_eq!(level.tiles().kind_at(door), Some(TileKind::Door));
                    }
                    RoomKind::Lift => {
                        let tunnel = level.tiles().get(room.side_midpoint(Side::East)).unwrap();
                        assert_eq!(tunnel.kind, TileKind::Tunnel);
                        assert_eq!(tunnel.rotation, 270);
                    }
                    RoomKind::Normal | RoomKind::Boss => {}
                }
            }
        }
    }
}

#[test]
fn test_lift_links_join_lift_rooms() {
    for seed in SEEDS {
        let (_, dungeon) = levels(seed);
        for link in &dungeon.lifts {
            assert_eq!(link.from_level, link.to_level + 1);
            let from = dungeon.level(link.from_level).unwrap();
            let to = dungeon.level(link.to_level).unwrap();
            assert_eq!(from.rooms[link.from_room].kind, RoomKind::Lift);
            assert_eq!(to.rooms[link.to_room].kind, RoomKind::Lift);
            assert_eq!(dungeon.lift_up(link.to_level), Some(link));
        }
    }
}

#[test]
fn test_agents_spawn_on_walkable_floor() {
    let (config, dungeon) = levels(42);
    let mut rng = LevelRng::new(42);
    for level in &dungeon.levels {
        let nav = dungeon.navigation(level.index, &config).unwrap();
        let mut manager = AgentManager::new();
        manager.spawn_in_level(level, &nav, &config, &mut rng).unwrap();
        for agent in manager.agents() {
            assert!(nav.is_walkable(agent.x, agent.z));
            assert!(level.decor().iter().all(|d| d.coord() != agent.position()));
            let agent_type = config.agents.iter().find(|t| t.id == agent.type_id).unwrap();
            assert!(agent_type.spawns_on(level.index));
        }
        for _ in 0..20 {
            manager.update_all(0.5, &nav, &mut rng);
        }
        for agent in manager.agents() {
            if let Some(target) = agent.target {
                assert!(nav.is_walkable(target.x, target.z));
            }
        }
    }
}

#[test]
fn test_custom_config_from_json() {
    let json = r#"{
        "levels": [
            { "index": 0, "grid_size": 24, "required_rooms": [{ "kind": "treasure", "count": 2 }] }
        ],
        "bsp": { "min_leaf_size": 6, "max_depth": 2 }
    }"#;
    let config = DungeonConfig::from_json_str(json).unwrap();
    let level = generate_level(config.level(0).unwrap(), &config, &mut LevelRng::new(5)).unwrap();
    assert_eq!(level.grid_size, 24);
    assert_level_invariants(&level, &config);
    assert_eq!(
        level.room_count(RoomKind::Treasure) + level.placement_failures.len(),
        2
    );
}

#[test]
fn test_special_room_on_small_grid_keeps_walls_inside() {
    let json = r#"{
        "levels": [
            {
                "index": 0,
                "grid_size": 6,
                "room_min_size": 4,
                "room_max_size": 4,
                "required_rooms": [{ "kind": "lift", "count": 1 }]
            }
        ]
    }"#;
    let config = DungeonConfig::from_json_str(json).unwrap();
    let level = generate_level(config.level(0).unwrap(), &config, &mut LevelRng::new(1)).unwrap();
    let lift = level.first_room_of_kind(RoomKind::Lift).expect("lift fits with its walls");
    assert_eq!(level.rooms[lift].region(), Region::new(1, 1, 4, 4));
    assert_level_invariants(&level, &config);
}
