//! delve: dungeon floor-plan generator
//!
//! Generates a dungeon from a seed and prints each level as text or JSON.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use strum::IntoEnumIterator;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use delve_core::agent::{AgentManager, AgentState};
use delve_core::dungeon::{Dungeon, Level, TileKind};
use delve_core::{DungeonConfig, LevelRng};

/// Procedural dungeon floor-plan generator
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Generate dungeon floor plans", long_about = None)]
struct Args {
    /// Generation seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// JSON configuration file (built-in defaults if omitted)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Only show the level with this index
    #[arg(short = 'l', long = "level", allow_hyphen_values = true)]
    level: Option<i32>,

    /// Print the generated levels as JSON
    #[arg(long = "json")]
    json: bool,

    /// Spawn agents and run them for this many one-second ticks
    #[arg(short = 'a', long = "agents")]
    agents: Option<u32>,

    /// Verbose (debug) logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => DungeonConfig::load_from_file(path)?,
        None => DungeonConfig::default(),
    };
    if let Some(index) = args.level {
        config.level(index)?;
    }

    let seed = args.seed.unwrap_or_else(|| LevelRng::from_entropy().seed());
    let dungeon = Dungeon::generate(&config, seed)?;
    tracing::info!(seed, "dungeon generated");

    let levels: Vec<&Level> = dungeon
        .levels
        .iter()
        .filter(|l| args.level.is_none_or(|index| l.index == index))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
        return Ok(());
    }

    println!("seed {seed}");
    let mut rng = LevelRng::new(seed);
    for level in levels {
        print_level(&dungeon, level);
        if let Some(ticks) = args.agents {
            run_agents(&dungeon, level, &config, ticks, &mut rng)?;
        }
    }
    Ok(())
}

fn print_level(dungeon: &Dungeon, level: &Level) {
    println!();
    println!("level {} ({} rooms)", level.index, level.rooms.len());
    print!("{}", level.render_ascii());

    let counts: Vec<String> = TileKind::iter()
        .map(|kind| format!("{kind}: {}", level.tiles().count(kind)))
        .collect();
    println!("tiles  {}, decor: {}", counts.join(", "), level.decor().len());

    for kind in &level.placement_failures {
        println!("unplaced {kind} room");
    }
    if let Some(lift) = dungeon.lift_down(level.index) {
        println!(
            "lift   room {} -> level {} room {}",
            lift.from_room, lift.to_level, lift.to_room
        );
    }
}

fn run_agents(
    dungeon: &Dungeon,
    level: &Level,
    config: &DungeonConfig,
    ticks: u32,
    rng: &mut LevelRng,
) -> Result<(), Box<dyn Error>> {
    let nav = dungeon.navigation(level.index, config)?;
    let mut manager = AgentManager::new();
    let spawned = manager.spawn_in_level(level, &nav, config, rng)?;

    let mut transitions = 0;
    for _ in 0..ticks {
        transitions += manager.update_all(1.0, &nav, rng);
    }

    let patrolling = manager
        .agents()
        .iter()
        .filter(|a| a.state == AgentState::Patrol)
        .count();
    println!(
        "agents {spawned} spawned, {patrolling} patrolling, {transitions} transitions over {ticks} ticks"
    );
    Ok(())
}
