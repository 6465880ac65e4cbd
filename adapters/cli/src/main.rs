#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a command script against a Robo Rally board.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use roborally_core::{Command, Event};
use roborally_system_spawning::{Candidate, Config as SpawningConfig, Spawning};
use roborally_world::{self as world, query, World};

use crate::config::Script;

/// Replays a command script against a board and reports the final state.
#[derive(Parser, Debug)]
#[command(name = "roborally")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board map (JSON)
    #[arg(short, long)]
    map: PathBuf,

    /// Command script (JSON)
    #[arg(short, long)]
    script: PathBuf,

    /// Rule overrides (TOML)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Print every event as a JSON line
    #[arg(long)]
    events: bool,
}

/// Entry point for the Robo Rally command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let map = config::load_map(&args.map)?;
    let script = config::load_script(&args.script)?;
    let rules = config::load_rules(args.rules.as_deref())?;

    let mut world = World::from_map(&map, rules)
        .with_context(|| format!("failed to assemble board from {}", args.map.display()))?;
    info!(
        "board {}x{} loaded with {} start points",
        map.width,
        map.height,
        query::board(&world).start_points().len()
    );

    let events = replay(&mut world, &script);
    info!("{} events produced", events.len());

    if args.events {
        for event in &events {
            println!(
                "{}",
                serde_json::to_string(event).context("failed to encode event")?
            );
        }
    }

    println!("{}", report::render(&world)?);
    Ok(())
}

/// Registers players, places robots and runs the scripted commands in order.
fn replay(world: &mut World, script: &Script) -> Vec<Event> {
    let mut events = Vec::new();
    for player in &script.players {
        world::apply(world, Command::AddPlayer { player: *player }, &mut events);
    }

    let candidates: Vec<Candidate> = script
        .robots
        .iter()
        .map(|entry| Candidate::new(entry.robot, entry.owner))
        .collect();
    let mut spawning = Spawning::new(SpawningConfig::default());
    let mut spawns = Vec::new();
    spawning.handle(
        &events,
        query::board(world).start_points(),
        &candidates,
        &mut spawns,
    );
    if spawns.len() < candidates.len() {
        warn!(
            "{} robots left unplaced: not enough start points",
            candidates.len() - spawns.len()
        );
    }

    for command in spawns.into_iter().chain(script.commands.iter().cloned()) {
        debug!("applying {command:?}");
        let start = events.len();
        world::apply(world, command, &mut events);
        for event in &events[start..] {
            if let Event::CommandRejected { reason } = event {
                warn!("command rejected: {reason:?}");
            }
        }
    }
    events
}
