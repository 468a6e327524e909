#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Bomb Arena round between
//! computer-controlled players.

mod ascii;
mod level_file;
mod notifier;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bomb_arena_core::{Command, Controller, Event, RoundOutcome};
use bomb_arena_system_ai::Ai;
use bomb_arena_world::{self as world, query, World};
use clap::Parser;

use crate::{
    level_file::{LevelFile, DEFAULT_ARENA},
    notifier::{LogNotifier, Notifier},
};

/// Headless Bomb Arena simulation
#[derive(Parser, Debug)]
#[command(name = "bomb-arena")]
#[command(about = "Runs a headless Bomb Arena round between computer players", long_about = None)]
#[command(version)]
struct Cli {
    /// Plain-text level file (defaults to the built-in arena)
    #[arg(long)]
    level: Option<PathBuf>,

    /// TOML game configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of computer players, one per spawn point
    #[arg(long, default_value = "2")]
    players: usize,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// Seed for bonus drops and AI wandering, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Print a frame every N ticks (0 disables frames)
    #[arg(long, default_value = "60")]
    render_every: u64,

    /// Ticks between automatic bomb drops by every living player (0 disables)
    #[arg(long, default_value = "45")]
    bomb_interval: u64,
}

/// Entry point for the Bomb Arena command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = settings::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.bonus.seed = seed;
    }
    let ai_seed = config.bonus.seed;

    let level = match &cli.level {
        Some(path) => LevelFile::load(path)?,
        None => LevelFile::parse(DEFAULT_ARENA).context("built-in arena is malformed")?,
    };
    if cli.players == 0 {
        bail!("at least one player is required");
    }
    if cli.players > level.spawns.len() {
        bail!(
            "level has {} spawn points but {} players were requested",
            level.spawns.len(),
            cli.players
        );
    }

    let mut world = World::new(config).context("failed to create world")?;
    let mut notifier = LogNotifier::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            layout: level.layout,
        },
        &mut events,
    )?;
    for (index, cell) in level.spawns.iter().take(cli.players).enumerate() {
        world::apply(
            &mut world,
            Command::SpawnPlayer {
                name: format!("bot-{index}"),
                cell: *cell,
                controller: Controller::Ai,
            },
            &mut events,
        )?;
    }
    dispatch(&mut notifier, &mut events);

    let mut ai = Ai::new(ai_seed);
    let mut outcome = RoundOutcome::InProgress;
    for tick in 1..=cli.ticks {
        for command in plan_tick(&world, &mut ai, cli.bomb_interval, tick) {
            world::apply(&mut world, command, &mut events)?;
        }
        world::apply(&mut world, Command::Tick, &mut events)?;
        dispatch(&mut notifier, &mut events);

        if cli.render_every > 0 && tick % cli.render_every == 0 {
            print_frame(&world);
        }
        outcome = query::round_outcome(&world);
        if outcome != RoundOutcome::InProgress {
            break;
        }
    }

    print_frame(&world);
    let characters = query::character_view(&world);
    match outcome {
        RoundOutcome::Winner(id) => {
            let name = characters
                .get(id)
                .map_or("unknown", |winner| winner.name.as_str());
            println!("winner: {name}");
        }
        RoundOutcome::Draw => println!("draw: nobody survived"),
        RoundOutcome::InProgress => println!("time limit reached"),
    }
    for character in characters.iter() {
        println!(
            "{:>8}  life {}  score {}",
            character.name, character.life, character.score
        );
    }
    println!("{}", notifier.summary());
    Ok(())
}

/// Commands submitted before the tick: bomb drops first, then AI moves.
fn plan_tick(world: &World, ai: &mut Ai, bomb_interval: u64, tick: u64) -> Vec<Command> {
    let mut commands = Vec::new();
    let characters = query::character_view(world);
    if bomb_interval > 0 && tick % bomb_interval == 0 {
        commands.extend(
            characters
                .iter()
                .filter(|character| character.alive)
                .map(|character| Command::DropBomb {
                    player: character.id,
                }),
        );
    }
    if let (Some(level), Some(coordinates)) =
        (query::level_view(world), query::coordinates(world))
    {
        ai.handle(&characters, &level, coordinates, &mut commands);
    }
    commands
}

fn dispatch(notifier: &mut impl Notifier, events: &mut Vec<Event>) {
    for event in events.drain(..) {
        notifier.notify(&event);
    }
}

fn print_frame(world: &World) {
    if let Some(level) = query::level_view(world) {
        println!(
            "tick {}\n{}",
            query::tick_index(world),
            ascii::render(&level, &query::character_view(world))
        );
    }
}
