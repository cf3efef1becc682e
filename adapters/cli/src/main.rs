#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Galaxy Shooter session.

mod autopilot;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use galaxy_shooter_core::{Event, GameConfig};
use galaxy_shooter_simulation::{load_config, render_config, Simulation, TickInput};
use galaxy_shooter_world::query;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless Galaxy Shooter simulation", long_about = None)]
struct Args {
    /// TOML configuration overriding the built-in defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,
    /// Simulation rate in ticks per second.
    #[arg(long, default_value_t = 60)]
    hz: u32,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Prints the effective configuration as TOML and exits.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Default)]
struct Summary {
    ticks: u32,
    kills: u32,
    waves_started: u32,
    power_ups: u32,
    all_waves_completed: bool,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        self.ticks += 1;
        for event in events {
            match event {
                Event::EntityKilled { .. } => self.kills += 1,
                Event::WaveStarted { .. } => self.waves_started += 1,
                Event::PowerUpCollected { .. } => self.power_ups += 1,
                Event::AllWavesCompleted => self.all_waves_completed = true,
                _ => {}
            }
        }
    }
}

/// Entry point for the Galaxy Shooter command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.hz > 0, "--hz must be at least 1");

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    if args.dump_config {
        print!("{}", render_config(&config).context("rendering configuration")?);
        return Ok(());
    }

    let mut simulation = Simulation::new(config).context("starting simulation")?;
    println!("{}", query::welcome_banner(simulation.world()));

    let dt = Duration::from_secs(1) / args.hz;
    let mut summary = Summary::default();
    for _ in 0..args.ticks {
        let input = TickInput {
            player: autopilot::pilot(simulation.world()),
            collisions: autopilot::collisions(simulation.world()),
            commands: Vec::new(),
        };
        let events = simulation.step(&input, dt);
        summary.record(&events);
        if query::is_game_over(simulation.world()) {
            log::info!("game over after {} ticks", summary.ticks);
            break;
        }
    }

    let player = query::player(simulation.world());
    let outcome = if player.dead {
        "destroyed"
    } else if query::is_game_over(simulation.world()) {
        "ended"
    } else {
        "survived"
    };
    println!(
        "{outcome} | ticks: {} | score: {} | kills: {} | waves started: {}{} | power-ups: {} | health: {}/{}",
        summary.ticks,
        query::score(simulation.world()),
        summary.kills,
        summary.waves_started,
        if summary.all_waves_completed {
            " (all completed)"
        } else {
            ""
        },
        summary.power_ups,
        player.health,
        player.max_health,
    );
    Ok(())
}
