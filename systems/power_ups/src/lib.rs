#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Periodic power-up drops drawn from a weighted table.

use std::time::Duration;

use galaxy_shooter_core::{ArenaConfig, Command, Event, PowerUpDropConfig, PowerUpKind};
use glam::Vec2;
use rand::{distributions::Distribution, distributions::WeightedIndex, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const RNG_STREAM_DROPS: u64 = 7;

/// Deterministic drop system that emits power-up spawn commands on a fixed cadence.
#[derive(Debug)]
pub struct PowerUpDrops {
    interval: Duration,
    accumulator: Duration,
    spread_x: f32,
    spawn_y: f32,
    kinds: Vec<PowerUpKind>,
    weights: Option<WeightedIndex<u32>>,
    rng: ChaCha8Rng,
    stopped: bool,
}

impl PowerUpDrops {
    /// Creates the drop system; a table without positive weights drops nothing.
    #[must_use]
    pub fn new(config: &PowerUpDropConfig, arena: &ArenaConfig, seed: u64) -> Self {
        let weights = match WeightedIndex::new(config.table.iter().map(|entry| entry.weight)) {
            Ok(weights) => Some(weights),
            Err(error) => {
                log::warn!("power-up drops disabled: {error}");
                None
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(RNG_STREAM_DROPS);

        Self {
            interval: config.interval,
            accumulator: Duration::ZERO,
            spread_x: (arena.spawn_x * config.spread).abs(),
            spawn_y: arena.spawn_y,
            kinds: config.table.iter().map(|entry| entry.kind).collect(),
            weights,
            rng,
            stopped: false,
        }
    }

    /// Halts further drops.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.accumulator = Duration::ZERO;
    }

    /// Reports whether drops were halted.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Consumes events and emits a spawn command for every elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if events.iter().any(|event| matches!(event, Event::GameOver)) {
            self.stop();
        }
        if self.stopped || self.interval.is_zero() || self.weights.is_none() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            if let Some(command) = self.next_drop() {
                out.push(command);
            }
        }
    }

    fn next_drop(&mut self) -> Option<Command> {
        let weights = self.weights.as_ref()?;
        let kind = *self.kinds.get(weights.sample(&mut self.rng))?;
        let x = if self.spread_x > 0.0 {
            self.rng.gen_range(-self.spread_x..=self.spread_x)
        } else {
            0.0
        };
        Some(Command::SpawnPowerUp {
            kind,
            position: Vec2::new(x, self.spawn_y),
        })
    }
}
