#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted wave orchestrator that issues enemy spawn commands and gates
//! progression on the number of surviving enemies.

use std::{collections::BTreeSet, time::Duration};

use galaxy_shooter_core::{
    ArenaConfig, Command, EntityHandle, EntityRef, Event, Placement, SpawnDirective,
    WaveDescriptor, WavesConfig,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_PLACEMENT: &str = "wave-placement";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Settling { remaining: Duration },
    Spawning { wave: u32, next: usize, wait: Duration },
    Draining { wave: u32 },
    Interlude { wave: u32, remaining: Duration },
    Completed,
    Stopped,
}

/// Wave orchestrator driven by elapsed-time and lifecycle events.
#[derive(Debug)]
pub struct WaveOrchestrator {
    settle_delay: Duration,
    waves: Vec<WaveDescriptor>,
    spawn_x: f32,
    spawn_y: f32,
    seed: u64,
    rng: ChaCha8Rng,
    phase: Phase,
    live: BTreeSet<EntityHandle>,
    pending: u32,
}

impl WaveOrchestrator {
    /// Creates an idle orchestrator for the scripted waves.
    #[must_use]
    pub fn new(config: &WavesConfig, arena: &ArenaConfig, seed: u64) -> Self {
        Self {
            settle_delay: config.settle_delay,
            waves: config.waves.clone(),
            spawn_x: arena.spawn_x.abs(),
            spawn_y: arena.spawn_y,
            seed,
            rng: ChaCha8Rng::seed_from_u64(derive_wave_seed(seed, 0)),
            phase: Phase::Idle,
            live: BTreeSet::new(),
            pending: 0,
        }
    }

    /// Starts the settle countdown that precedes the first wave.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            log::debug!("wave orchestrator already started");
            return;
        }
        self.phase = Phase::Settling {
            remaining: self.settle_delay,
        };
    }

    /// Aborts every countdown and forgets tracked enemies; safe in any state.
    pub fn stop_all(&mut self) {
        if self.phase != Phase::Stopped {
            log::info!("wave orchestrator stopped");
        }
        self.phase = Phase::Stopped;
        self.live.clear();
        self.pending = 0;
    }

    /// Number of enemies spawned by the waves that are still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Wave currently issuing directives or waiting on its gate.
    #[must_use]
    pub fn current_wave(&self) -> Option<u32> {
        match self.phase {
            Phase::Spawning { wave, .. }
            | Phase::Draining { wave }
            | Phase::Interlude { wave, .. } => Some(wave),
            _ => None,
        }
    }

    /// Reports whether every wave has been played out.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Reports whether the orchestrator was stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    /// Consumes world events, tracking wave enemies and emitting spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        if self.phase == Phase::Stopped {
            return;
        }

        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::EnemySpawned {
                    handle,
                    wave: Some(_),
                    ..
                } => {
                    let _ = self.live.insert(*handle);
                    self.pending = self.pending.saturating_sub(1);
                }
                Event::SpawnFailed {
                    kind,
                    wave: Some(wave),
                } => {
                    log::warn!("wave {wave} skipped a {kind:?} spawn");
                    self.pending = self.pending.saturating_sub(1);
                }
                Event::EntityKilled {
                    entity: EntityRef::Pooled(handle),
                }
                | Event::EntityDeactivated { handle } => {
                    let _ = self.live.remove(handle);
                }
                Event::GameOver => {
                    self.stop_all();
                    return;
                }
                _ => {}
            }
        }

        self.advance(elapsed, out_commands, out_events);
    }

    fn advance(
        &mut self,
        mut budget: Duration,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        loop {
            match self.phase {
                Phase::Idle | Phase::Completed | Phase::Stopped => return,
                Phase::Settling { remaining } => {
                    if remaining > budget {
                        self.phase = Phase::Settling {
                            remaining: remaining - budget,
                        };
                        return;
                    }
                    budget -= remaining;
                    self.begin_wave(0, out_events);
                }
                Phase::Spawning { wave, next, wait } => {
                    if wait > budget {
                        self.phase = Phase::Spawning {
                            wave,
                            next,
                            wait: wait - budget,
                        };
                        return;
                    }
                    budget -= wait;

                    let directive = self
                        .descriptor(wave)
                        .and_then(|descriptor| descriptor.directives.get(next))
                        .copied();
                    self.phase = match directive {
                        Some(directive) => {
                            self.issue(wave, directive, out_commands);
                            Phase::Spawning {
                                wave,
                                next: next + 1,
                                wait: directive.delay,
                            }
                        }
                        None => Phase::Draining { wave },
                    };
                }
                Phase::Draining { wave } => {
                    let threshold = self
                        .descriptor(wave)
                        .map_or(0, |descriptor| descriptor.min_enemies_left_to_progress);
                    let outstanding = self.live.len() as u64 + u64::from(self.pending);
                    if outstanding > u64::from(threshold) {
                        return;
                    }
                    self.phase = Phase::Interlude {
                        wave,
                        remaining: self
                            .descriptor(wave)
                            .map_or(Duration::ZERO, |descriptor| descriptor.inter_wave_delay),
                    };
                }
                Phase::Interlude { wave, remaining } => {
                    if remaining > budget {
                        self.phase = Phase::Interlude {
                            wave,
                            remaining: remaining - budget,
                        };
                        return;
                    }
                    budget -= remaining;
                    if self.descriptor(wave + 1).is_none() {
                        self.complete(out_events);
                        return;
                    }
                    self.begin_wave(wave + 1, out_events);
                }
            }
        }
    }

    /// Announces the wave; its first directive waits out the settle delay again.
    fn begin_wave(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        if self.descriptor(wave).is_none() {
            self.complete(out_events);
            return;
        }
        log::info!("wave {wave} started");
        self.rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.seed, wave));
        self.phase = Phase::Spawning {
            wave,
            next: 0,
            wait: self.settle_delay,
        };
        out_events.push(Event::WaveStarted { wave });
    }

    fn complete(&mut self, out_events: &mut Vec<Event>) {
        log::info!("all waves completed");
        self.phase = Phase::Completed;
        out_events.push(Event::AllWavesCompleted);
    }

    fn issue(&mut self, wave: u32, directive: SpawnDirective, out_commands: &mut Vec<Command>) {
        let (position, rotation) = match directive.placement {
            Placement::Random => (self.random_spawn_point(), 0.0),
            Placement::Position { position } => (position, 0.0),
            Placement::Rotation { rotation } => (self.random_spawn_point(), rotation),
            Placement::Transform { position, rotation } => (position, rotation),
        };
        self.pending = self.pending.saturating_add(1);
        out_commands.push(Command::SpawnEnemy {
            kind: directive.enemy,
            position,
            rotation,
            wave: Some(wave),
        });
    }

    fn random_spawn_point(&mut self) -> Vec2 {
        let x = if self.spawn_x > 0.0 && self.spawn_x.is_finite() {
            self.rng.gen_range(-self.spawn_x..=self.spawn_x)
        } else {
            0.0
        };
        Vec2::new(x, self.spawn_y)
    }

    fn descriptor(&self, wave: u32) -> Option<&WaveDescriptor> {
        self.waves.get(wave as usize)
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(RNG_STREAM_PLACEMENT.as_bytes());
    hasher.update(wave.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_seeds_are_distinct_per_wave() {
        assert_ne!(derive_wave_seed(7, 0), derive_wave_seed(7, 1));
        assert_eq!(derive_wave_seed(7, 3), derive_wave_seed(7, 3));
        assert_ne!(derive_wave_seed(7, 0), derive_wave_seed(8, 0));
    }

    #[test]
    fn empty_script_completes_after_settling() {
        let config = WavesConfig {
            settle_delay: Duration::from_secs(1),
            waves: Vec::new(),
        };
        let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 1);
        let mut commands = Vec::new();
        let mut events = Vec::new();
        waves.start();

        waves.advance(Duration::from_secs(1), &mut commands, &mut events);

        assert!(waves.is_completed());
        assert_eq!(events, vec![Event::AllWavesCompleted]);
        assert!(commands.is_empty());
    }

    #[test]
    fn single_wave_announces_then_waits_before_spawning() {
        let config = WavesConfig {
            settle_delay: Duration::from_secs(1),
            waves: vec![WaveDescriptor {
                directives: vec![SpawnDirective::new(
                    galaxy_shooter_core::EnemyKind::Rookie,
                    Duration::ZERO,
                    Placement::Random,
                )],
                min_enemies_left_to_progress: 0,
                inter_wave_delay: Duration::ZERO,
            }],
        };
        let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 1);
        let mut commands = Vec::new();
        let mut events = Vec::new();
        waves.start();

        waves.advance(Duration::from_secs(1), &mut commands, &mut events);
        assert_eq!(events, vec![Event::WaveStarted { wave: 0 }]);
        assert!(commands.is_empty());

        waves.advance(Duration::from_secs(1), &mut commands, &mut events);
        assert_eq!(commands.len(), 1);
    }
}
