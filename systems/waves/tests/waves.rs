use std::time::Duration;

use galaxy_shooter_core::{
    ArenaConfig, Command, EnemyKind, EntityHandle, EntityRef, Event, Placement, PoolKind,
    SpawnDirective, WaveDescriptor, WavesConfig,
};
use galaxy_shooter_system_waves::WaveOrchestrator;
use glam::Vec2;

fn tick(millis: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }
}

fn rookies(count: usize, delay_ms: u64) -> Vec<SpawnDirective> {
    (0..count)
        .map(|_| {
            SpawnDirective::new(
                EnemyKind::Rookie,
                Duration::from_millis(delay_ms),
                Placement::Random,
            )
        })
        .collect()
}

fn wave(directives: Vec<SpawnDirective>, min_left: u32, delay_ms: u64) -> WaveDescriptor {
    WaveDescriptor {
        directives,
        min_enemies_left_to_progress: min_left,
        inter_wave_delay: Duration::from_millis(delay_ms),
    }
}

fn script(waves: Vec<WaveDescriptor>) -> WavesConfig {
    WavesConfig {
        settle_delay: Duration::from_millis(500),
        waves,
    }
}

/// Stand-in for the world: confirms every spawn command with a fresh handle.
#[derive(Default)]
struct Harness {
    next_index: u32,
    spawned: Vec<EntityHandle>,
    inbox: Vec<Event>,
}

impl Harness {
    fn run(&mut self, waves: &mut WaveOrchestrator, extra: &[Event]) -> (Vec<Command>, Vec<Event>) {
        let mut events = std::mem::take(&mut self.inbox);
        events.extend_from_slice(extra);

        let mut commands = Vec::new();
        let mut emitted = Vec::new();
        waves.handle(&events, &mut commands, &mut emitted);

        for command in &commands {
            if let Command::SpawnEnemy { kind, wave, .. } = command {
                let handle = EntityHandle::new(kind.pool_kind(), self.next_index);
                self.next_index += 1;
                self.spawned.push(handle);
                self.inbox.push(Event::EnemySpawned {
                    handle,
                    kind: *kind,
                    wave: *wave,
                });
            }
        }
        (commands, emitted)
    }

    fn kill(&self, index: usize) -> Event {
        Event::EntityKilled {
            entity: EntityRef::Pooled(self.spawned[index]),
        }
    }
}

fn count_spawns(commands: &[Command]) -> usize {
    commands
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
        .count()
}

#[test]
fn first_wave_waits_for_the_settle_delay_twice() {
    let config = script(vec![wave(rookies(2, 1_000), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 9);
    let mut harness = Harness::default();
    waves.start();

    let (commands, events) = harness.run(&mut waves, &[tick(400)]);
    assert!(commands.is_empty());
    assert!(events.is_empty());

    let (commands, events) = harness.run(&mut waves, &[tick(100)]);
    assert_eq!(events, vec![Event::WaveStarted { wave: 0 }]);
    assert!(commands.is_empty(), "the wave settles again before spawning");

    let (commands, _) = harness.run(&mut waves, &[tick(499)]);
    assert!(commands.is_empty());
    let (commands, _) = harness.run(&mut waves, &[tick(1)]);
    assert_eq!(count_spawns(&commands), 1, "second directive waits its delay");

    let (commands, _) = harness.run(&mut waves, &[tick(999)]);
    assert!(commands.is_empty());
    let (commands, _) = harness.run(&mut waves, &[tick(1)]);
    assert_eq!(count_spawns(&commands), 1);
}

#[test]
fn random_placement_lands_on_the_spawn_line() {
    let arena = ArenaConfig::default();
    let config = script(vec![wave(rookies(6, 0), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &arena, 3);
    let mut harness = Harness::default();
    waves.start();

    let (commands, _) = harness.run(&mut waves, &[tick(1_000)]);

    assert_eq!(count_spawns(&commands), 6);
    for command in commands {
        let Command::SpawnEnemy {
            position,
            rotation,
            wave,
            ..
        } = command
        else {
            panic!("unexpected command {command:?}");
        };
        assert!(position.x.abs() <= arena.spawn_x);
        assert_eq!(position.y, arena.spawn_y);
        assert_eq!(rotation, 0.0);
        assert_eq!(wave, Some(0));
    }
}

#[test]
fn explicit_transform_is_used_verbatim() {
    let directive = SpawnDirective::new(
        EnemyKind::Asteroid,
        Duration::ZERO,
        Placement::Transform {
            position: Vec2::new(-10.0, 12.0),
            rotation: -20.0,
        },
    );
    let config = script(vec![wave(vec![directive], 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 3);
    let mut harness = Harness::default();
    waves.start();

    let (commands, _) = harness.run(&mut waves, &[tick(1_000)]);

    assert_eq!(
        commands,
        vec![Command::SpawnEnemy {
            kind: EnemyKind::Asteroid,
            position: Vec2::new(-10.0, 12.0),
            rotation: -20.0,
            wave: Some(0),
        }]
    );
}

#[test]
fn next_wave_waits_until_few_enough_enemies_remain() {
    let config = script(vec![
        wave(rookies(4, 0), 2, 1_000),
        wave(rookies(1, 0), 0, 0),
    ]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 11);
    let mut harness = Harness::default();
    waves.start();

    let (commands, _) = harness.run(&mut waves, &[tick(1_000)]);
    assert_eq!(count_spawns(&commands), 4);
    let _ = harness.run(&mut waves, &[tick(16)]);
    assert_eq!(waves.live_count(), 4);

    let kill = harness.kill(0);
    let (_, events) = harness.run(&mut waves, &[kill, tick(5_000)]);
    assert!(events.is_empty(), "three enemies left is above the gate");
    assert_eq!(waves.current_wave(), Some(0));

    let kill = harness.kill(1);
    let (_, events) = harness.run(&mut waves, &[kill, tick(16)]);
    assert!(events.is_empty(), "gate open, inter-wave delay running");

    let (commands, events) = harness.run(&mut waves, &[tick(984)]);
    assert_eq!(events, vec![Event::WaveStarted { wave: 1 }]);
    assert!(commands.is_empty(), "a new wave settles before its first spawn");
    assert_eq!(waves.current_wave(), Some(1));

    let (commands, _) = harness.run(&mut waves, &[tick(499)]);
    assert!(commands.is_empty());
    let (commands, _) = harness.run(&mut waves, &[tick(1)]);
    assert_eq!(count_spawns(&commands), 1);
}

#[test]
fn unconfirmed_spawns_hold_the_gate() {
    let config = script(vec![wave(rookies(1, 0), 0, 0), wave(rookies(1, 0), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut commands = Vec::new();
    let mut events = Vec::new();
    waves.start();

    waves.handle(&[tick(1_000)], &mut commands, &mut events);
    waves.handle(&[tick(5_000)], &mut commands, &mut events);

    assert_eq!(events, vec![Event::WaveStarted { wave: 0 }]);
    assert_eq!(count_spawns(&commands), 1);
}

#[test]
fn failed_spawn_is_skipped() {
    let config = script(vec![wave(rookies(1, 0), 0, 0), wave(rookies(1, 0), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut commands = Vec::new();
    let mut events = Vec::new();
    waves.start();

    waves.handle(&[tick(1_000)], &mut commands, &mut events);
    waves.handle(
        &[Event::SpawnFailed {
            kind: PoolKind::Rookie,
            wave: Some(0),
        }],
        &mut commands,
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::WaveStarted { wave: 0 }, Event::WaveStarted { wave: 1 }]
    );
    assert_eq!(waves.live_count(), 0);
}

#[test]
fn recycled_handles_leave_the_live_set_on_deactivation() {
    let config = script(vec![wave(rookies(1, 0), 0, 0), wave(rookies(1, 0), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut harness = Harness::default();
    waves.start();

    let _ = harness.run(&mut waves, &[tick(1_000)]);
    let _ = harness.run(&mut waves, &[]);
    assert_eq!(waves.live_count(), 1);

    let released = Event::EntityDeactivated {
        handle: harness.spawned[0],
    };
    let (_, events) = harness.run(&mut waves, &[released]);

    assert_eq!(waves.live_count(), 0);
    assert_eq!(events, vec![Event::WaveStarted { wave: 1 }]);
}

#[test]
fn last_wave_completes_once_after_its_delay() {
    let config = script(vec![wave(rookies(1, 0), 0, 2_000)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut harness = Harness::default();
    waves.start();

    let _ = harness.run(&mut waves, &[tick(1_000)]);
    let _ = harness.run(&mut waves, &[]);
    let kill = harness.kill(0);
    let (_, events) = harness.run(&mut waves, &[kill]);
    assert!(events.is_empty(), "the inter-wave delay also trails the last wave");
    assert_eq!(waves.current_wave(), Some(0));

    let (_, events) = harness.run(&mut waves, &[tick(1_999)]);
    assert!(events.is_empty());
    let (_, events) = harness.run(&mut waves, &[tick(1)]);

    assert_eq!(events, vec![Event::AllWavesCompleted]);
    assert!(waves.is_completed());

    let (commands, events) = harness.run(&mut waves, &[tick(10_000)]);
    assert!(commands.is_empty());
    assert!(events.is_empty());
}

#[test]
fn stop_all_is_safe_in_any_state() {
    let config = script(vec![wave(rookies(3, 1_000), 0, 0)]);
    let mut idle = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    idle.stop_all();
    idle.stop_all();
    assert!(idle.is_stopped());

    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut harness = Harness::default();
    waves.start();
    let _ = harness.run(&mut waves, &[tick(500)]);
    waves.stop_all();

    let (commands, events) = harness.run(&mut waves, &[tick(10_000)]);
    assert!(commands.is_empty());
    assert!(events.is_empty());
    assert_eq!(waves.live_count(), 0);
}

#[test]
fn game_over_stops_the_script() {
    let config = script(vec![wave(rookies(3, 1_000), 0, 0)]);
    let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), 5);
    let mut harness = Harness::default();
    waves.start();
    let _ = harness.run(&mut waves, &[tick(500)]);

    let (commands, _) = harness.run(&mut waves, &[Event::GameOver, tick(5_000)]);

    assert!(commands.is_empty());
    assert!(waves.is_stopped());
}

#[test]
fn placement_is_reproducible_from_the_seed() {
    let config = script(vec![wave(rookies(5, 0), 0, 0)]);
    let spawn = |seed: u64| {
        let mut waves = WaveOrchestrator::new(&config, &ArenaConfig::default(), seed);
        let mut commands = Vec::new();
        let mut events = Vec::new();
        waves.start();
        waves.handle(&[tick(1_000)], &mut commands, &mut events);
        commands
    };

    assert_eq!(spawn(42), spawn(42));
    assert_ne!(spawn(42), spawn(43));
}
