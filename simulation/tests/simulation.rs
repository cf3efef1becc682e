use std::time::Duration;

use galaxy_shooter_core::{
    AbilityKind, BeamState, Command, EntityRef, Event, FirePattern, GameConfig, InvalidConfig,
    PlayerInput, PoolKind, PowerUpKind,
};
use galaxy_shooter_simulation::{parse_config, ConfigError, Simulation, TickInput};
use galaxy_shooter_world::query;
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(16);

fn simulation() -> Simulation {
    Simulation::new(GameConfig::default()).expect("default configuration is valid")
}

fn idle() -> TickInput {
    TickInput::default()
}

fn with_commands(commands: Vec<Command>) -> TickInput {
    TickInput {
        commands,
        ..TickInput::default()
    }
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = GameConfig::default();
    config.player.max_health = 0;

    let error = Simulation::new(config).expect_err("zero health must be rejected");

    assert!(matches!(
        error,
        ConfigError::Invalid(InvalidConfig::ZeroMaxHealth { entity: "player" })
    ));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let error = parse_config("seed = \"not a number\"").expect_err("bad seed");
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn toml_overrides_reach_the_world() {
    let config = parse_config(
        r#"
        seed = 11

        [player]
        max_ammo = 3

        [waves]
        settle_delay = 0.5

        [[waves.waves]]
        min_enemies_left_to_progress = 0

        [[waves.waves.directives]]
        enemy = "Asteroid"
        delay = 0.0
        placement = { mode = "Transform", position = [4.0, 12.0], rotation = 0.0 }
        "#,
    )
    .expect("valid document");
    let mut sim = Simulation::new(config).expect("valid configuration");

    assert_eq!(query::player(sim.world()).ammo, 3);

    let mut spawned = Vec::new();
    for _ in 0..80 {
        spawned.extend(sim.step(&idle(), FRAME).into_iter().filter_map(|event| match event {
            Event::EnemySpawned { handle, .. } => Some(handle),
            _ => None,
        }));
    }

    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].kind(), PoolKind::Asteroid);
}

#[test]
fn first_wave_starts_after_settling() {
    let mut sim = simulation();
    let mut started_at = None;
    let mut spawned_at = None;

    for frame in 0..400 {
        let events = sim.step(&idle(), FRAME);
        if events.contains(&Event::WaveStarted { wave: 0 }) {
            started_at = Some(frame);
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { wave: Some(0), .. }))
        {
            spawned_at = Some(frame);
            break;
        }
    }

    assert_eq!(started_at, Some(124), "2 s settle delay at 16 ms per frame");
    assert_eq!(spawned_at, Some(249), "the wave settles another 2 s before spawning");

    let _ = sim.step(&idle(), FRAME);
    assert_eq!(sim.waves().live_count(), 1, "confirmation delivered next tick");
}

#[test]
fn collected_power_up_runs_through_the_ability_pipeline() {
    let mut sim = simulation();
    let events = sim.step(
        &with_commands(vec![Command::SpawnPowerUp {
            kind: PowerUpKind::Shield,
            position: Vec2::new(0.0, -4.0),
        }]),
        FRAME,
    );
    let handle = events
        .iter()
        .find_map(|event| match event {
            Event::EntityActivated { handle, .. } if handle.kind() == PoolKind::PowerUp => {
                Some(*handle)
            }
            _ => None,
        })
        .expect("power-up spawned");

    let events = sim.step(
        &TickInput {
            collisions: vec![(EntityRef::Player, EntityRef::Pooled(handle))],
            ..TickInput::default()
        },
        FRAME,
    );

    assert!(events.contains(&Event::PowerUpCollected {
        kind: PowerUpKind::Shield,
    }));
    assert!(events.contains(&Event::AbilityActivated {
        kind: AbilityKind::Shield,
    }));
    assert!(events.contains(&Event::ShieldChanged {
        entity: EntityRef::Player,
        shield: 3,
    }));
    assert_eq!(query::player(sim.world()).shield, 3);
    assert!(sim.abilities().scheduler().is_active(AbilityKind::Shield));
}

#[test]
fn firing_with_beam_pattern_charges_the_beam() {
    let mut sim = simulation();
    let _ = sim.step(
        &with_commands(vec![Command::SetFirePattern {
            pattern: FirePattern::Beam,
        }]),
        FRAME,
    );

    let events = sim.step(
        &TickInput {
            player: PlayerInput::new(Vec2::ZERO, true, false),
            ..TickInput::default()
        },
        FRAME,
    );

    assert!(events.contains(&Event::BeamRequested));
    assert!(events.contains(&Event::BeamStateChanged {
        state: BeamState::ChargeUp,
    }));
    assert_eq!(sim.beam().state(), BeamState::ChargeUp);
}

#[test]
fn ending_the_game_halts_every_system() {
    let mut sim = simulation();
    let events = sim.step(&with_commands(vec![Command::EndGame]), FRAME);
    assert!(events.contains(&Event::GameOver));

    let mut spawns = 0;
    for _ in 0..1_000 {
        spawns += sim
            .step(&idle(), FRAME)
            .iter()
            .filter(|event| matches!(event, Event::EntityActivated { .. }))
            .count();
    }

    assert!(query::is_game_over(sim.world()));
    assert!(sim.waves().is_stopped());
    assert!(sim.power_ups().is_stopped());
    assert_eq!(spawns, 0);
}

#[test]
fn identical_inputs_replay_identically() {
    let run = || {
        let mut sim = simulation();
        let input = TickInput {
            player: PlayerInput::new(Vec2::new(1.0, 0.0), true, true),
            ..TickInput::default()
        };
        (0..600)
            .flat_map(|_| sim.step(&input, FRAME))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}
