#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped Galaxy Shooter simulation that owns the world and every system.

use std::time::Duration;

use galaxy_shooter_core::{
    BodySnapshot, Command, EntityRef, Event, Extent, GameConfig, PlayerInput,
};
use galaxy_shooter_system_abilities::Abilities;
use galaxy_shooter_system_beam::BeamWeapon;
use galaxy_shooter_system_power_ups::PowerUpDrops;
use galaxy_shooter_system_waves::WaveOrchestrator;
use galaxy_shooter_world::{self as world, query, World};
use glam::Vec2;

pub mod config;

pub use config::{load_config, parse_config, render_config, ConfigError};

/// Everything the adapters feed into a single tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Player intents for the tick.
    pub player: PlayerInput,
    /// Overlapping pairs reported by the collision layer.
    pub collisions: Vec<(EntityRef, EntityRef)>,
    /// Extra commands applied before the tick advances.
    pub commands: Vec<Command>,
}

/// Reports whether two axis-aligned rectangles overlap.
#[must_use]
pub fn aabb_overlap(extent: &Extent, body: &BodySnapshot) -> bool {
    extent.overlaps(&body.extent())
}

/// Root of the simulation: the world plus the systems reacting to it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    abilities: Abilities,
    beam: BeamWeapon,
    waves: WaveOrchestrator,
    power_ups: PowerUpDrops,
    carried: Vec<Event>,
}

impl Simulation {
    /// Validates the configuration, prewarms every pool and starts the waves.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let abilities = Abilities::new(&config.abilities);
        let beam = BeamWeapon::new(config.beam);
        let mut waves = WaveOrchestrator::new(&config.waves, &config.arena, config.seed);
        let power_ups = PowerUpDrops::new(&config.power_ups, &config.arena, config.seed);
        let pools = config.pools.clone();

        let mut world = World::new(config);
        let mut events = Vec::new();
        for entry in pools {
            world::apply(
                &mut world,
                Command::Prewarm {
                    kind: entry.kind,
                    count: entry.count,
                },
                &mut events,
            );
        }
        waves.start();
        log::info!("{}", query::welcome_banner(&world));

        Ok(Self {
            world,
            abilities,
            beam,
            waves,
            power_ups,
            carried: events,
        })
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Pickup and ability system.
    #[must_use]
    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    /// Charged beam weapon.
    #[must_use]
    pub fn beam(&self) -> &BeamWeapon {
        &self.beam
    }

    /// Wave orchestrator.
    #[must_use]
    pub fn waves(&self) -> &WaveOrchestrator {
        &self.waves
    }

    /// Power-up drop system.
    #[must_use]
    pub fn power_ups(&self) -> &PowerUpDrops {
        &self.power_ups
    }

    /// Point the beam is fired from: the nose of the player ship.
    #[must_use]
    pub fn beam_origin(&self) -> Vec2 {
        let player = query::player(&self.world);
        player.position + Vec2::new(0.0, player.half_size.y)
    }

    /// Advances the simulation by one tick and returns every event it produced.
    ///
    /// Input and collisions are applied first, then the world advances. The
    /// ability and beam systems react to that, after which the waves and
    /// power-up drops see the whole tick, including kills caused by the beam.
    /// Spawn confirmations produced last are delivered to the systems at the
    /// start of the next tick.
    pub fn step(&mut self, input: &TickInput, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();

        world::apply(
            &mut self.world,
            Command::SetPlayerInput {
                input: input.player,
            },
            &mut events,
        );
        for command in &input.commands {
            world::apply(&mut self.world, command.clone(), &mut events);
        }
        for (first, second) in &input.collisions {
            world::apply(
                &mut self.world,
                Command::ReportCollision {
                    first: *first,
                    second: *second,
                },
                &mut events,
            );
        }
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut observed = std::mem::take(&mut self.carried);
        observed.extend(events.iter().cloned());

        let mut commands = Vec::new();
        let mut reactions = Vec::new();
        self.abilities
            .handle(&observed, &mut commands, &mut reactions);
        let origin = self.beam_origin();
        let targets = query::bodies(&self.world);
        self.beam.handle(
            &observed,
            origin,
            &targets,
            aabb_overlap,
            &mut commands,
            &mut reactions,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut reactions);
        }
        events.extend(reactions.iter().cloned());
        observed.extend(reactions);

        let mut progression = Vec::new();
        self.waves
            .handle(&observed, &mut commands, &mut progression);
        self.power_ups.handle(&observed, &mut commands);

        let mut confirmations = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut confirmations);
        }
        events.extend(progression);
        events.extend(confirmations.iter().cloned());
        self.carried = confirmations;

        events
    }
}
