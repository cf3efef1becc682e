#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Galaxy Shooter simulation kernel.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event batches, query immutable
//! snapshots, and respond with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{
    AbilitiesConfig, ArenaConfig, AxisBounds, BeamConfig, BombingConfig, DodgingConfig,
    EnemiesConfig, EnemyConfig, FireInterval, GameConfig, InvalidConfig, PlayerConfig,
    PoolPrewarm, PowerUpDropConfig, ProjectileConfig, RammingConfig, SpawnDirective,
    ThrusterConfig, ToxinConfig, WaveDescriptor, WavesConfig, WeightedPowerUp,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Galaxy Shooter.";

/// Registry tag routing pooled instances back to their owning pool.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PoolKind {
    /// Basic shooter enemy.
    Rookie,
    /// Drifting asteroid enemy.
    Asteroid,
    /// Swaying enemy that drops bombs.
    Bomber,
    /// Shielded enemy that leaves toxic smoke behind.
    Toxic,
    /// Enemy that rams the player.
    Reckless,
    /// Enemy that sidesteps player lasers.
    Avoider,
    /// Enemy that aims its lasers at the player.
    Watcher,
    /// Short-lived death effect.
    Explosion,
    /// Single forward laser fired by the player.
    PlayerLaser,
    /// Laser fired in the triple-shot spread.
    TripleShotLaser,
    /// Laser that steers toward the nearest enemy.
    HeatSeekLaser,
    /// Laser fired by enemies toward the player.
    EnemyLaser,
    /// Bomb dropped by bombers; bursts into enemy lasers.
    Bomb,
    /// Cloud left behind when a toxic enemy loses its shield.
    ToxicSmoke,
    /// Collectible power-up capsule.
    PowerUp,
}

impl PoolKind {
    /// Every pool kind known to the kernel, in registry order.
    pub const ALL: [PoolKind; 15] = [
        PoolKind::Rookie,
        PoolKind::Asteroid,
        PoolKind::Bomber,
        PoolKind::Toxic,
        PoolKind::Reckless,
        PoolKind::Avoider,
        PoolKind::Watcher,
        PoolKind::Explosion,
        PoolKind::PlayerLaser,
        PoolKind::TripleShotLaser,
        PoolKind::HeatSeekLaser,
        PoolKind::EnemyLaser,
        PoolKind::Bomb,
        PoolKind::ToxicSmoke,
        PoolKind::PowerUp,
    ];

    /// Reports whether instances of this kind are lasers fired by the player.
    #[must_use]
    pub const fn is_player_projectile(self) -> bool {
        matches!(
            self,
            PoolKind::PlayerLaser | PoolKind::TripleShotLaser | PoolKind::HeatSeekLaser
        )
    }

    /// Reports whether instances of this kind are projectiles that hurt the player.
    #[must_use]
    pub const fn is_hostile_projectile(self) -> bool {
        matches!(self, PoolKind::EnemyLaser | PoolKind::Bomb)
    }
}

/// Opaque reference to a pooled instance.
///
/// A handle names the instance rather than one activation of it, so a
/// recycled instance is handed out again under the same handle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityHandle {
    kind: PoolKind,
    index: u32,
}

impl EntityHandle {
    /// Creates a new handle for the instance stored at `index` within the pool of `kind`.
    #[must_use]
    pub const fn new(kind: PoolKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// Pool the instance belongs to.
    #[must_use]
    pub const fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Slot of the instance within its pool.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

/// Reference to any entity that can take part in combat or collisions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EntityRef {
    /// The player ship, which lives outside of the pools.
    Player,
    /// A pooled instance.
    Pooled(EntityHandle),
}

/// Flat enemy variants selected by configuration.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Enemy ship that fires lasers at the player.
    Rookie,
    /// Inert rock that only damages on contact.
    Asteroid,
    /// Sways across the field and drops a bomb once per pass.
    Bomber,
    /// Carries a rechargeable shield and leaves smoke when it breaks.
    Toxic,
    /// Turns toward a nearby player and rams it.
    Reckless,
    /// Sidesteps player lasers coming from below.
    Avoider,
    /// Fires toward whichever side the player is on.
    Watcher,
}

impl EnemyKind {
    /// Every enemy variant, in registry order.
    pub const ALL: [EnemyKind; 7] = [
        EnemyKind::Rookie,
        EnemyKind::Asteroid,
        EnemyKind::Bomber,
        EnemyKind::Toxic,
        EnemyKind::Reckless,
        EnemyKind::Avoider,
        EnemyKind::Watcher,
    ];

    /// Pool that stores instances of this enemy kind.
    #[must_use]
    pub const fn pool_kind(self) -> PoolKind {
        match self {
            EnemyKind::Rookie => PoolKind::Rookie,
            EnemyKind::Asteroid => PoolKind::Asteroid,
            EnemyKind::Bomber => PoolKind::Bomber,
            EnemyKind::Toxic => PoolKind::Toxic,
            EnemyKind::Reckless => PoolKind::Reckless,
            EnemyKind::Avoider => PoolKind::Avoider,
            EnemyKind::Watcher => PoolKind::Watcher,
        }
    }

    /// Maps a pool kind back onto the enemy stored in it.
    #[must_use]
    pub const fn from_pool_kind(kind: PoolKind) -> Option<Self> {
        match kind {
            PoolKind::Rookie => Some(EnemyKind::Rookie),
            PoolKind::Asteroid => Some(EnemyKind::Asteroid),
            PoolKind::Bomber => Some(EnemyKind::Bomber),
            PoolKind::Toxic => Some(EnemyKind::Toxic),
            PoolKind::Reckless => Some(EnemyKind::Reckless),
            PoolKind::Avoider => Some(EnemyKind::Avoider),
            PoolKind::Watcher => Some(EnemyKind::Watcher),
            _ => None,
        }
    }

    /// Lowercase name used by the configuration tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EnemyKind::Rookie => "rookie",
            EnemyKind::Asteroid => "asteroid",
            EnemyKind::Bomber => "bomber",
            EnemyKind::Toxic => "toxic",
            EnemyKind::Reckless => "reckless",
            EnemyKind::Avoider => "avoider",
            EnemyKind::Watcher => "watcher",
        }
    }
}

/// Collectible power-up variants.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PowerUpKind {
    /// Timed three-way spread shot.
    TripleShot,
    /// Timed homing lasers.
    HeatSeek,
    /// Timed charged beam weapon.
    Beam,
    /// Timed movement speed boost.
    Speed,
    /// Timed shield.
    Shield,
    /// Instant single point of health.
    Life,
    /// Instant full ammunition refill.
    Ammo,
}

impl PowerUpKind {
    /// Timed ability granted by the power-up, or `None` for instant effects.
    #[must_use]
    pub const fn ability(self) -> Option<AbilityKind> {
        match self {
            PowerUpKind::TripleShot => Some(AbilityKind::TripleShot),
            PowerUpKind::HeatSeek => Some(AbilityKind::HeatSeek),
            PowerUpKind::Beam => Some(AbilityKind::Beam),
            PowerUpKind::Speed => Some(AbilityKind::Speed),
            PowerUpKind::Shield => Some(AbilityKind::Shield),
            PowerUpKind::Life | PowerUpKind::Ammo => None,
        }
    }
}

/// Timed abilities granted to the player.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AbilityKind {
    /// Fires three lasers per shot.
    TripleShot,
    /// Fires lasers that steer toward enemies.
    HeatSeek,
    /// Replaces lasers with the charged beam.
    Beam,
    /// Multiplies movement speed.
    Speed,
    /// Absorbs incoming damage.
    Shield,
}

impl AbilityKind {
    /// Every ability kind known to the kernel.
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::TripleShot,
        AbilityKind::HeatSeek,
        AbilityKind::Beam,
        AbilityKind::Speed,
        AbilityKind::Shield,
    ];

    /// Exclusion group the ability competes in.
    #[must_use]
    pub const fn group(self) -> ExclusionGroup {
        match self {
            AbilityKind::TripleShot | AbilityKind::HeatSeek | AbilityKind::Beam => {
                ExclusionGroup::WeaponMode
            }
            AbilityKind::Speed => ExclusionGroup::Mobility,
            AbilityKind::Shield => ExclusionGroup::Defense,
        }
    }
}

/// Sets of abilities of which at most one may be active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExclusionGroup {
    /// Abilities that replace the player's weapon.
    WeaponMode,
    /// Abilities that alter movement.
    Mobility,
    /// Abilities that protect the player.
    Defense,
}

/// Weapon behaviour used when the player fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirePattern {
    /// One forward laser per shot.
    #[default]
    Single,
    /// Three lasers fanned out per shot.
    TripleShot,
    /// One homing laser per shot.
    HeatSeek,
    /// Firing requests the charged beam instead of lasers.
    Beam,
}

/// Placement policy of a scripted spawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Placement {
    /// Uniform x along the spawn line, default heading.
    Random,
    /// Explicit coordinates, default heading.
    Position {
        /// Spawn coordinates.
        position: Vec2,
    },
    /// Uniform x along the spawn line with an explicit heading in degrees.
    Rotation {
        /// Heading in degrees, counter-clockwise from straight down.
        rotation: f32,
    },
    /// Explicit coordinates and heading in degrees.
    Transform {
        /// Spawn coordinates.
        position: Vec2,
        /// Heading in degrees, counter-clockwise from straight down.
        rotation: f32,
    },
}

/// Phase of the charged beam weapon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BeamState {
    /// Beam is idle.
    #[default]
    Inactive,
    /// Charge is accumulating toward full.
    ChargeUp,
    /// Beam is live and sampling collisions.
    Firing,
    /// Charge is draining back to zero.
    Regressing,
}

/// Presentation cues raised when the beam charge crosses configured thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BeamCue {
    /// Charge-up glow should switch on.
    LightOn,
    /// Charge-up particles should start.
    ParticlesOn,
    /// Charge-up particles should stop while regressing.
    ParticlesOff,
}

/// Axis-aligned rectangle described by its center and half size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    center: Vec2,
    half_size: Vec2,
}

impl Extent {
    /// Creates a new extent centered on `center`.
    #[must_use]
    pub fn new(center: Vec2, half_size: Vec2) -> Self {
        Self {
            center,
            half_size: half_size.abs(),
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Half of the rectangle's width and height.
    #[must_use]
    pub const fn half_size(&self) -> Vec2 {
        self.half_size
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let delta = (point - self.center).abs();
        delta.x <= self.half_size.x && delta.y <= self.half_size.y
    }

    /// Reports whether the two rectangles overlap, touching edges included.
    #[must_use]
    pub fn overlaps(&self, other: &Extent) -> bool {
        let delta = (other.center - self.center).abs();
        let reach = self.half_size + other.half_size;
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Intents captured by the input-mapping layer for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Desired movement direction; normalised by the world.
    pub movement: Vec2,
    /// Player holds the fire button.
    pub fire: bool,
    /// Player holds the thrust button.
    pub thrust: bool,
}

impl PlayerInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(movement: Vec2, fire: bool, thrust: bool) -> Self {
        Self {
            movement,
            fire,
            thrust,
        }
    }
}

/// Immutable representation of an active pooled instance used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySnapshot {
    /// Handle of the pooled instance.
    pub handle: EntityHandle,
    /// World position of the instance.
    pub position: Vec2,
    /// Half extents of the instance's collider.
    pub half_size: Vec2,
    /// Remaining health for damageable instances, `None` otherwise.
    pub health: Option<u32>,
}

impl BodySnapshot {
    /// Collider rectangle of the instance.
    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.position, self.half_size)
    }

    /// Reports whether the instance can still take damage.
    #[must_use]
    pub fn is_alive_damageable(&self) -> bool {
        matches!(self.health, Some(health) if health > 0)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a pool and fills it with deactivated instances.
    Prewarm {
        /// Pool to register.
        kind: PoolKind,
        /// Number of instances created up front.
        count: u32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests an enemy from its pool.
    SpawnEnemy {
        /// Enemy variant to spawn.
        kind: EnemyKind,
        /// Spawn coordinates.
        position: Vec2,
        /// Heading in degrees, counter-clockwise from straight down.
        rotation: f32,
        /// Wave that requested the spawn, if any.
        wave: Option<u32>,
    },
    /// Requests a power-up capsule from its pool.
    SpawnPowerUp {
        /// Power-up carried by the capsule.
        kind: PowerUpKind,
        /// Spawn coordinates.
        position: Vec2,
    },
    /// Returns a pooled instance to its pool.
    Release {
        /// Instance to deactivate.
        handle: EntityHandle,
    },
    /// Applies damage to a damageable entity.
    DamageEntity {
        /// Entity receiving the damage.
        target: EntityRef,
        /// Requested damage; its magnitude is clamped to the entity's health range.
        amount: i32,
    },
    /// Restores health to a damageable entity.
    HealEntity {
        /// Entity receiving the healing.
        target: EntityRef,
        /// Requested healing; its magnitude is clamped to the entity's health range.
        amount: i32,
    },
    /// Raises or refills a shield on the target.
    ActivateShield {
        /// Entity receiving the shield.
        target: EntityRef,
        /// Shield health granted.
        capacity: u32,
    },
    /// Drops the target's shield.
    DeactivateShield {
        /// Entity losing its shield.
        target: EntityRef,
    },
    /// Forces the target into its terminal dead state.
    KillEntity {
        /// Entity to kill.
        target: EntityRef,
    },
    /// Reports an overlap detected by the external collision system.
    ReportCollision {
        /// First participant of the overlap.
        first: EntityRef,
        /// Second participant of the overlap.
        second: EntityRef,
    },
    /// Switches the player's weapon behaviour.
    SetFirePattern {
        /// Pattern to use for subsequent shots.
        pattern: FirePattern,
    },
    /// Refills player ammunition by the amount, or completely when `None`.
    RefillAmmo {
        /// Rounds to add.
        amount: Option<u32>,
    },
    /// Replaces the player's movement speed multiplier.
    SetSpeedMultiplier {
        /// New multiplier.
        multiplier: f32,
    },
    /// Stores the player's intents for the upcoming tick.
    SetPlayerInput {
        /// Intents to apply.
        input: PlayerInput,
    },
    /// Raises the game-over flag.
    EndGame,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A pooled instance became active.
    EntityActivated {
        /// Instance that was activated.
        handle: EntityHandle,
        /// Position the instance was placed at.
        position: Vec2,
    },
    /// A pooled instance returned to its pool.
    EntityDeactivated {
        /// Instance that was deactivated.
        handle: EntityHandle,
    },
    /// A spawn request was refused and its dependent action skipped.
    SpawnFailed {
        /// Pool the spawn was requested from.
        kind: PoolKind,
        /// Wave that requested the spawn, if any.
        wave: Option<u32>,
    },
    /// An enemy entered the play field.
    EnemySpawned {
        /// Instance hosting the enemy.
        handle: EntityHandle,
        /// Enemy variant.
        kind: EnemyKind,
        /// Wave that requested the spawn, if any.
        wave: Option<u32>,
    },
    /// A damageable entity lost health without dying.
    EntityDamaged {
        /// Entity that was hit.
        entity: EntityRef,
        /// Health remaining after the hit.
        health: u32,
    },
    /// A damageable entity regained health.
    EntityHealed {
        /// Entity that was healed.
        entity: EntityRef,
        /// Health after healing.
        health: u32,
    },
    /// A damageable entity died.
    EntityKilled {
        /// Entity that died.
        entity: EntityRef,
    },
    /// A shield was raised, refilled, drained, or dropped.
    ShieldChanged {
        /// Shield owner.
        entity: EntityRef,
        /// Remaining shield health; zero when the shield is down.
        shield: u32,
    },
    /// A shield was depleted by damage.
    ShieldBroken {
        /// Shield owner.
        entity: EntityRef,
    },
    /// The player fired lasers.
    Shot {
        /// Ammunition left after the shot.
        remaining_ammo: u32,
    },
    /// The player tried to fire without ammunition.
    OutOfAmmo,
    /// The player's ammunition was refilled.
    AmmoRefilled {
        /// Ammunition after the refill.
        ammo: u32,
    },
    /// The player fired while the beam fire pattern was selected.
    BeamRequested,
    /// Thruster fuel changed.
    ThrusterFuelChanged {
        /// Fuel level in `[0, 1]`.
        fraction: f32,
    },
    /// Thruster recovery cooldown progressed.
    ThrusterCooldownChanged {
        /// Cooldown progress in `[0, 1]`.
        fraction: f32,
    },
    /// The player picked up a power-up.
    PowerUpCollected {
        /// Power-up that was collected.
        kind: PowerUpKind,
    },
    /// A wave started issuing spawn directives.
    WaveStarted {
        /// Zero-based wave index.
        wave: u32,
    },
    /// The final wave's progression condition was satisfied.
    AllWavesCompleted,
    /// A timed ability started or restarted.
    AbilityActivated {
        /// Ability that became active.
        kind: AbilityKind,
    },
    /// A timed ability ended through expiry, pre-emption, or cancellation.
    AbilityDeactivated {
        /// Ability that ended.
        kind: AbilityKind,
    },
    /// The beam weapon changed phase.
    BeamStateChanged {
        /// Phase entered.
        state: BeamState,
    },
    /// The beam charge crossed a presentation threshold.
    BeamCue {
        /// Cue to play.
        cue: BeamCue,
    },
    /// The player's score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// The game-over flag was raised.
    GameOver,
}
