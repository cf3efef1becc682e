//! Tunable parameters of the simulation.
//!
//! Every key of a [`GameConfig`] document is optional; missing values fall
//! back to the stock game tuning, per variant for enemy tables. Durations are written as floating point
//! seconds.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EnemyKind, Placement, PoolKind, PowerUpKind};

/// Complete configuration consumed when constructing a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Global seed from which every random stream is derived.
    pub seed: u64,
    /// Play field geometry.
    pub arena: ArenaConfig,
    /// Player ship tuning.
    pub player: PlayerConfig,
    /// Per-variant enemy tuning.
    pub enemies: EnemiesConfig,
    /// Laser, capsule and effect tuning.
    pub projectiles: ProjectileConfig,
    /// Timed ability tuning.
    pub abilities: AbilitiesConfig,
    /// Charged beam tuning.
    pub beam: BeamConfig,
    /// Scripted enemy waves.
    pub waves: WavesConfig,
    /// Periodic power-up drops.
    pub power_ups: PowerUpDropConfig,
    /// Instances created per pool before the first tick.
    pub pools: Vec<PoolPrewarm>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x0bad_5eed_cafe_f00d,
            arena: ArenaConfig::default(),
            player: PlayerConfig::default(),
            enemies: EnemiesConfig::default(),
            projectiles: ProjectileConfig::default(),
            abilities: AbilitiesConfig::default(),
            beam: BeamConfig::default(),
            waves: WavesConfig::default(),
            power_ups: PowerUpDropConfig::default(),
            pools: vec![
                PoolPrewarm::new(PoolKind::Rookie, 10),
                PoolPrewarm::new(PoolKind::Asteroid, 5),
                PoolPrewarm::new(PoolKind::Bomber, 4),
                PoolPrewarm::new(PoolKind::Toxic, 4),
                PoolPrewarm::new(PoolKind::Reckless, 4),
                PoolPrewarm::new(PoolKind::Avoider, 4),
                PoolPrewarm::new(PoolKind::Watcher, 4),
                PoolPrewarm::new(PoolKind::Explosion, 10),
                PoolPrewarm::new(PoolKind::PlayerLaser, 20),
                PoolPrewarm::new(PoolKind::TripleShotLaser, 30),
                PoolPrewarm::new(PoolKind::HeatSeekLaser, 10),
                PoolPrewarm::new(PoolKind::EnemyLaser, 20),
                PoolPrewarm::new(PoolKind::Bomb, 4),
                PoolPrewarm::new(PoolKind::ToxicSmoke, 4),
                PoolPrewarm::new(PoolKind::PowerUp, 5),
            ],
        }
    }
}

impl GameConfig {
    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.player.max_health == 0 {
            return Err(InvalidConfig::ZeroMaxHealth { entity: "player" });
        }
        for kind in EnemyKind::ALL {
            if self.enemy(kind).max_health == 0 {
                return Err(InvalidConfig::ZeroMaxHealth {
                    entity: kind.name(),
                });
            }
        }
        if !(self.beam.charge_rate > 0.0) {
            return Err(InvalidConfig::NonPositiveRate {
                field: "beam.charge_rate",
            });
        }
        if !(self.beam.regress_rate > 0.0) {
            return Err(InvalidConfig::NonPositiveRate {
                field: "beam.regress_rate",
            });
        }
        if !(self.beam.growth_rate > 0.0) {
            return Err(InvalidConfig::NonPositiveRate {
                field: "beam.growth_rate",
            });
        }
        if !self.power_ups.interval.is_zero()
            && self.power_ups.table.iter().all(|entry| entry.weight == 0)
        {
            return Err(InvalidConfig::EmptyPowerUpTable);
        }
        self.arena.validate()?;
        if self.enemies.bombing.altitude.min > self.enemies.bombing.altitude.max {
            return Err(InvalidConfig::InvertedBounds);
        }
        for (index, entry) in self.pools.iter().enumerate() {
            if self.pools[..index].iter().any(|other| other.kind == entry.kind) {
                return Err(InvalidConfig::DuplicatePool { kind: entry.kind });
            }
        }
        Ok(())
    }

    /// Tuning of the provided enemy variant.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyConfig {
        match kind {
            EnemyKind::Rookie => &self.enemies.rookie,
            EnemyKind::Asteroid => &self.enemies.asteroid,
            EnemyKind::Bomber => &self.enemies.bomber,
            EnemyKind::Toxic => &self.enemies.toxic,
            EnemyKind::Reckless => &self.enemies.reckless,
            EnemyKind::Avoider => &self.enemies.avoider,
            EnemyKind::Watcher => &self.enemies.watcher,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidConfig {
    /// A damageable entity was configured without health.
    #[error("{entity} must have a max_health of at least 1")]
    ZeroMaxHealth {
        /// Entity whose health is missing.
        entity: &'static str,
    },
    /// A rate that must advance time was zero or negative.
    #[error("{field} must be greater than zero")]
    NonPositiveRate {
        /// Offending field.
        field: &'static str,
    },
    /// Power-ups drop periodically but no entry can be drawn.
    #[error("power-up drops are enabled but the weight table is empty")]
    EmptyPowerUpTable,
    /// A vertical bound has its minimum above its maximum.
    #[error("bounds must have min <= max")]
    InvertedBounds,
    /// A horizontal arena distance is not finite or has the wrong sign.
    #[error("{field} must be finite and {requirement}")]
    ArenaExtent {
        /// Offending field.
        field: &'static str,
        /// Accepted range.
        requirement: &'static str,
    },
    /// The same pool appears twice in the prewarm list.
    #[error("pool {kind:?} is listed more than once")]
    DuplicatePool {
        /// Pool listed twice.
        kind: PoolKind,
    },
}

/// Inclusive range along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl AxisBounds {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Reports whether `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into the range.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

/// Play field geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Horizontal distance from the center at which entities wrap around.
    pub wrap_x: f32,
    /// Half width of the line enemies and power-ups spawn along; zero puts
    /// every spawn on the center line.
    pub spawn_x: f32,
    /// Vertical position of the spawn line.
    pub spawn_y: f32,
    /// Vertical range the player is clamped to.
    pub player_bounds_y: AxisBounds,
    /// Vertical range enemies live in before wrapping back to the spawn line.
    pub enemy_bounds_y: AxisBounds,
    /// Vertical range lasers and capsules live in before being released.
    pub projectile_bounds_y: AxisBounds,
}

impl ArenaConfig {
    fn validate(&self) -> Result<(), InvalidConfig> {
        if !(self.wrap_x.is_finite() && self.wrap_x > 0.0) {
            return Err(InvalidConfig::ArenaExtent {
                field: "arena.wrap_x",
                requirement: "greater than zero",
            });
        }
        if !(self.spawn_x.is_finite() && self.spawn_x >= 0.0) {
            return Err(InvalidConfig::ArenaExtent {
                field: "arena.spawn_x",
                requirement: "zero or more",
            });
        }
        if !self.spawn_y.is_finite() {
            return Err(InvalidConfig::ArenaExtent {
                field: "arena.spawn_y",
                requirement: "a real number",
            });
        }
        if self.player_bounds_y.min > self.player_bounds_y.max
            || self.enemy_bounds_y.min > self.enemy_bounds_y.max
            || self.projectile_bounds_y.min > self.projectile_bounds_y.max
        {
            return Err(InvalidConfig::InvertedBounds);
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            wrap_x: 21.0,
            spawn_x: 20.0,
            spawn_y: 12.0,
            player_bounds_y: AxisBounds::new(-9.0, 8.0),
            enemy_bounds_y: AxisBounds::new(-12.0, 12.0),
            projectile_bounds_y: AxisBounds::new(-11.0, 11.0),
        }
    }
}

/// Player ship tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Health the ship starts with.
    pub max_health: u32,
    /// Grace period after a hit during which damage is ignored.
    #[serde(with = "seconds")]
    pub invincibility: Duration,
    /// Minimum time between shots.
    #[serde(with = "seconds")]
    pub fire_cooldown: Duration,
    /// Ammunition capacity; the ship starts full.
    pub max_ammo: u32,
    /// Cruise speed in units per second.
    pub speed: f32,
    /// Speed while the thrusters burn.
    pub thruster_speed: f32,
    /// Position the ship starts at.
    pub spawn_position: Vec2,
    /// Half extents of the ship's collider.
    pub half_size: Vec2,
    /// Thruster fuel tuning.
    pub thrusters: ThrusterConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 3,
            invincibility: Duration::from_secs(2),
            fire_cooldown: Duration::from_millis(200),
            max_ammo: 15,
            speed: 8.0,
            thruster_speed: 10.0,
            spawn_position: Vec2::new(0.0, -6.0),
            half_size: Vec2::new(0.8, 0.8),
            thrusters: ThrusterConfig::default(),
        }
    }
}

/// Thruster fuel tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrusterConfig {
    /// Fuel burned per second while thrusting.
    pub waste_rate: f32,
    /// Fuel recovered per second once the cooldown completes.
    pub recovery_rate: f32,
    /// Idle time before fuel starts recovering.
    #[serde(with = "seconds")]
    pub recovery_cooldown: Duration,
    /// Fuel required to ignite again while recovering.
    pub min_fuel_after_exhaust: f32,
}

impl Default for ThrusterConfig {
    fn default() -> Self {
        Self {
            waste_rate: 0.2,
            recovery_rate: 0.4,
            recovery_cooldown: Duration::from_millis(400),
            min_fuel_after_exhaust: 1.0,
        }
    }
}

/// Tuning for every enemy variant.
///
/// Each variant table is merged field by field onto that variant's stock
/// tuning, so `[enemies.asteroid] speed = 3.0` keeps the asteroid harmless.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EnemiesDocument")]
pub struct EnemiesConfig {
    /// Laser-firing enemy ship.
    pub rookie: EnemyConfig,
    /// Slow drifting rock.
    pub asteroid: EnemyConfig,
    /// Swaying bomb dropper.
    pub bomber: EnemyConfig,
    /// Shielded ship that leaves smoke behind.
    pub toxic: EnemyConfig,
    /// Ship that rams the player.
    pub reckless: EnemyConfig,
    /// Ship that dodges player lasers.
    pub avoider: EnemyConfig,
    /// Ship that aims at the player.
    pub watcher: EnemyConfig,
    /// Bomber sway and bomb tuning.
    pub bombing: BombingConfig,
    /// Toxic shield and smoke tuning.
    pub toxin: ToxinConfig,
    /// Reckless ram tuning.
    pub ramming: RammingConfig,
    /// Avoider dodge tuning.
    pub dodging: DodgingConfig,
}

impl Default for EnemiesConfig {
    fn default() -> Self {
        let shooter = |score, fire_min_ms, fire_max_ms| EnemyConfig {
            score,
            fire_interval: Some(FireInterval {
                min: Duration::from_millis(fire_min_ms),
                max: Duration::from_millis(fire_max_ms),
            }),
            ..EnemyConfig::default()
        };
        Self {
            rookie: EnemyConfig::default(),
            asteroid: EnemyConfig {
                max_health: 3,
                speed: 2.0,
                collision_damage: 1,
                score: 25,
                half_size: Vec2::new(1.2, 1.2),
                despawn_delay: Duration::from_millis(250),
                fire_interval: None,
            },
            bomber: EnemyConfig {
                max_health: 2,
                score: 20,
                fire_interval: None,
                ..EnemyConfig::default()
            },
            toxic: EnemyConfig {
                speed: 6.0,
                ..shooter(25, 2_000, 4_000)
            },
            reckless: shooter(20, 2_000, 4_000),
            avoider: shooter(30, 2_000, 4_000),
            watcher: EnemyConfig {
                max_health: 2,
                despawn_delay: Duration::from_millis(200),
                ..shooter(30, 2_000, 4_000)
            },
            bombing: BombingConfig::default(),
            toxin: ToxinConfig::default(),
            ramming: RammingConfig::default(),
            dodging: DodgingConfig::default(),
        }
    }
}

/// Serialized shape of [`EnemiesConfig`]: every variant table is a patch.
#[derive(Default, Deserialize)]
#[serde(default)]
struct EnemiesDocument {
    rookie: EnemyPatch,
    asteroid: EnemyPatch,
    bomber: EnemyPatch,
    toxic: EnemyPatch,
    reckless: EnemyPatch,
    avoider: EnemyPatch,
    watcher: EnemyPatch,
    bombing: BombingConfig,
    toxin: ToxinConfig,
    ramming: RammingConfig,
    dodging: DodgingConfig,
}

impl From<EnemiesDocument> for EnemiesConfig {
    fn from(document: EnemiesDocument) -> Self {
        let stock = EnemiesConfig::default();
        Self {
            rookie: document.rookie.apply(stock.rookie),
            asteroid: document.asteroid.apply(stock.asteroid),
            bomber: document.bomber.apply(stock.bomber),
            toxic: document.toxic.apply(stock.toxic),
            reckless: document.reckless.apply(stock.reckless),
            avoider: document.avoider.apply(stock.avoider),
            watcher: document.watcher.apply(stock.watcher),
            bombing: document.bombing,
            toxin: document.toxin,
            ramming: document.ramming,
            dodging: document.dodging,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct EnemyPatch {
    max_health: Option<u32>,
    speed: Option<f32>,
    collision_damage: Option<i32>,
    score: Option<u32>,
    half_size: Option<Vec2>,
    #[serde(deserialize_with = "seconds::deserialize_some")]
    despawn_delay: Option<Duration>,
    #[serde(deserialize_with = "volley::deserialize_some")]
    fire_interval: Option<Option<FireInterval>>,
}

impl EnemyPatch {
    fn apply(self, base: EnemyConfig) -> EnemyConfig {
        EnemyConfig {
            max_health: self.max_health.unwrap_or(base.max_health),
            speed: self.speed.unwrap_or(base.speed),
            collision_damage: self.collision_damage.unwrap_or(base.collision_damage),
            score: self.score.unwrap_or(base.score),
            half_size: self.half_size.unwrap_or(base.half_size),
            despawn_delay: self.despawn_delay.unwrap_or(base.despawn_delay),
            fire_interval: self.fire_interval.unwrap_or(base.fire_interval),
        }
    }
}

/// Random range between two enemy volleys.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireInterval {
    /// Shortest wait between volleys.
    #[serde(with = "seconds")]
    pub min: Duration,
    /// Longest wait between volleys.
    #[serde(with = "seconds")]
    pub max: Duration,
}

/// Tuning of a single enemy variant.
///
/// Standalone documents must name every field; partial tables are only
/// accepted inside [`EnemiesConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Health the enemy spawns with.
    pub max_health: u32,
    /// Travel speed along the heading.
    pub speed: f32,
    /// Damage dealt to the player on contact.
    pub collision_damage: i32,
    /// Score awarded on death.
    pub score: u32,
    /// Half extents of the collider.
    pub half_size: Vec2,
    /// Time a dead enemy lingers before returning to its pool.
    #[serde(with = "seconds")]
    pub despawn_delay: Duration,
    /// Volley cadence; `None`, written `false`, for enemies that never fire.
    #[serde(with = "volley")]
    pub fire_interval: Option<FireInterval>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 1,
            speed: 4.0,
            collision_damage: 1,
            score: 10,
            half_size: Vec2::new(1.0, 1.0),
            despawn_delay: Duration::from_millis(500),
            fire_interval: Some(FireInterval {
                min: Duration::from_secs(3),
                max: Duration::from_secs(5),
            }),
        }
    }
}

/// Bomber sway and bomb tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombingConfig {
    /// Angular frequency of the sideways sway in radians per second.
    pub sway_frequency: f32,
    /// Peak sideways speed of the sway.
    pub sway_amplitude: f32,
    /// Heights a bomber picks its drop point from on every pass.
    pub altitude: AxisBounds,
    /// Speed the bomb leaves the bomber with; it slows to a quarter before bursting.
    pub bomb_speed: f32,
    /// Distance a bomb falls before bursting.
    pub fuse_distance: f32,
    /// Lasers released in a ring when a bomb bursts.
    pub burst_lasers: u32,
    /// Damage of a bomb that hits the player before bursting.
    pub bomb_damage: i32,
    /// Half extents of the bomb collider.
    pub bomb_half_size: Vec2,
}

impl Default for BombingConfig {
    fn default() -> Self {
        Self {
            sway_frequency: 4.0,
            sway_amplitude: 4.0,
            altitude: AxisBounds::new(-3.0, 9.6),
            bomb_speed: 6.0,
            fuse_distance: 6.0,
            burst_lasers: 8,
            bomb_damage: 1,
            bomb_half_size: Vec2::new(0.4, 0.4),
        }
    }
}

/// Toxic shield and smoke tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxinConfig {
    /// Shield health raised on every spawn.
    pub shield_capacity: u32,
    /// Travel speed while the shield holds.
    pub shielded_speed: f32,
    /// Time a smoke cloud lingers.
    #[serde(with = "seconds")]
    pub smoke_duration: Duration,
    /// Exposure inside the smoke between two hits.
    #[serde(with = "seconds")]
    pub smoke_damage_interval: Duration,
    /// Damage of one smoke hit.
    pub smoke_damage: i32,
    /// Half extents of the smoke cloud.
    pub smoke_half_size: Vec2,
}

impl Default for ToxinConfig {
    fn default() -> Self {
        Self {
            shield_capacity: 1,
            shielded_speed: 4.0,
            smoke_duration: Duration::from_secs(4),
            smoke_damage_interval: Duration::from_secs(1),
            smoke_damage: 1,
            smoke_half_size: Vec2::new(2.0, 2.0),
        }
    }
}

/// Reckless ram tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RammingConfig {
    /// Distance at which the enemy locks onto the player.
    pub lock_radius: f32,
    /// Speed while ramming.
    pub ram_speed: f32,
    /// Turn rate toward the player in radians per second.
    pub turn_rate: f32,
}

impl Default for RammingConfig {
    fn default() -> Self {
        Self {
            lock_radius: 6.0,
            ram_speed: 6.0,
            turn_rate: 2.5,
        }
    }
}

/// Avoider dodge tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgingConfig {
    /// Distance at which incoming player lasers are noticed.
    pub detect_radius: f32,
    /// Horizontal distance under which a laser counts as incoming.
    pub threshold: f32,
    /// Speed while dodging.
    pub dodge_speed: f32,
}

impl Default for DodgingConfig {
    fn default() -> Self {
        Self {
            detect_radius: 4.0,
            threshold: 1.5,
            dodge_speed: 8.0,
        }
    }
}

/// Laser, capsule and effect tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Speed of player lasers.
    pub player_laser_speed: f32,
    /// Damage of a player laser hit.
    pub player_laser_damage: i32,
    /// Horizontal offset of the outer triple-shot lasers.
    pub triple_shot_spread: f32,
    /// Turn rate of heat-seeking lasers in radians per second.
    pub heat_seek_turn_rate: f32,
    /// Speed of enemy lasers.
    pub enemy_laser_speed: f32,
    /// Damage of an enemy laser hit.
    pub enemy_laser_damage: i32,
    /// Fall speed of power-up capsules.
    pub power_up_speed: f32,
    /// Half extents of every laser collider.
    pub laser_half_size: Vec2,
    /// Half extents of power-up capsules.
    pub power_up_half_size: Vec2,
    /// Lifetime of explosion effects.
    #[serde(with = "seconds")]
    pub explosion_lifetime: Duration,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            player_laser_speed: 15.0,
            player_laser_damage: 1,
            triple_shot_spread: 0.9,
            heat_seek_turn_rate: 6.0,
            enemy_laser_speed: 8.0,
            enemy_laser_damage: 1,
            power_up_speed: 3.0,
            laser_half_size: Vec2::new(0.1, 0.4),
            power_up_half_size: Vec2::new(0.5, 0.5),
            explosion_lifetime: Duration::from_millis(800),
        }
    }
}

/// Timed ability tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilitiesConfig {
    /// Duration of the triple-shot ability.
    #[serde(with = "seconds")]
    pub triple_shot_duration: Duration,
    /// Duration of the heat-seek ability.
    #[serde(with = "seconds")]
    pub heat_seek_duration: Duration,
    /// Duration of the beam ability.
    #[serde(with = "seconds")]
    pub beam_duration: Duration,
    /// Duration of the speed boost.
    #[serde(with = "seconds")]
    pub speed_duration: Duration,
    /// Duration of the shield.
    #[serde(with = "seconds")]
    pub shield_duration: Duration,
    /// Movement multiplier applied by the speed boost.
    pub speed_multiplier: f32,
    /// Rounds refilled when a weapon ability activates.
    pub ammo_refill: u32,
    /// Shield health granted by the shield ability.
    pub shield_capacity: u32,
    /// Health restored by the life power-up.
    pub life_heal: i32,
}

impl Default for AbilitiesConfig {
    fn default() -> Self {
        Self {
            triple_shot_duration: Duration::from_secs(5),
            heat_seek_duration: Duration::from_secs(5),
            beam_duration: Duration::from_secs(6),
            speed_duration: Duration::from_secs(8),
            shield_duration: Duration::from_secs(15),
            speed_multiplier: 1.5,
            ammo_refill: 10,
            shield_capacity: 3,
            life_heal: 1,
        }
    }
}

/// Charged beam tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Charge gained per second while charging.
    pub charge_rate: f32,
    /// Charge lost per second while regressing.
    pub regress_rate: f32,
    /// Fraction of the full extent gained per second while firing.
    pub growth_rate: f32,
    /// Length of the fully grown beam.
    pub max_length: f32,
    /// Width of the fully grown beam.
    pub max_width: f32,
    /// Time the fully grown beam holds before regressing.
    #[serde(with = "seconds")]
    pub firing_duration: Duration,
    /// Damage applied to each overlapping enemy every tick.
    pub damage_per_tick: i32,
    /// Restarting the beam while it fires refreshes the hold timer.
    ///
    /// With this set, a player who keeps the trigger held re-requests the
    /// beam every tick and it stays `Firing` until released or the ability
    /// ends.
    pub refresh_hold_on_restart: bool,
    /// Charge at which the glow cue fires.
    pub light_threshold: f32,
    /// Charge at which the particle cue fires.
    pub particles_threshold: f32,
    /// Charge below which particles stop while regressing.
    pub particles_off_threshold: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            charge_rate: 2.0,
            regress_rate: 1.0,
            growth_rate: 4.0,
            max_length: 20.0,
            max_width: 1.5,
            firing_duration: Duration::from_secs(2),
            damage_per_tick: 1,
            refresh_hold_on_restart: true,
            light_threshold: 0.2,
            particles_threshold: 0.5,
            particles_off_threshold: 0.3,
        }
    }
}

/// One scripted spawn inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnDirective {
    /// Enemy to spawn.
    pub enemy: EnemyKind,
    /// Wait after this spawn before the next directive.
    #[serde(with = "seconds")]
    pub delay: Duration,
    /// Where the enemy appears.
    pub placement: Placement,
}

impl SpawnDirective {
    /// Creates a new directive.
    #[must_use]
    pub const fn new(enemy: EnemyKind, delay: Duration, placement: Placement) -> Self {
        Self {
            enemy,
            delay,
            placement,
        }
    }
}

/// Ordered batch of spawn directives gated by a live-enemy threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveDescriptor {
    /// Directives issued in order.
    pub directives: Vec<SpawnDirective>,
    /// Live enemies tolerated before the next wave may begin.
    #[serde(default)]
    pub min_enemies_left_to_progress: u32,
    /// Wait between the gate opening and the next wave; after the last wave
    /// it delays `AllWavesCompleted`.
    #[serde(with = "seconds", default)]
    pub inter_wave_delay: Duration,
}

/// Scripted enemy waves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavesConfig {
    /// Wait before the first wave, repeated at the start of every wave
    /// between `WaveStarted` and its first spawn.
    #[serde(with = "seconds")]
    pub settle_delay: Duration,
    /// Waves played in order.
    pub waves: Vec<WaveDescriptor>,
}

impl Default for WavesConfig {
    fn default() -> Self {
        let rookies = |count: usize, delay_ms: u64| {
            (0..count)
                .map(|_| {
                    SpawnDirective::new(
                        EnemyKind::Rookie,
                        Duration::from_millis(delay_ms),
                        Placement::Random,
                    )
                })
                .collect::<Vec<_>>()
        };

        let mut third = rookies(4, 600);
        third.push(SpawnDirective::new(
            EnemyKind::Asteroid,
            Duration::from_secs(1),
            Placement::Transform {
                position: Vec2::new(-10.0, 12.0),
                rotation: -20.0,
            },
        ));
        third.push(SpawnDirective::new(
            EnemyKind::Asteroid,
            Duration::from_secs(1),
            Placement::Transform {
                position: Vec2::new(10.0, 12.0),
                rotation: 20.0,
            },
        ));

        let fourth = [
            EnemyKind::Bomber,
            EnemyKind::Toxic,
            EnemyKind::Reckless,
            EnemyKind::Avoider,
            EnemyKind::Watcher,
        ]
        .into_iter()
        .map(|enemy| SpawnDirective::new(enemy, Duration::from_millis(1_200), Placement::Random))
        .collect();

        Self {
            settle_delay: Duration::from_secs(2),
            waves: vec![
                WaveDescriptor {
                    directives: rookies(3, 1_000),
                    min_enemies_left_to_progress: 0,
                    inter_wave_delay: Duration::from_secs(2),
                },
                WaveDescriptor {
                    directives: rookies(5, 800),
                    min_enemies_left_to_progress: 1,
                    inter_wave_delay: Duration::from_secs(2),
                },
                WaveDescriptor {
                    directives: third,
                    min_enemies_left_to_progress: 0,
                    inter_wave_delay: Duration::from_secs(3),
                },
                WaveDescriptor {
                    directives: fourth,
                    min_enemies_left_to_progress: 0,
                    inter_wave_delay: Duration::from_secs(3),
                },
            ],
        }
    }
}

/// Weighted entry of the power-up drop table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedPowerUp {
    /// Power-up dropped.
    pub kind: PowerUpKind,
    /// Relative likelihood.
    pub weight: u32,
}

/// Periodic power-up drops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpDropConfig {
    /// Time between drops; zero disables drops.
    #[serde(with = "seconds")]
    pub interval: Duration,
    /// Fraction of the spawn line drops are spread across.
    pub spread: f32,
    /// Weighted drop table.
    pub table: Vec<WeightedPowerUp>,
}

impl Default for PowerUpDropConfig {
    fn default() -> Self {
        let entry = |kind, weight| WeightedPowerUp { kind, weight };
        Self {
            interval: Duration::from_secs(7),
            spread: 0.9,
            table: vec![
                entry(PowerUpKind::Ammo, 30),
                entry(PowerUpKind::TripleShot, 15),
                entry(PowerUpKind::Speed, 15),
                entry(PowerUpKind::Shield, 12),
                entry(PowerUpKind::Life, 10),
                entry(PowerUpKind::HeatSeek, 10),
                entry(PowerUpKind::Beam, 8),
            ],
        }
    }
}

/// Instances created for a pool before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPrewarm {
    /// Pool to register.
    pub kind: PoolKind,
    /// Instances created up front.
    pub count: u32,
}

impl PoolPrewarm {
    /// Creates a new prewarm entry.
    #[must_use]
    pub const fn new(kind: PoolKind, count: u32) -> Self {
        Self { kind, count }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        let nanos = (secs * 1e9).round();
        if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
            return Err(D::Error::custom(format!(
                "expected a non-negative number of seconds, found {secs}"
            )));
        }
        Ok(Duration::from_nanos(nanos as u64))
    }

    pub(super) fn deserialize_some<'de, D>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

/// `fire_interval` is either a `{ min, max }` table or `false`.
mod volley {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::FireInterval;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Volley {
        Switch(bool),
        Every(FireInterval),
    }

    pub(super) fn serialize<S>(
        value: &Option<FireInterval>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(interval) => interval.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<FireInterval>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Volley::deserialize(deserializer)? {
            Volley::Switch(false) => Ok(None),
            Volley::Switch(true) => Err(D::Error::custom(
                "fire_interval = true is ambiguous, give a { min, max } table instead",
            )),
            Volley::Every(interval) => Ok(Some(interval)),
        }
    }

    pub(super) fn deserialize_some<'de, D>(
        deserializer: D,
    ) -> Result<Option<Option<FireInterval>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            seed = 7

            [player]
            max_health = 5
            invincibility = 0.5

            [beam]
            charge_rate = 4.0
            "#,
        )
        .expect("parse partial config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.player.max_health, 5);
        assert_eq!(config.player.invincibility, Duration::from_millis(500));
        assert_eq!(config.player.max_ammo, PlayerConfig::default().max_ammo);
        assert!((config.beam.charge_rate - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.waves, WavesConfig::default());
    }

    #[test]
    fn negative_durations_are_rejected() {
        let result: Result<GameConfig, _> = toml::from_str(
            r#"
            [player]
            fire_cooldown = -1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_health_is_rejected() {
        let mut config = GameConfig::default();
        config.enemies.rookie.max_health = 0;
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::ZeroMaxHealth { entity: "rookie" })
        );
    }

    #[test]
    fn enemy_tables_merge_onto_their_own_variant() {
        let config: GameConfig = toml::from_str(
            r#"
            [enemies.asteroid]
            speed = 3.0

            [enemies.rookie]
            fire_interval = false

            [enemies.toxic.fire_interval]
            min = 1.0
            max = 1.5
            "#,
        )
        .expect("parse enemy overrides");

        let stock = EnemiesConfig::default();
        assert!((config.enemies.asteroid.speed - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.enemies.asteroid.fire_interval, None);
        assert_eq!(config.enemies.asteroid.max_health, stock.asteroid.max_health);
        assert_eq!(config.enemies.rookie.fire_interval, None);
        assert_eq!(config.enemies.rookie.score, stock.rookie.score);
        assert_eq!(
            config.enemies.toxic.fire_interval,
            Some(FireInterval {
                min: Duration::from_secs(1),
                max: Duration::from_millis(1_500),
            })
        );
        assert!((config.enemies.toxic.speed - stock.toxic.speed).abs() < f32::EPSILON);
        assert_eq!(config.enemies.watcher, stock.watcher);
    }

    #[test]
    fn harmless_enemies_render_fire_interval_false() {
        let rendered = toml::to_string(&GameConfig::default()).expect("render defaults");
        assert!(rendered.contains("fire_interval = false"));

        let restored: GameConfig = toml::from_str(&rendered).expect("parse rendered defaults");
        assert_eq!(restored.enemies.asteroid.fire_interval, None);
        assert_eq!(restored.enemies.bomber.fire_interval, None);
        assert_eq!(restored, GameConfig::default());
    }

    #[test]
    fn fire_interval_true_is_rejected() {
        let result: Result<GameConfig, _> = toml::from_str(
            r#"
            [enemies.asteroid]
            fire_interval = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_spawn_half_width_is_rejected() {
        let mut config = GameConfig::default();
        config.arena.spawn_x = -5.0;
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::ArenaExtent {
                field: "arena.spawn_x",
                requirement: "zero or more",
            })
        );
    }

    #[test]
    fn zero_spawn_half_width_is_accepted() {
        let mut config = GameConfig::default();
        config.arena.spawn_x = 0.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn wrap_distance_must_be_positive() {
        for wrap_x in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let mut config = GameConfig::default();
            config.arena.wrap_x = wrap_x;
            assert_eq!(
                config.validate(),
                Err(InvalidConfig::ArenaExtent {
                    field: "arena.wrap_x",
                    requirement: "greater than zero",
                }),
                "wrap_x = {wrap_x}"
            );
        }
    }

    #[test]
    fn every_enemy_variant_needs_health() {
        let mut config = GameConfig::default();
        config.enemies.watcher.max_health = 0;
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::ZeroMaxHealth { entity: "watcher" })
        );
    }

    #[test]
    fn duplicate_pools_are_rejected() {
        let mut config = GameConfig::default();
        config.pools.push(PoolPrewarm::new(PoolKind::Rookie, 1));
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::DuplicatePool {
                kind: PoolKind::Rookie
            })
        );
    }
}
