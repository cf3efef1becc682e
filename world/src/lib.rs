#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Galaxy Shooter.

use std::time::Duration;

use galaxy_shooter_core::{
    AxisBounds, Command, EnemyKind, EntityHandle, EntityRef, Event, FireInterval, FirePattern,
    GameConfig, PoolKind, PowerUpKind, WELCOME_BANNER,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod combat;
mod player;
pub mod pool;
mod tactics;

pub use combat::{CombatState, DamageOutcome};
pub use pool::{Acquired, PoolAllocator, PoolError, PoolStats};

use player::{Ship, Trigger};
use tactics::{heading, steer_toward, Surroundings, Tactic};

const WORLD_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const FIRST_VOLLEY_SCALE: f32 = 0.4;
const BOMB_FINAL_SPEED_SCALE: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Role {
    Enemy(EnemyKind),
    Laser {
        hostile: bool,
        damage: i32,
        homing: bool,
    },
    Bomb {
        damage: i32,
        fallen: f32,
    },
    Smoke {
        exposure: Duration,
        exposed: bool,
    },
    PowerUp(PowerUpKind),
    #[default]
    Effect,
}

#[derive(Clone, Debug, Default)]
struct Body {
    role: Role,
    position: Vec2,
    rotation: f32,
    velocity: Vec2,
    half_size: Vec2,
    combat: CombatState,
    despawn_in: Option<Duration>,
    fire_in: Option<Duration>,
    tactic: Tactic,
}

impl Body {
    fn new(role: Role, position: Vec2, velocity: Vec2, half_size: Vec2) -> Self {
        Self {
            role,
            position,
            velocity,
            half_size,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Participant {
    Player,
    Enemy(EntityHandle, EnemyKind),
    PlayerLaser(EntityHandle, i32),
    EnemyLaser(EntityHandle, i32),
    Smoke(EntityHandle),
    PowerUp(EntityHandle, PowerUpKind),
    Inert,
}

/// Represents the authoritative Galaxy Shooter world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    pool: PoolAllocator<Body>,
    player: Ship,
    score: u32,
    game_over: bool,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl World {
    /// Creates a world with an unprewarmed pool registry and a fresh player ship.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            player: Ship::new(&config.player),
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ WORLD_STREAM),
            pool: PoolAllocator::new(),
            score: 0,
            game_over: false,
            tick_index: 0,
            config,
        }
    }

    fn combat_mut(&mut self, target: EntityRef) -> Option<&mut CombatState> {
        match target {
            EntityRef::Player => Some(&mut self.player.combat),
            EntityRef::Pooled(handle) => self
                .pool
                .get_mut(handle)
                .filter(|body| matches!(body.role, Role::Enemy(_)))
                .map(|body| &mut body.combat),
        }
    }

    fn spawn_body(
        &mut self,
        kind: PoolKind,
        body: Body,
        wave: Option<u32>,
        out_events: &mut Vec<Event>,
    ) -> Option<EntityHandle> {
        let acquired = match self.pool.acquire(kind) {
            Ok(acquired) => acquired,
            Err(error) => {
                log::warn!("skipping spawn: {error}");
                out_events.push(Event::SpawnFailed { kind, wave });
                return None;
            }
        };

        let position = body.position;
        if let Some(slot) = self.pool.get_mut(acquired.handle) {
            *slot = body;
        }
        out_events.push(Event::EntityActivated {
            handle: acquired.handle,
            position,
        });
        Some(acquired.handle)
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        position: Vec2,
        rotation: f32,
        wave: Option<u32>,
        out_events: &mut Vec<Event>,
    ) {
        if self.game_over {
            log::debug!("refusing {kind:?} spawn after game over");
            out_events.push(Event::SpawnFailed {
                kind: kind.pool_kind(),
                wave,
            });
            return;
        }

        let config = *self.config.enemy(kind);
        let fire_in = config.fire_interval.map(|interval| {
            let scale = self.rng.gen_range(0.0..FIRST_VOLLEY_SCALE);
            sample_interval(&mut self.rng, interval).mul_f32(scale)
        });
        let mut body = Body::new(
            Role::Enemy(kind),
            position,
            heading(rotation) * config.speed,
            config.half_size,
        );
        body.rotation = rotation;
        body.combat = CombatState::new(config.max_health, Duration::ZERO);
        body.fire_in = fire_in;
        body.tactic = Tactic::for_kind(kind);
        if kind == EnemyKind::Bomber {
            body.tactic
                .arm(sample_bounds(&mut self.rng, self.config.enemies.bombing.altitude));
        }
        let shield = match kind {
            EnemyKind::Toxic => self.config.enemies.toxin.shield_capacity,
            _ => 0,
        };
        let shielded = body.combat.activate_shield(shield);

        if let Some(handle) = self.spawn_body(kind.pool_kind(), body, wave, out_events) {
            out_events.push(Event::EnemySpawned { handle, kind, wave });
            if shielded {
                out_events.push(Event::ShieldChanged {
                    entity: EntityRef::Pooled(handle),
                    shield,
                });
            }
        }
    }

    fn spawn_smoke(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let toxin = self.config.enemies.toxin;
        let mut body = Body::new(
            Role::Smoke {
                exposure: Duration::ZERO,
                exposed: false,
            },
            position,
            Vec2::ZERO,
            toxin.smoke_half_size,
        );
        body.despawn_in = Some(toxin.smoke_duration);
        let _ = self.spawn_body(PoolKind::ToxicSmoke, body, None, out_events);
    }

    fn drop_bomb(&mut self, position: Vec2, rotation: f32, out_events: &mut Vec<Event>) {
        let bombing = self.config.enemies.bombing;
        let mut body = Body::new(
            Role::Bomb {
                damage: bombing.bomb_damage,
                fallen: 0.0,
            },
            position,
            heading(rotation) * bombing.bomb_speed,
            bombing.bomb_half_size,
        );
        body.rotation = rotation;
        let _ = self.spawn_body(PoolKind::Bomb, body, None, out_events);
    }

    fn spawn_explosion(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let mut body = Body::new(Role::Effect, position, Vec2::ZERO, Vec2::ZERO);
        body.despawn_in = Some(self.config.projectiles.explosion_lifetime);
        let _ = self.spawn_body(PoolKind::Explosion, body, None, out_events);
    }

    fn release(&mut self, handle: EntityHandle, out_events: &mut Vec<Event>) {
        if self.pool.release(handle) {
            out_events.push(Event::EntityDeactivated { handle });
        }
    }

    fn damage(&mut self, target: EntityRef, amount: i32, out_events: &mut Vec<Event>) {
        let Some(combat) = self.combat_mut(target) else {
            log::debug!("ignoring damage to non-damageable {target:?}");
            return;
        };
        let outcome = combat.take_damage(amount);

        match outcome {
            DamageOutcome::Absorbed {
                shield_health,
                broken,
            } => {
                out_events.push(Event::ShieldChanged {
                    entity: target,
                    shield: shield_health,
                });
                if broken {
                    out_events.push(Event::ShieldBroken { entity: target });
                    self.on_shield_broken(target, out_events);
                }
            }
            DamageOutcome::Ignored => {
                log::trace!("{target:?} is invincible; hit ignored");
            }
            DamageOutcome::Damaged { health } => {
                out_events.push(Event::EntityDamaged {
                    entity: target,
                    health,
                });
            }
            DamageOutcome::Killed => self.on_killed(target, out_events),
            DamageOutcome::AlreadyDead => {}
        }
    }

    fn on_shield_broken(&mut self, target: EntityRef, out_events: &mut Vec<Event>) {
        let EntityRef::Pooled(handle) = target else {
            return;
        };
        let smoke_at = self
            .pool
            .get(handle)
            .filter(|body| body.role == Role::Enemy(EnemyKind::Toxic))
            .map(|body| body.position);
        if let Some(position) = smoke_at {
            self.spawn_smoke(position, out_events);
        }
    }

    fn kill(&mut self, target: EntityRef, out_events: &mut Vec<Event>) {
        let killed = self.combat_mut(target).is_some_and(CombatState::kill);
        if killed {
            self.on_killed(target, out_events);
        }
    }

    fn on_killed(&mut self, target: EntityRef, out_events: &mut Vec<Event>) {
        out_events.push(Event::EntityKilled { entity: target });

        match target {
            EntityRef::Player => {
                let position = self.player.position;
                self.spawn_explosion(position, out_events);
                self.end_game(out_events);
            }
            EntityRef::Pooled(handle) => {
                let Some(body) = self.pool.get_mut(handle) else {
                    return;
                };
                let Role::Enemy(kind) = body.role else {
                    return;
                };
                let config = self.config.enemy(kind);
                body.velocity = Vec2::ZERO;
                body.fire_in = None;
                body.despawn_in = Some(config.despawn_delay);
                let position = body.position;

                self.score = self.score.saturating_add(config.score);
                out_events.push(Event::ScoreChanged { score: self.score });
                self.spawn_explosion(position, out_events);
            }
        }
    }

    fn end_game(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        log::info!("game over at tick {} with score {}", self.tick_index, self.score);
        out_events.push(Event::GameOver);
    }

    fn classify(&self, entity: EntityRef) -> Participant {
        match entity {
            EntityRef::Player => {
                let combat = &self.player.combat;
                if combat.is_dead() || (combat.is_invincible() && !combat.is_shielded()) {
                    Participant::Inert
                } else {
                    Participant::Player
                }
            }
            EntityRef::Pooled(handle) => {
                let Some(body) = self.pool.get(handle) else {
                    return Participant::Inert;
                };
                match body.role {
                    Role::Enemy(kind) if !body.combat.is_dead() => {
                        Participant::Enemy(handle, kind)
                    }
                    Role::Laser {
                        hostile: false,
                        damage,
                        ..
                    } => Participant::PlayerLaser(handle, damage),
                    Role::Laser {
                        hostile: true,
                        damage,
                        ..
                    } => Participant::EnemyLaser(handle, damage),
                    Role::Bomb { damage, .. } => Participant::EnemyLaser(handle, damage),
                    Role::Smoke { .. } => Participant::Smoke(handle),
                    Role::PowerUp(kind) => Participant::PowerUp(handle, kind),
                    _ => Participant::Inert,
                }
            }
        }
    }

    fn resolve_collision(&mut self, first: EntityRef, second: EntityRef, out_events: &mut Vec<Event>) {
        let a = self.classify(first);
        let b = self.classify(second);
        if !self.resolve_pair(a, b, out_events) && !self.resolve_pair(b, a, out_events) {
            log::trace!("collision between {first:?} and {second:?} has no effect");
        }
    }

    fn resolve_pair(&mut self, a: Participant, b: Participant, out_events: &mut Vec<Event>) -> bool {
        match (a, b) {
            (Participant::Player, Participant::Enemy(handle, kind)) => {
                let config = self.config.enemy(kind);
                let collision_damage = config.collision_damage;
                let self_damage = i32::try_from(config.max_health).unwrap_or(i32::MAX);
                self.damage(EntityRef::Player, collision_damage, out_events);
                self.damage(EntityRef::Pooled(handle), self_damage, out_events);
            }
            (Participant::Player, Participant::EnemyLaser(handle, damage)) => {
                self.damage(EntityRef::Player, damage, out_events);
                self.release(handle, out_events);
            }
            (Participant::Player, Participant::Smoke(handle)) => {
                if let Some(Body {
                    role: Role::Smoke { exposed, .. },
                    ..
                }) = self.pool.get_mut(handle)
                {
                    *exposed = true;
                }
            }
            (Participant::Player, Participant::PowerUp(handle, kind)) => {
                out_events.push(Event::PowerUpCollected { kind });
                self.release(handle, out_events);
            }
            (Participant::Enemy(enemy, _), Participant::PlayerLaser(laser, damage)) => {
                self.damage(EntityRef::Pooled(enemy), damage, out_events);
                self.release(laser, out_events);
            }
            _ => return false,
        }
        true
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.player.combat.tick(dt);
        if !self.player.combat.is_dead() {
            self.player.steer(dt, &self.config.arena, out_events);
        }

        match self.player.pull_trigger(dt, self.game_over) {
            Trigger::Idle => {}
            Trigger::Beam => out_events.push(Event::BeamRequested),
            Trigger::Empty => out_events.push(Event::OutOfAmmo),
            Trigger::Lasers(pattern) => {
                self.fire_lasers(pattern, out_events);
                out_events.push(Event::Shot {
                    remaining_ammo: self.player.ammo,
                });
            }
        }

        self.advance_bodies(dt, out_events);
    }

    fn fire_lasers(&mut self, pattern: FirePattern, out_events: &mut Vec<Event>) {
        let projectiles = self.config.projectiles;
        let origin = self.player.position + Vec2::new(0.0, self.player.half_size.y);
        let velocity = Vec2::new(0.0, projectiles.player_laser_speed);
        let laser = |position: Vec2, homing: bool| {
            Body::new(
                Role::Laser {
                    hostile: false,
                    damage: projectiles.player_laser_damage,
                    homing,
                },
                position,
                velocity,
                projectiles.laser_half_size,
            )
        };

        match pattern {
            FirePattern::Single | FirePattern::Beam => {
                let _ = self.spawn_body(PoolKind::PlayerLaser, laser(origin, false), None, out_events);
            }
            FirePattern::TripleShot => {
                let spread = projectiles.triple_shot_spread;
                for offset in [-spread, 0.0, spread] {
                    let position = origin + Vec2::new(offset, 0.0);
                    let _ = self.spawn_body(
                        PoolKind::TripleShotLaser,
                        laser(position, false),
                        None,
                        out_events,
                    );
                }
            }
            FirePattern::HeatSeek => {
                let _ = self.spawn_body(PoolKind::HeatSeekLaser, laser(origin, true), None, out_events);
            }
        }
    }

    fn advance_bodies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let arena = self.config.arena;
        let turn_rate = self.config.projectiles.heat_seek_turn_rate;
        let bombing = self.config.enemies.bombing;
        let smoke_interval = self.config.enemies.toxin.smoke_damage_interval;
        let targets: Vec<Vec2> = self
            .pool
            .iter_active()
            .filter(|(_, body)| matches!(body.role, Role::Enemy(_)) && !body.combat.is_dead())
            .map(|(_, body)| body.position)
            .collect();
        let player_lasers: Vec<Vec2> = self
            .pool
            .iter_active()
            .filter(|(_, body)| matches!(body.role, Role::Laser { hostile: false, .. }))
            .map(|(_, body)| body.position)
            .collect();
        let player = (!self.player.combat.is_dead()).then_some(self.player.position);
        let around = Surroundings {
            config: &self.config,
            player,
            player_lasers: &player_lasers,
            seconds,
        };

        let mut expired = Vec::new();
        let mut volleys = Vec::new();
        let mut bombs = Vec::new();
        let mut bursts = Vec::new();
        let mut smoke_hits = 0_u32;

        for (handle, body) in self.pool.iter_active_mut() {
            body.combat.tick(dt);

            match body.role {
                Role::Laser { homing: true, .. } => {
                    if let Some(target) = nearest(&targets, body.position) {
                        body.velocity = steer_toward(
                            body.velocity,
                            target - body.position,
                            turn_rate * seconds,
                        );
                    }
                }
                Role::Enemy(kind) if !body.combat.is_dead() => {
                    body.velocity = tactics::steer(
                        kind,
                        &mut body.tactic,
                        &mut body.rotation,
                        body.position,
                        body.combat.is_shielded(),
                        &around,
                    );
                }
                Role::Bomb { damage, fallen } => {
                    let progress = if bombing.fuse_distance > 0.0 {
                        (fallen / bombing.fuse_distance).min(1.0)
                    } else {
                        1.0
                    };
                    let speed =
                        bombing.bomb_speed * (1.0 - (1.0 - BOMB_FINAL_SPEED_SCALE) * progress);
                    body.velocity = heading(body.rotation) * speed;
                    body.role = Role::Bomb {
                        damage,
                        fallen: fallen + speed * seconds,
                    };
                }
                _ => {}
            }
            body.position += body.velocity * seconds;

            if let Some(remaining) = body.despawn_in {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    expired.push(handle);
                    continue;
                }
                body.despawn_in = Some(remaining);
            }

            match body.role {
                Role::Enemy(kind) => {
                    if body.combat.is_dead() {
                        continue;
                    }
                    if !arena.enemy_bounds_y.contains(body.position.y) {
                        body.position =
                            Vec2::new(spawn_line_x(&mut self.rng, arena.spawn_x), arena.spawn_y);
                        body.tactic = Tactic::for_kind(kind);
                        match kind {
                            EnemyKind::Bomber => body
                                .tactic
                                .arm(sample_bounds(&mut self.rng, bombing.altitude)),
                            EnemyKind::Reckless => body.rotation = 0.0,
                            _ => {}
                        }
                    }
                    if body.position.x.abs() > arena.wrap_x {
                        body.position.x = -arena.wrap_x * body.position.x.signum();
                    }

                    let in_range =
                        !self.game_over && arena.projectile_bounds_y.contains(body.position.y);
                    if body.tactic.take_drop(body.position.y) && in_range {
                        bombs.push((body.position, body.rotation));
                    }

                    let Some(remaining) = body.fire_in else {
                        continue;
                    };
                    let remaining = remaining.saturating_sub(dt);
                    if !remaining.is_zero() {
                        body.fire_in = Some(remaining);
                        continue;
                    }
                    body.fire_in = self
                        .config
                        .enemy(kind)
                        .fire_interval
                        .map(|interval| sample_interval(&mut self.rng, interval));
                    if in_range {
                        let muzzle = body.position - Vec2::new(0.0, body.half_size.y);
                        volleys.extend(
                            tactics::volley(kind, &body.tactic, body.rotation, body.position, player)
                                .into_iter()
                                .map(|(offset, rotation)| (muzzle + offset, rotation)),
                        );
                    }
                }
                Role::Bomb { fallen, .. } => {
                    if fallen >= bombing.fuse_distance {
                        bursts.push(body.position);
                        expired.push(handle);
                    } else if !arena.projectile_bounds_y.contains(body.position.y)
                        || body.position.x.abs() > arena.wrap_x
                    {
                        expired.push(handle);
                    }
                }
                Role::Smoke { exposure, exposed } => {
                    let mut exposure = if exposed {
                        exposure + dt
                    } else {
                        Duration::ZERO
                    };
                    if exposed && exposure >= smoke_interval {
                        exposure = exposure.saturating_sub(smoke_interval);
                        smoke_hits += 1;
                    }
                    body.role = Role::Smoke {
                        exposure,
                        exposed: false,
                    };
                }
                Role::Laser { .. } | Role::PowerUp(_) => {
                    if !arena.projectile_bounds_y.contains(body.position.y)
                        || body.position.x.abs() > arena.wrap_x
                    {
                        expired.push(handle);
                    }
                }
                Role::Effect => {}
            }
        }

        for (position, rotation) in volleys {
            self.fire_enemy_laser(position, rotation, out_events);
        }
        for (position, rotation) in bombs {
            self.drop_bomb(position, rotation, out_events);
        }
        for position in bursts {
            self.burst(position, out_events);
        }
        let smoke_damage = self.config.enemies.toxin.smoke_damage;
        for _ in 0..smoke_hits {
            self.damage(EntityRef::Player, smoke_damage, out_events);
        }
        for handle in expired {
            self.release(handle, out_events);
        }
    }

    fn burst(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        let lasers = self.config.enemies.bombing.burst_lasers;
        let step = 360.0 / lasers.max(1) as f32;
        for index in 0..lasers {
            self.fire_enemy_laser(position, index as f32 * step, out_events);
        }
    }

    fn fire_enemy_laser(&mut self, position: Vec2, rotation: f32, out_events: &mut Vec<Event>) {
        let projectiles = self.config.projectiles;
        let mut body = Body::new(
            Role::Laser {
                hostile: true,
                damage: projectiles.enemy_laser_damage,
                homing: false,
            },
            position,
            heading(rotation) * projectiles.enemy_laser_speed,
            projectiles.laser_half_size,
        );
        body.rotation = rotation;
        let _ = self.spawn_body(PoolKind::EnemyLaser, body, None, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Prewarm { kind, count } => {
            if let Err(error) = world.pool.prewarm(kind, count as usize) {
                log::warn!("ignoring prewarm request: {error}");
            }
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnEnemy {
            kind,
            position,
            rotation,
            wave,
        } => world.spawn_enemy(kind, position, rotation, wave, out_events),
        Command::SpawnPowerUp { kind, position } => {
            if world.game_over {
                log::debug!("refusing {kind:?} drop after game over");
                return;
            }
            let projectiles = world.config.projectiles;
            let body = Body::new(
                Role::PowerUp(kind),
                position,
                Vec2::new(0.0, -projectiles.power_up_speed),
                projectiles.power_up_half_size,
            );
            let _ = world.spawn_body(PoolKind::PowerUp, body, None, out_events);
        }
        Command::Release { handle } => world.release(handle, out_events),
        Command::DamageEntity { target, amount } => world.damage(target, amount, out_events),
        Command::HealEntity { target, amount } => {
            let healed = world
                .combat_mut(target)
                .and_then(|combat| combat.heal(amount));
            if let Some(health) = healed {
                out_events.push(Event::EntityHealed {
                    entity: target,
                    health,
                });
            }
        }
        Command::ActivateShield { target, capacity } => {
            let raised = world
                .combat_mut(target)
                .is_some_and(|combat| combat.activate_shield(capacity));
            if raised {
                out_events.push(Event::ShieldChanged {
                    entity: target,
                    shield: capacity,
                });
            }
        }
        Command::DeactivateShield { target } => {
            let dropped = world
                .combat_mut(target)
                .is_some_and(CombatState::deactivate_shield);
            if dropped {
                out_events.push(Event::ShieldChanged {
                    entity: target,
                    shield: 0,
                });
            }
        }
        Command::KillEntity { target } => world.kill(target, out_events),
        Command::ReportCollision { first, second } => {
            world.resolve_collision(first, second, out_events);
        }
        Command::SetFirePattern { pattern } => world.player.fire_pattern = pattern,
        Command::RefillAmmo { amount } => {
            let ammo = world.player.refill(amount);
            out_events.push(Event::AmmoRefilled { ammo });
        }
        Command::SetSpeedMultiplier { multiplier } => {
            world.player.speed_multiplier = multiplier.max(0.0);
        }
        Command::SetPlayerInput { input } => world.player.input = input,
        Command::EndGame => world.end_game(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use galaxy_shooter_core::{
        BodySnapshot, EntityHandle, EntityRef, FirePattern, GameConfig, PoolKind,
    };
    use glam::Vec2;

    use super::{CombatState, PoolStats, Role, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Reports whether the game-over flag is raised.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Captures the player ship's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let ship = &world.player;
        PlayerSnapshot {
            position: ship.position,
            half_size: ship.half_size,
            health: ship.combat.health(),
            max_health: ship.combat.max_health(),
            shield: ship.combat.shield_health(),
            invincible: ship.combat.is_invincible(),
            dead: ship.combat.is_dead(),
            ammo: ship.ammo,
            max_ammo: ship.max_ammo,
            fire_pattern: ship.fire_pattern,
            speed_multiplier: ship.speed_multiplier,
            fuel: ship.thrusters.fuel(),
        }
    }

    /// Combat state of a damageable entity.
    #[must_use]
    pub fn combat(world: &World, entity: EntityRef) -> Option<&CombatState> {
        match entity {
            EntityRef::Player => Some(&world.player.combat),
            EntityRef::Pooled(handle) => world
                .pool
                .get(handle)
                .filter(|body| matches!(body.role, Role::Enemy(_)))
                .map(|body| &body.combat),
        }
    }

    /// Position of the entity, if it is active.
    #[must_use]
    pub fn position(world: &World, entity: EntityRef) -> Option<Vec2> {
        match entity {
            EntityRef::Player => Some(world.player.position),
            EntityRef::Pooled(handle) => world.pool.get(handle).map(|body| body.position),
        }
    }

    /// Reports whether the handle refers to an active instance.
    #[must_use]
    pub fn is_active(world: &World, handle: EntityHandle) -> bool {
        world.pool.is_active(handle)
    }

    /// Occupancy counters of the pool.
    #[must_use]
    pub fn pool_stats(world: &World, kind: PoolKind) -> Option<PoolStats> {
        world.pool.stats(kind)
    }

    /// Captures every active pooled instance in registry order.
    #[must_use]
    pub fn bodies(world: &World) -> Vec<BodySnapshot> {
        world
            .pool
            .iter_active()
            .map(|(handle, body)| BodySnapshot {
                handle,
                position: body.position,
                half_size: body.half_size,
                health: match body.role {
                    Role::Enemy(_) => Some(body.combat.health()),
                    _ => None,
                },
            })
            .collect()
    }

    /// Number of enemies that are active and alive.
    #[must_use]
    pub fn live_enemies(world: &World) -> usize {
        world
            .pool
            .iter_active()
            .filter(|(_, body)| matches!(body.role, Role::Enemy(_)) && !body.combat.is_dead())
            .count()
    }

    /// Immutable representation of the player ship used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// World position of the ship.
        pub position: Vec2,
        /// Half extents of the ship's collider.
        pub half_size: Vec2,
        /// Current health.
        pub health: u32,
        /// Health ceiling.
        pub max_health: u32,
        /// Remaining shield health; zero while the shield is down.
        pub shield: u32,
        /// Invincibility window is open.
        pub invincible: bool,
        /// Ship was destroyed.
        pub dead: bool,
        /// Rounds left in the magazine.
        pub ammo: u32,
        /// Magazine capacity.
        pub max_ammo: u32,
        /// Active weapon behaviour.
        pub fire_pattern: FirePattern,
        /// Movement speed multiplier.
        pub speed_multiplier: f32,
        /// Thruster fuel in `[0, 1]`.
        pub fuel: f32,
    }
}

fn sample_interval(rng: &mut ChaCha8Rng, interval: FireInterval) -> Duration {
    if interval.max <= interval.min {
        return interval.min;
    }
    let seconds = rng.gen_range(interval.min.as_secs_f32()..interval.max.as_secs_f32());
    Duration::from_secs_f32(seconds)
}

fn nearest(targets: &[Vec2], from: Vec2) -> Option<Vec2> {
    targets.iter().copied().min_by(|a, b| {
        a.distance_squared(from)
            .total_cmp(&b.distance_squared(from))
    })
}

/// Uniform x along the spawn line; a line without width spawns on the center.
fn spawn_line_x(rng: &mut ChaCha8Rng, half_width: f32) -> f32 {
    let half_width = half_width.abs();
    if half_width > 0.0 && half_width.is_finite() {
        rng.gen_range(-half_width..=half_width)
    } else {
        0.0
    }
}

fn sample_bounds(rng: &mut ChaCha8Rng, bounds: AxisBounds) -> f32 {
    if bounds.max > bounds.min && (bounds.max - bounds.min).is_finite() {
        rng.gen_range(bounds.min..=bounds.max)
    } else {
        bounds.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_line_tolerates_negative_and_empty_widths() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..32 {
            let x = spawn_line_x(&mut rng, -5.0);
            assert!((-5.0..=5.0).contains(&x));
        }
        assert_eq!(spawn_line_x(&mut rng, 0.0), 0.0);
        assert_eq!(spawn_line_x(&mut rng, f32::NAN), 0.0);
        assert_eq!(spawn_line_x(&mut rng, f32::INFINITY), 0.0);
    }

    #[test]
    fn inverted_bounds_sample_their_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(sample_bounds(&mut rng, AxisBounds::new(4.0, 1.0)), 4.0);
    }

    #[test]
    fn collapsed_fire_interval_returns_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let interval = FireInterval {
            min: Duration::from_secs(2),
            max: Duration::from_secs(1),
        };
        assert_eq!(sample_interval(&mut rng, interval), Duration::from_secs(2));
    }
}
