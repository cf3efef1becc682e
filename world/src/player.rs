//! Player ship state: movement, ammunition and thruster fuel.

use std::time::Duration;

use galaxy_shooter_core::{
    ArenaConfig, Event, FirePattern, PlayerConfig, PlayerInput, ThrusterConfig,
};
use glam::Vec2;

use crate::combat::CombatState;

/// Authoritative state of the player ship.
#[derive(Clone, Debug)]
pub(crate) struct Ship {
    pub(crate) position: Vec2,
    pub(crate) half_size: Vec2,
    pub(crate) combat: CombatState,
    pub(crate) input: PlayerInput,
    pub(crate) ammo: u32,
    pub(crate) max_ammo: u32,
    pub(crate) fire_pattern: FirePattern,
    pub(crate) speed_multiplier: f32,
    fire_cooldown: Duration,
    fire_ready_in: Duration,
    speed: f32,
    thruster_speed: f32,
    pub(crate) thrusters: Thrusters,
}

/// What a fire attempt produced during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Trigger {
    /// Nothing happened.
    Idle,
    /// Lasers should be spawned using the pattern.
    Lasers(FirePattern),
    /// The beam should be requested.
    Beam,
    /// The magazine is empty.
    Empty,
}

impl Ship {
    pub(crate) fn new(config: &PlayerConfig) -> Self {
        Self {
            position: config.spawn_position,
            half_size: config.half_size,
            combat: CombatState::new(config.max_health, config.invincibility),
            input: PlayerInput::default(),
            ammo: config.max_ammo,
            max_ammo: config.max_ammo,
            fire_pattern: FirePattern::Single,
            speed_multiplier: 1.0,
            fire_cooldown: config.fire_cooldown,
            fire_ready_in: Duration::ZERO,
            speed: config.speed,
            thruster_speed: config.thruster_speed,
            thrusters: Thrusters::new(config.thrusters),
        }
    }

    /// Moves the ship for one tick, burning fuel when thrusting.
    pub(crate) fn steer(&mut self, dt: Duration, arena: &ArenaConfig, out_events: &mut Vec<Event>) {
        let direction = self.input.movement.normalize_or_zero();
        let wants_thrust = self.input.thrust && direction != Vec2::ZERO;
        let thrusting = self.thrusters.update(wants_thrust, dt, out_events);

        let base = if thrusting {
            self.thruster_speed
        } else {
            self.speed
        };
        self.position += direction * base * self.speed_multiplier * dt.as_secs_f32();

        if self.position.x.abs() > arena.wrap_x {
            self.position.x = -arena.wrap_x * self.position.x.signum();
        }
        self.position.y = arena.player_bounds_y.clamp(self.position.y);
    }

    /// Resolves the fire button, consuming ammunition when lasers leave the ship.
    pub(crate) fn pull_trigger(&mut self, dt: Duration, game_over: bool) -> Trigger {
        self.fire_ready_in = self.fire_ready_in.saturating_sub(dt);
        if !self.input.fire || game_over || self.combat.is_dead() {
            return Trigger::Idle;
        }
        if !self.fire_ready_in.is_zero() {
            return Trigger::Idle;
        }

        self.fire_ready_in = self.fire_cooldown;
        if self.fire_pattern == FirePattern::Beam {
            return Trigger::Beam;
        }
        if self.ammo == 0 {
            return Trigger::Empty;
        }
        self.ammo -= 1;
        Trigger::Lasers(self.fire_pattern)
    }

    /// Adds rounds up to capacity, or fills the magazine when `amount` is `None`.
    pub(crate) fn refill(&mut self, amount: Option<u32>) -> u32 {
        self.ammo = match amount {
            Some(amount) => self.ammo.saturating_add(amount).min(self.max_ammo),
            None => self.max_ammo,
        };
        self.ammo
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ThrusterPhase {
    Ready,
    Cooldown { remaining: Duration },
    Recovering,
}

/// Fuel model of the ship's thrusters.
///
/// Fuel burns while thrusting. Once the pilot lets go, a recovery cooldown
/// runs (aborted by thrusting again while fuel remains) before fuel flows
/// back. While recovering, the thrusters reignite only once the minimum
/// fuel level is reached.
#[derive(Clone, Debug)]
pub(crate) struct Thrusters {
    config: ThrusterConfig,
    fuel: f32,
    phase: ThrusterPhase,
}

impl Thrusters {
    pub(crate) fn new(config: ThrusterConfig) -> Self {
        Self {
            config,
            fuel: 1.0,
            phase: ThrusterPhase::Ready,
        }
    }

    pub(crate) fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Advances the fuel model, returning whether the thrusters burn this tick.
    pub(crate) fn update(
        &mut self,
        wants_thrust: bool,
        dt: Duration,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let seconds = dt.as_secs_f32();
        match self.phase {
            ThrusterPhase::Recovering => {
                if wants_thrust && self.fuel >= self.config.min_fuel_after_exhaust {
                    self.phase = ThrusterPhase::Ready;
                } else {
                    self.fuel = (self.fuel + self.config.recovery_rate * seconds).min(1.0);
                    out_events.push(Event::ThrusterFuelChanged {
                        fraction: self.fuel,
                    });
                    if self.fuel >= 1.0 {
                        self.phase = ThrusterPhase::Ready;
                    }
                    return false;
                }
            }
            ThrusterPhase::Cooldown { remaining } => {
                if wants_thrust && self.fuel > 0.0 {
                    out_events.push(Event::ThrusterCooldownChanged { fraction: 0.0 });
                    self.phase = ThrusterPhase::Ready;
                } else {
                    let remaining = remaining.saturating_sub(dt);
                    if remaining.is_zero() {
                        out_events.push(Event::ThrusterCooldownChanged { fraction: 0.0 });
                        self.phase = ThrusterPhase::Recovering;
                    } else {
                        out_events.push(Event::ThrusterCooldownChanged {
                            fraction: self.cooldown_progress(remaining),
                        });
                        self.phase = ThrusterPhase::Cooldown { remaining };
                    }
                    return false;
                }
            }
            ThrusterPhase::Ready => {}
        }

        if wants_thrust && self.fuel > 0.0 {
            self.fuel = (self.fuel - self.config.waste_rate * seconds).max(0.0);
            out_events.push(Event::ThrusterFuelChanged {
                fraction: self.fuel,
            });
            return true;
        }

        if self.fuel < 1.0 {
            self.phase = ThrusterPhase::Cooldown {
                remaining: self.config.recovery_cooldown,
            };
        }
        false
    }

    fn cooldown_progress(&self, remaining: Duration) -> f32 {
        let total = self.config.recovery_cooldown.as_secs_f32();
        if total <= 0.0 {
            return 1.0;
        }
        (1.0 - remaining.as_secs_f32() / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thrusters() -> Thrusters {
        Thrusters::new(ThrusterConfig {
            waste_rate: 0.5,
            recovery_rate: 1.0,
            recovery_cooldown: Duration::from_millis(400),
            min_fuel_after_exhaust: 0.5,
        })
    }

    #[test]
    fn burning_drains_fuel_until_exhausted() {
        let mut thrusters = thrusters();
        let mut events = Vec::new();

        assert!(thrusters.update(true, Duration::from_secs(1), &mut events));
        assert!(thrusters.update(true, Duration::from_secs(1), &mut events));
        assert!(thrusters.fuel().abs() < f32::EPSILON);
        assert!(!thrusters.update(true, Duration::from_millis(100), &mut events));
        assert_eq!(
            events.first(),
            Some(&Event::ThrusterFuelChanged { fraction: 0.5 })
        );
    }

    #[test]
    fn cooldown_precedes_recovery() {
        let mut thrusters = thrusters();
        let mut events = Vec::new();
        let _ = thrusters.update(true, Duration::from_secs(1), &mut events);
        events.clear();

        assert!(!thrusters.update(false, Duration::from_millis(100), &mut events));
        assert!(!thrusters.update(false, Duration::from_millis(200), &mut events));
        assert_eq!(
            events,
            vec![Event::ThrusterCooldownChanged { fraction: 0.5 }]
        );
        assert!((thrusters.fuel() - 0.5).abs() < f32::EPSILON);

        let _ = thrusters.update(false, Duration::from_millis(200), &mut events);
        let _ = thrusters.update(false, Duration::from_millis(250), &mut events);
        assert!((thrusters.fuel() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn thrusting_interrupts_cooldown() {
        let mut thrusters = thrusters();
        let mut events = Vec::new();
        let _ = thrusters.update(true, Duration::from_millis(200), &mut events);
        let _ = thrusters.update(false, Duration::from_millis(10), &mut events);
        events.clear();

        assert!(thrusters.update(true, Duration::from_millis(10), &mut events));
        assert_eq!(
            events.first(),
            Some(&Event::ThrusterCooldownChanged { fraction: 0.0 })
        );
    }

    #[test]
    fn recovery_requires_minimum_fuel_to_reignite() {
        let mut thrusters = thrusters();
        let mut events = Vec::new();
        let _ = thrusters.update(true, Duration::from_secs(2), &mut events);
        let _ = thrusters.update(false, Duration::from_millis(10), &mut events);
        let _ = thrusters.update(false, Duration::from_millis(400), &mut events);

        assert!(!thrusters.update(true, Duration::from_millis(200), &mut events));
        assert!(!thrusters.update(true, Duration::from_millis(400), &mut events));
        assert!(thrusters.update(true, Duration::from_millis(100), &mut events));
    }

    #[test]
    fn empty_magazine_reports_instead_of_firing() {
        let mut ship = Ship::new(&PlayerConfig {
            max_ammo: 1,
            ..PlayerConfig::default()
        });
        ship.input.fire = true;

        assert_eq!(
            ship.pull_trigger(Duration::ZERO, false),
            Trigger::Lasers(FirePattern::Single)
        );
        assert_eq!(ship.pull_trigger(Duration::from_millis(50), false), Trigger::Idle);
        assert_eq!(ship.pull_trigger(Duration::from_millis(150), false), Trigger::Empty);
        assert_eq!(ship.pull_trigger(Duration::from_secs(1), true), Trigger::Idle);
    }

    #[test]
    fn movement_wraps_horizontally_and_clamps_vertically() {
        let arena = ArenaConfig::default();
        let mut ship = Ship::new(&PlayerConfig::default());
        ship.position = Vec2::new(20.9, 7.9);
        ship.input.movement = Vec2::new(1.0, 1.0);
        let mut events = Vec::new();

        ship.steer(Duration::from_millis(100), &arena, &mut events);

        assert!((ship.position.x + arena.wrap_x).abs() < f32::EPSILON);
        assert!((ship.position.y - arena.player_bounds_y.max).abs() < f32::EPSILON);
    }
}
