//! Flight and aiming of the individual enemy variants.

use std::f32::consts::FRAC_1_SQRT_2;

use galaxy_shooter_core::{EnemyKind, GameConfig};
use glam::Vec2;

const PAIRED_LASER_OFFSET_X: f32 = 0.4;
const WATCH_FRONT_DEGREES: f32 = 45.0;
const WATCH_SIDE_DEGREES: f32 = 135.0;
const WATCH_REAR_SPREAD_DEGREES: f32 = 30.0;

/// Steering memory carried by an enemy between ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum Tactic {
    #[default]
    Cruise,
    /// Time spent swaying and the height the pending bomb drops at.
    Sway { elapsed: f32, drop_at: Option<f32> },
    /// Player is within the lock radius.
    Ram { locked: bool },
    /// Sideways direction of the current dodge, in `[-1, 1]`.
    Dodge { drift: f32 },
}

impl Tactic {
    pub(crate) fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Bomber => Tactic::Sway {
                elapsed: 0.0,
                drop_at: None,
            },
            EnemyKind::Reckless => Tactic::Ram { locked: false },
            EnemyKind::Avoider => Tactic::Dodge { drift: 0.0 },
            EnemyKind::Rookie | EnemyKind::Asteroid | EnemyKind::Toxic | EnemyKind::Watcher => {
                Tactic::Cruise
            }
        }
    }

    /// Schedules one bomb for the current pass.
    pub(crate) fn arm(&mut self, altitude: f32) {
        if let Tactic::Sway { drop_at, .. } = self {
            *drop_at = Some(altitude);
        }
    }

    /// Consumes the pending bomb once the bomber sank to its drop height.
    pub(crate) fn take_drop(&mut self, height: f32) -> bool {
        if let Tactic::Sway { drop_at, .. } = self {
            if drop_at.is_some_and(|altitude| height <= altitude) {
                *drop_at = None;
                return true;
            }
        }
        false
    }
}

/// What an enemy can see while steering.
pub(crate) struct Surroundings<'a> {
    pub(crate) config: &'a GameConfig,
    pub(crate) player: Option<Vec2>,
    pub(crate) player_lasers: &'a [Vec2],
    pub(crate) seconds: f32,
}

/// Velocity of a living enemy for this tick; rammers also turn their heading.
pub(crate) fn steer(
    kind: EnemyKind,
    tactic: &mut Tactic,
    rotation: &mut f32,
    position: Vec2,
    shielded: bool,
    around: &Surroundings<'_>,
) -> Vec2 {
    let enemies = &around.config.enemies;
    let speed = around.config.enemy(kind).speed;
    let forward = heading(*rotation);

    match (kind, tactic) {
        (EnemyKind::Toxic, _) if shielded => forward * enemies.toxin.shielded_speed,
        (EnemyKind::Bomber, Tactic::Sway { elapsed, .. }) => {
            *elapsed += around.seconds;
            let bombing = &enemies.bombing;
            let sway = (*elapsed * bombing.sway_frequency).sin() * bombing.sway_amplitude;
            (forward * speed + forward.perp() * sway) * FRAC_1_SQRT_2
        }
        (EnemyKind::Reckless, Tactic::Ram { locked }) => {
            let ramming = &enemies.ramming;
            let target = around
                .player
                .filter(|player| player.distance(position) <= ramming.lock_radius);
            *locked = target.is_some();
            match target {
                Some(player) => {
                    let direction =
                        steer_toward(forward, player - position, ramming.turn_rate * around.seconds);
                    *rotation = rotation_of(direction);
                    direction * ramming.ram_speed
                }
                None => forward * speed,
            }
        }
        (EnemyKind::Avoider, Tactic::Dodge { drift }) => {
            let dodging = &enemies.dodging;
            *drift = around
                .player_lasers
                .iter()
                .filter(|laser| {
                    laser.y < position.y
                        && laser.distance(position) <= dodging.detect_radius
                        && (laser.x - position.x).abs() <= dodging.threshold
                })
                .map(|laser| (position.x - laser.x).signum())
                .sum::<f32>()
                .clamp(-1.0, 1.0);
            if *drift == 0.0 {
                forward * speed
            } else {
                (forward + forward.perp() * *drift).normalize_or_zero() * dodging.dodge_speed
            }
        }
        _ => forward * speed,
    }
}

/// Lasers of one volley as muzzle offsets and headings in degrees.
pub(crate) fn volley(
    kind: EnemyKind,
    tactic: &Tactic,
    rotation: f32,
    position: Vec2,
    player: Option<Vec2>,
) -> Vec<(Vec2, f32)> {
    match (kind, tactic) {
        (EnemyKind::Reckless, Tactic::Ram { locked: true }) => Vec::new(),
        (EnemyKind::Reckless, _) => vec![(Vec2::ZERO, rotation)],
        (EnemyKind::Watcher, _) => watch(rotation, position, player)
            .into_iter()
            .map(|aim| (Vec2::ZERO, aim))
            .collect(),
        _ => vec![
            (Vec2::new(-PAIRED_LASER_OFFSET_X, 0.0), rotation),
            (Vec2::new(PAIRED_LASER_OFFSET_X, 0.0), rotation),
        ],
    }
}

/// Headings that cover the side of the watcher the player is on.
fn watch(rotation: f32, position: Vec2, player: Option<Vec2>) -> Vec<f32> {
    let Some(offset) = player.map(|player| player - position) else {
        return vec![rotation];
    };
    if offset == Vec2::ZERO {
        return vec![rotation];
    }
    let bearing = heading(rotation).angle_between(offset).to_degrees();
    if bearing.abs() <= WATCH_FRONT_DEGREES {
        vec![rotation]
    } else if bearing > 0.0 && bearing <= WATCH_SIDE_DEGREES {
        vec![rotation + 90.0]
    } else if bearing < 0.0 && bearing >= -WATCH_SIDE_DEGREES {
        vec![rotation - 90.0]
    } else {
        vec![
            rotation + 180.0 - WATCH_REAR_SPREAD_DEGREES,
            rotation + 180.0 + WATCH_REAR_SPREAD_DEGREES,
        ]
    }
}

pub(crate) fn heading(rotation_degrees: f32) -> Vec2 {
    Vec2::from_angle(rotation_degrees.to_radians()).rotate(Vec2::NEG_Y)
}

fn rotation_of(direction: Vec2) -> f32 {
    Vec2::NEG_Y.angle_between(direction).to_degrees()
}

pub(crate) fn steer_toward(velocity: Vec2, desired: Vec2, max_turn: f32) -> Vec2 {
    let speed = velocity.length();
    let current = velocity.normalize_or_zero();
    let desired = desired.normalize_or_zero();
    if current == Vec2::ZERO || desired == Vec2::ZERO {
        return velocity;
    }
    let turn = current.angle_between(desired).clamp(-max_turn, max_turn);
    Vec2::from_angle(turn).rotate(current) * speed
}
