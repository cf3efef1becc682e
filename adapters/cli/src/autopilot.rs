//! Scripted pilot and overlap detector standing in for a player and a physics engine.

use galaxy_shooter_core::{BodySnapshot, EnemyKind, EntityRef, Extent, PlayerInput, PoolKind};
use galaxy_shooter_world::{query, World};
use glam::Vec2;

const ALIGNED_DISTANCE: f32 = 0.25;
const THRUST_DISTANCE: f32 = 6.0;

/// Steers under the nearest living enemy and keeps the trigger held.
pub(crate) fn pilot(world: &World) -> PlayerInput {
    let player = query::player(world);
    if player.dead {
        return PlayerInput::default();
    }

    let target = query::bodies(world)
        .into_iter()
        .filter(BodySnapshot::is_alive_damageable)
        .map(|body| body.position)
        .min_by(|a, b| {
            a.distance_squared(player.position)
                .total_cmp(&b.distance_squared(player.position))
        });

    let Some(target) = target else {
        return PlayerInput::new(Vec2::ZERO, false, false);
    };
    let dx = target.x - player.position.x;
    let movement = if dx.abs() > ALIGNED_DISTANCE {
        Vec2::new(dx.signum(), 0.0)
    } else {
        Vec2::ZERO
    };
    PlayerInput::new(movement, true, dx.abs() > THRUST_DISTANCE)
}

/// Pairs of overlapping colliders the world should resolve this tick.
pub(crate) fn collisions(world: &World) -> Vec<(EntityRef, EntityRef)> {
    let player = query::player(world);
    let bodies = query::bodies(world);
    let mut pairs = Vec::new();

    if !player.dead {
        let ship = Extent::new(player.position, player.half_size);
        pairs.extend(
            bodies
                .iter()
                .filter(|body| touches_player(body) && ship.overlaps(&body.extent()))
                .map(|body| (EntityRef::Player, EntityRef::Pooled(body.handle))),
        );
    }

    for laser in bodies
        .iter()
        .filter(|body| body.handle.kind().is_player_projectile())
    {
        let hit = bodies
            .iter()
            .filter(|body| body.is_alive_damageable())
            .find(|enemy| laser.extent().overlaps(&enemy.extent()));
        if let Some(enemy) = hit {
            pairs.push((EntityRef::Pooled(laser.handle), EntityRef::Pooled(enemy.handle)));
        }
    }

    pairs
}

fn touches_player(body: &BodySnapshot) -> bool {
    let kind = body.handle.kind();
    if EnemyKind::from_pool_kind(kind).is_some() {
        return body.is_alive_damageable();
    }
    kind.is_hostile_projectile() || matches!(kind, PoolKind::ToxicSmoke | PoolKind::PowerUp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_shooter_core::{Command, GameConfig, PowerUpKind};
    use galaxy_shooter_world as world;

    fn prewarmed() -> World {
        let config = GameConfig::default();
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
        world
    }

    #[test]
    fn pilot_idles_without_targets() {
        let world = prewarmed();
        assert_eq!(pilot(&world), PlayerInput::default());
    }

    #[test]
    fn pilot_chases_the_nearest_enemy() {
        let mut world = prewarmed();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Rookie,
                position: Vec2::new(-10.0, 8.0),
                rotation: 0.0,
                wave: None,
            },
            &mut events,
        );

        let input = pilot(&world);

        assert_eq!(input.movement, Vec2::new(-1.0, 0.0));
        assert!(input.fire);
        assert!(input.thrust);
    }

    #[test]
    fn overlapping_power_up_is_reported() {
        let mut world = prewarmed();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnPowerUp {
                kind: PowerUpKind::Ammo,
                position: Vec2::new(0.0, -6.0),
            },
            &mut events,
        );

        let pairs = collisions(&world);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, EntityRef::Player);
    }

    #[test]
    fn every_enemy_variant_can_ram_the_player() {
        for kind in EnemyKind::ALL {
            let mut world = prewarmed();
            let mut events = Vec::new();
            world::apply(
                &mut world,
                Command::SpawnEnemy {
                    kind,
                    position: Vec2::new(0.0, -6.0),
                    rotation: 0.0,
                    wave: None,
                },
                &mut events,
            );

            let pairs = collisions(&world);

            assert!(
                pairs
                    .iter()
                    .any(|(first, second)| *first == EntityRef::Player
                        && matches!(second, EntityRef::Pooled(handle) if handle.kind() == kind.pool_kind())),
                "{kind:?} should touch the player"
            );
        }
    }
}
