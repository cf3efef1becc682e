#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timed ability scheduling and the power-up pickup system built on top of it.

use std::{collections::BTreeMap, fmt::Debug, time::Duration};

use galaxy_shooter_core::{
    AbilitiesConfig, AbilityKind, Command, EntityRef, Event, ExclusionGroup, FirePattern,
    PowerUpKind,
};

/// Kind of timed ability the scheduler can manage.
pub trait Ability: Copy + Ord + Debug {
    /// Exclusion group identifier; at most one ability per group is active.
    type Group: Copy + Eq + Debug;

    /// Group the ability belongs to.
    fn group(&self) -> Self::Group;
}

impl Ability for AbilityKind {
    type Group = ExclusionGroup;

    fn group(&self) -> ExclusionGroup {
        AbilityKind::group(*self)
    }
}

/// Why an ability stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The countdown ran out.
    Expired,
    /// Another ability of the same group took over.
    Preempted,
    /// The ability was cancelled explicitly.
    Cancelled,
}

/// State change reported by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition<K> {
    /// The ability started or restarted its countdown.
    Activated(K),
    /// The ability stopped and its deactivation effect ran.
    Deactivated {
        /// Ability that stopped.
        kind: K,
        /// Cause of the stop.
        reason: EndReason,
    },
}

#[derive(Clone, Debug, Default)]
struct Effect {
    on_activate: Vec<Command>,
    on_deactivate: Option<Vec<Command>>,
}

/// Activation and deactivation command lists per ability kind.
#[derive(Clone, Debug)]
pub struct AbilityEffects<K> {
    effects: BTreeMap<K, Effect>,
}

impl<K> Default for AbilityEffects<K> {
    fn default() -> Self {
        Self {
            effects: BTreeMap::new(),
        }
    }
}

impl<K: Ability> AbilityEffects<K> {
    /// Creates an empty effect table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the commands emitted whenever the ability activates.
    pub fn set_activation(&mut self, kind: K, commands: Vec<Command>) {
        self.effects.entry(kind).or_default().on_activate = commands;
    }

    /// Sets the commands emitted when the ability stops for any reason.
    pub fn set_deactivation(&mut self, kind: K, commands: Vec<Command>) {
        self.effects.entry(kind).or_default().on_deactivate = Some(commands);
    }

    /// Commands emitted on activation; empty when none are registered.
    #[must_use]
    pub fn activation(&self, kind: K) -> &[Command] {
        self.effects
            .get(&kind)
            .map(|effect| effect.on_activate.as_slice())
            .unwrap_or_default()
    }

    /// Commands emitted on deactivation, or `None` when none are registered.
    #[must_use]
    pub fn deactivation(&self, kind: K) -> Option<&[Command]> {
        self.effects
            .get(&kind)
            .and_then(|effect| effect.on_deactivate.as_deref())
    }
}

/// Timer-driven scheduler enforcing per-group mutual exclusion.
///
/// At most one ability per exclusion group is active. Every stop, whether by
/// expiry, pre-emption or cancellation, emits the deactivation effect exactly
/// once.
#[derive(Clone, Debug)]
pub struct AbilityScheduler<K> {
    effects: AbilityEffects<K>,
    active: BTreeMap<K, Duration>,
}

impl<K: Ability> AbilityScheduler<K> {
    /// Creates a scheduler driving the provided effects.
    #[must_use]
    pub fn new(effects: AbilityEffects<K>) -> Self {
        Self {
            effects,
            active: BTreeMap::new(),
        }
    }

    /// Starts or restarts the ability's countdown.
    ///
    /// Any other active ability of the same group is stopped first, so its
    /// deactivation commands precede the activation commands in `out_commands`.
    pub fn activate(
        &mut self,
        kind: K,
        duration: Duration,
        out_commands: &mut Vec<Command>,
        out_transitions: &mut Vec<Transition<K>>,
    ) {
        let group = kind.group();
        let rivals: Vec<K> = self
            .active
            .keys()
            .copied()
            .filter(|other| *other != kind && other.group() == group)
            .collect();
        for rival in rivals {
            self.end(rival, EndReason::Preempted, out_commands, out_transitions);
        }

        if self.effects.deactivation(kind).is_none() {
            log::warn!("ability {kind:?} has no deactivation effect registered");
        }

        out_commands.extend_from_slice(self.effects.activation(kind));
        let _ = self.active.insert(kind, duration);
        out_transitions.push(Transition::Activated(kind));
    }

    /// Reports whether the ability's countdown is running.
    #[must_use]
    pub fn is_active(&self, kind: K) -> bool {
        self.active.contains_key(&kind)
    }

    /// Time left before the ability expires.
    #[must_use]
    pub fn remaining(&self, kind: K) -> Option<Duration> {
        self.active.get(&kind).copied()
    }

    /// Active abilities in kind order.
    pub fn active(&self) -> impl Iterator<Item = K> + '_ {
        self.active.keys().copied()
    }

    /// Stops the ability as if it expired; returns `false` when it was not active.
    pub fn cancel(
        &mut self,
        kind: K,
        out_commands: &mut Vec<Command>,
        out_transitions: &mut Vec<Transition<K>>,
    ) -> bool {
        if !self.active.contains_key(&kind) {
            return false;
        }
        self.end(kind, EndReason::Cancelled, out_commands, out_transitions);
        true
    }

    /// Stops every active ability.
    pub fn cancel_all(
        &mut self,
        out_commands: &mut Vec<Command>,
        out_transitions: &mut Vec<Transition<K>>,
    ) {
        let kinds: Vec<K> = self.active.keys().copied().collect();
        for kind in kinds {
            self.end(kind, EndReason::Cancelled, out_commands, out_transitions);
        }
    }

    /// Advances every countdown, stopping abilities whose time ran out.
    pub fn tick(
        &mut self,
        dt: Duration,
        out_commands: &mut Vec<Command>,
        out_transitions: &mut Vec<Transition<K>>,
    ) {
        let mut expired = Vec::new();
        for (kind, remaining) in &mut self.active {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                expired.push(*kind);
            }
        }
        for kind in expired {
            self.end(kind, EndReason::Expired, out_commands, out_transitions);
        }
    }

    fn end(
        &mut self,
        kind: K,
        reason: EndReason,
        out_commands: &mut Vec<Command>,
        out_transitions: &mut Vec<Transition<K>>,
    ) {
        if self.active.remove(&kind).is_none() {
            return;
        }
        if let Some(commands) = self.effects.deactivation(kind) {
            out_commands.extend_from_slice(commands);
        }
        out_transitions.push(Transition::Deactivated { kind, reason });
    }
}

/// Builds the ship's ability effects from the tuning values.
#[must_use]
pub fn ship_effects(config: &AbilitiesConfig) -> AbilityEffects<AbilityKind> {
    let mut effects = AbilityEffects::new();
    let single = Command::SetFirePattern {
        pattern: FirePattern::Single,
    };

    for (kind, pattern) in [
        (AbilityKind::TripleShot, FirePattern::TripleShot),
        (AbilityKind::HeatSeek, FirePattern::HeatSeek),
    ] {
        effects.set_activation(
            kind,
            vec![
                Command::SetFirePattern { pattern },
                Command::RefillAmmo {
                    amount: Some(config.ammo_refill),
                },
            ],
        );
        effects.set_deactivation(kind, vec![single.clone()]);
    }

    effects.set_activation(
        AbilityKind::Beam,
        vec![Command::SetFirePattern {
            pattern: FirePattern::Beam,
        }],
    );
    effects.set_deactivation(AbilityKind::Beam, vec![single]);

    effects.set_activation(
        AbilityKind::Speed,
        vec![Command::SetSpeedMultiplier {
            multiplier: config.speed_multiplier,
        }],
    );
    effects.set_deactivation(
        AbilityKind::Speed,
        vec![Command::SetSpeedMultiplier { multiplier: 1.0 }],
    );

    effects.set_activation(
        AbilityKind::Shield,
        vec![Command::ActivateShield {
            target: EntityRef::Player,
            capacity: config.shield_capacity,
        }],
    );
    effects.set_deactivation(
        AbilityKind::Shield,
        vec![Command::DeactivateShield {
            target: EntityRef::Player,
        }],
    );

    effects
}

/// Pickup system translating collected power-ups into ability commands.
#[derive(Debug)]
pub struct Abilities {
    config: AbilitiesConfig,
    scheduler: AbilityScheduler<AbilityKind>,
}

impl Abilities {
    /// Creates the system with the ship's effect table.
    #[must_use]
    pub fn new(config: &AbilitiesConfig) -> Self {
        Self {
            config: *config,
            scheduler: AbilityScheduler::new(ship_effects(config)),
        }
    }

    /// Read-only access to the underlying scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &AbilityScheduler<AbilityKind> {
        &self.scheduler
    }

    /// Consumes world events, emitting effect commands and ability notifications.
    ///
    /// Countdowns advance before the batch's pickups are applied, so an
    /// ability collected during a tick keeps its full duration.
    pub fn handle(
        &mut self,
        events: &[Event],
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let mut transitions = Vec::new();

        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if !elapsed.is_zero() {
            self.scheduler.tick(elapsed, out_commands, &mut transitions);
        }

        for event in events {
            match event {
                Event::PowerUpCollected { kind } => {
                    self.collect(*kind, out_commands, &mut transitions);
                }
                Event::EntityKilled {
                    entity: EntityRef::Player,
                }
                | Event::GameOver => {
                    self.scheduler.cancel_all(out_commands, &mut transitions);
                }
                Event::ShieldBroken {
                    entity: EntityRef::Player,
                } => {
                    let _ = self.scheduler.cancel(
                        AbilityKind::Shield,
                        out_commands,
                        &mut transitions,
                    );
                }
                _ => {}
            }
        }

        out_events.extend(transitions.into_iter().map(|transition| match transition {
            Transition::Activated(kind) => Event::AbilityActivated { kind },
            Transition::Deactivated { kind, .. } => Event::AbilityDeactivated { kind },
        }));
    }

    fn collect(
        &mut self,
        kind: PowerUpKind,
        out_commands: &mut Vec<Command>,
        transitions: &mut Vec<Transition<AbilityKind>>,
    ) {
        match kind.ability() {
            Some(ability) => {
                let duration = self.duration(ability);
                self.scheduler
                    .activate(ability, duration, out_commands, transitions);
            }
            None => match kind {
                PowerUpKind::Life => out_commands.push(Command::HealEntity {
                    target: EntityRef::Player,
                    amount: self.config.life_heal,
                }),
                PowerUpKind::Ammo => out_commands.push(Command::RefillAmmo { amount: None }),
                _ => log::debug!("power-up {kind:?} has no pickup effect"),
            },
        }
    }

    fn duration(&self, kind: AbilityKind) -> Duration {
        match kind {
            AbilityKind::TripleShot => self.config.triple_shot_duration,
            AbilityKind::HeatSeek => self.config.heat_seek_duration,
            AbilityKind::Beam => self.config.beam_duration,
            AbilityKind::Speed => self.config.speed_duration,
            AbilityKind::Shield => self.config.shield_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Spell {
        Fire,
        Ice,
        Haste,
    }

    impl Ability for Spell {
        type Group = u8;

        fn group(&self) -> u8 {
            match self {
                Spell::Fire | Spell::Ice => 0,
                Spell::Haste => 1,
            }
        }
    }

    #[test]
    fn scheduler_is_generic_over_kind() {
        let mut scheduler = AbilityScheduler::new(AbilityEffects::<Spell>::new());
        let mut commands = Vec::new();
        let mut transitions = Vec::new();

        scheduler.activate(Spell::Fire, Duration::from_secs(1), &mut commands, &mut transitions);
        scheduler.activate(Spell::Haste, Duration::from_secs(1), &mut commands, &mut transitions);
        scheduler.activate(Spell::Ice, Duration::from_secs(1), &mut commands, &mut transitions);

        assert!(!scheduler.is_active(Spell::Fire));
        assert!(scheduler.is_active(Spell::Ice));
        assert!(scheduler.is_active(Spell::Haste));
        assert_eq!(
            transitions[2],
            Transition::Deactivated {
                kind: Spell::Fire,
                reason: EndReason::Preempted,
            }
        );
    }

    #[test]
    fn missing_deactivation_still_expires() {
        let mut effects = AbilityEffects::new();
        effects.set_activation(Spell::Haste, vec![Command::EndGame]);
        let mut scheduler = AbilityScheduler::new(effects);
        let mut commands = Vec::new();
        let mut transitions = Vec::new();

        scheduler.activate(Spell::Haste, Duration::from_millis(10), &mut commands, &mut transitions);
        scheduler.tick(Duration::from_millis(10), &mut commands, &mut transitions);

        assert!(!scheduler.is_active(Spell::Haste));
        assert_eq!(commands, vec![Command::EndGame]);
        assert_eq!(
            transitions.last(),
            Some(&Transition::Deactivated {
                kind: Spell::Haste,
                reason: EndReason::Expired,
            })
        );
    }
}
