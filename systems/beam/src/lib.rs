#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Charged beam weapon: a four-phase state machine that samples overlaps while firing.

use std::time::Duration;

use galaxy_shooter_core::{
    BeamConfig, BeamCue, BeamState, BodySnapshot, Command, EntityRef, Event, Extent,
};
use glam::Vec2;

/// Beam weapon owned by the simulation and fed the player's position every tick.
#[derive(Debug)]
pub struct BeamWeapon {
    config: BeamConfig,
    state: BeamState,
    charge: f32,
    size: f32,
    held_for: Duration,
    light_on: bool,
    particles_on: bool,
    scratch: Vec<Command>,
}

impl BeamWeapon {
    /// Creates an inactive beam.
    #[must_use]
    pub fn new(config: BeamConfig) -> Self {
        Self {
            config,
            state: BeamState::Inactive,
            charge: 0.0,
            size: 0.0,
            held_for: Duration::ZERO,
            light_on: false,
            particles_on: false,
            scratch: Vec::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> BeamState {
        self.state
    }

    /// Charge level in `[0, 1]`.
    #[must_use]
    pub const fn charge(&self) -> f32 {
        self.charge
    }

    /// Fraction of the full extent currently covered, in `[0, 1]`.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Rectangle covered by the beam when fired from `origin`.
    ///
    /// The beam extends upwards from the origin; `None` while nothing is drawn.
    #[must_use]
    pub fn extent(&self, origin: Vec2) -> Option<Extent> {
        if self.size <= 0.0 {
            return None;
        }
        let length = self.config.max_length * self.size;
        let width = self.config.max_width * self.size;
        Some(Extent::new(
            origin + Vec2::new(0.0, length / 2.0),
            Vec2::new(width / 2.0, length / 2.0),
        ))
    }

    /// Starts charging.
    ///
    /// Restarting while regressing drops back to inactive first. While the
    /// beam charges or fires this only refreshes the hold timer, and only when
    /// configured to.
    pub fn start(&mut self, out_events: &mut Vec<Event>) {
        match self.state {
            BeamState::Inactive => self.enter(BeamState::ChargeUp, out_events),
            BeamState::Regressing => {
                self.stop(out_events);
                self.enter(BeamState::ChargeUp, out_events);
            }
            BeamState::ChargeUp | BeamState::Firing => {
                if self.config.refresh_hold_on_restart {
                    self.held_for = Duration::ZERO;
                }
            }
        }
    }

    /// Aborts the beam from any phase, resetting charge and extent.
    pub fn stop(&mut self, out_events: &mut Vec<Event>) {
        if self.particles_on {
            out_events.push(Event::BeamCue {
                cue: BeamCue::ParticlesOff,
            });
        }
        self.charge = 0.0;
        self.size = 0.0;
        self.held_for = Duration::ZERO;
        self.light_on = false;
        self.particles_on = false;
        if self.state != BeamState::Inactive {
            self.enter(BeamState::Inactive, out_events);
        }
    }

    /// Advances the beam by `dt`.
    ///
    /// While firing, every snapshot the `overlaps` predicate matches against
    /// the beam's extent is hit: enemy lasers are released and living
    /// damageable bodies take the per-tick damage.
    pub fn tick<F>(
        &mut self,
        dt: Duration,
        origin: Vec2,
        targets: &[BodySnapshot],
        overlaps: F,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) where
        F: Fn(&Extent, &BodySnapshot) -> bool,
    {
        let seconds = dt.as_secs_f32();
        match self.state {
            BeamState::Inactive => {}
            BeamState::ChargeUp => {
                self.charge = (self.charge + self.config.charge_rate * seconds).min(1.0);
                if !self.light_on && self.charge >= self.config.light_threshold {
                    self.light_on = true;
                    out_events.push(Event::BeamCue {
                        cue: BeamCue::LightOn,
                    });
                }
                if !self.particles_on && self.charge >= self.config.particles_threshold {
                    self.particles_on = true;
                    out_events.push(Event::BeamCue {
                        cue: BeamCue::ParticlesOn,
                    });
                }
                if self.charge >= 1.0 {
                    self.enter(BeamState::Firing, out_events);
                }
            }
            BeamState::Firing => {
                if self.size < 1.0 {
                    self.size = (self.size + self.config.growth_rate * seconds).min(1.0);
                } else {
                    self.held_for = self.held_for.saturating_add(dt);
                }

                if self.held_for >= self.config.firing_duration {
                    self.enter(BeamState::Regressing, out_events);
                    return;
                }
                self.sample(origin, targets, overlaps, out_commands);
            }
            BeamState::Regressing => {
                self.charge = (self.charge - self.config.regress_rate * seconds).max(0.0);
                self.size = self.size.min(self.charge);
                if self.particles_on && self.charge < self.config.particles_off_threshold {
                    self.particles_on = false;
                    out_events.push(Event::BeamCue {
                        cue: BeamCue::ParticlesOff,
                    });
                }
                if self.charge <= 0.0 {
                    self.stop(out_events);
                }
            }
        }
    }

    /// Consumes world events: fire requests start the beam, player death or
    /// game over stops it, and elapsed time advances it.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        origin: Vec2,
        targets: &[BodySnapshot],
        overlaps: F,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) where
        F: Fn(&Extent, &BodySnapshot) -> bool,
    {
        for event in events {
            match event {
                Event::BeamRequested => self.start(out_events),
                Event::EntityKilled {
                    entity: EntityRef::Player,
                }
                | Event::GameOver => self.stop(out_events),
                Event::TimeAdvanced { dt } => {
                    self.tick(*dt, origin, targets, &overlaps, out_commands, out_events);
                }
                _ => {}
            }
        }
    }

    fn enter(&mut self, state: BeamState, out_events: &mut Vec<Event>) {
        log::debug!("beam {:?} -> {state:?}", self.state);
        self.state = state;
        out_events.push(Event::BeamStateChanged { state });
    }

    fn sample<F>(
        &mut self,
        origin: Vec2,
        targets: &[BodySnapshot],
        overlaps: F,
        out_commands: &mut Vec<Command>,
    ) where
        F: Fn(&Extent, &BodySnapshot) -> bool,
    {
        let Some(extent) = self.extent(origin) else {
            return;
        };

        self.scratch.clear();
        for target in targets.iter().filter(|target| overlaps(&extent, target)) {
            if target.handle.kind().is_hostile_projectile() {
                self.scratch.push(Command::Release {
                    handle: target.handle,
                });
            } else if target.is_alive_damageable() {
                self.scratch.push(Command::DamageEntity {
                    target: EntityRef::Pooled(target.handle),
                    amount: self.config.damage_per_tick,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }
        out_commands.reserve(self.scratch.len());
        out_commands.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_grows_upwards_from_origin() {
        let mut beam = BeamWeapon::new(BeamConfig::default());
        assert_eq!(beam.extent(Vec2::ZERO), None);

        beam.size = 0.5;
        let extent = beam.extent(Vec2::new(1.0, -6.0)).expect("drawn");
        assert_eq!(extent.center(), Vec2::new(1.0, -1.0));
        assert_eq!(extent.half_size(), Vec2::new(0.375, 5.0));
    }

    #[test]
    fn restart_while_firing_refreshes_hold() {
        let mut beam = BeamWeapon::new(BeamConfig::default());
        let mut events = Vec::new();
        beam.state = BeamState::Firing;
        beam.size = 1.0;
        beam.held_for = Duration::from_secs(1);

        beam.start(&mut events);

        assert_eq!(beam.held_for, Duration::ZERO);
        assert_eq!(beam.state(), BeamState::Firing);
        assert!(events.is_empty());
    }
}
