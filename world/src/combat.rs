//! Health, shield and invincibility bookkeeping shared by every damageable entity.

use std::time::Duration;

/// Result of routing a single hit through [`CombatState::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The shield soaked the hit; health is untouched.
    Absorbed {
        /// Shield health left after the hit.
        shield_health: u32,
        /// The hit depleted the shield and dropped it.
        broken: bool,
    },
    /// The invincibility window suppressed the hit.
    Ignored,
    /// Health dropped without reaching zero.
    Damaged {
        /// Health left after the hit.
        health: u32,
    },
    /// Health reached zero and the entity died.
    Killed,
    /// The entity was already dead.
    AlreadyDead,
}

/// Combat state machine of a damageable entity.
///
/// `health == 0` holds exactly when the entity is dead. While the shield is
/// raised it takes every hit; otherwise an open invincibility window
/// suppresses hits entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatState {
    health: u32,
    max_health: u32,
    shield_health: u32,
    shield_active: bool,
    invincible_for: Option<Duration>,
    invincibility_window: Duration,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl CombatState {
    /// Creates a full-health state; `max_health` is raised to at least one.
    #[must_use]
    pub fn new(max_health: u32, invincibility_window: Duration) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            shield_health: 0,
            shield_active: false,
            invincible_for: None,
            invincibility_window,
        }
    }

    /// Restores the state a freshly spawned entity starts with.
    pub fn reset(&mut self) {
        *self = Self::new(self.max_health, self.invincibility_window);
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health ceiling.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Remaining shield health; zero while the shield is down.
    #[must_use]
    pub const fn shield_health(&self) -> u32 {
        if self.shield_active {
            self.shield_health
        } else {
            0
        }
    }

    /// Reports whether the shield is raised.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shield_active
    }

    /// Reports whether the invincibility window is open.
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.invincible_for.is_some()
    }

    /// Time left in the invincibility window.
    #[must_use]
    pub const fn invincible_for(&self) -> Option<Duration> {
        self.invincible_for
    }

    /// Reports whether the entity reached its terminal state.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Routes a hit through the shield, the invincibility window, then health.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }

        let amount = self.clamp_amount(amount);

        if self.shield_active {
            self.shield_health = self.shield_health.saturating_sub(amount);
            let broken = self.shield_health == 0;
            if broken {
                self.shield_active = false;
            }
            self.open_invincibility();
            return DamageOutcome::Absorbed {
                shield_health: self.shield_health,
                broken,
            };
        }

        if self.is_invincible() {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.enter_dead();
            return DamageOutcome::Killed;
        }

        self.open_invincibility();
        DamageOutcome::Damaged {
            health: self.health,
        }
    }

    /// Restores health, returning the new value, or `None` once dead.
    pub fn heal(&mut self, amount: i32) -> Option<u32> {
        if self.is_dead() {
            return None;
        }

        let amount = self.clamp_amount(amount);
        self.health = self.health.saturating_add(amount).min(self.max_health);
        Some(self.health)
    }

    /// Raises the shield, or refills it when already raised.
    ///
    /// Returns `false` when the entity is dead or `capacity` is zero.
    pub fn activate_shield(&mut self, capacity: u32) -> bool {
        if self.is_dead() || capacity == 0 {
            return false;
        }
        self.shield_active = true;
        self.shield_health = capacity;
        true
    }

    /// Drops the shield, returning whether it was raised.
    pub fn deactivate_shield(&mut self) -> bool {
        let was_active = self.shield_active;
        self.shield_active = false;
        self.shield_health = 0;
        was_active
    }

    /// Forces the terminal transition; returns `false` when already dead.
    pub fn kill(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = 0;
        self.enter_dead();
        true
    }

    /// Advances the invincibility window.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(remaining) = self.invincible_for {
            let remaining = remaining.saturating_sub(dt);
            self.invincible_for = if remaining.is_zero() {
                None
            } else {
                Some(remaining)
            };
        }
    }

    /// Sign is dropped: a negative hit still hurts and a negative heal still heals.
    fn clamp_amount(&self, amount: i32) -> u32 {
        amount.unsigned_abs().min(self.max_health)
    }

    fn open_invincibility(&mut self) {
        if !self.invincibility_window.is_zero() {
            self.invincible_for = Some(self.invincibility_window);
        }
    }

    fn enter_dead(&mut self) {
        self.shield_active = false;
        self.shield_health = 0;
        self.invincible_for = None;
    }
}
