//! Health and the damage sink contract.

use bevy::prelude::*;

/// Anything that can receive damage from the combat resolver.
///
/// Weapon collaborators and agents deliver damage through `ApplyDamage`
/// events; the systems routing those events call into this trait.
pub trait DamageSink {
    /// Returns the health left after the hit.
    fn apply_damage(&mut self, amount: f32) -> f32;
}

/// Health of an agent or of a damage target (player, props)
///
/// Invariant: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Non-positive and NaN amounts are ignored (no healing through damage).
    pub fn take_damage(&mut self, amount: f32) {
        if !(amount > 0.0) {
            return;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

impl DamageSink for Health {
    fn apply_damage(&mut self, amount: f32) -> f32 {
        self.take_damage(amount);
        self.current
    }
}
