//! Damage events
//!
//! `ApplyDamage` is the damage sink entry point: weapons, hazards and the
//! engine's own attacks all go through it. Intake runs on the decision tick
//! (`ai::systems::reactions::receive_damage`).

use bevy::prelude::*;

/// Request: deal `amount` to `target`.
#[derive(Event, Debug, Clone)]
pub struct ApplyDamage {
    pub target: Entity,
    pub amount: f32,
    pub source: Option<Entity>,
}

/// Event: damage was applied
///
/// Used by UI, sound and effects collaborators.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Health actually removed (after clamping)
    pub damage: f32,
    pub target_died: bool,
}

/// Event: entity died (health reached 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}
