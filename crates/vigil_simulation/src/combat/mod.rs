//! Combat module
//!
//! - Rules: cooldown, melee/ranged resolution (pure, no ECS access)
//! - Events: ApplyDamage (intake), DamageDealt, EntityDied
//!
//! Attempts are issued by `ai::systems::motion` on the motion tick; damage
//! intake happens on the decision tick.

use bevy::prelude::*;

pub mod cooldown;
pub mod damage;
pub mod resolver;


pub use cooldown::AttackCooldown;
pub use damage::{ApplyDamage, DamageDealt, EntityDied};
pub use resolver::{resolve_melee, resolve_ranged, AttackOutcome, AttackProfile};

/// Registers combat events.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ApplyDamage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();
    }
}
