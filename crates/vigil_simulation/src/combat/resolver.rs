//! Combat Resolver: melee and ranged attack attempts.
//!
//! An attempt is resolved in this order:
//! 1. cooldown (early attempts are silently dropped)
//! 2. horizontal range
//! 3. ranged only: vision cone, then an unobstructed line of fire
//!
//! Only a landed attack starts the cooldown.

use bevy::prelude::*;

use crate::combat::cooldown::AttackCooldown;
use crate::components::horizontal_distance;
use crate::perception::{can_see, has_line_of_fire, SpatialQuery, Viewpoint, VisionParams};

/// Attack tuning pulled from `AgentConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub damage: f32,
    /// Attacks per second
    pub rate: f32,
    pub range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    Landed { damage: f32 },
    NotReady,
    OutOfRange,
    NoLineOfSight,
}

impl AttackOutcome {
    pub fn landed(&self) -> bool {
        matches!(self, AttackOutcome::Landed { .. })
    }
}

pub fn resolve_melee(
    cooldown: &mut AttackCooldown,
    attacker_root: Vec3,
    target_root: Vec3,
    profile: &AttackProfile,
    now: f64,
) -> AttackOutcome {
    if !cooldown.ready(now) {
        return AttackOutcome::NotReady;
    }
    if horizontal_distance(attacker_root, target_root) > profile.range {
        return AttackOutcome::OutOfRange;
    }

    cooldown.start(now, profile.rate);
    AttackOutcome::Landed {
        damage: profile.damage,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn resolve_ranged<S: SpatialQuery + ?Sized>(
    cooldown: &mut AttackCooldown,
    view: &Viewpoint,
    attacker_root: Vec3,
    target_root: Vec3,
    target: Entity,
    profile: &AttackProfile,
    vision: &VisionParams,
    now: f64,
    spatial: &S,
) -> AttackOutcome {
    if !cooldown.ready(now) {
        return AttackOutcome::NotReady;
    }
    if horizontal_distance(attacker_root, target_root) > profile.range {
        return AttackOutcome::OutOfRange;
    }
    if !can_see(view, target_root, target, vision, spatial) {
        return AttackOutcome::NoLineOfSight;
    }
    // Re-checked right before firing
    if !has_line_of_fire(view, target_root, target, vision, spatial) {
        return AttackOutcome::NoLineOfSight;
    }

    cooldown.start(now, profile.rate);
    AttackOutcome::Landed {
        damage: profile.damage,
    }
}
