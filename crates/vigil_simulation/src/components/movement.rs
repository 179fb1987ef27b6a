//! Movement intents: what the engine wants, not how the body gets there

use bevy::prelude::*;

/// Desired horizontal motion for one agent, written on the motion tick.
///
/// Architecture:
/// - AI systems write the intent (strategic layer)
/// - The locomotion collaborator integrates it (gravity, ground snapping,
///   collision response are its business)
/// - `HeadlessLocomotionPlugin` is the minimal integrator for headless runs
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Horizontal velocity (y is always 0)
    pub velocity: Vec3,
    /// Horizontal facing direction, `None` keeps the current orientation
    pub facing: Option<Vec3>,
}

impl MovementIntent {
    pub const IDLE: Self = Self {
        velocity: Vec3::ZERO,
        facing: None,
    };

    /// Move along `direction` (flattened) at `speed`, facing the same way.
    pub fn toward(direction: Vec3, speed: f32) -> Self {
        let flat = flatten(direction).normalize_or_zero();
        if flat == Vec3::ZERO {
            return Self::IDLE;
        }
        Self {
            velocity: flat * speed,
            facing: Some(flat),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.velocity == Vec3::ZERO
    }
}

/// Drop the vertical component.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance on the ground plane.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}
