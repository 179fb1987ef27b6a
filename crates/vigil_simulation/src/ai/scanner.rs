//! Stationary scanner (surveillance camera) sweep.
//!
//! The pivot yaws at `sweep_speed` deg/s. A forward ray of `bounce_distance`
//! that starts touching obstruction geometry reverses the sweep; the reversal
//! is edge-triggered so the scanner turns away instead of jittering against
//! the wall.

use bevy::prelude::*;

use crate::ai::archetype::SweepConfig;
use crate::ai::runtime::AgentRuntime;
use crate::ai::spawn::Inert;
use crate::components::flatten;
use crate::perception::{SpatialFilter, SpatialQuery};

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ScannerSweep {
    /// +1 or -1
    pub direction: f32,
    /// Bounce ray was touching on the previous tick
    pub blocked: bool,
}

impl Default for ScannerSweep {
    fn default() -> Self {
        Self {
            direction: 1.0,
            blocked: false,
        }
    }
}

impl ScannerSweep {
    /// Update the sweep direction and return this tick's yaw delta (radians).
    pub fn step<S: SpatialQuery + ?Sized>(
        &mut self,
        eye: Vec3,
        forward: Vec3,
        config: &SweepConfig,
        filter: &SpatialFilter,
        dt: f32,
        spatial: &S,
    ) -> f32 {
        let touching = spatial
            .raycast_first_hit(eye, flatten(forward), config.bounce_distance, filter)
            .is_some();
        if touching && !self.blocked {
            self.direction = -self.direction;
        }
        self.blocked = touching;

        self.direction * config.sweep_speed.to_radians() * dt
    }
}

/// System: rotate every live scanner (motion tick).
pub fn sweep_scanners<S: SpatialQuery + Resource>(
    time: Res<Time>,
    spatial: Res<S>,
    mut scanners: Query<(Entity, &AgentRuntime, &mut Transform, &mut ScannerSweep), Without<Inert>>,
) {
    let dt = time.delta_secs();

    for (entity, runtime, mut transform, mut sweep) in scanners.iter_mut() {
        if !runtime.is_alive() {
            continue;
        }
        let archetype = runtime.archetype();
        let Some(config) = archetype.capabilities.sweep else {
            continue;
        };

        let eye = transform.translation + Vec3::Y * archetype.config.eye_height;
        let filter = SpatialFilter::new(archetype.config.obstruction_mask).excluding(entity);
        let yaw = sweep.step(eye, transform.forward().as_vec3(), &config, &filter, dt, &*spatial);
        transform.rotate_y(yaw);
    }
}
