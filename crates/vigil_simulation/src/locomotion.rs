//! Headless locomotion: MovementIntent → Transform
//!
//! Minimal stand-in for a character controller. Gravity, ground snapping and
//! sliding along walls are out of scope: a step that would overlap blocking
//! geometry is simply not taken.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::ai::MotionSet;
use crate::components::MovementIntent;
use crate::perception::collision_layers::MOVEMENT_BLOCKING_MASK;
use crate::perception::{ObstacleBody, SpatialFilter, SpatialQuery};

/// System: position += velocity * dt, then face the intent direction.
pub fn integrate_movement_intents<S: SpatialQuery + Resource>(
    time: Res<Time>,
    spatial: Res<S>,
    mut bodies: Query<(Entity, &mut Transform, &MovementIntent, Option<&ObstacleBody>)>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, intent, body) in bodies.iter_mut() {
        if let Some(facing) = intent.facing {
            let target = transform.translation + facing;
            transform.look_at(target, Vec3::Y);
        }

        if intent.is_idle() {
            continue;
        }

        let next = transform.translation + intent.velocity * delta;
        if let Some(body) = body {
            let filter = SpatialFilter::new(MOVEMENT_BLOCKING_MASK).excluding(entity);
            if spatial.overlaps(&body.volume.translated(next), &filter) {
                continue;
            }
        }
        transform.translation = next;
    }
}

/// Plugin: headless locomotion on the motion tick
pub struct HeadlessLocomotionPlugin<S> {
    _spatial: PhantomData<fn() -> S>,
}

impl<S> Default for HeadlessLocomotionPlugin<S> {
    fn default() -> Self {
        Self {
            _spatial: PhantomData,
        }
    }
}

impl<S: SpatialQuery + Resource> Plugin for HeadlessLocomotionPlugin<S> {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            integrate_movement_intents::<S>.in_set(MotionSet::Integrate),
        );
    }
}
