//! Perception: vision cone + obstruction test
//!
//! Three gates, cheapest first: range → angle → occlusion.
//! Pure function of (eye, forward, target, params, obstacle set).

use bevy::prelude::*;

pub mod collision_layers;
pub mod obstacles;
pub mod spatial;

#[cfg(test)]
mod perception_tests;

pub use obstacles::{sync_obstacle_bodies, Obstacle, ObstacleBody, ObstacleField};
pub use spatial::{QueryVolume, RayHit, SpatialFilter, SpatialQuery};

/// Where an observer looks from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub eye: Vec3,
    pub forward: Vec3,
    /// Excluded from occlusion rays (the eye sits inside the observer's body)
    pub observer: Option<Entity>,
}

impl Viewpoint {
    pub fn from_transform(transform: &Transform, eye_height: f32, observer: Entity) -> Self {
        Self {
            eye: transform.translation + Vec3::Y * eye_height,
            forward: transform.forward().as_vec3(),
            observer: Some(observer),
        }
    }
}

/// Vision cone parameters (AgentConfig view fields + engine torso height).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionParams {
    pub view_distance: f32,
    /// Half-angle, degrees (60 => 120° total)
    pub view_angle: f32,
    pub obstruction_mask: u32,
    pub torso_height: f32,
}

impl VisionParams {
    pub fn aim_point(&self, target_root: Vec3) -> Vec3 {
        target_root + Vec3::Y * self.torso_height
    }

    fn filter(&self, view: &Viewpoint) -> SpatialFilter {
        let filter = SpatialFilter::new(self.obstruction_mask);
        match view.observer {
            Some(observer) => filter.excluding(observer),
            None => filter,
        }
    }
}

/// Angle on the horizontal plane, degrees.
///
/// Degenerate (vertical) vectors count as 0° so a target straight overhead
/// is never rejected by the cone.
pub fn horizontal_angle_deg(a: Vec3, b: Vec3) -> f32 {
    let a = Vec3::new(a.x, 0.0, a.z);
    let b = Vec3::new(b.x, 0.0, b.z);
    if a.length_squared() < 1e-10 || b.length_squared() < 1e-10 {
        return 0.0;
    }
    a.angle_between(b).to_degrees()
}

/// Is `target` (root position `target_root`) visible from `view`?
pub fn can_see<S: SpatialQuery + ?Sized>(
    view: &Viewpoint,
    target_root: Vec3,
    target: Entity,
    params: &VisionParams,
    spatial: &S,
) -> bool {
    let to_target = params.aim_point(target_root) - view.eye;
    let distance = to_target.length();

    // 1. range
    if distance > params.view_distance {
        return false;
    }

    // 2. angle (horizontal plane only)
    if horizontal_angle_deg(view.forward, to_target) > params.view_angle {
        return false;
    }

    // 3. occlusion
    !is_occluded(view, to_target, distance, params.view_distance, target, params, spatial)
}

/// Unobstructed line of fire from the eye to the target's aim point.
///
/// Ranged attacks re-check this right before firing, independently of the
/// cone, so a target that broke line of sight since detection is never hit.
pub fn has_line_of_fire<S: SpatialQuery + ?Sized>(
    view: &Viewpoint,
    target_root: Vec3,
    target: Entity,
    params: &VisionParams,
    spatial: &S,
) -> bool {
    let to_target = params.aim_point(target_root) - view.eye;
    let distance = to_target.length();
    !is_occluded(view, to_target, distance, distance, target, params, spatial)
}

fn is_occluded<S: SpatialQuery + ?Sized>(
    view: &Viewpoint,
    to_target: Vec3,
    target_distance: f32,
    ray_length: f32,
    target: Entity,
    params: &VisionParams,
    spatial: &S,
) -> bool {
    match spatial.raycast_first_hit(view.eye, to_target, ray_length, &params.filter(view)) {
        // Geometry behind the target is not between eye and target.
        Some(hit) => hit.entity != target && hit.distance <= target_distance,
        None => false,
    }
}
