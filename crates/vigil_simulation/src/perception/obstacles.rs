//! ObstacleField: built-in `SpatialQuery` for headless runs and tests.
//!
//! Two kinds of obstacles:
//! - statics: walls/structures registered once (`add_static`)
//! - bodies: entities with `ObstacleBody`, re-synced from `Transform` every tick
//!
//! Intersections use `bevy::math::bounding` volumes; hosts with a real physics
//! backend implement `SpatialQuery` on their own resource instead.

use bevy::math::bounding::{Aabb3d, BoundingSphere, IntersectsVolume, RayCast3d};
use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::components::Presentation;
use crate::perception::collision_layers::COLLISION_LAYER_ACTORS;
use crate::perception::spatial::{QueryVolume, RayHit, SpatialFilter, SpatialQuery};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub entity: Entity,
    pub volume: QueryVolume,
    pub layers: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleField {
    statics: Vec<Obstacle>,
    bodies: Vec<Obstacle>,
}

/// Dynamic obstacle attached to an entity; `volume` is relative to its translation.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ObstacleBody {
    pub volume: QueryVolume,
    pub layers: u32,
}

impl ObstacleBody {
    /// 0.8 x 1.8 x 0.8 box standing on the root, actors layer.
    pub fn humanoid() -> Self {
        Self {
            volume: QueryVolume::Box {
                center: Vec3::new(0.0, 0.9, 0.0),
                half_extents: Vec3::new(0.4, 0.9, 0.4),
            },
            layers: COLLISION_LAYER_ACTORS,
        }
    }
}

impl ObstacleField {
    pub fn add_static(&mut self, entity: Entity, volume: QueryVolume, layers: u32) {
        self.statics.push(Obstacle {
            entity,
            volume,
            layers,
        });
    }

    pub fn remove(&mut self, entity: Entity) {
        self.statics.retain(|o| o.entity != entity);
        self.bodies.retain(|o| o.entity != entity);
    }

    pub fn set_bodies(&mut self, bodies: impl IntoIterator<Item = Obstacle>) {
        self.bodies.clear();
        self.bodies.extend(bodies);
    }

    pub fn len(&self) -> usize {
        self.statics.len() + self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn candidates<'a>(&'a self, filter: &'a SpatialFilter) -> impl Iterator<Item = &'a Obstacle> + 'a {
        self.statics
            .iter()
            .chain(self.bodies.iter())
            .filter(move |o| filter.accepts(o.entity, o.layers))
    }
}

fn ray_time_of_impact(ray: &RayCast3d, volume: &QueryVolume) -> Option<f32> {
    match *volume {
        QueryVolume::Sphere { center, radius } => {
            ray.sphere_intersection_at(&BoundingSphere::new(center, radius))
        }
        QueryVolume::Box {
            center,
            half_extents,
        } => ray.aabb_intersection_at(&Aabb3d::new(center, half_extents)),
    }
}

fn volumes_intersect(a: &QueryVolume, b: &QueryVolume) -> bool {
    match (*a, *b) {
        (
            QueryVolume::Sphere { center, radius },
            QueryVolume::Sphere {
                center: other_center,
                radius: other_radius,
            },
        ) => BoundingSphere::new(center, radius)
            .intersects(&BoundingSphere::new(other_center, other_radius)),
        (
            QueryVolume::Sphere { center, radius },
            QueryVolume::Box {
                center: box_center,
                half_extents,
            },
        )
        | (
            QueryVolume::Box {
                center: box_center,
                half_extents,
            },
            QueryVolume::Sphere { center, radius },
        ) => BoundingSphere::new(center, radius).intersects(&Aabb3d::new(box_center, half_extents)),
        (
            QueryVolume::Box {
                center,
                half_extents,
            },
            QueryVolume::Box {
                center: other_center,
                half_extents: other_half_extents,
            },
        ) => Aabb3d::new(center, half_extents)
            .intersects(&Aabb3d::new(other_center, other_half_extents)),
    }
}

impl SpatialQuery for ObstacleField {
    fn raycast_first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &SpatialFilter,
    ) -> Option<RayHit> {
        if !(max_distance > 0.0) {
            return None;
        }
        let direction = Dir3::new(direction).ok()?;
        let ray = RayCast3d::from_ray(Ray3d { origin, direction }, max_distance);

        let mut nearest: Option<(Entity, f32)> = None;
        for obstacle in self.candidates(filter) {
            let Some(toi) = ray_time_of_impact(&ray, &obstacle.volume) else {
                continue;
            };
            // strict < keeps the first registered obstacle on ties
            if nearest.map_or(true, |(_, best)| toi < best) {
                nearest = Some((obstacle.entity, toi));
            }
        }

        nearest.map(|(entity, distance)| RayHit {
            entity,
            point: origin + direction.as_vec3() * distance,
            distance,
        })
    }

    fn overlaps(&self, volume: &QueryVolume, filter: &SpatialFilter) -> bool {
        self.candidates(filter)
            .any(|obstacle| volumes_intersect(volume, &obstacle.volume))
    }
}

/// System: rebuild body obstacles from transforms.
///
/// Non-collidable presentations (dead agents) stop blocking anything.
pub fn sync_obstacle_bodies(
    mut field: ResMut<ObstacleField>,
    bodies: Query<(Entity, &Transform, &ObstacleBody, Option<&Presentation>)>,
) {
    let synced = bodies
        .iter()
        .filter(|(_, _, _, presentation)| presentation.map_or(true, |p| p.collidable))
        .map(|(entity, transform, body, _)| Obstacle {
            entity,
            volume: body.volume.translated(transform.translation),
            layers: body.layers,
        });
    field.set_bodies(synced);
}
