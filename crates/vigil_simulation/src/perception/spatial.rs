//! Spatial query capability consumed by perception, combat and locomotion.
//!
//! The engine never talks to a physics backend directly. Hosts provide an
//! implementation as a Bevy resource (`ObstacleField` is the built-in one).

use bevy::prelude::*;

/// Which obstacles a query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialFilter {
    /// Layer bits (see `collision_layers`)
    pub mask: u32,
    /// Usually the querying agent itself (the eye sits inside its body)
    pub exclude: Option<Entity>,
}

impl SpatialFilter {
    pub fn new(mask: u32) -> Self {
        Self { mask, exclude: None }
    }

    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    pub fn accepts(&self, entity: Entity, layers: u32) -> bool {
        layers & self.mask != 0 && self.exclude != Some(entity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Query volume for overlap tests.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum QueryVolume {
    Sphere { center: Vec3, radius: f32 },
    Box { center: Vec3, half_extents: Vec3 },
}

impl QueryVolume {
    pub fn translated(self, offset: Vec3) -> Self {
        match self {
            QueryVolume::Sphere { center, radius } => QueryVolume::Sphere {
                center: center + offset,
                radius,
            },
            QueryVolume::Box {
                center,
                half_extents,
            } => QueryVolume::Box {
                center: center + offset,
                half_extents,
            },
        }
    }
}

pub trait SpatialQuery {
    /// First obstacle hit along `direction` (need not be normalized) within
    /// `max_distance`. Zero directions never hit.
    fn raycast_first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &SpatialFilter,
    ) -> Option<RayHit>;

    fn overlaps(&self, volume: &QueryVolume, filter: &SpatialFilter) -> bool;
}
