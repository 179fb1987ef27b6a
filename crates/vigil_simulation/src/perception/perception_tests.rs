//! Tests for the vision cone.

use approx::assert_relative_eq;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::collision_layers::*;
use super::*;

struct Scene {
    field: ObstacleField,
    observer: Entity,
    target: Entity,
    wall: Entity,
}

fn scene() -> Scene {
    let mut world = World::new();
    Scene {
        field: ObstacleField::default(),
        observer: world.spawn_empty().id(),
        target: world.spawn_empty().id(),
        wall: world.spawn_empty().id(),
    }
}

/// Soldier defaults: 8m range, 60° half-angle, eye at 1.7m
fn soldier_params() -> VisionParams {
    VisionParams {
        view_distance: 8.0,
        view_angle: 60.0,
        obstruction_mask: OBSTRUCTION_MASK_DEFAULT,
        torso_height: 1.0,
    }
}

fn observer_at_origin(facing: Vec3, observer: Entity) -> Viewpoint {
    let transform = Transform::from_translation(Vec3::ZERO).looking_to(facing, Vec3::Y);
    Viewpoint::from_transform(&transform, 1.7, observer)
}

#[test]
fn test_target_ahead_in_range_is_visible() {
    let s = scene();
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_range_gate() {
    let s = scene();
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(!can_see(&view, Vec3::new(0.0, 0.0, -9.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_angle_gate() {
    let s = scene();
    // rotated 90°: target on the flank
    let view = observer_at_origin(Vec3::X, s.observer);
    assert!(!can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_occlusion_gate() {
    let mut s = scene();
    s.field.add_static(
        s.wall,
        QueryVolume::Box {
            center: Vec3::new(0.0, 1.5, -2.5),
            half_extents: Vec3::new(2.0, 2.0, 0.2),
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(!can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_obstacle_outside_mask_does_not_occlude() {
    let mut s = scene();
    s.field.add_static(
        s.wall,
        QueryVolume::Box {
            center: Vec3::new(0.0, 1.5, -2.5),
            half_extents: Vec3::new(2.0, 2.0, 0.2),
        },
        COLLISION_LAYER_ACTORS,
    );
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_hitting_the_target_itself_counts_as_visible() {
    let mut s = scene();
    s.field.add_static(
        s.target,
        QueryVolume::Sphere {
            center: Vec3::new(0.0, 1.0, -5.0),
            radius: 0.5,
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_wall_behind_target_does_not_occlude() {
    let mut s = scene();
    s.field.add_static(
        s.wall,
        QueryVolume::Box {
            center: Vec3::new(0.0, 1.5, -7.0),
            half_extents: Vec3::new(3.0, 3.0, 0.2),
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_observer_body_never_occludes() {
    let mut s = scene();
    s.field.add_static(
        s.observer,
        QueryVolume::Sphere {
            center: Vec3::new(0.0, 1.0, 0.0),
            radius: 1.0,
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    assert!(can_see(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_vertical_offset_does_not_defeat_cone() {
    let s = scene();
    let view = observer_at_origin(Vec3::NEG_Z, s.observer);
    // Target on a ledge 4m up, 3m ahead: steep in 3D, straight ahead on the ground plane
    assert!(can_see(&view, Vec3::new(0.0, 4.0, -3.0), s.target, &soldier_params(), &s.field));
}

#[test]
fn test_horizontal_angle_degenerate_is_zero() {
    assert_eq!(horizontal_angle_deg(Vec3::NEG_Z, Vec3::Y), 0.0);
    assert_relative_eq!(horizontal_angle_deg(Vec3::NEG_Z, Vec3::X), 90.0, epsilon = 1e-3);
}

#[test]
fn test_line_of_fire_ignores_cone() {
    let mut s = scene();
    let params = soldier_params();
    // facing away, but nothing in between
    let view = observer_at_origin(Vec3::Z, s.observer);
    assert!(has_line_of_fire(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &params, &s.field));

    s.field.add_static(
        s.wall,
        QueryVolume::Box {
            center: Vec3::new(0.0, 1.5, -2.5),
            half_extents: Vec3::new(2.0, 2.0, 0.2),
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    assert!(!has_line_of_fire(&view, Vec3::new(0.0, 0.0, -5.0), s.target, &params, &s.field));
}

#[test]
fn test_perception_is_pure() {
    let mut s = scene();
    s.field.add_static(
        s.wall,
        QueryVolume::Box {
            center: Vec3::new(1.0, 1.0, -3.0),
            half_extents: Vec3::new(0.5, 2.0, 0.5),
        },
        COLLISION_LAYER_ENVIRONMENT,
    );
    let params = soldier_params();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let facing = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
        let target = Vec3::new(rng.gen_range(-10.0..10.0), rng.gen_range(-1.0..2.0), rng.gen_range(-10.0..10.0));
        let view = observer_at_origin(facing, s.observer);

        let first = can_see(&view, target, s.target, &params, &s.field);
        let second = can_see(&view, target, s.target, &params, &s.field);
        assert_eq!(first, second, "facing {:?}, target {:?}", facing, target);
    }
}
