//! Patrol Follower: ordered waypoint loop
//!
//! Walk toward `path[index]` on the ground plane; inside `reach_distance`
//! dwell for `patrol_wait`, then `index = (index + 1) % len`.

use bevy::prelude::*;

use crate::components::{flatten, MovementIntent};

/// Read-only waypoint loop handed to an agent at spawn.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolPath {
    pub waypoints: Vec<Vec3>,
}

impl PatrolPath {
    pub fn new(waypoints: impl Into<Vec<Vec3>>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Per-agent cursor into the path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatrolCursor {
    index: usize,
    dwell: f32,
}

impl PatrolCursor {
    /// Always a valid index for a path of `len` (> 0) waypoints.
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.index % len
        }
    }
}

/// Patrol tuning pulled from `AgentConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolParams {
    pub patrol_speed: f32,
    pub reach_distance: f32,
    pub patrol_wait: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    Move(MovementIntent),
    /// At a waypoint, waiting
    Dwell,
    /// Nothing to follow: caller falls back to Normal
    EmptyPath,
}

impl PatrolStep {
    pub fn intent(&self) -> MovementIntent {
        match self {
            PatrolStep::Move(intent) => *intent,
            PatrolStep::Dwell | PatrolStep::EmptyPath => MovementIntent::IDLE,
        }
    }
}

pub fn advance(
    cursor: &mut PatrolCursor,
    position: Vec3,
    path: &[Vec3],
    params: &PatrolParams,
    dt: f32,
) -> PatrolStep {
    let len = path.len();
    let index = cursor.index(len);
    let Some(&waypoint) = path.get(index) else {
        return PatrolStep::EmptyPath;
    };

    let to_waypoint = flatten(waypoint - position);
    if to_waypoint.length() < params.reach_distance {
        cursor.dwell += dt;
        if cursor.dwell >= params.patrol_wait {
            cursor.dwell = 0.0;
            cursor.index = (index + 1) % len;
        }
        return PatrolStep::Dwell;
    }

    cursor.dwell = 0.0;
    PatrolStep::Move(MovementIntent::toward(to_waypoint, params.patrol_speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn params(wait: f32) -> PatrolParams {
        PatrolParams {
            patrol_speed: 3.0,
            reach_distance: 0.2,
            patrol_wait: wait,
        }
    }

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_moves_horizontally_at_patrol_speed() {
        let mut cursor = PatrolCursor::default();
        let step = advance(&mut cursor, Vec3::new(0.0, 5.0, 0.0), &square(), &params(1.0), DT);

        let PatrolStep::Move(intent) = step else {
            panic!("expected movement, got {:?}", step);
        };
        assert_eq!(intent.velocity.y, 0.0);
        assert_relative_eq!(intent.velocity.length(), 3.0, epsilon = 1e-5);
        assert!(intent.velocity.z < 0.0);
        assert_eq!(cursor.index(3), 0);
    }

    #[test]
    fn test_dwells_then_advances() {
        let mut cursor = PatrolCursor::default();
        let at_first = Vec3::new(0.0, 0.0, -3.9);

        // 0.5s dwell at 60Hz
        for _ in 0..29 {
            assert_eq!(advance(&mut cursor, at_first, &square(), &params(0.5), DT), PatrolStep::Dwell);
            assert_eq!(cursor.index(3), 0);
        }
        for _ in 0..2 {
            advance(&mut cursor, at_first, &square(), &params(0.5), DT);
        }
        assert_eq!(cursor.index(3), 1);

        // now heading to (4, 0, -4): +x
        let step = advance(&mut cursor, at_first, &square(), &params(0.5), DT);
        assert!(step.intent().velocity.x > 0.0);
    }

    #[test]
    fn test_index_wraps() {
        let mut cursor = PatrolCursor::default();
        let path = square();
        for (i, &waypoint) in path.iter().enumerate() {
            assert_eq!(cursor.index(path.len()), i);
            advance(&mut cursor, waypoint, &path, &params(0.0), DT);
        }
        assert_eq!(cursor.index(path.len()), 0);
    }

    #[test]
    fn test_empty_path() {
        let mut cursor = PatrolCursor::default();
        let step = advance(&mut cursor, Vec3::ZERO, &[], &params(1.0), DT);
        assert_eq!(step, PatrolStep::EmptyPath);
        assert!(step.intent().is_idle());
    }

    #[test]
    fn test_cursor_survives_shorter_path() {
        let mut cursor = PatrolCursor::default();
        let path = square();
        advance(&mut cursor, path[0], &path, &params(0.0), DT);
        advance(&mut cursor, path[1], &path, &params(0.0), DT);
        // index 2, path shrinks to one waypoint
        assert_eq!(cursor.index(1), 0);
        let step = advance(&mut cursor, Vec3::new(0.0, 0.0, 5.0), &path[..1], &params(0.0), DT);
        assert!(matches!(step, PatrolStep::Move(_)));
    }
}
