//! Agent spawning: one call wires every component an agent needs.

use std::sync::Arc;

use bevy::prelude::*;

use crate::ai::archetype::Archetype;
use crate::ai::runtime::AgentRuntime;
use crate::ai::scanner::ScannerSweep;
use crate::components::{MovementIntent, Presentation};
use crate::patrol::PatrolPath;
use crate::perception::ObstacleBody;

/// The entity an agent perceives and attacks, injected at spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTarget(pub Entity);

/// Marker: misconfigured agent, skipped by perception and motion.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Inert;

/// Where and how to place a new agent.
#[derive(Debug, Clone)]
pub struct AgentSpawn {
    pub position: Vec3,
    /// Initial horizontal facing
    pub facing: Vec3,
    pub target: Option<Entity>,
    pub patrol: Vec<Vec3>,
    /// `None` = no body in the obstacle field
    pub body: Option<ObstacleBody>,
}

impl Default for AgentSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Vec3::NEG_Z,
            target: None,
            patrol: Vec::new(),
            body: Some(ObstacleBody::humanoid()),
        }
    }
}

impl AgentSpawn {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = facing;
        self
    }

    pub fn targeting(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn patrolling(mut self, waypoints: impl Into<Vec<Vec3>>) -> Self {
        self.patrol = waypoints.into();
        self
    }

    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }
}

/// Spawn a fully wired agent.
///
/// Validation happens on activation (`lifecycle::activate_new_agents`): an
/// invalid archetype or a missing target leaves the entity `Inert`.
pub fn spawn_agent(commands: &mut Commands, archetype: Arc<Archetype>, spawn: AgentSpawn) -> Entity {
    let initial = archetype.capabilities.initial_state;
    let scanner = archetype.is_scanner();

    let mut entity = commands.spawn((
        Name::new(archetype.name.clone()),
        Transform::from_translation(spawn.position).looking_to(spawn.facing, Vec3::Y),
        MovementIntent::IDLE,
        Presentation::with_label(initial.label()),
        PatrolPath::new(spawn.patrol),
        AgentRuntime::new(archetype),
    ));

    if let Some(target) = spawn.target {
        entity.insert(AgentTarget(target));
    }
    if let Some(body) = spawn.body {
        entity.insert(body);
    }
    if scanner {
        entity.insert(ScannerSweep::default());
    }

    entity.id()
}
