//! Agent State Machine
//!
//! One archetype-parametrized controller for every enemy variant:
//! - `AgentRuntime`: per-agent state machine (pure, effect-recording)
//! - `Archetype` / `ArchetypeCatalog`: shared tuning + capabilities
//! - systems: Bevy glue on the decision and motion ticks

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod archetype;
pub mod events;
pub mod runtime;
pub mod scanner;
pub mod spawn;
pub mod state;
pub mod systems;


pub use archetype::{AgentConfig, Archetype, ArchetypeCatalog, Capabilities, CombatMode, DamageReaction, SweepConfig};
pub use events::{AgentStateChanged, ConfigurationFault, RespawnAgent};
pub use runtime::{AgentRuntime, DamageOutcome, Effect};
pub use scanner::ScannerSweep;
pub use spawn::{spawn_agent, AgentSpawn, AgentTarget, Inert};
pub use state::AgentState;

use crate::alert::AlertBroadcast;
use crate::perception::SpatialQuery;

/// Decision tick stages, in order (Update).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecisionSet {
    /// Activation, despawn cleanup, respawns
    Lifecycle,
    /// Timers, damage intake, perception
    React,
    /// Alert broadcasts + presentation
    Propagate,
}

/// Motion tick stages, in order (FixedUpdate).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MotionSet {
    /// Spatial provider refresh
    Sense,
    /// Intents, sweeps, attack attempts
    Intent,
    /// Locomotion collaborators integrate intents
    Integrate,
}

/// AI Plugin, generic over the spatial query provider `S`
///
/// `S` must be inserted as a resource by the host (see `SimulationPlugin`
/// for the headless `ObstacleField` setup).
pub struct AIPlugin<S> {
    _spatial: PhantomData<fn() -> S>,
}

impl<S> Default for AIPlugin<S> {
    fn default() -> Self {
        Self {
            _spatial: PhantomData,
        }
    }
}

impl<S: SpatialQuery + Resource> Plugin for AIPlugin<S> {
    fn build(&self, app: &mut App) {
        app.add_event::<AgentStateChanged>()
            .add_event::<RespawnAgent>()
            .add_event::<ConfigurationFault>()
            .add_event::<AlertBroadcast>();

        app.configure_sets(
            Update,
            (DecisionSet::Lifecycle, DecisionSet::React, DecisionSet::Propagate).chain(),
        )
        .configure_sets(
            FixedUpdate,
            (MotionSet::Sense, MotionSet::Intent, MotionSet::Integrate).chain(),
        );

        app.add_systems(
            Update,
            (
                (
                    systems::activate_new_agents,
                    systems::forget_despawned_agents,
                    systems::handle_respawns,
                )
                    .chain()
                    .in_set(DecisionSet::Lifecycle),
                (
                    systems::fire_timers,
                    systems::receive_damage,
                    systems::perceive::<S>,
                )
                    .chain()
                    .in_set(DecisionSet::React),
                (systems::flush_alert_broadcasts, systems::update_presentation)
                    .chain()
                    .in_set(DecisionSet::Propagate),
            ),
        );

        app.add_systems(
            FixedUpdate,
            (systems::drive_agents::<S>, scanner::sweep_scanners::<S>)
                .chain()
                .in_set(MotionSet::Intent),
        );
    }
}
