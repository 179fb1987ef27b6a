//! AI events
//!
//! Outgoing: state transitions and configuration faults.
//! Incoming: respawn requests from the level collaborator.

use bevy::prelude::*;

use crate::ai::state::AgentState;

/// Event: an agent changed state (never emitted for re-entry).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AgentStateChanged {
    pub agent: Entity,
    pub from: AgentState,
    pub to: AgentState,
}

/// Request: rebuild a (usually dead) agent from its archetype.
#[derive(Event, Debug, Clone, Copy)]
pub struct RespawnAgent {
    pub agent: Entity,
}

/// Event: an agent could not be activated and was made `Inert`.
#[derive(Event, Debug, Clone)]
pub struct ConfigurationFault {
    pub agent: Entity,
    pub reason: String,
}
