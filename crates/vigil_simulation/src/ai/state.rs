//! Agent states.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Walking the waypoint loop
    Patrol,
    /// Standing by (no path, or stationary archetype)
    Normal,
    /// Squad-wide alert; moves on the target
    Alert,
    Chase,
    /// Short hit reaction, left through a `ReturnFromDamage` timer
    Damage,
    /// Terminal until respawn
    Dead,
}

impl AgentState {
    /// Lowercase name shown by the presentation sink.
    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Patrol => "patrol",
            AgentState::Normal => "normal",
            AgentState::Alert => "alert",
            AgentState::Chase => "chase",
            AgentState::Damage => "damage",
            AgentState::Dead => "dead",
        }
    }

    pub fn is_alive(&self) -> bool {
        *self != AgentState::Dead
    }

    /// States that move on the target and attempt attacks.
    pub fn is_engaging(&self) -> bool {
        matches!(self, AgentState::Alert | AgentState::Chase)
    }

    /// States a detection or forced alert can pull the agent out of.
    pub fn is_idle(&self) -> bool {
        matches!(self, AgentState::Patrol | AgentState::Normal)
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
