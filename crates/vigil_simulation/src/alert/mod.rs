//! Alert Registry: squad-wide "go alert" broadcast
//!
//! Explicit resource instead of a process-wide static list:
//! - agents are registered at spawn/respawn, unregistered at death/despawn
//! - `broadcast_alert` visits a snapshot of the members in registration order,
//!   so handlers may register/unregister (themselves included) mid-broadcast
//!
//! Broadcasts requested during a tick (`PendingAlerts`) are flushed by
//! `ai::systems::broadcast::flush_alert_broadcasts` in the same decision tick.

use bevy::prelude::*;


#[derive(Resource, Debug, Clone, Default)]
pub struct AlertRegistry {
    members: Vec<Entity>,
}

impl AlertRegistry {
    /// Returns false if already registered (no-op).
    pub fn register(&mut self, agent: Entity) -> bool {
        if self.members.contains(&agent) {
            return false;
        }
        self.members.push(agent);
        true
    }

    /// Returns false if the agent was not registered (no-op).
    pub fn unregister(&mut self, agent: Entity) -> bool {
        let before = self.members.len();
        self.members.retain(|&member| member != agent);
        self.members.len() != before
    }

    pub fn contains(&self, agent: Entity) -> bool {
        self.members.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    /// Invoke `force_alert` on every agent registered at call time.
    ///
    /// Synchronous and total: when this returns, every member of the snapshot
    /// has been visited exactly once. Agents registered by a handler are not
    /// visited by this broadcast. Returns the number of visits.
    pub fn broadcast_alert(&mut self, mut force_alert: impl FnMut(Entity, &mut AlertRegistry)) -> usize {
        let snapshot = self.members.clone();
        for &agent in &snapshot {
            force_alert(agent, self);
        }
        snapshot.len()
    }
}

/// Broadcast requests raised during the current tick (first detection,
/// scanner sighting, delayed alert after an unanswered hit). Collaborators
/// may push requests too.
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingAlerts {
    sources: Vec<Entity>,
}

impl PendingAlerts {
    pub fn request(&mut self, source: Entity) {
        self.sources.push(source);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Drain the queue in request order.
    pub fn take(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.sources)
    }
}

/// Event: a broadcast went out.
#[derive(Event, Debug, Clone)]
pub struct AlertBroadcast {
    pub source: Entity,
    /// Registered agents visited
    pub reached: usize,
}
