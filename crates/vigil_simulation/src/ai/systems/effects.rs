//! Applies the effects recorded by `AgentRuntime` methods.
//!
//! Every system that calls into the state machine drains its effects through
//! `EffectWriter::apply` right after the call, so timers, registry membership
//! and events stay in step with the runtime.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ai::events::AgentStateChanged;
use crate::ai::runtime::{AgentRuntime, Effect};
use crate::alert::{AlertRegistry, PendingAlerts};
use crate::timers::{FiredTimer, TimerScheduler};

#[derive(SystemParam)]
pub struct EffectWriter<'w> {
    scheduler: ResMut<'w, TimerScheduler>,
    pending_alerts: ResMut<'w, PendingAlerts>,
    state_changed: EventWriter<'w, AgentStateChanged>,
}

impl EffectWriter<'_> {
    /// The registry is passed in (not held) so broadcasts can lend theirs.
    pub fn apply(&mut self, agent: Entity, runtime: &mut AgentRuntime, registry: &mut AlertRegistry) {
        for effect in runtime.drain_effects() {
            match effect {
                Effect::StateChanged { from, to } => {
                    crate::logger::log(&format!("AI: {:?} {} → {}", agent, from, to));
                    self.state_changed.write(AgentStateChanged { agent, from, to });
                }
                Effect::ScheduleTimer { action, delay } => {
                    self.scheduler.schedule(agent, delay, action);
                }
                Effect::CancelTimers => {
                    self.scheduler.cancel_all(agent);
                }
                Effect::BroadcastAlert => {
                    self.pending_alerts.request(agent);
                }
                Effect::Register => {
                    registry.register(agent);
                }
                Effect::Unregister => {
                    registry.unregister(agent);
                }
            }
        }
    }

    /// Decision clock → due timers.
    pub fn advance_timers(&mut self, now: f64) -> Vec<FiredTimer> {
        self.scheduler.advance_to(now)
    }

    pub fn cancel_timers(&mut self, agent: Entity) -> usize {
        self.scheduler.cancel_all(agent)
    }

    pub fn take_alert_requests(&mut self) -> Vec<Entity> {
        self.pending_alerts.take()
    }
}
