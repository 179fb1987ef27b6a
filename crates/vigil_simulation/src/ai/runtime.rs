//! AgentRuntime: the per-agent state machine
//!
//! Plain data + methods, no ECS access. Every method that needs the outside
//! world (timers, alert registry, events) records an `Effect`; the calling
//! system drains and applies them in order (`ai::systems::effects`).
//!
//! ```text
//! Patrol/Normal ──see──▶ Chase            (single-stage)
//! Patrol/Normal ──see──▶ Alert ─timer─▶ Chase   (two-stage)
//! Patrol/Normal ──forced alert──▶ Alert (Chase without an Alert state)
//! any alive ──hit──▶ Damage ─timer─▶ Alert | Chase | initial state
//! any alive ──lethal hit──▶ Dead ──respawn──▶ initial state
//! ```

use std::sync::Arc;

use bevy::prelude::*;

use crate::ai::archetype::Archetype;
use crate::ai::state::AgentState;
use crate::combat::AttackCooldown;
use crate::patrol::PatrolCursor;
use crate::timers::TimerAction;

/// Side effect requested by the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    StateChanged { from: AgentState, to: AgentState },
    ScheduleTimer { action: TimerAction, delay: f64 },
    /// Drop every pending timer of this agent
    CancelTimers,
    BroadcastAlert,
    Register,
    Unregister,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Dead target or non-positive amount
    Ignored,
    Wounded { dealt: f32 },
    Killed { dealt: f32 },
}

impl DamageOutcome {
    pub fn dealt(&self) -> f32 {
        match self {
            DamageOutcome::Ignored => 0.0,
            DamageOutcome::Wounded { dealt } | DamageOutcome::Killed { dealt } => *dealt,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct AgentRuntime {
    archetype: Arc<Archetype>,
    state: AgentState,
    health: f32,
    /// Sticky while alive
    has_detected_target: bool,
    /// Monotonic while alive
    globally_alerted: bool,
    /// Scanner: target seen on the previous decision tick
    sighted: bool,
    pub patrol: PatrolCursor,
    pub cooldown: AttackCooldown,
    effects: Vec<Effect>,
}

impl AgentRuntime {
    pub fn new(archetype: Arc<Archetype>) -> Self {
        Self {
            health: archetype.config.max_health,
            state: archetype.capabilities.initial_state,
            archetype,
            has_detected_target: false,
            globally_alerted: false,
            sighted: false,
            patrol: PatrolCursor::default(),
            cooldown: AttackCooldown::default(),
            effects: Vec::new(),
        }
    }

    pub fn archetype(&self) -> &Arc<Archetype> {
        &self.archetype
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub fn has_detected_target(&self) -> bool {
        self.has_detected_target
    }

    pub fn globally_alerted(&self) -> bool {
        self.globally_alerted
    }

    /// Take the effects recorded since the last drain, in order.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Transition; re-entering the current state has no side effects.
    pub fn set_state(&mut self, to: AgentState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.effects.push(Effect::StateChanged { from, to });

        if to == AgentState::Alert {
            if let Some(delay) = self.archetype.capabilities.alert_to_chase_delay {
                self.effects.push(Effect::ScheduleTimer {
                    action: TimerAction::AlertToChase,
                    delay,
                });
            }
        }
    }

    /// Perception result for this decision tick.
    pub fn observe(&mut self, sees_target: bool) {
        if matches!(self.state, AgentState::Dead | AgentState::Damage) {
            return;
        }

        if self.archetype.is_scanner() {
            // edge-triggered
            if sees_target && !self.sighted {
                self.has_detected_target = true;
                self.effects.push(Effect::BroadcastAlert);
            }
            self.sighted = sees_target;
            return;
        }

        if !sees_target {
            return;
        }

        if !self.has_detected_target {
            self.has_detected_target = true;
            if self.archetype.capabilities.broadcast_on_detection {
                self.effects.push(Effect::BroadcastAlert);
            }
        }

        let two_stage = self.archetype.is_two_stage();
        match self.state {
            AgentState::Patrol | AgentState::Normal if two_stage => self.set_state(AgentState::Alert),
            AgentState::Patrol | AgentState::Normal => self.set_state(AgentState::Chase),
            AgentState::Alert if !two_stage => self.set_state(AgentState::Chase),
            _ => {}
        }
    }

    /// Alert registry entry point. No-op on Dead.
    pub fn force_alert(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.globally_alerted = true;
        self.has_detected_target = true;

        let caps = &self.archetype.capabilities;
        if !caps.mobile || !self.state.is_idle() {
            return;
        }
        let to = if caps.alert_state {
            AgentState::Alert
        } else {
            AgentState::Chase
        };
        self.set_state(to);
    }

    /// Damage entry point.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        // also rejects NaN
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        let dealt = before - self.health;

        if self.health <= 0.0 {
            self.health = 0.0;
            self.effects.push(Effect::CancelTimers);
            self.set_state(AgentState::Dead);
            if self.archetype.capabilities.alertable {
                self.effects.push(Effect::Unregister);
            }
            return DamageOutcome::Killed { dealt };
        }

        if let Some(reaction) = self.archetype.capabilities.damage_reaction {
            // at most one pending return: a new hit restarts the recovery
            self.effects.push(Effect::CancelTimers);
            self.set_state(AgentState::Damage);
            self.effects.push(Effect::ScheduleTimer {
                action: TimerAction::ReturnFromDamage,
                delay: reaction.recovery_delay,
            });
            if let Some(delay) = reaction.delayed_alert {
                if !self.has_detected_target {
                    self.effects.push(Effect::ScheduleTimer {
                        action: TimerAction::DelayedGlobalAlert,
                        delay,
                    });
                }
            }
        }

        DamageOutcome::Wounded { dealt }
    }

    /// A timer of this agent fired. Destinations come from the flags as they
    /// are now.
    pub fn on_timer(&mut self, action: TimerAction) {
        if !self.is_alive() {
            return;
        }

        match action {
            TimerAction::ReturnFromDamage => {
                if self.state != AgentState::Damage {
                    return;
                }
                let caps = &self.archetype.capabilities;
                let to = if self.globally_alerted {
                    if caps.alert_state {
                        AgentState::Alert
                    } else {
                        AgentState::Chase
                    }
                } else if self.has_detected_target {
                    AgentState::Chase
                } else {
                    caps.initial_state
                };
                self.set_state(to);
            }
            TimerAction::AlertToChase => {
                if self.state == AgentState::Alert {
                    self.set_state(AgentState::Chase);
                }
            }
            TimerAction::DelayedGlobalAlert => {
                self.force_alert();
                self.effects.push(Effect::BroadcastAlert);
            }
        }
    }

    /// Path ran out (or was never given) while patrolling.
    pub fn fall_back_to_normal(&mut self) {
        if self.state == AgentState::Patrol {
            self.set_state(AgentState::Normal);
        }
    }

    /// External respawn: rebuild the runtime from the archetype.
    pub fn respawn(&mut self) {
        let from = self.state;
        let mut fresh = Self::new(self.archetype.clone());
        fresh.effects = std::mem::take(&mut self.effects);
        *self = fresh;

        self.effects.push(Effect::CancelTimers);
        if from != self.state {
            self.effects.push(Effect::StateChanged { from, to: self.state });
        }
        if self.archetype.capabilities.alertable {
            self.effects.push(Effect::Register);
        }
    }
}
