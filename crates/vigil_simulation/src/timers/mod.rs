//! Timer/Scheduler: deferred, cancellable, single-shot agent timers
//!
//! Replaces "stop all coroutines, then start a new one":
//! - `schedule(owner, delay, action)` arms a timer on the decision clock
//! - `cancel_all(owner)` drops every pending timer of that agent
//! - `advance_to(now)` pops due timers (deadline order, then scheduling order)
//!
//! The clock is f64 seconds so long sessions keep sub-millisecond deadlines.
//!
//! Payloads are plain data (`TimerAction`). What a fired timer *does* is
//! decided by the agent at fire time from its current flags, never captured
//! up front.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What to re-evaluate when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TimerAction {
    /// Leave Damage; destination resolved from flags at fire time
    ReturnFromDamage,
    /// Two-stage reaction: Alert → Chase
    AlertToChase,
    /// "Not killed within N seconds after a hit → alert everyone"
    DelayedGlobalAlert,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub owner: Entity,
    pub action: TimerAction,
    pub deadline: f64,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    owner: Entity,
    action: TimerAction,
    deadline: f64,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TimerScheduler {
    now: f64,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl TimerScheduler {
    /// Clock value of the last `advance_to`.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fires at or after `now + delay`; negative delays clamp to zero.
    pub fn schedule(&mut self, owner: Entity, delay: f64, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingTimer {
            handle,
            owner,
            action,
            deadline: self.now + delay.max(0.0),
        });
        handle
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Returns the number of timers dropped.
    pub fn cancel_all(&mut self, owner: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.owner != owner);
        before - self.pending.len()
    }

    pub fn pending_for(&self, owner: Entity) -> usize {
        self.pending.iter().filter(|t| t.owner == owner).count()
    }

    pub fn has_pending(&self, owner: Entity, action: TimerAction) -> bool {
        self.pending
            .iter()
            .any(|t| t.owner == owner && t.action == action)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and pop every due timer (edge-triggered: each
    /// timer is returned at most once). The clock never goes backwards.
    pub fn advance_to(&mut self, now: f64) -> Vec<FiredTimer> {
        self.now = self.now.max(now);
        let clock = self.now;

        let mut fired: Vec<FiredTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.deadline <= clock {
                fired.push(FiredTimer {
                    handle: t.handle,
                    owner: t.owner,
                    action: t.action,
                    deadline: t.deadline,
                });
                false
            } else {
                true
            }
        });

        fired.sort_by(|a, b| {
            a.deadline
                .total_cmp(&b.deadline)
                .then(a.handle.cmp(&b.handle))
        });
        fired
    }
}
