//! AI reaction systems (damage intake, respawn).

use bevy::prelude::*;

use crate::ai::events::RespawnAgent;
use crate::ai::runtime::{AgentRuntime, DamageOutcome};
use crate::ai::spawn::Inert;
use crate::ai::systems::effects::EffectWriter;
use crate::alert::AlertRegistry;
use crate::combat::{ApplyDamage, DamageDealt, EntityDied};
use crate::components::{DamageSink, Health};

/// System: route `ApplyDamage` requests into their sinks
///
/// - agents → `AgentRuntime::apply_damage` (state machine reaction)
/// - anything else with `Health` (player, props) → plain health deduction
/// - inert agents → dropped
///
/// Emits DamageDealt for every hit that removed health and EntityDied on the
/// killing blow.
pub fn receive_damage(
    mut requests: EventReader<ApplyDamage>,
    mut agents: Query<&mut AgentRuntime, Without<Inert>>,
    mut others: Query<&mut Health, Without<AgentRuntime>>,
    inert: Query<(), With<Inert>>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let (dealt, died) = if let Ok(mut runtime) = agents.get_mut(request.target) {
            let outcome = runtime.apply_damage(request.amount);
            effects.apply(request.target, &mut runtime, &mut registry);
            match outcome {
                DamageOutcome::Ignored => continue,
                DamageOutcome::Wounded { dealt } => (dealt, false),
                DamageOutcome::Killed { dealt } => (dealt, true),
            }
        } else if inert.contains(request.target) {
            crate::logger::log(&format!("ApplyDamage: {:?} is inert, ignored", request.target));
            continue;
        } else if let Ok(mut health) = others.get_mut(request.target) {
            if !health.is_alive() {
                continue;
            }
            let before = health.current;
            let left = health.apply_damage(request.amount);
            (before - left, left <= 0.0)
        } else {
            crate::logger::log_warning(&format!(
                "ApplyDamage: target {:?} has no damage sink",
                request.target
            ));
            continue;
        };

        if dealt <= 0.0 {
            continue;
        }

        dealt_events.write(DamageDealt {
            attacker: request.source,
            target: request.target,
            damage: dealt,
            target_died: died,
        });

        if died {
            died_events.write(EntityDied {
                entity: request.target,
                killer: request.source,
            });
            crate::logger::log_info(&format!(
                "Entity {:?} killed by {:?}",
                request.target, request.source
            ));
        }
    }
}

/// System: rebuild agents on `RespawnAgent` requests.
///
/// Inert agents stay inert: they are never registered or revived.
pub fn handle_respawns(
    mut requests: EventReader<RespawnAgent>,
    mut agents: Query<&mut AgentRuntime, Without<Inert>>,
    inert: Query<(), With<Inert>>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
) {
    for request in requests.read() {
        if inert.contains(request.agent) {
            crate::logger::log_warning(&format!("RespawnAgent: {:?} is inert, ignored", request.agent));
            continue;
        }
        let Ok(mut runtime) = agents.get_mut(request.agent) else {
            crate::logger::log_warning(&format!("RespawnAgent: {:?} is not an agent", request.agent));
            continue;
        };
        runtime.respawn();
        effects.apply(request.agent, &mut runtime, &mut registry);
        crate::logger::log_info(&format!(
            "AI: {:?} respawned as {}",
            request.agent,
            runtime.archetype().name
        ));
    }
}
