//! Agent lifecycle: activation on spawn, cleanup on despawn.

use bevy::prelude::*;

use crate::ai::events::ConfigurationFault;
use crate::ai::runtime::AgentRuntime;
use crate::ai::spawn::{AgentTarget, Inert};
use crate::ai::systems::effects::EffectWriter;
use crate::alert::AlertRegistry;

/// System: validate and register freshly spawned agents.
///
/// Misconfigured agents (invalid archetype, no target, target without a
/// `Transform`) become `Inert` and are reported; they never panic the app.
pub fn activate_new_agents(
    mut commands: Commands,
    agents: Query<(Entity, &AgentRuntime, Option<&AgentTarget>), Added<AgentRuntime>>,
    targets: Query<(), With<Transform>>,
    mut registry: ResMut<AlertRegistry>,
    mut faults: EventWriter<ConfigurationFault>,
) {
    for (entity, runtime, target) in agents.iter() {
        let archetype = runtime.archetype();

        let fault = match (archetype.validate(), target) {
            (Err(err), _) => Some(err.to_string()),
            (Ok(()), None) => Some("no target assigned".to_owned()),
            (Ok(()), Some(AgentTarget(target))) if targets.get(*target).is_err() => {
                Some(format!("target {:?} has no Transform", target))
            }
            _ => None,
        };

        if let Some(reason) = fault {
            crate::logger::log_error(&format!(
                "AI: {:?} ({}) is inert: {}",
                entity, archetype.name, reason
            ));
            commands.entity(entity).insert(Inert);
            faults.write(ConfigurationFault { agent: entity, reason });
            continue;
        }

        if archetype.capabilities.alertable {
            registry.register(entity);
        }
        crate::logger::log(&format!(
            "AI: {:?} spawned as {} ({})",
            entity,
            archetype.name,
            runtime.state()
        ));
    }
}

/// System: despawned agents leave the registry and lose their timers.
pub fn forget_despawned_agents(
    mut removed: RemovedComponents<AgentRuntime>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
) {
    for entity in removed.read() {
        let was_registered = registry.unregister(entity);
        let cancelled = effects.cancel_timers(entity);
        if was_registered || cancelled > 0 {
            crate::logger::log(&format!(
                "AI: {:?} despawned (unregistered: {}, timers cancelled: {})",
                entity, was_registered, cancelled
            ));
        }
    }
}
