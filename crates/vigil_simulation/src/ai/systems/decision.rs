//! Decision tick: timers and perception.

use bevy::prelude::*;

use crate::ai::runtime::AgentRuntime;
use crate::ai::spawn::{AgentTarget, Inert};
use crate::ai::systems::effects::EffectWriter;
use crate::alert::AlertRegistry;
use crate::config::EngineSettings;
use crate::perception::{can_see, SpatialQuery, Viewpoint};

/// System: fire due timers on the decision clock.
///
/// Timers whose owner is gone, dead or inert are dropped.
pub fn fire_timers(
    time: Res<Time>,
    mut agents: Query<&mut AgentRuntime, Without<Inert>>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
) {
    for fired in effects.advance_timers(time.elapsed_secs_f64()) {
        let Ok(mut runtime) = agents.get_mut(fired.owner) else {
            continue;
        };
        if !runtime.is_alive() {
            continue;
        }
        runtime.on_timer(fired.action);
        effects.apply(fired.owner, &mut runtime, &mut registry);
    }
}

/// System: vision cone check for every live agent, fed into the state machine.
pub fn perceive<S: SpatialQuery + Resource>(
    settings: Res<EngineSettings>,
    spatial: Res<S>,
    mut agents: Query<(Entity, &mut AgentRuntime, &Transform, Option<&AgentTarget>), Without<Inert>>,
    targets: Query<&Transform>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
) {
    for (entity, mut runtime, transform, target) in agents.iter_mut() {
        if !runtime.is_alive() {
            continue;
        }

        let config = &runtime.archetype().config;
        let view = Viewpoint::from_transform(transform, config.eye_height, entity);
        let vision = config.vision(settings.torso_height);

        // despawned target = nothing to see
        let sees = target
            .and_then(|&AgentTarget(target)| targets.get(target).ok().map(|t| (target, t.translation)))
            .is_some_and(|(target, root)| can_see(&view, root, target, &vision, &*spatial));

        runtime.observe(sees);
        effects.apply(entity, &mut runtime, &mut registry);
    }
}
