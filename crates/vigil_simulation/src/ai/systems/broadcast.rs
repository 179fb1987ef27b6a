//! Alert broadcast flush (decision tick).

use bevy::prelude::*;

use crate::ai::runtime::AgentRuntime;
use crate::ai::systems::effects::EffectWriter;
use crate::alert::{AlertBroadcast, AlertRegistry};

/// System: run every broadcast requested this tick.
///
/// Each request is one synchronous `broadcast_alert` over the registry; an
/// agent that dies or despawns mid-broadcast is skipped by the handler.
pub fn flush_alert_broadcasts(
    mut agents: Query<&mut AgentRuntime>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
    mut broadcasts: EventWriter<AlertBroadcast>,
) {
    for source in effects.take_alert_requests() {
        let reached = registry.broadcast_alert(|agent, registry| {
            let Ok(mut runtime) = agents.get_mut(agent) else {
                return;
            };
            runtime.force_alert();
            effects.apply(agent, &mut runtime, registry);
        });

        crate::logger::log_info(&format!(
            "ALERT: {:?} raised a global alert ({} agents reached)",
            source, reached
        ));
        broadcasts.write(AlertBroadcast { source, reached });
    }
}
