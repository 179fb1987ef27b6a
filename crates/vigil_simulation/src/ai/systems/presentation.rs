//! Presentation sink updates.

use bevy::prelude::*;

use crate::ai::events::AgentStateChanged;
use crate::ai::state::AgentState;
use crate::components::Presentation;

/// System: mirror state changes into `Presentation`.
///
/// Dead agents are hidden and stop colliding; leaving Dead (respawn) restores
/// both.
pub fn update_presentation(
    mut changes: EventReader<AgentStateChanged>,
    mut presentations: Query<&mut Presentation>,
) {
    for change in changes.read() {
        let Ok(mut presentation) = presentations.get_mut(change.agent) else {
            continue;
        };
        presentation.label = change.to.label().to_owned();
        if change.to == AgentState::Dead {
            presentation.visible = false;
            presentation.collidable = false;
        } else if change.from == AgentState::Dead {
            presentation.visible = true;
            presentation.collidable = true;
        }
    }
}
