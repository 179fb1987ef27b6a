//! Presentation sink: state label + visibility toggles.
//!
//! Written by the engine, consumed by UI/rendering collaborators, never read
//! back by AI systems.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Presentation {
    /// Lowercase state name ("patrol", "chase", ...)
    pub label: String,
    pub visible: bool,
    pub collidable: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            label: String::new(),
            visible: true,
            collidable: true,
        }
    }
}

impl Presentation {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            ..default()
        }
    }
}
