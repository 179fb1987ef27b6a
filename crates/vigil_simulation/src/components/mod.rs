//! ECS components shared by the engine and its collaborators
//!
//! - actor: health + damage sink contract
//! - movement: locomotion intents (MovementIntent)
//! - presentation: state label / visibility toggles

pub mod actor;
pub mod movement;
pub mod presentation;

pub use actor::*;
pub use movement::*;
pub use presentation::*;
