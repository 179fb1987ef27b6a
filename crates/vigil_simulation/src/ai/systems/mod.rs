//! AI systems
//!
//! Decision tick (Update): lifecycle, timers, damage, perception, broadcasts,
//! presentation. Motion tick (FixedUpdate): intents and attack attempts.

pub mod broadcast;
pub mod decision;
pub mod effects;
pub mod lifecycle;
pub mod motion;
pub mod presentation;
pub mod reactions;

pub use broadcast::flush_alert_broadcasts;
pub use decision::{fire_timers, perceive};
pub use effects::EffectWriter;
pub use lifecycle::{activate_new_agents, forget_despawned_agents};
pub use motion::drive_agents;
pub use presentation::update_presentation;
pub use reactions::{handle_respawns, receive_damage};
