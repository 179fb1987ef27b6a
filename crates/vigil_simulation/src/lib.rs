//! VIGIL Simulation Core: enemy behavior engine
//!
//! ECS simulation on Bevy 0.16:
//! - perception: vision cone + obstruction queries (`SpatialQuery` provider)
//! - alert: squad-wide broadcast registry
//! - timers: cancellable deferred transitions
//! - patrol / combat: waypoint follower, melee/ranged resolution
//! - ai: archetype-parametrized agent state machine
//!
//! Two clocks: decisions on `Update`, motion on `FixedUpdate` (60Hz).

use std::marker::PhantomData;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod alert;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod locomotion;
pub mod logger;
pub mod patrol;
pub mod perception;
pub mod timers;

pub use ai::{
    spawn_agent, AIPlugin, AgentConfig, AgentRuntime, AgentSpawn, AgentState, AgentStateChanged, AgentTarget,
    Archetype, ArchetypeCatalog, ConfigurationFault, Inert, RespawnAgent,
};
pub use alert::{AlertBroadcast, AlertRegistry, PendingAlerts};
pub use combat::{ApplyDamage, CombatPlugin, DamageDealt, EntityDied};
pub use components::*;
pub use config::EngineSettings;
pub use error::ConfigError;
pub use locomotion::HeadlessLocomotionPlugin;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use patrol::PatrolPath;
pub use perception::{ObstacleBody, ObstacleField, QueryVolume, SpatialQuery};
pub use timers::TimerScheduler;

/// Behavior engine over a host-provided spatial query resource `S`.
///
/// Inserts the shared resources (registry, scheduler, settings, catalog) if
/// the host has not, and the AI + combat subsystems. Host settings that fail
/// validation are logged and replaced by the defaults.
pub struct EnginePlugin<S> {
    _spatial: PhantomData<fn() -> S>,
}

impl<S> Default for EnginePlugin<S> {
    fn default() -> Self {
        Self {
            _spatial: PhantomData,
        }
    }
}

impl<S: SpatialQuery + Resource> Plugin for EnginePlugin<S> {
    fn build(&self, app: &mut App) {
        let settings = match app.world().get_resource::<EngineSettings>() {
            Some(settings) => match settings.validate() {
                Ok(()) => settings.clone(),
                Err(err) => {
                    logger::log_error(&format!("EngineSettings rejected, using defaults: {}", err));
                    EngineSettings::default()
                }
            },
            None => EngineSettings::default(),
        };
        logger::set_log_level(settings.log_level);

        if !app.world().contains_resource::<ArchetypeCatalog>() {
            app.insert_resource(ArchetypeCatalog::standard());
        }

        app
            // Motion tick rate from settings
            .insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz))
            .insert_resource(settings)
            .init_resource::<AlertRegistry>()
            .init_resource::<TimerScheduler>()
            .init_resource::<PendingAlerts>()
            .add_plugins((CombatPlugin, AIPlugin::<S>::default()));
    }
}

/// Main headless plugin: engine + built-in `ObstacleField` + headless
/// locomotion.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<ObstacleField>()
            .add_plugins((
                EnginePlugin::<ObstacleField>::default(),
                HeadlessLocomotionPlugin::<ObstacleField>::default(),
            ))
            .add_systems(
                FixedUpdate,
                perception::sync_obstacle_bodies.in_set(ai::MotionSet::Sense),
            );
    }
}

/// Deterministic RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App for headless simulation (no engine plugins yet).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// World snapshot for determinism comparisons
///
/// Components are serialized through `Debug`, ordered by entity index.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }
    snapshot
}
