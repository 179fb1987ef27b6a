//! Headless VIGIL simulation
//!
//! Spawns a small guarded compound (player, walls, soldier, rifleman, grunt,
//! camera) and runs 1000 ticks without rendering.
//!
//! Usage: `vigil_simulation [archetypes.toml]`

use std::process::ExitCode;
use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;
use vigil_simulation::perception::collision_layers::COLLISION_LAYER_ENVIRONMENT;
use vigil_simulation::*;

fn main() -> ExitCode {
    let seed = 42;
    let mut app = create_headless_app(seed);
    log_info(&format!("Starting VIGIL headless simulation (seed: {})", seed));

    let catalog = match std::env::args().nth(1) {
        Some(path) => match ArchetypeCatalog::load(&path) {
            Ok(catalog) => catalog,
            Err(err) => {
                log_error(&format!("Cannot load archetypes: {}", err));
                return ExitCode::FAILURE;
            }
        },
        None => ArchetypeCatalog::standard(),
    };

    app.insert_resource(catalog).add_plugins(SimulationPlugin);

    if let Err(err) = spawn_demo_scene(app.world_mut()) {
        log_error(&format!("Cannot build demo scene: {}", err));
        return ExitCode::FAILURE;
    }

    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            report(app.world_mut(), tick);
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}

fn spawn_demo_scene(world: &mut World) -> Result<(), ConfigError> {
    let catalog = world.resource::<ArchetypeCatalog>().clone();
    let soldier = catalog.get("soldier")?;
    let rifleman = catalog.get("rifleman")?;
    let grunt = catalog.get("grunt")?;
    let camera = catalog.get("camera")?;

    let player = world
        .spawn((
            Name::new("player"),
            Transform::from_xyz(0.0, 0.0, 12.0),
            Health::new(100.0),
            ObstacleBody::humanoid(),
        ))
        .id();

    // Compound walls
    let walls = [
        (Vec3::new(0.0, 1.5, -10.0), Vec3::new(10.0, 1.5, 0.25)),
        (Vec3::new(-10.0, 1.5, 0.0), Vec3::new(0.25, 1.5, 10.0)),
        (Vec3::new(10.0, 1.5, 0.0), Vec3::new(0.25, 1.5, 10.0)),
        (Vec3::new(3.0, 1.5, 2.0), Vec3::new(2.0, 1.5, 0.25)),
    ];
    for (center, half_extents) in walls {
        let wall = world.spawn(Name::new("wall")).id();
        world.resource_mut::<ObstacleField>().add_static(
            wall,
            QueryVolume::Box { center, half_extents },
            COLLISION_LAYER_ENVIRONMENT,
        );
    }

    let patrol_route = jittered_route(
        world,
        &[
            Vec3::new(-6.0, 0.0, -6.0),
            Vec3::new(6.0, 0.0, -6.0),
            Vec3::new(6.0, 0.0, 6.0),
            Vec3::new(-6.0, 0.0, 6.0),
        ],
    );
    let sniper_route = jittered_route(world, &[Vec3::new(-8.0, 0.0, -8.0), Vec3::new(-8.0, 0.0, 4.0)]);

    {
        let mut commands = world.commands();
        spawn(
            &mut commands,
            soldier,
            AgentSpawn::at(Vec3::new(-6.0, 0.0, -6.0)).targeting(player).patrolling(patrol_route),
        );
        spawn(
            &mut commands,
            rifleman,
            AgentSpawn::at(Vec3::new(-8.0, 0.0, -8.0)).targeting(player).patrolling(sniper_route),
        );
        spawn(
            &mut commands,
            grunt,
            AgentSpawn::at(Vec3::new(5.0, 0.0, -5.0)).targeting(player).facing(Vec3::Z),
        );
        spawn(
            &mut commands,
            camera,
            AgentSpawn::at(Vec3::new(9.0, 1.0, 9.0))
                .targeting(player)
                .facing(Vec3::new(-1.0, 0.0, -1.0))
                .without_body(),
        );
    }
    world.flush();

    Ok(())
}

fn spawn(commands: &mut Commands, archetype: Arc<Archetype>, spawn: AgentSpawn) {
    let name = archetype.name.clone();
    let entity = spawn_agent(commands, archetype, spawn);
    log(&format!("Spawned {} as {:?}", name, entity));
}

/// Waypoints shifted by up to 0.5m so every seed walks a slightly different loop.
fn jittered_route(world: &mut World, waypoints: &[Vec3]) -> Vec<Vec3> {
    let mut rng = world.resource_mut::<DeterministicRng>();
    waypoints
        .iter()
        .map(|&p| p + Vec3::new(rng.rng.gen_range(-0.5..0.5), 0.0, rng.rng.gen_range(-0.5..0.5)))
        .collect()
}

fn report(world: &mut World, tick: u32) {
    let mut agents = world.query::<(&Name, &AgentRuntime)>();
    let summary: Vec<String> = agents
        .iter(world)
        .map(|(name, runtime)| format!("{}={}({:.0})", name, runtime.state(), runtime.health()))
        .collect();

    let mut players = world.query_filtered::<&Health, Without<AgentRuntime>>();
    let player_health = players.iter(world).next().map_or(0.0, |h| h.current);

    log_info(&format!(
        "Tick {}: player {:.0} HP | {}",
        tick,
        player_health,
        summary.join(", ")
    ));
}
