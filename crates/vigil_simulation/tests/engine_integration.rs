//! Engine integration tests
//!
//! Full headless App (SimulationPlugin) driven with a fixed 1/60s step:
//! - detection → chase → melee damage on the player
//! - global alert propagation (live registered agents only)
//! - delayed global alert after an unanswered hit
//! - lifecycle: inert on misconfiguration, registry cleanup on despawn
//! - presentation on death and respawn
//! - health invariants over 1000 ticks
//! - motion and attacks independent of the Update step
//! - invalid host settings fall back to defaults

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use vigil_simulation::*;

fn create_engine_app(seed: u64) -> App {
    create_engine_app_with_step(seed, 1.0 / 60.0)
}

fn create_engine_app_with_step(seed: u64, step: f64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(step)))
        .add_plugins(SimulationPlugin);
    app
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Name::new("player"),
            Transform::from_translation(position),
            Health::new(100.0),
            ObstacleBody::humanoid(),
        ))
        .id()
}

fn spawn_archetype(app: &mut App, archetype: &str, spawn: AgentSpawn) -> Entity {
    let archetype = app
        .world()
        .resource::<ArchetypeCatalog>()
        .get(archetype)
        .expect("standard archetype");
    let agent = spawn_agent(&mut app.world_mut().commands(), archetype, spawn);
    app.world_mut().flush();
    agent
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn state(app: &App, agent: Entity) -> AgentState {
    app.world().get::<AgentRuntime>(agent).expect("agent exists").state()
}

fn player_health(app: &App, player: Entity) -> f32 {
    app.world().get::<Health>(player).expect("player exists").current
}

#[test]
fn test_soldier_detects_chases_and_hits_player() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));
    let soldier = spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::ZERO).targeting(player));

    app.update();
    assert_eq!(state(&app, soldier), AgentState::Chase);
    assert!(app.world().get::<AgentRuntime>(soldier).unwrap().has_detected_target());

    // ~1.5s to close 4.5m at 3 m/s, then one hit per second
    run(&mut app, 300);

    let position = app.world().get::<Transform>(soldier).unwrap().translation;
    let gap = Vec2::new(position.x, position.z).distance(Vec2::new(0.0, -6.0));
    assert!(gap <= 1.6, "soldier stopped {} m away", gap);

    let health = player_health(&app, player);
    assert!(health < 100.0, "player untouched");
    assert!(health >= 50.0, "too many hits: {}", health);
    assert_eq!(health % 10.0, 0.0, "melee hits are 10 each");
}

#[test]
fn test_rifleman_alerts_then_chases() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));
    let rifleman = spawn_archetype(&mut app, "rifleman", AgentSpawn::at(Vec3::ZERO).targeting(player));

    app.update();
    assert_eq!(state(&app, rifleman), AgentState::Alert);

    run(&mut app, 20);
    assert_eq!(state(&app, rifleman), AgentState::Alert);

    run(&mut app, 20);
    assert_eq!(state(&app, rifleman), AgentState::Chase);

    // in range from the start: shots landed while still in Alert
    assert!(player_health(&app, player) < 100.0);
}

#[test]
fn test_global_alert_reaches_live_agents_only() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));

    // facing away from the player: nobody sees anything yet
    let soldier = spawn_archetype(
        &mut app,
        "soldier",
        AgentSpawn::at(Vec3::ZERO).targeting(player).facing(Vec3::Z),
    );
    let grunt = spawn_archetype(
        &mut app,
        "grunt",
        AgentSpawn::at(Vec3::new(25.0, 0.0, 25.0)).targeting(player).facing(Vec3::Z),
    );
    let rifleman = spawn_archetype(
        &mut app,
        "rifleman",
        AgentSpawn::at(Vec3::new(25.0, 0.0, -25.0)).targeting(player).facing(Vec3::NEG_Z),
    );
    let dead_rifleman = spawn_archetype(
        &mut app,
        "rifleman",
        AgentSpawn::at(Vec3::new(-25.0, 0.0, -25.0)).targeting(player).facing(Vec3::NEG_Z),
    );

    app.update();
    assert_eq!(app.world().resource::<AlertRegistry>().len(), 4);

    app.world_mut().send_event(ApplyDamage {
        target: dead_rifleman,
        amount: 100.0,
        source: None,
    });
    app.update();
    assert_eq!(state(&app, dead_rifleman), AgentState::Dead);
    assert_eq!(app.world().resource::<AlertRegistry>().len(), 3);
    assert_eq!(state(&app, grunt), AgentState::Normal);

    // turn the soldier around: first detection raises the alert
    app.world_mut()
        .get_mut::<Transform>(soldier)
        .unwrap()
        .look_to(Vec3::NEG_Z, Vec3::Y);
    app.update();

    let reached: Vec<usize> = app
        .world()
        .resource::<Events<AlertBroadcast>>()
        .iter_current_update_events()
        .map(|broadcast| broadcast.reached)
        .collect();
    assert_eq!(reached, vec![3]);

    assert_eq!(state(&app, soldier), AgentState::Chase);
    // grunt has no Alert stage
    assert_eq!(state(&app, grunt), AgentState::Chase);
    assert_eq!(state(&app, rifleman), AgentState::Alert);
    assert_eq!(state(&app, dead_rifleman), AgentState::Dead);

    let runtime = app.world().get::<AgentRuntime>(grunt).unwrap();
    assert!(runtime.globally_alerted());
    assert!(runtime.has_detected_target());
    assert!(!app.world().get::<AgentRuntime>(dead_rifleman).unwrap().globally_alerted());
}

#[test]
fn test_unanswered_hit_raises_delayed_alert() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));
    let soldier = spawn_archetype(
        &mut app,
        "soldier",
        AgentSpawn::at(Vec3::ZERO).targeting(player).facing(Vec3::Z),
    );
    let grunt = spawn_archetype(
        &mut app,
        "grunt",
        AgentSpawn::at(Vec3::new(25.0, 0.0, 25.0)).targeting(player).facing(Vec3::Z),
    );

    app.update();
    app.world_mut().send_event(ApplyDamage {
        target: soldier,
        amount: 10.0,
        source: Some(player),
    });
    app.update();
    assert_eq!(state(&app, soldier), AgentState::Damage);
    assert_eq!(app.world().get::<AgentRuntime>(soldier).unwrap().health(), 40.0);

    // recovered (empty patrol route → Normal), alert still pending
    run(&mut app, 120);
    assert!(state(&app, soldier).is_idle());
    assert_eq!(state(&app, grunt), AgentState::Normal);

    run(&mut app, 90);
    assert_eq!(state(&app, grunt), AgentState::Chase);
    assert!(app.world().get::<AgentRuntime>(soldier).unwrap().globally_alerted());
    assert!(state(&app, soldier).is_engaging());
}

#[test]
fn test_agent_without_target_is_inert() {
    let mut app = create_engine_app(42);
    let agent = spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::ZERO));

    app.update();

    assert!(app.world().get::<Inert>(agent).is_some());
    assert!(!app.world().resource::<AlertRegistry>().contains(agent));

    let faults: Vec<Entity> = app
        .world()
        .resource::<Events<ConfigurationFault>>()
        .iter_current_update_events()
        .map(|fault| fault.agent)
        .collect();
    assert_eq!(faults, vec![agent]);

    // inert agents never move
    run(&mut app, 60);
    assert_eq!(app.world().get::<Transform>(agent).unwrap().translation, Vec3::ZERO);
}

#[test]
fn test_inert_agent_ignores_respawn_and_damage() {
    let mut app = create_engine_app(42);
    let agent = spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::ZERO));

    app.update();
    assert!(app.world().get::<Inert>(agent).is_some());
    let initial = state(&app, agent);

    app.world_mut().send_event(RespawnAgent { agent });
    app.world_mut().send_event(ApplyDamage {
        target: agent,
        amount: 5.0,
        source: None,
    });
    app.update();

    assert!(!app.world().resource::<AlertRegistry>().contains(agent));
    assert_eq!(state(&app, agent), initial);
    assert_eq!(app.world().get::<AgentRuntime>(agent).unwrap().health(), 50.0);

    let changes = app.world().resource::<Events<AgentStateChanged>>();
    assert_eq!(changes.iter_current_update_events().count(), 0);
    let dealt = app.world().resource::<Events<DamageDealt>>();
    assert_eq!(dealt.iter_current_update_events().count(), 0);

    // nothing scheduled for it either
    run(&mut app, 180);
    assert_eq!(state(&app, agent), initial);
    assert!(!app.world().resource::<AlertRegistry>().contains(agent));
}

#[test]
fn test_despawned_agent_leaves_registry() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 20.0));
    let grunt = spawn_archetype(&mut app, "grunt", AgentSpawn::at(Vec3::ZERO).targeting(player));
    let camera = spawn_archetype(
        &mut app,
        "camera",
        AgentSpawn::at(Vec3::new(5.0, 1.0, 0.0)).targeting(player).without_body(),
    );

    app.update();
    let registry = app.world().resource::<AlertRegistry>();
    assert!(registry.contains(grunt));
    // cameras raise alerts but never receive them
    assert!(!registry.contains(camera));

    app.world_mut().despawn(grunt);
    app.update();
    assert!(app.world().resource::<AlertRegistry>().is_empty());
}

#[test]
fn test_dead_agent_is_hidden_until_respawn() {
    let mut app = create_engine_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 20.0));
    let soldier = spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::ZERO).targeting(player));

    app.update();
    app.world_mut().send_event(ApplyDamage {
        target: soldier,
        amount: 60.0,
        source: Some(player),
    });
    app.update();

    let died: Vec<Entity> = app
        .world()
        .resource::<Events<EntityDied>>()
        .iter_current_update_events()
        .map(|died| died.entity)
        .collect();
    assert_eq!(died, vec![soldier]);

    let presentation = app.world().get::<Presentation>(soldier).unwrap();
    assert_eq!(presentation.label, "dead");
    assert!(!presentation.visible);
    assert!(!presentation.collidable);
    assert!(!app.world().resource::<AlertRegistry>().contains(soldier));

    app.world_mut().send_event(RespawnAgent { agent: soldier });
    app.update();

    let runtime = app.world().get::<AgentRuntime>(soldier).unwrap();
    assert!(runtime.is_alive());
    assert_eq!(runtime.health(), 50.0);
    let presentation = app.world().get::<Presentation>(soldier).unwrap();
    assert!(presentation.visible);
    assert!(presentation.collidable);
    assert!(app.world().resource::<AlertRegistry>().contains(soldier));
}

#[test]
fn test_health_invariants_1000_ticks() {
    let mut app = create_engine_app(7);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -4.0));
    let agents = [
        spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::new(-2.0, 0.0, 0.0)).targeting(player)),
        spawn_archetype(&mut app, "rifleman", AgentSpawn::at(Vec3::new(2.0, 0.0, 0.0)).targeting(player)),
        spawn_archetype(
            &mut app,
            "grunt",
            AgentSpawn::at(Vec3::new(0.0, 0.0, 4.0)).targeting(player).facing(Vec3::NEG_Z),
        ),
        spawn_archetype(
            &mut app,
            "camera",
            AgentSpawn::at(Vec3::new(0.0, 1.0, 6.0)).targeting(player).without_body(),
        ),
    ];

    for tick in 0..1000 {
        // agents wounding each other every half second
        if tick % 30 == 0 {
            let target = agents[(tick / 30) % agents.len()];
            app.world_mut().send_event(ApplyDamage {
                target,
                amount: 7.5,
                source: None,
            });
        }
        app.update();

        let health = player_health(&app, player);
        assert!((0.0..=100.0).contains(&health), "tick {}: player health {}", tick, health);

        for &agent in &agents {
            let runtime = app.world().get::<AgentRuntime>(agent).unwrap();
            let max = runtime.archetype().config.max_health;
            assert!(
                (0.0..=max).contains(&runtime.health()),
                "tick {}: {:?} health {}",
                tick,
                agent,
                runtime.health()
            );
            assert_eq!(runtime.is_alive(), runtime.state() != AgentState::Dead);
        }
    }

    assert!(player_health(&app, player) < 100.0, "nobody attacked the player");
}

#[test]
fn test_shipped_catalog_matches_standard() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/archetypes.toml");
    let shipped = ArchetypeCatalog::load(path).expect("shipped catalog loads");
    let standard = ArchetypeCatalog::standard();

    assert_eq!(shipped.names().collect::<Vec<_>>(), standard.names().collect::<Vec<_>>());
    for name in standard.names() {
        assert_eq!(shipped.get(name).unwrap(), standard.get(name).unwrap(), "{} differs", name);
    }
}

#[test]
fn test_missing_catalog_file_is_reported() {
    let err = ArchetypeCatalog::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{}", err);
}

#[test]
fn test_update_step_does_not_change_motion() {
    // same 3 simulated seconds, Update at 30Hz vs 120Hz, motion stays at 60Hz
    let simulate = |step: f64| {
        let mut app = create_engine_app_with_step(42, step);
        let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));
        let soldier = spawn_archetype(&mut app, "soldier", AgentSpawn::at(Vec3::ZERO).targeting(player));

        app.update();
        run(&mut app, (3.0 / step).round() as usize);

        let position = app.world().get::<Transform>(soldier).unwrap().translation;
        (player_health(&app, player), position)
    };

    let (coarse_health, coarse_position) = simulate(1.0 / 30.0);
    let (fine_health, fine_position) = simulate(1.0 / 120.0);

    assert!(coarse_health < 100.0, "player untouched");
    assert_eq!(coarse_health, fine_health);
    assert!(
        coarse_position.abs_diff_eq(fine_position, 1e-4),
        "{} vs {}",
        coarse_position,
        fine_position
    );
}

#[test]
fn test_invalid_settings_fall_back_to_defaults() {
    let mut app = create_headless_app(42);
    app.insert_resource(EngineSettings {
        fixed_hz: 0.0,
        ..default()
    })
    .add_plugins(SimulationPlugin);

    assert_eq!(app.world().resource::<EngineSettings>().fixed_hz, 60.0);
    assert_eq!(
        app.world().resource::<Time<Fixed>>().timestep(),
        Time::<Fixed>::from_hz(60.0).timestep()
    );

    app.update();
}
