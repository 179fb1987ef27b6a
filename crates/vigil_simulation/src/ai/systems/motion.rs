//! Motion tick: state → MovementIntent, plus attack attempts.
//!
//! Patrol   → patrol follower intent (empty path → Normal)
//! Alert/Chase → move on the target, face it, attempt an attack
//! anything else → idle

use bevy::prelude::*;

use crate::ai::archetype::{Archetype, CombatMode};
use crate::ai::runtime::AgentRuntime;
use crate::ai::spawn::{AgentTarget, Inert};
use crate::ai::state::AgentState;
use crate::ai::systems::effects::EffectWriter;
use crate::alert::AlertRegistry;
use crate::combat::{resolve_melee, resolve_ranged, ApplyDamage, AttackOutcome, AttackCooldown};
use crate::components::{flatten, MovementIntent};
use crate::config::EngineSettings;
use crate::patrol::{self, PatrolPath, PatrolStep};
use crate::perception::{SpatialQuery, Viewpoint};

/// System: drive every live mobile agent for one motion tick.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn drive_agents<S: SpatialQuery + Resource>(
    time: Res<Time>,
    settings: Res<EngineSettings>,
    spatial: Res<S>,
    mut agents: Query<
        (
            Entity,
            &mut AgentRuntime,
            &Transform,
            &mut MovementIntent,
            Option<&PatrolPath>,
            Option<&AgentTarget>,
        ),
        Without<Inert>,
    >,
    targets: Query<&Transform>,
    mut registry: ResMut<AlertRegistry>,
    mut effects: EffectWriter,
    mut attacks: EventWriter<ApplyDamage>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs_f64();

    for (entity, mut runtime, transform, mut intent, path, target) in agents.iter_mut() {
        let archetype = runtime.archetype().clone();
        if !archetype.capabilities.mobile {
            *intent = MovementIntent::IDLE;
            continue;
        }

        match runtime.state() {
            AgentState::Patrol => {
                let waypoints = path.map(|p| p.waypoints.as_slice()).unwrap_or(&[]);
                let step = patrol::advance(
                    &mut runtime.patrol,
                    transform.translation,
                    waypoints,
                    &archetype.config.patrol(),
                    dt,
                );
                if step == PatrolStep::EmptyPath {
                    runtime.fall_back_to_normal();
                    effects.apply(entity, &mut runtime, &mut registry);
                }
                *intent = step.intent();
            }
            AgentState::Alert | AgentState::Chase => {
                let Some(&AgentTarget(target)) = target else {
                    *intent = MovementIntent::IDLE;
                    continue;
                };
                let Ok(target_transform) = targets.get(target) else {
                    *intent = MovementIntent::IDLE;
                    continue;
                };
                let target_root = target_transform.translation;

                *intent = pursue(transform.translation, target_root, &archetype);

                let attempt = Attempt {
                    attacker: entity,
                    transform,
                    target,
                    target_root,
                    now,
                    torso_height: settings.torso_height,
                };
                let outcome = attempt.resolve(&archetype, &mut runtime.cooldown, &*spatial);
                if let Some(AttackOutcome::Landed { damage }) = outcome {
                    crate::logger::log(&format!(
                        "AI: {:?} hits {:?} for {}",
                        entity, target, damage
                    ));
                    attacks.write(ApplyDamage {
                        target,
                        amount: damage,
                        source: Some(entity),
                    });
                }
            }
            AgentState::Normal | AgentState::Damage | AgentState::Dead => {
                *intent = MovementIntent::IDLE;
            }
        }
    }
}

/// Close in until within attack range, always facing the target.
fn pursue(position: Vec3, target_root: Vec3, archetype: &Archetype) -> MovementIntent {
    let to_target = flatten(target_root - position);
    if to_target.length() > archetype.config.attack_range {
        return MovementIntent::toward(to_target, archetype.config.move_speed);
    }
    let facing = to_target.normalize_or_zero();
    MovementIntent {
        velocity: Vec3::ZERO,
        facing: (facing != Vec3::ZERO).then_some(facing),
    }
}

struct Attempt<'a> {
    attacker: Entity,
    transform: &'a Transform,
    target: Entity,
    target_root: Vec3,
    now: f64,
    torso_height: f32,
}

impl Attempt<'_> {
    /// `None` for archetypes without an attack.
    fn resolve<S: SpatialQuery + ?Sized>(
        &self,
        archetype: &Archetype,
        cooldown: &mut AttackCooldown,
        spatial: &S,
    ) -> Option<AttackOutcome> {
        let config = &archetype.config;
        let profile = config.attack();
        match archetype.capabilities.combat {
            CombatMode::None => None,
            CombatMode::Melee => Some(resolve_melee(
                cooldown,
                self.transform.translation,
                self.target_root,
                &profile,
                self.now,
            )),
            CombatMode::Ranged => {
                let view = Viewpoint::from_transform(self.transform, config.eye_height, self.attacker);
                Some(resolve_ranged(
                    cooldown,
                    &view,
                    self.transform.translation,
                    self.target_root,
                    self.target,
                    &profile,
                    &config.vision(self.torso_height),
                    self.now,
                    spatial,
                ))
            }
        }
    }
}
