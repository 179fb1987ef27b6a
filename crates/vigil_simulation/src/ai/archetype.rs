//! Archetypes: one parametrized engine instead of per-variant controllers.
//!
//! An archetype = `AgentConfig` (numbers) + `Capabilities` (which behaviors
//! exist). Agents share their archetype through `Arc<Archetype>`.
//!
//! TOML layout:
//! ```toml
//! [[archetype]]
//! name = "soldier"
//!
//! [archetype.config]
//! max_health = 50.0
//! view_distance = 8.0
//!
//! [archetype.capabilities]
//! initial_state = "patrol"
//! combat = "melee"
//! damage_reaction = { recovery_delay = 0.15, delayed_alert = 3.0 }
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

use crate::ai::state::AgentState;
use crate::combat::AttackProfile;
use crate::error::ConfigError;
use crate::patrol::PatrolParams;
use crate::perception::collision_layers::OBSTRUCTION_MASK_DEFAULT;
use crate::perception::VisionParams;

/// Immutable per-archetype tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub max_health: f32,
    /// Chase/alert speed
    pub move_speed: f32,
    pub patrol_speed: f32,
    pub eye_height: f32,
    pub view_distance: f32,
    /// Half-angle, degrees (60 => 120° total)
    pub view_angle: f32,
    /// Layer bits of the geometry that blocks sight
    pub obstruction_mask: u32,
    pub attack_damage: f32,
    /// Attacks per second
    pub attack_rate: f32,
    pub attack_range: f32,
    /// Waypoint arrival radius
    pub reach_distance: f32,
    /// Dwell time at each waypoint
    pub patrol_wait: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            move_speed: 3.0,
            patrol_speed: 3.0,
            eye_height: 1.7,
            view_distance: 8.0,
            view_angle: 60.0,
            obstruction_mask: OBSTRUCTION_MASK_DEFAULT,
            attack_damage: 10.0,
            attack_rate: 1.0,
            attack_range: 1.5,
            reach_distance: 0.2,
            patrol_wait: 1.0,
        }
    }
}

impl AgentConfig {
    /// `archetype` only labels the error.
    pub fn validate(&self, archetype: &str) -> Result<(), ConfigError> {
        positive(archetype, "max_health", self.max_health)?;
        non_negative(archetype, "move_speed", self.move_speed)?;
        non_negative(archetype, "patrol_speed", self.patrol_speed)?;
        non_negative(archetype, "eye_height", self.eye_height)?;
        non_negative(archetype, "view_distance", self.view_distance)?;
        non_negative(archetype, "attack_damage", self.attack_damage)?;
        non_negative(archetype, "attack_range", self.attack_range)?;
        positive(archetype, "reach_distance", self.reach_distance)?;
        non_negative(archetype, "patrol_wait", self.patrol_wait)?;
        if !(0.0..=180.0).contains(&self.view_angle) {
            return Err(ConfigError::invalid(archetype, "view_angle", "must be within 0..=180 degrees"));
        }
        Ok(())
    }

    pub fn vision(&self, torso_height: f32) -> VisionParams {
        VisionParams {
            view_distance: self.view_distance,
            view_angle: self.view_angle,
            obstruction_mask: self.obstruction_mask,
            torso_height,
        }
    }

    pub fn attack(&self) -> AttackProfile {
        AttackProfile {
            damage: self.attack_damage,
            rate: self.attack_rate,
            range: self.attack_range,
        }
    }

    pub fn patrol(&self) -> PatrolParams {
        PatrolParams {
            patrol_speed: self.patrol_speed,
            reach_distance: self.reach_distance,
            patrol_wait: self.patrol_wait,
        }
    }
}

fn non_negative(archetype: &str, field: &'static str, value: impl Into<f64>) -> Result<(), ConfigError> {
    let value = value.into();
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(archetype, field, format!("must be finite and >= 0, got {}", value)))
    }
}

fn positive(archetype: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(archetype, field, format!("must be finite and > 0, got {}", value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatMode {
    #[default]
    None,
    Melee,
    Ranged,
}

/// Hit reaction: Damage state, then back after `recovery_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamageReaction {
    pub recovery_delay: f64,
    /// Hit while undetected and not killed within this many seconds →
    /// global alert
    pub delayed_alert: Option<f64>,
}

impl Default for DamageReaction {
    fn default() -> Self {
        Self {
            recovery_delay: 0.15,
            delayed_alert: None,
        }
    }
}

/// Stationary scanner sweep.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Degrees per second
    pub sweep_speed: f32,
    /// Forward ray length that triggers a direction reversal
    pub bounce_distance: f32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sweep_speed: 30.0,
            bounce_distance: 1.5,
        }
    }
}

/// Which behaviors an archetype has.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capabilities {
    pub initial_state: AgentState,
    pub combat: CombatMode,
    pub mobile: bool,
    /// Has an Alert state (forced alert lands there instead of Chase)
    pub alert_state: bool,
    /// Two-stage reaction: detection → Alert, then Chase after the delay
    pub alert_to_chase_delay: Option<f64>,
    pub broadcast_on_detection: bool,
    /// Registered with the alert registry
    pub alertable: bool,
    pub damage_reaction: Option<DamageReaction>,
    pub sweep: Option<SweepConfig>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            initial_state: AgentState::Patrol,
            combat: CombatMode::None,
            mobile: true,
            alert_state: true,
            alert_to_chase_delay: None,
            broadcast_on_detection: false,
            alertable: true,
            damage_reaction: None,
            sweep: None,
        }
    }
}

impl Capabilities {
    pub fn validate(&self, archetype: &str) -> Result<(), ConfigError> {
        if !matches!(self.initial_state, AgentState::Patrol | AgentState::Normal) {
            return Err(ConfigError::invalid(archetype, "initial_state", "must be `patrol` or `normal`"));
        }
        if let Some(delay) = self.alert_to_chase_delay {
            non_negative(archetype, "alert_to_chase_delay", delay)?;
            if !self.alert_state {
                return Err(ConfigError::invalid(
                    archetype,
                    "alert_to_chase_delay",
                    "requires `alert_state = true`",
                ));
            }
        }
        if let Some(reaction) = &self.damage_reaction {
            non_negative(archetype, "recovery_delay", reaction.recovery_delay)?;
            if let Some(delay) = reaction.delayed_alert {
                non_negative(archetype, "delayed_alert", delay)?;
            }
        }
        if let Some(sweep) = &self.sweep {
            if !sweep.sweep_speed.is_finite() {
                return Err(ConfigError::invalid(archetype, "sweep_speed", "must be finite"));
            }
            non_negative(archetype, "bounce_distance", sweep.bounce_distance)?;
            if self.mobile {
                return Err(ConfigError::invalid(archetype, "sweep", "scanners must have `mobile = false`"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Archetype {
    pub name: String,
    #[serde(default)]
    pub config: AgentConfig,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Archetype {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate(&self.name)?;
        self.capabilities.validate(&self.name)?;
        if self.capabilities.combat != CombatMode::None {
            positive(&self.name, "attack_rate", self.config.attack_rate)?;
        }
        Ok(())
    }

    pub fn is_two_stage(&self) -> bool {
        self.capabilities.alert_to_chase_delay.is_some()
    }

    pub fn is_scanner(&self) -> bool {
        self.capabilities.sweep.is_some()
    }

    /// Soldier: patrolling melee agent, alerts the squad on first sight and
    /// after an unanswered hit.
    pub fn soldier() -> Self {
        Self {
            name: "soldier".to_owned(),
            config: AgentConfig::default(),
            capabilities: Capabilities {
                combat: CombatMode::Melee,
                broadcast_on_detection: true,
                damage_reaction: Some(DamageReaction {
                    recovery_delay: 0.15,
                    delayed_alert: Some(3.0),
                }),
                ..default()
            },
        }
    }

    /// Rifleman: patrolling ranged agent, two-stage reaction.
    pub fn rifleman() -> Self {
        Self {
            name: "rifleman".to_owned(),
            config: AgentConfig {
                max_health: 40.0,
                move_speed: 2.5,
                patrol_speed: 2.0,
                view_distance: 12.0,
                view_angle: 45.0,
                attack_damage: 8.0,
                attack_rate: 2.0,
                attack_range: 8.0,
                ..default()
            },
            capabilities: Capabilities {
                combat: CombatMode::Ranged,
                alert_to_chase_delay: Some(0.5),
                damage_reaction: Some(DamageReaction::default()),
                ..default()
            },
        }
    }

    /// Grunt: stands by, goes straight to Chase, no Alert state.
    pub fn grunt() -> Self {
        Self {
            name: "grunt".to_owned(),
            config: AgentConfig {
                max_health: 80.0,
                move_speed: 4.0,
                view_distance: 6.0,
                view_angle: 75.0,
                attack_damage: 15.0,
                attack_rate: 0.8,
                attack_range: 1.8,
                ..default()
            },
            capabilities: Capabilities {
                initial_state: AgentState::Normal,
                combat: CombatMode::Melee,
                alert_state: false,
                damage_reaction: Some(DamageReaction {
                    recovery_delay: 0.25,
                    delayed_alert: None,
                }),
                ..default()
            },
        }
    }

    /// Surveillance camera: stationary scanner.
    pub fn camera() -> Self {
        Self {
            name: "camera".to_owned(),
            config: AgentConfig {
                max_health: 100.0,
                move_speed: 0.0,
                patrol_speed: 0.0,
                view_distance: 5.0,
                attack_damage: 0.0,
                ..default()
            },
            capabilities: Capabilities {
                initial_state: AgentState::Normal,
                combat: CombatMode::None,
                mobile: false,
                alert_state: false,
                alertable: false,
                sweep: Some(SweepConfig::default()),
                ..default()
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    archetype: Vec<Archetype>,
}

/// Named archetypes available to `spawn_agent`.
#[derive(Resource, Debug, Clone, Default)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Arc<Archetype>>,
}

impl ArchetypeCatalog {
    /// soldier, rifleman, grunt, camera
    pub fn standard() -> Self {
        Self {
            archetypes: vec![
                Arc::new(Archetype::soldier()),
                Arc::new(Archetype::rifleman()),
                Arc::new(Archetype::grunt()),
                Arc::new(Archetype::camera()),
            ],
        }
    }

    pub fn from_archetypes(archetypes: impl IntoIterator<Item = Archetype>) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        for archetype in archetypes {
            if catalog.contains(&archetype.name) {
                return Err(ConfigError::DuplicateArchetype(archetype.name));
            }
            archetype.validate()?;
            catalog.archetypes.push(Arc::new(archetype));
        }
        Ok(catalog)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_archetypes(file.archetype)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.archetypes.iter().try_for_each(|a| a.validate())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Archetype>, ConfigError> {
        self.archetypes
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownArchetype(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.archetypes.iter().any(|a| a.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
