//! Engine-wide settings (TOML).
//!
//! Per-archetype tuning lives in `ai::archetype`; this is only what is shared
//! by every agent.

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::logger::LogLevel;

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Motion tick rate (FixedUpdate)
    pub fixed_hz: f64,
    /// Perception aims at target root + this, never at the feet
    pub torso_height: f32,
    pub log_level: LogLevel,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            torso_height: 1.0,
            log_level: LogLevel::Debug,
        }
    }
}

impl EngineSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(ConfigError::invalid("<engine>", "fixed_hz", "must be positive"));
        }
        if !(self.torso_height.is_finite() && self.torso_height >= 0.0) {
            return Err(ConfigError::invalid("<engine>", "torso_height", "must be non-negative"));
        }
        Ok(())
    }
}
