//! Configuration errors.
//!
//! Only loading/validation is fallible. Runtime faults never propagate out of
//! a system: they become `ConfigurationFault` events plus an error log line.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown archetype `{0}`")]
    UnknownArchetype(String),

    #[error("archetype `{0}` is defined more than once")]
    DuplicateArchetype(String),

    #[error("archetype `{archetype}`: invalid `{field}` ({reason})")]
    InvalidValue {
        archetype: String,
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(archetype: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            archetype: archetype.to_owned(),
            field,
            reason: reason.into(),
        }
    }
}
