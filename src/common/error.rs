//! Configuration errors.
//!
//! Gameplay itself has no error path: missing sinks and controls no-op, and
//! unknown level ids fall back to level 1. Only loading external TOML can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("level catalogue has no level {0} to fall back to")]
    MissingFallbackLevel(u32),

    #[error("level {level}: platform {index} has a non-positive scale")]
    BadPlatformScale { level: u32, index: usize },
}
