//! Runtime configuration for the engine, read from TOML.
//!
//! Every section and field has a default, so an empty document is a valid configuration:
//!
//! ```toml
//! [registry]
//! entity_capacity = 1024
//!
//! [frame]
//! frames = 120
//! fixed_time_step_ms = 16
//!
//! [log]
//! level = "debug"
//! ```

use std::{fs, io, path::Path, str::FromStr};

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`Config`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown log level '{0}'")]
    InvalidLevel(String),
}

/// The full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub frame: FrameConfig,
    pub log: LogConfig,
}

/// Sizing of a [`Registry`](crate::ecs::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of entities to reserve room for up front.
    pub entity_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 256,
        }
    }
}

/// Settings of the frame loop driving a registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Number of frames to run. Zero runs until stopped.
    pub frames: u32,

    /// Fixed simulation step in milliseconds. Zero uses the measured frame delta instead.
    pub fixed_time_step_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frames: 60,
            fixed_time_step_ms: 16,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace` (case-insensitive).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl LogConfig {
    /// Parse the configured level.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.level).map_err(|_| ConfigError::InvalidLevel(self.level.clone()))
    }
}

impl Config {
    /// Parse a configuration from TOML text. The log level is validated eagerly.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.log.level_filter()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        // When
        let config = Config::from_toml_str("").unwrap();

        // Then
        assert_eq!(config, Config::default());
        assert_eq!(config.registry.entity_capacity, 256);
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        // Given
        let text = r#"
            [frame]
            frames = 3

            [log]
            level = "TRACE"
        "#;

        // When
        let config = Config::from_toml_str(text).unwrap();

        // Then
        assert_eq!(config.frame.frames, 3);
        assert_eq!(config.frame.fixed_time_step_ms, 16);
        assert_eq!(config.registry, RegistryConfig::default());
        assert_eq!(config.log.level_filter().unwrap(), LevelFilter::Trace);
    }

    #[test]
    fn invalid_level_is_rejected() {
        // When
        let result = Config::from_toml_str("[log]\nlevel = \"loud\"");

        // Then
        assert!(matches!(result, Err(ConfigError::InvalidLevel(level)) if level == "loud"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        // When
        let result = Config::from_toml_str("[registry]\nentity_capacity = \"many\"");

        // Then
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        // When
        let result = Config::load("does/not/exist.toml");

        // Then
        let Err(error) = result else {
            panic!("expected an error");
        };
        assert!(matches!(error, ConfigError::Io { .. }));
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
