//! Configuration loading and typed config structures for StoryMaker.
//!
//! The configuration lives in `storymaker-config.yaml`. Every field has a
//! default, so a missing file or an empty document yields a playable game.
//! `STORYMAKER_HOST` and `STORYMAKER_PORT` override the listen address after
//! parsing.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use storymaker_types::Wallet;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its accepted range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration, mirroring `storymaker-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Listen address of the game server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-session gameplay parameters.
    #[serde(default)]
    pub session: SessionConfig,

    /// Map generation parameters.
    #[serde(default)]
    pub map: MapConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults. Environment overrides are applied
    /// in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let mut config = Self::default();
            config.server.apply_env_overrides();
            config.validate()?;
            return Ok(config);
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges the parser cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width < MIN_MAP_SIDE || self.map.height < MIN_MAP_SIDE {
            return Err(ConfigError::Invalid {
                reason: format!("map must be at least {MIN_MAP_SIDE}x{MIN_MAP_SIDE}"),
            });
        }
        if self.session.message_history == 0 {
            return Err(ConfigError::Invalid {
                reason: "session.message_history must be at least 1".to_owned(),
            });
        }
        if self.session.starting_health == 0 || self.session.starting_energy == 0 {
            return Err(ConfigError::Invalid {
                reason: "starting health and energy must be positive".to_owned(),
            });
        }
        Ok(())
    }
}

/// Smallest map side that leaves room for the water border and a house.
pub const MIN_MAP_SIDE: u32 = 5;

/// Listen address of the game server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Apply `STORYMAKER_HOST` and `STORYMAKER_PORT` if set.
    ///
    /// An unparsable port is ignored and the configured one kept.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("STORYMAKER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("STORYMAKER_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.port = port;
        }
    }

    /// `host:port` form for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Gameplay parameters applied to every session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// In-game minutes consumed by every successful command.
    #[serde(default = "default_minutes_per_action")]
    pub minutes_per_action: u32,

    /// In-game minutes consumed by resting.
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: u32,

    /// Health at session start, also the maximum.
    #[serde(default = "default_vital")]
    pub starting_health: u32,

    /// Energy at session start, also the maximum.
    #[serde(default = "default_vital")]
    pub starting_energy: u32,

    /// Energy drained by every successful command other than resting.
    #[serde(default = "default_energy_per_action")]
    pub energy_per_action: u32,

    /// Energy recovered by resting.
    #[serde(default = "default_rest_recovery")]
    pub rest_recovery: u32,

    /// Health lost by acting while exhausted.
    #[serde(default = "default_exhaustion_damage")]
    pub exhaustion_damage: u32,

    /// Wallet at session start.
    #[serde(default = "default_starting_money")]
    pub starting_money: Wallet,

    /// Narrative entries kept for replay on reconnect.
    #[serde(default = "default_message_history")]
    pub message_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            minutes_per_action: default_minutes_per_action(),
            rest_minutes: default_rest_minutes(),
            starting_health: default_vital(),
            starting_energy: default_vital(),
            energy_per_action: default_energy_per_action(),
            rest_recovery: default_rest_recovery(),
            exhaustion_damage: default_exhaustion_damage(),
            starting_money: default_starting_money(),
            message_history: default_message_history(),
        }
    }
}

/// Map generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapConfig {
    /// Number of columns.
    #[serde(default = "default_map_width")]
    pub width: u32,

    /// Number of rows.
    #[serde(default = "default_map_height")]
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: default_map_width(),
            height: default_map_height(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

const fn default_minutes_per_action() -> u32 {
    5
}

const fn default_rest_minutes() -> u32 {
    60
}

const fn default_vital() -> u32 {
    100
}

const fn default_energy_per_action() -> u32 {
    1
}

const fn default_rest_recovery() -> u32 {
    30
}

const fn default_exhaustion_damage() -> u32 {
    5
}

fn default_starting_money() -> Wallet {
    BTreeMap::from([("coin".to_owned(), Decimal::TEN)])
}

const fn default_message_history() -> usize {
    200
}

const fn default_map_width() -> u32 {
    16
}

const fn default_map_height() -> u32 {
    10
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::parse("").unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.map.width, 16);
        assert_eq!(config.map.height, 10);
        assert_eq!(config.session.starting_money.get("coin"), Some(&dec!(10)));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "
session:
  minutes_per_action: 10
  starting_money:
    coin: 3
    gem: 1
map:
  width: 8
";
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.session.minutes_per_action, 10);
        assert_eq!(config.session.rest_minutes, 60);
        assert_eq!(config.session.starting_money.get("gem"), Some(&dec!(1)));
        assert_eq!(config.map.width, 8);
        assert_eq!(config.map.height, 10);
    }

    #[test]
    fn tiny_map_is_rejected() {
        let result = GameConfig::parse("map:\n  width: 2\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = GameConfig::parse("session: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 9000,
        };
        assert_eq!(server.bind_addr(), "127.0.0.1:9000");
    }
}
