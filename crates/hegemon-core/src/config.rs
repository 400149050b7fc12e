//! Engine configuration, loadable from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for world events, great-person draws and self-play maps.
    pub seed: u64,
    /// Turn at which the time victory is evaluated.
    pub turn_limit: u32,
    /// Persist every this many turns; 0 disables autosave.
    pub autosave_interval: u32,
    /// Entries kept in the notification log.
    pub notification_capacity: usize,
    pub random_events: bool,
    /// Consecutive AI turns `end_turn` may run per player before yielding.
    pub ai_turn_guard_per_player: usize,
    pub victory: VictoryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            turn_limit: 500,
            autosave_interval: 10,
            notification_capacity: 10,
            random_events: true,
            ai_turn_guard_per_player: 1,
            victory: VictoryConfig::default(),
        }
    }
}

fn default_seed() -> u64 {
    0x5eed
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryConfig {
    /// Share of all cities one player must hold.
    pub domination_share: f64,
    /// Domination is not checked until this many cities exist.
    pub domination_min_cities: usize,
    pub science_techs: usize,
    pub culture: i32,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        Self {
            domination_share: 0.75,
            domination_min_cities: 4,
            science_techs: 60,
            culture: 50_000,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_limit == 0 {
            return Err(ConfigError::Invalid("turn_limit must be positive".into()));
        }
        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notification_capacity must be at least 1".into(),
            ));
        }
        if self.ai_turn_guard_per_player == 0 {
            return Err(ConfigError::Invalid(
                "ai_turn_guard_per_player must be at least 1".into(),
            ));
        }
        let v = &self.victory;
        if !(v.domination_share > 0.0 && v.domination_share <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "victory.domination_share must be in (0, 1], got {}",
                v.domination_share
            )));
        }
        if v.science_techs == 0 || v.science_techs > crate::rules::TECHS.len() {
            return Err(ConfigError::Invalid(format!(
                "victory.science_techs must be in 1..={}",
                crate::rules::TECHS.len()
            )));
        }
        if v.culture <= 0 {
            return Err(ConfigError::Invalid("victory.culture must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.turn_limit, 500);
        assert_eq!(config.autosave_interval, 10);
        assert_eq!(config.victory.domination_share, 0.75);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let config = EngineConfig::from_yaml_str(
            "seed: 42\nrandom_events: false\nvictory:\n  culture: 1000\n",
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert!(!config.random_events);
        assert_eq!(config.victory.culture, 1000);
        assert_eq!(config.victory.science_techs, 60);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = EngineConfig::from_yaml_str("victory:\n  domination_share: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::from_yaml_str("turn_limit: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = EngineConfig::from_yaml_str("seed: [not a number").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn yaml_round_trip_and_file_load() {
        let config = EngineConfig::default().with_seed(7);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, config.to_yaml().unwrap()).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }
}
