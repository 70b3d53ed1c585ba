//! TOML-based planner configuration.
//!
//! Stores display and placement defaults:
//! - Hour range the calendar grid shows and auto-fills
//! - Default duration applied when a placement does not specify one
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::StorageError;

/// Grid display and placement defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// First hour shown and auto-filled on the calendar grid
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u8,
    /// Hour the grid stops at, exclusive
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u8,
    /// Duration in hours applied when a placement does not specify one
    #[serde(default = "default_duration_hours")]
    pub default_duration_hours: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
}

// Default functions
fn default_day_start_hour() -> u8 {
    6
}
fn default_day_end_hour() -> u8 {
    22
}
fn default_duration_hours() -> u32 {
    1
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            default_duration_hours: default_duration_hours(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf, StorageError> {
        Ok(super::data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, StorageError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| StorageError::ConfigParse(e.to_string()))
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let raw =
            toml::to_string_pretty(self).map_err(|e| StorageError::ConfigSave(e.to_string()))?;
        fs::write(Self::config_path()?, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.planner.day_start_hour, 6);
        assert_eq!(config.planner.day_end_hour, 22);
        assert_eq!(config.planner.default_duration_hours, 1);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: Config = toml::from_str("[planner]\nday_start_hour = 8\n").unwrap();
        assert_eq!(config.planner.day_start_hour, 8);
        assert_eq!(config.planner.day_end_hour, 22);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            planner: PlannerConfig {
                day_start_hour: 7,
                day_end_hour: 23,
                default_duration_hours: 2,
            },
        };
        let raw = toml::to_string_pretty(&config).unwrap();
        let decoded: Config = toml::from_str(&raw).unwrap();
        assert_eq!(decoded, config);
    }
}
