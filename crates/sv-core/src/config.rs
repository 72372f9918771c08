//! Configuration
//!
//! Defaults, an optional JSON config file and the `SURVIVOR_SAVE_DIR`
//! environment override.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_AUTOSAVE_INTERVAL, DEFAULT_CITY_SIZE, DEFAULT_HISCORE_CAPACITY, MAX_CITY_SIZE};

/// Environment variable overriding the save directory
pub const SAVE_DIR_ENV: &str = "SURVIVOR_SAVE_DIR";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Persistence and world-size settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivorConfig {
    /// Directory holding the save, hiscore and hint files
    pub save_dir: PathBuf,
    /// Width and height of the city grid
    pub city_size: usize,
    /// Turns between automatic saves
    pub autosave_interval_turns: i32,
    /// Entries kept in the hiscore table
    pub max_hiscores: usize,
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            city_size: DEFAULT_CITY_SIZE,
            autosave_interval_turns: DEFAULT_AUTOSAVE_INTERVAL,
            max_hiscores: DEFAULT_HISCORE_CAPACITY,
        }
    }
}

/// Platform data directory, or the working directory if there is none
pub fn default_save_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("rogue-survivor");
    path
}

impl SurvivorConfig {
    /// Defaults with the environment override applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file, then apply the environment override
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(SAVE_DIR_ENV)
            && !dir.is_empty()
        {
            self.save_dir = PathBuf::from(dir);
        }
    }

    /// Reject values the campaign cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city_size == 0 || self.city_size > MAX_CITY_SIZE {
            return Err(ConfigError::Invalid {
                field: "city_size",
                reason: format!("must be in 1..={}, got {}", MAX_CITY_SIZE, self.city_size),
            });
        }
        if self.autosave_interval_turns <= 0 {
            return Err(ConfigError::Invalid {
                field: "autosave_interval_turns",
                reason: format!("must be positive, got {}", self.autosave_interval_turns),
            });
        }
        if self.max_hiscores == 0 {
            return Err(ConfigError::Invalid {
                field: "max_hiscores",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn campaign_path(&self) -> PathBuf {
        self.save_dir.join("save.dat")
    }

    pub fn hiscores_path(&self) -> PathBuf {
        self.save_dir.join("hiscores.dat")
    }

    pub fn hints_path(&self) -> PathBuf {
        self.save_dir.join("hints.dat")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SurvivorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_hiscores, 12);
        assert!(config.save_dir.ends_with("rogue-survivor"));
    }

    #[test]
    fn test_file_paths() {
        let config = SurvivorConfig {
            save_dir: PathBuf::from("/tmp/rs"),
            ..Default::default()
        };
        assert_eq!(config.campaign_path(), PathBuf::from("/tmp/rs/save.dat"));
        assert_eq!(config.hiscores_path(), PathBuf::from("/tmp/rs/hiscores.dat"));
        assert_eq!(config.hints_path(), PathBuf::from("/tmp/rs/hints.dat"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SurvivorConfig::default();
        config.city_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "city_size", .. })
        ));

        let mut config = SurvivorConfig::default();
        config.autosave_interval_turns = 0;
        assert!(config.validate().is_err());

        let mut config = SurvivorConfig::default();
        config.max_hiscores = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "city_size": 7 }}"#).unwrap();

        let config = SurvivorConfig::load(file.path()).unwrap();
        assert_eq!(config.city_size, 7);
        assert_eq!(config.max_hiscores, 12);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SurvivorConfig::load(Path::new("/nonexistent/survivor.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
