//! Configuration loading and management
//!
//! Handles parsing of the optional `lazytask.toml` file in the data directory
//! and resolution of the data directory itself.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILENAME: &str = "lazytask.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LAZYTASK_DATA_DIR";

/// Fallback data directory when no platform directory is available
pub const FALLBACK_DATA_DIR: &str = ".lazytask";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store key configuration
    #[serde(default)]
    pub store: StoreKeys,
}

/// Keys under which the two persisted records live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreKeys {
    /// Key holding the JSON array of tasks
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,

    /// Key holding the settings document (settings + theme fields)
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

fn default_tasks_key() -> String {
    "@lazytask_tasks".to_string()
}

fn default_settings_key() -> String {
    "app_settings".to_string()
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            tasks_key: default_tasks_key(),
            settings_key: default_settings_key(),
        }
    }
}

impl StoreKeys {
    fn validate(&self) -> Result<()> {
        if self.tasks_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "store.tasks_key cannot be empty".to_string(),
            ));
        }
        if self.settings_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "store.settings_key cannot be empty".to_string(),
            ));
        }
        if self.tasks_key == self.settings_key {
            return Err(Error::InvalidConfig(format!(
                "store.tasks_key and store.settings_key must differ (both '{}')",
                self.tasks_key
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `lazytask.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults when
    /// the file is absent
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        self.store.validate()
    }
}

/// Resolve the data directory.
///
/// Resolution order:
/// 1) explicit path (CLI `--data-dir` or `LAZYTASK_DATA_DIR`)
/// 2) platform data directory (e.g. `~/.local/share/lazytask`)
/// 3) `./.lazytask`
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    ProjectDirs::from("", "", "lazytask")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(config.store.tasks_key, "@lazytask_tasks");
        assert_eq!(config.store.settings_key, "app_settings");
    }

    #[test]
    fn test_partial_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[store]\ntasks_key = \"work_tasks\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(config.store.tasks_key, "work_tasks");
        assert_eq!(config.store.settings_key, "app_settings");
    }

    #[test]
    fn test_rejects_shared_key() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "[store]\ntasks_key = \"same\"\nsettings_key = \"same\"\n",
        )
        .unwrap();

        let err = Config::load_from_dir(temp.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "store = [nope").unwrap();
        assert!(matches!(
            Config::load_from_dir(temp.path()),
            Err(Error::TomlParse(_))
        ));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/lt")));
        assert_eq!(dir, PathBuf::from("/tmp/lt"));
    }
}
