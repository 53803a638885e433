use std::path::{Path, PathBuf};

use database::DatabaseConfig;
use serde::Deserialize;

use crate::RegistryError;

pub const DEFAULT_AVATAR_DIR: &str = "static/avatars";
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Settings for one registry instance, read from an optional YAML file.
///
/// ```yaml
/// database_url: players.db
/// avatar_dir: static/avatars
/// leaderboard_size: 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub database_url: Option<String>,
    pub avatar_dir: PathBuf,
    pub leaderboard_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            avatar_dir: PathBuf::from(DEFAULT_AVATAR_DIR),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl RegistryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, RegistryError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| RegistryError::ConfigFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&contents)
    }

    /// Loads the file when one is given, otherwise falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, RegistryError> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Database settings, with a command-line URL taking precedence over
    /// `DATABASE_URL` and then over the file's `database_url`.
    pub fn database_config(&self, cli_url: Option<String>) -> DatabaseConfig {
        DatabaseConfig::from_cli_or_env_or_yaml(cli_url, self.database_url.clone())
    }
}
