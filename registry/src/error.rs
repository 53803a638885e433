use std::path::PathBuf;

use database::DatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Level must be a whole number, got {0:?}")]
    InvalidLevel(String),

    #[error("Avatar storage error: {0}")]
    Avatar(#[source] std::io::Error),

    #[error("Database error: {0}")]
    Database(DatabaseError),

    #[error("Could not read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl From<DatabaseError> for RegistryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            other => Self::Database(other),
        }
    }
}
