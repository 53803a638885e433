use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const DEFAULT_DATABASE_URL: &str = "players.db";
pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_DATABASE_URL)
    }

    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var("DATABASE_URL") {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            DEFAULT_DATABASE_URL.to_string()
        };

        Self::new(url)
    }

    pub fn is_in_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL || self.url == ":memory:"
    }

    /// Opens a pool over the configured SQLite file, creating the file if it
    /// does not exist. Plain paths and `sqlite:` URLs are both accepted.
    ///
    /// Every connection to an in-memory database sees its own private
    /// database, so in-memory pools hold exactly one connection for their
    /// whole lifetime.
    pub async fn create_pool(&self) -> Result<sqlx::SqlitePool, sqlx::Error> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str(MEMORY_DATABASE_URL)?
        } else if self.url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.url)
                .create_if_missing(true)
        };

        let pool_options = if self.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(self.pool_size.max(1))
        };

        pool_options.connect_with(options).await
    }
}
