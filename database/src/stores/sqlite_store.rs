use super::RecordStore;
use crate::{DatabaseConfig, DatabaseError, NewPlayer, PlayerRecord};
use sqlx::SqlitePool;

const CREATE_PLAYERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_name TEXT,
    game TEXT,
    username TEXT UNIQUE,
    level INTEGER NOT NULL DEFAULT 0,
    team TEXT,
    role TEXT,
    favorite TEXT,
    avatar TEXT NOT NULL DEFAULT '',
    date_registered TEXT NOT NULL
)
"#;

const SELECT_PLAYERS: &str = "SELECT id, player_name, game, username, level, team, role, favorite, avatar, date_registered FROM players";

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the configured database and makes sure the players table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = config
            .create_pool()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        tracing::info!("Opened player store at {}", config.url);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_PLAYERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, player: &NewPlayer) -> Result<i64, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO players (player_name, game, username, level, team, role, favorite, avatar, date_registered) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&player.player_name)
        .bind(&player.game)
        .bind(&player.username)
        .bind(player.level)
        .bind(&player.team)
        .bind(&player.role)
        .bind(&player.favorite)
        .bind(&player.avatar)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, player.username.as_deref()))
        .inspect_err(|e| {
            if e.is_duplicate_username() {
                tracing::warn!("Rejected duplicate username {:?}", player.username);
            }
        })?;

        let id = result.last_insert_rowid();
        tracing::debug!("Created player {} ({:?})", id, player.username);
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<PlayerRecord>, DatabaseError> {
        let players = sqlx::query_as::<_, PlayerRecord>(&format!("{SELECT_PLAYERS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        tracing::debug!("Listed {} players", players.len());
        Ok(players)
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        tracing::debug!(
            "Deleted player {} ({} rows affected)",
            id,
            result.rows_affected()
        );
        Ok(())
    }

    async fn top_n_by_level(&self, n: usize) -> Result<Vec<PlayerRecord>, DatabaseError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        // Equal levels fall back to registration order.
        let players = sqlx::query_as::<_, PlayerRecord>(&format!(
            "{SELECT_PLAYERS} ORDER BY level DESC, id ASC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(players)
    }

    async fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(count as usize)
    }
}
