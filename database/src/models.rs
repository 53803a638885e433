use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlayerRecord {
    pub id: i64,
    pub player_name: Option<String>,
    pub game: Option<String>,
    pub username: Option<String>,
    pub level: i64,
    pub team: Option<String>,
    pub role: Option<String>,
    pub favorite: Option<String>,
    pub avatar: String,
    pub date_registered: chrono::DateTime<chrono::Utc>,
}

/// Fields supplied on registration. The store assigns `id` and
/// `date_registered`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub player_name: Option<String>,
    pub game: Option<String>,
    pub username: Option<String>,
    pub level: i64,
    pub team: Option<String>,
    pub role: Option<String>,
    pub favorite: Option<String>,
    pub avatar: String,
}
