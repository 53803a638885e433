use database::{PlayerRecord, RecordStore, SqliteRecordStore};
use ranking::{rank_for_level, Rank};
use serde::Serialize;

use crate::avatar::{AvatarStore, AvatarUpload, FsAvatarStore};
use crate::config::{RegistryConfig, DEFAULT_LEADERBOARD_SIZE};
use crate::{RegistrationForm, RegistryError};

/// A stored player paired with the rank shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub record: PlayerRecord,
    pub rank: Rank,
}

impl From<PlayerRecord> for RankedPlayer {
    fn from(record: PlayerRecord) -> Self {
        let rank = rank_for_level(record.level, record.game.as_deref());
        Self { record, rank }
    }
}

pub struct Registry<S, A> {
    store: S,
    avatars: A,
    leaderboard_size: usize,
}

impl Registry<SqliteRecordStore, FsAvatarStore> {
    /// Opens the SQLite store and avatar directory named by `config`.
    pub async fn open(
        config: &RegistryConfig,
        database_url: Option<String>,
    ) -> Result<Self, RegistryError> {
        let store = SqliteRecordStore::connect(&config.database_config(database_url)).await?;
        let avatars = FsAvatarStore::open(&config.avatar_dir)
            .await
            .map_err(RegistryError::Avatar)?;
        Ok(Self::new(store, avatars).with_leaderboard_size(config.leaderboard_size))
    }
}

impl<S: RecordStore, A: AvatarStore> Registry<S, A> {
    pub fn new(store: S, avatars: A) -> Self {
        Self {
            store,
            avatars,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }

    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.leaderboard_size = size;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Registers a player and returns the new id. A taken username yields
    /// [`RegistryError::DuplicateUsername`] and nothing is created. The avatar
    /// only replaces a file of the same name once the record is stored.
    pub async fn register(
        &self,
        form: RegistrationForm,
        avatar: Option<AvatarUpload>,
    ) -> Result<i64, RegistryError> {
        let mut player = form.into_new_player()?;

        let staged = match avatar {
            Some(upload) => self
                .avatars
                .stage(&upload)
                .await
                .map_err(RegistryError::Avatar)?,
            None => None,
        };
        if let Some(staged) = &staged {
            player.avatar = staged.reference();
        }

        // A failed insert drops the staged file.
        let id = self.store.create(&player).await?;

        if let Some(staged) = staged {
            if let Err(err) = self.avatars.commit(staged).await {
                log::warn!("Avatar for player {id} could not be stored, rolling back: {err}");
                self.store.delete(id).await?;
                return Err(RegistryError::Avatar(err));
            }
        }

        log::info!(
            "Registered player {} as id {}",
            player.username.as_deref().unwrap_or("<none>"),
            id
        );
        Ok(id)
    }

    pub async fn list_players(&self) -> Result<Vec<RankedPlayer>, RegistryError> {
        let players = self.store.list_all().await?;
        Ok(players.into_iter().map(RankedPlayer::from).collect())
    }

    pub async fn remove_player(&self, id: i64) -> Result<(), RegistryError> {
        self.store.delete(id).await?;
        log::info!("Removed player {id}");
        Ok(())
    }

    pub async fn leaderboard(&self) -> Result<Vec<RankedPlayer>, RegistryError> {
        let players = self.store.top_n_by_level(self.leaderboard_size).await?;
        Ok(players.into_iter().map(RankedPlayer::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::NoopAvatarStore;
    use database::DatabaseConfig;

    async fn in_memory_registry() -> Registry<SqliteRecordStore, NoopAvatarStore> {
        let store = SqliteRecordStore::connect(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open store");
        Registry::new(store, NoopAvatarStore)
    }

    fn form(username: &str, level: &str, game: &str) -> RegistrationForm {
        RegistrationForm {
            player_name: Some(username.to_uppercase()),
            username: Some(username.to_string()),
            level: Some(level.to_string()),
            game: Some(game.to_string()),
            ..RegistrationForm::default()
        }
    }

    #[tokio::test]
    async fn test_register_and_rank() {
        let registry = in_memory_registry().await;

        registry
            .register(form("ana1", "22", "Valorant"), None)
            .await
            .unwrap();

        let players = registry.list_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].record.level, 22);
        assert_eq!(players[0].rank, Rank::Gold);
    }

    #[tokio::test]
    async fn test_invalid_level_creates_nothing() {
        let registry = in_memory_registry().await;

        let err = registry
            .register(form("bad", "twelve", "Valorant"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidLevel(_)));
        assert_eq!(registry.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_level_is_stored_but_unranked() {
        let registry = in_memory_registry().await;

        registry
            .register(form("neg", "-5", "Valorant"), None)
            .await
            .unwrap();

        let players = registry.list_players().await.unwrap();
        assert_eq!(players[0].record.level, -5);
        assert_eq!(players[0].rank, Rank::Unranked);
    }

    #[tokio::test]
    async fn test_noop_avatar_store_leaves_avatar_empty() {
        let registry = in_memory_registry().await;

        registry
            .register(
                form("pic", "3", "Apex"),
                Some(AvatarUpload::new("pic.png", vec![1])),
            )
            .await
            .unwrap();

        let players = registry.list_players().await.unwrap();
        assert_eq!(players[0].record.avatar, "");
    }

    #[tokio::test]
    async fn test_custom_leaderboard_size() {
        let registry = in_memory_registry().await.with_leaderboard_size(2);

        for (name, level) in [("a", "1"), ("b", "2"), ("c", "3")] {
            registry.register(form(name, level, "Apex"), None).await.unwrap();
        }

        let top = registry.leaderboard().await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].record.level, 3);
        assert_eq!(top[1].record.level, 2);
    }

    #[test]
    fn test_ranked_player_serializes_flat() {
        let ranked = RankedPlayer::from(PlayerRecord {
            id: 1,
            player_name: None,
            game: Some("Valorant".to_string()),
            username: Some("flat".to_string()),
            level: 40,
            team: None,
            role: None,
            favorite: None,
            avatar: String::new(),
            date_registered: chrono::Utc::now(),
        });

        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["username"], "flat");
        assert_eq!(json["rank"], "Radiant");
    }
}
