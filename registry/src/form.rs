use database::NewPlayer;
use serde::Deserialize;

use crate::RegistryError;

/// Registration fields as submitted. Everything is optional; `level` arrives
/// as text and defaults to 0 when missing or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationForm {
    pub player_name: Option<String>,
    pub username: Option<String>,
    pub level: Option<String>,
    pub team: Option<String>,
    pub game: Option<String>,
    pub role: Option<String>,
    pub favorite: Option<String>,
}

impl RegistrationForm {
    pub fn parse_level(&self) -> Result<i64, RegistryError> {
        match self.level.as_deref().map(str::trim) {
            None | Some("") => Ok(0),
            Some(text) => text
                .parse::<i64>()
                .map_err(|_| RegistryError::InvalidLevel(text.to_string())),
        }
    }

    /// Validates the level and builds the record to insert, with no avatar.
    pub fn into_new_player(self) -> Result<NewPlayer, RegistryError> {
        let level = self.parse_level()?;
        Ok(NewPlayer {
            player_name: self.player_name,
            game: self.game,
            username: self.username,
            level,
            team: self.team,
            role: self.role,
            favorite: self.favorite,
            avatar: String::new(),
        })
    }
}
