use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    Query(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),
}

impl DatabaseError {
    /// Classifies an insert failure, separating UNIQUE violations on the
    /// username column from every other query error.
    pub(crate) fn from_insert(err: sqlx::Error, username: Option<&str>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::DuplicateUsername(username.unwrap_or_default().to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }

    pub fn is_duplicate_username(&self) -> bool {
        matches!(self, Self::DuplicateUsername(_))
    }
}
