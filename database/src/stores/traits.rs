use super::super::{DatabaseError, NewPlayer, PlayerRecord};
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a new record stamped with the current time and returns its id.
    /// A taken username fails with [`DatabaseError::DuplicateUsername`] and
    /// leaves the store unchanged.
    async fn create(&self, player: &NewPlayer) -> Result<i64, DatabaseError>;
    async fn list_all(&self) -> Result<Vec<PlayerRecord>, DatabaseError>;
    /// Deleting an id that does not exist is not an error.
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
    async fn top_n_by_level(&self, n: usize) -> Result<Vec<PlayerRecord>, DatabaseError>;
    async fn count(&self) -> Result<usize, DatabaseError>;
}
