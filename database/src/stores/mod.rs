pub mod sqlite_store;
pub mod traits;

pub use sqlite_store::SqliteRecordStore;
pub use traits::RecordStore;
