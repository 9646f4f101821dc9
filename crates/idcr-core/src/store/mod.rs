//! Record persistence.

mod sqlite;

pub use sqlite::SqliteRecordStore;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::warn;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::config::StorageConfig;
use crate::models::record::CardRecord;

/// Trait for record stores.
pub trait RecordStore: Send + Sync {
    /// Store identifier used in logs.
    fn name(&self) -> &'static str;

    /// Persist a processed card.
    fn save(&self, record: &CardRecord) -> Result<(), StoreError>;

    /// Look up a record by id.
    fn get(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StoreError>;
}

/// Process-local store used when persistence is disabled or unavailable.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<Uuid, CardRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn save(&self, record: &CardRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Write("record map lock poisoned".to_string()))?;
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Write("record map lock poisoned".to_string()))?;
        Ok(records.get(&id).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Write("record map lock poisoned".to_string()))?;
        Ok(records.len())
    }
}

/// Open the store described by `config`.
///
/// Falls back to an in-memory store when persistence is disabled or the
/// database cannot be opened; processing never depends on the database.
pub fn open_store(config: &StorageConfig) -> Arc<dyn RecordStore> {
    if !config.enabled {
        warn!("Record persistence disabled, keeping records in memory");
        return Arc::new(MemoryRecordStore::new());
    }

    match SqliteRecordStore::open(&config.database_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(
                "Could not open record store at {}: {}. Keeping records in memory",
                config.database_path.display(),
                e
            );
            Arc::new(MemoryRecordStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ExtractedRecord;

    #[test]
    fn test_memory_store() {
        let store = MemoryRecordStore::new();
        let record = CardRecord::new(ExtractedRecord::default());

        store.save(&record).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_open_store_disabled() {
        let config = StorageConfig {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(open_store(&config).name(), "memory");
    }

    #[test]
    fn test_open_store_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            enabled: true,
            database_path: dir.path().join("idcr.sqlite3"),
        };
        assert_eq!(open_store(&config).name(), "sqlite");
    }

    #[test]
    fn test_open_store_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file
        let config = StorageConfig {
            enabled: true,
            database_path: dir.path().to_path_buf(),
        };
        assert_eq!(open_store(&config).name(), "memory");
    }
}
