//! SQLite record store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::record::{CardRecord, ExtractedRecord, Field};

use super::RecordStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS card_records (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    id_number     TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    address       TEXT NOT NULL,
    gender        TEXT NOT NULL,
    postal_code   TEXT NOT NULL,
    created_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_card_records_created_at ON card_records(created_at);
";

/// Durable store backed by a single SQLite connection.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;

        info!("Opened record store at {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Write("connection lock poisoned".to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn save(&self, record: &CardRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let fields = &record.fields;

        conn.execute(
            "INSERT INTO card_records
                (id, name, id_number, date_of_birth, address, gender, postal_code, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id.to_string(),
                fields.name.as_str(),
                fields.id_number.as_str(),
                fields.date_of_birth.as_str(),
                fields.address.as_str(),
                fields.gender.as_str(),
                fields.postal_code.as_str(),
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError> {
        let conn = self.lock()?;

        let record = conn
            .query_row(
                "SELECT id, name, id_number, date_of_birth, address, gender, postal_code, created_at
                 FROM card_records WHERE id = ?1",
                params![id.to_string()],
                read_row,
            )
            .optional()?;

        Ok(record)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM card_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(7)?;

    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(CardRecord {
        id,
        fields: ExtractedRecord {
            name: Field::from_marked(row.get(1)?),
            id_number: Field::from_marked(row.get(2)?),
            date_of_birth: Field::from_marked(row.get(3)?),
            address: Field::from_marked(row.get(4)?),
            gender: Field::from_marked(row.get(5)?),
            postal_code: Field::from_marked(row.get(6)?),
        },
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CardRecord {
        CardRecord::new(ExtractedRecord {
            name: Field::Found("Rajeev Kumar".to_string()),
            id_number: Field::Found("123456789123".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_save_and_get() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let record = sample();

        store.save(&record).unwrap();

        let loaded = store.get(record.id).unwrap().unwrap();
        assert_eq!(loaded.fields, record.fields);
        assert_eq!(loaded.created_at.timestamp(), record.created_at.timestamp());
        assert_eq!(loaded.fields.address, Field::NotFound);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_get_unknown_id() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        assert!(store.get(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_is_a_write_error() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let record = sample();

        store.save(&record).unwrap();
        assert!(matches!(store.save(&record), Err(StoreError::Database(_))));
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("records.sqlite3");
        let record = sample();

        SqliteRecordStore::open(&path).unwrap().save(&record).unwrap();

        let reopened = SqliteRecordStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert!(reopened.get(record.id).unwrap().is_some());
    }
}
