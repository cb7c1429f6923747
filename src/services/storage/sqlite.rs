use rusqlite::{params, OptionalExtension};

use super::{KeyValueStore, StoreError};
use crate::services::database::Database;

/// Key-value storage backed by the `key_value_store` table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wraps an opened database; the schema must already be initialized.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens the database at `path` and creates the table if needed.
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM key_value_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.connection().execute(
            "INSERT INTO key_value_store (key, value, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.db
            .connection()
            .execute("DELETE FROM key_value_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}
