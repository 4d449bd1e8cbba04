use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::storage::{Storage, StorageError};

/// SQLite-backed [`Storage`]. Each key holds one text value.
#[derive(Clone)]
pub struct KeyValueRepository {
    pool: DbPool,
}

impl KeyValueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Storage for KeyValueRepository {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now()],
        )?;
        tracing::debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        let rows = conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        tracing::debug!("Removed '{}' ({} rows)", key, rows);
        Ok(())
    }
}
