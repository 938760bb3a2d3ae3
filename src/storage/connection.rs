use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::RecordsError;

use super::KeyValueStore;

/// SQLite-backed key-value store. All entries live in a single two-column
/// table, so the file stays a drop-in replacement for the browser's local
/// storage: one row per key, the value being the serialized payload.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`, creating parent
    /// directories and the schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        ensure_schema(&conn)?;
        debug!(path = %path.display(), "opened record store");
        Ok(Self { conn })
    }

    /// A throwaway store living only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read {key}"))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("failed to write {key}"))?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> crate::error::Result<Option<String>> {
        let value = self.read(key).map_err(storage_error)?;
        debug!(key, found = value.is_some(), "store read");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> crate::error::Result<()> {
        self.write(key, value).map_err(storage_error)?;
        debug!(key, bytes = value.len(), "store write");
        Ok(())
    }
}

/// Create the key-value table if it does not exist yet.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_entries table")?;
    Ok(())
}

/// Flatten an `anyhow` chain into the domain's storage error.
fn storage_error(err: anyhow::Error) -> RecordsError {
    RecordsError::Storage(format!("{err:#}"))
}
