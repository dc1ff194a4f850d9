//! SQLite-backed record store.
//!
//! A single `kv` table holds every record. Values are the JSON strings
//! produced by [`save_json`](super::save_json); the table does not look
//! inside them.

use rusqlite::{params, Connection};
use std::path::Path;

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

/// SQLite database holding the persisted records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/aurore.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or the database cannot be opened.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join("aurore.db"))
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate().map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            );",
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| StorageError::read(key, e))?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::read(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
                params![key, value],
            )
            .map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .map_err(|e| StorageError::read("*", e))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::read("*", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::read("*", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn keys_are_sorted_and_remove_works() {
        let db = Database::open_memory().unwrap();
        db.set("userData", "{}").unwrap();
        db.set("hasSeenWelcome", "true").unwrap();
        assert_eq!(db.keys().unwrap(), vec!["hasSeenWelcome", "userData"]);
        db.remove("userData").unwrap();
        assert_eq!(db.keys().unwrap(), vec!["hasSeenWelcome"]);
    }

    #[test]
    fn reopen_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aurore.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("hasSeenWelcome", "true").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("hasSeenWelcome").unwrap().as_deref(), Some("true"));
    }
}
