//! SQLite-backed history persistence.
//!
//! The retained window is small and always rewritten whole, so entries
//! are stored as a single JSON document under one key rather than one
//! row per entry.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::types::{HistoryEntry, HistoryError};

const HISTORY_KEY: &str = "conversion_history";

/// Persistence seam for the history store.
pub trait HistoryBackend: Send + Sync {
    /// Load the persisted entries, newest first.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Replace the persisted entries with the given snapshot.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
}

/// SQLite-backed history persistence.
pub struct SqliteHistoryBackend {
    conn: Mutex<Connection>,
}

impl SqliteHistoryBackend {
    /// Open a history database, creating the file and table if needed.
    pub fn new(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open(path).map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory history database (useful for testing).
    pub fn in_memory() -> Result<Self, HistoryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), HistoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(())
    }
}

impl HistoryBackend for SqliteHistoryBackend {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let conn = self.conn.lock().unwrap();

        let json: Option<String> = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?",
                params![HISTORY_KEY],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                _ => Err(HistoryError::Database(e.to_string())),
            })?;

        match json {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| HistoryError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![HISTORY_KEY, &json],
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::catalog::Format;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            file_name: name.to_string(),
            source_format: Format::Txt,
            target_format: Format::Pdf,
            size_bytes: 42,
            completed_at: Utc::now(),
            download_path: format!("/downloads/x/{}", name),
            converted_file_name: name.to_string(),
        }
    }

    #[test]
    fn test_load_empty_database() {
        let backend = SqliteHistoryBackend::in_memory().unwrap();
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let backend = SqliteHistoryBackend::in_memory().unwrap();
        let entries = vec![entry("a.pdf"), entry("b.pdf")];

        backend.save(&entries).unwrap();
        let loaded = backend.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].file_name, "a.pdf");
        assert_eq!(loaded[1].file_name, "b.pdf");
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let backend = SqliteHistoryBackend::in_memory().unwrap();
        backend.save(&[entry("old.pdf")]).unwrap();
        backend.save(&[entry("new.pdf")]).unwrap();

        let loaded = backend.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].file_name, "new.pdf");
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        {
            let backend = SqliteHistoryBackend::new(&path).unwrap();
            backend.save(&[entry("kept.pdf")]).unwrap();
        }

        let backend = SqliteHistoryBackend::new(&path).unwrap();
        let loaded = backend.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].file_name, "kept.pdf");
    }
}
