//! SQLite-based store implementation

use fieldlog_util::ScopeKey;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{Store, StoreError, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            -- One serialized session list per (trainer, school) scope
            CREATE TABLE IF NOT EXISTS session_lists (
                scope_key TEXT PRIMARY KEY,
                payload_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

impl Store for SqliteStore {
    fn load(&self, key: &ScopeKey) -> StoreResult<Option<String>> {
        let conn = self.lock()?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM session_lists WHERE scope_key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        debug!(scope = %key, found = payload.is_some(), "Session list loaded");
        Ok(payload)
    }

    fn save(&self, key: &ScopeKey, payload: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let saved_at = fieldlog_util::format_timestamp(&fieldlog_util::now_utc());

        conn.execute(
            r#"
            INSERT INTO session_lists (scope_key, payload_json, saved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(scope_key)
            DO UPDATE SET payload_json = excluded.payload_json, saved_at = excluded.saved_at
            "#,
            params![key.as_str(), payload, saved_at],
        )?;

        debug!(scope = %key, bytes = payload.len(), "Session list saved");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn test_load_missing_scope() {
        let store = SqliteStore::in_memory().unwrap();
        let key = ScopeKey::for_pair("asha@example.org", "sunrise");
        assert!(store.load(&key).unwrap().is_none());
    }

    #[test]
    fn test_save_then_overwrite() {
        let store = SqliteStore::in_memory().unwrap();
        let key = ScopeKey::for_pair("asha@example.org", "sunrise");

        store.save(&key, "[]").unwrap();
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("[]"));

        store.save(&key, r#"[{"id":1}]"#).unwrap();
        assert_eq!(store.load(&key).unwrap().as_deref(), Some(r#"[{"id":1}]"#));
    }

    #[test]
    fn test_scopes_are_isolated() {
        let store = SqliteStore::in_memory().unwrap();
        let sunrise = ScopeKey::for_pair("asha@example.org", "sunrise");
        let hillside = ScopeKey::for_pair("asha@example.org", "hillside");

        store.save(&sunrise, "[1]").unwrap();
        assert!(store.load(&hillside).unwrap().is_none());
    }

    #[test]
    fn test_payload_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldlog.db");
        let key = ScopeKey::for_pair("asha@example.org", "sunrise");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&key, "[\"kept\"]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("[\"kept\"]"));
    }
}
