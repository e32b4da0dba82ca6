// 🔐 Local Flag Store
// Persistent boolean switches, one row per key (SQLite + WAL)

use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Set once the user accepted (or declined) biometric unlock
pub const ALLOW_FINGERPRINT: &str = "@allow-fingerprint";

/// Boolean key-value storage that survives restarts.
///
/// `get` returns `None` for keys never written; callers treat that as
/// "the user has not decided yet", which is different from `Some(false)`.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<bool>, StoreError>;
    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteFlagStore {
    conn: Connection,
}

impl SqliteFlagStore {
    /// Open (or create) the store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS flags (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteFlagStore { conn })
    }
}

impl FlagStore for SqliteFlagStore {
    fn get(&self, key: &str) -> Result<Option<bool>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM flags WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;

        // Values are stored as the strings "true"/"false"; anything else counts as unset.
        Ok(raw.and_then(|v| match v.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }))
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO flags (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value.to_string(), chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Non-persistent store, for tests and for running without a data directory
#[derive(Debug, Default, Clone)]
pub struct MemoryFlagStore {
    flags: HashMap<String, bool>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.flags.get(key).copied())
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.flags.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
