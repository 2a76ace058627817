//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite key/value table with schema versioning
//! - An in-memory store for tests and as a fallback
//! - Typed JSON load/save on top of either backend

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and kv tables
/// - v2: kv.updated_at
const SCHEMA_VERSION: u32 = 2;

/// Key for saved [`crate::stats::UserStats`]
pub const KEY_USER_STATS: &str = "user_stats";
/// Key for a saved [`crate::app::ChallengeState`]
pub const KEY_CHALLENGE: &str = "challenge_state";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
    #[error("migration from v{from} to v{to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// String key/value backend.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Key/value store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database in the OS data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/wordhunt/` or `~/.local/share/wordhunt/`
    /// - macOS: `~/Library/Application Support/wordhunt/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(data_dir.join("wordhunt.db"))
    }

    /// Open or create the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        let store = SqliteStore { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = SqliteStore {
            conn: Connection::open_in_memory()?,
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "wordhunt")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version < SCHEMA_VERSION {
            self.migrate_schema(current_version)?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }

    fn migrate_schema(&self, from_version: u32) -> Result<(), StorageError> {
        let mut current_version = from_version;

        while current_version < SCHEMA_VERSION {
            match current_version {
                1 => {
                    self.conn
                        .execute_batch("ALTER TABLE kv ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0;")?;
                    current_version = 2;
                }
                _ => {
                    return Err(StorageError::MigrationFailed {
                        from: current_version,
                        to: SCHEMA_VERSION,
                        reason: format!("no migration path from version {}", current_version),
                    });
                }
            }
        }

        self.conn
            .execute("UPDATE meta SET schema_version = ?1", params![SCHEMA_VERSION])?;
        debug!(from = from_version, to = SCHEMA_VERSION, "migrated storage schema");

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Key/value store that lives for the session only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Typed access to a key/value backend.
///
/// Values are stored as JSON. Storage never fails a caller: if the backend
/// errors, a warning is logged and the rest of the session runs against an
/// in-memory store. Unreadable values load as the supplied default.
pub struct Persistence {
    backend: Box<dyn KeyValueStore>,
    degraded: bool,
}

impl Persistence {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            degraded: false,
        }
    }

    /// The on-disk database, or memory if it cannot be opened.
    pub fn open_default() -> Self {
        match SqliteStore::open() {
            Ok(store) => Self::new(Box::new(store)),
            Err(err) => {
                warn!(error = %err, "storage unavailable, keeping data in memory");
                Self {
                    backend: Box::new(MemoryStore::new()),
                    degraded: true,
                }
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Whether the session has fallen back to memory
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Load a value, or `default` if it is missing or unreadable.
    pub fn load<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                self.degrade(err);
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable stored value");
                default
            }
        }
    }

    /// Save a value.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "value could not be serialized");
                return;
            }
        };
        if let Err(err) = self.backend.set(key, &raw) {
            self.degrade(err);
            // Memory backends do not fail
            let _ = self.backend.set(key, &raw);
        }
    }

    pub fn remove(&mut self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            self.degrade(err);
        }
    }

    fn degrade(&mut self, err: StorageError) {
        warn!(error = %err, "storage failed, keeping data in memory for this session");
        self.backend = Box::new(MemoryStore::new());
        self.degraded = true;
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
