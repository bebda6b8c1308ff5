// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle with scoped, per-call connections.
//!
//! A [`Database`] holds only the file path and busy timeout. Every store call
//! opens its own connection, runs, and drops it on every exit path, so the
//! credential and settings stores can share one file without extra locking.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lockbox_config::model::StorageConfig;
use lockbox_core::StoreError;
use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

use crate::migrations;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the SQLite file backing both stores. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run
    /// pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(path.as_ref(), true, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open the database described by the `[storage]` config section.
    pub fn open_with_config(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::open_with(
            Path::new(&config.database_path),
            config.wal_mode,
            Duration::from_millis(config.busy_timeout_ms),
        )
    }

    fn open_with(path: &Path, wal_mode: bool, busy_timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StoreError::storage)?;
        }

        let db = Self {
            path: path.to_path_buf(),
            busy_timeout,
        };

        let mut conn = db.connect()?;
        if wal_mode {
            // journal_mode is persistent, so setting it once per file is enough.
            let mode: String = conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
                .map_err(map_db_err)?;
            debug!(journal_mode = %mode, "journal mode set");
        }
        migrations::run_migrations(&mut conn)?;

        debug!(path = %db.path.display(), "database opened");
        Ok(db)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(map_db_err)?;
        conn.busy_timeout(self.busy_timeout).map_err(map_db_err)?;
        Ok(conn)
    }

    /// Run `f` on a fresh connection that is closed when the call returns.
    pub fn call<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        f(&conn).map_err(map_db_err)
    }

    /// Run `f` inside an immediate transaction on a fresh connection.
    ///
    /// Commits only if `f` succeeds; any error rolls everything back.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(map_db_err)?;
        let value = f(&tx).map_err(map_db_err)?;
        tx.commit().map_err(map_db_err)?;
        Ok(value)
    }
}

/// Classify a rusqlite error: unique violations become `DuplicateName`,
/// everything else is an opaque storage failure.
pub(crate) fn map_db_err(e: rusqlite::Error) -> StoreError {
    if is_unique_violation(&e) {
        StoreError::DuplicateName
    } else {
        StoreError::storage(e)
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("passwords.db");

        let db = Database::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn open_creates_both_tables() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("schema.db")).unwrap();

        let tables: Vec<String> = db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' \
                     AND name IN ('password_entries', 'app_settings') ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .unwrap();

        assert_eq!(tables, vec!["app_settings", "password_entries"]);
    }

    #[test]
    fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twice.db");
        Database::open(&path).unwrap();
        Database::open(&path).unwrap();
    }

    #[test]
    fn open_with_config_respects_wal_setting() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("cfg.db").to_string_lossy().into_owned(),
            wal_mode: false,
            busy_timeout_ms: 100,
        };
        let db = Database::open_with_config(&config).unwrap();
        let mode: String = db
            .call(|conn| conn.query_row("PRAGMA journal_mode", [], |row| row.get(0)))
            .unwrap();
        assert_ne!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("tx.db")).unwrap();

        let result: Result<(), StoreError> = db.transaction(|conn| {
            conn.execute(
                "INSERT INTO app_settings (key, value) VALUES ('a', '1')",
                [],
            )?;
            conn.execute(
                "INSERT INTO app_settings (key, value) VALUES ('a', '2')",
                [],
            )?;
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::DuplicateName)));

        let count: i64 = db
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0)))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn missing_table_is_storage_error_not_duplicate() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("err.db")).unwrap();
        let result = db.call(|conn| conn.execute("INSERT INTO nope (x) VALUES (1)", []));
        assert!(matches!(result, Err(StoreError::Storage { .. })));
    }
}
