// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value operations on `app_settings`.

use lockbox_core::{AppSetting, StoreError};
use rusqlite::{Connection, OptionalExtension, params};

use crate::database::Database;

/// Get a setting row by key.
pub fn find(db: &Database, key: &str) -> Result<Option<AppSetting>, StoreError> {
    db.call(|conn| {
        conn.query_row(
            "SELECT id, key, value FROM app_settings WHERE key = ?1",
            params![key],
            |row| {
                Ok(AppSetting {
                    id: row.get(0)?,
                    key: row.get(1)?,
                    value: row.get(2)?,
                })
            },
        )
        .optional()
    })
}

fn check_keys<'a>(mut keys: impl Iterator<Item = &'a str>) -> Result<(), StoreError> {
    if keys.any(|key| key.is_empty()) {
        return Err(StoreError::storage("setting key must not be empty"));
    }
    Ok(())
}

/// Insert or overwrite a single setting.
pub fn upsert(db: &Database, key: &str, value: &str) -> Result<(), StoreError> {
    check_keys(std::iter::once(key))?;
    db.call(|conn| upsert_on(conn, key, value))
}

/// Insert or overwrite several settings atomically.
pub fn upsert_all(db: &Database, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
    check_keys(pairs.iter().map(|(key, _)| *key))?;
    db.transaction(|conn| {
        for (key, value) in pairs {
            upsert_on(conn, key, value)?;
        }
        Ok(())
    })
}

/// Insert settings that must not exist yet, atomically.
///
/// Runs under `BEGIN IMMEDIATE`, so a concurrent writer cannot slip in
/// between the check and the write. An existing key yields `DuplicateName`
/// and rolls back the whole batch.
pub fn insert_all_new(db: &Database, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
    check_keys(pairs.iter().map(|(key, _)| *key))?;
    db.transaction(|conn| {
        let mut stmt = conn.prepare("INSERT INTO app_settings (key, value) VALUES (?1, ?2)")?;
        for (key, value) in pairs {
            stmt.execute(params![key, value])?;
        }
        Ok(())
    })
}

/// Delete a setting. Returns whether it existed.
pub fn delete(db: &Database, key: &str) -> Result<bool, StoreError> {
    db.call(|conn| {
        let changed = conn.execute("DELETE FROM app_settings WHERE key = ?1", params![key])?;
        Ok(changed > 0)
    })
}

/// Upsert on an existing connection or transaction. Keeps the row id stable.
pub(crate) fn upsert_on(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}
