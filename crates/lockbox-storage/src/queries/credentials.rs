// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD operations on `password_entries`.

use lockbox_core::{CredentialEntry, CredentialPatch, NewCredential, ReencryptedSecret, StoreError};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::database::Database;

const SELECT_ENTRY: &str =
    "SELECT id, name, encrypted_password, master_key_salt, created_at FROM password_entries";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CredentialEntry> {
    Ok(CredentialEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        encrypted_secret: row.get(2)?,
        key_salt: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a new entry and return its id. A taken name yields `DuplicateName`.
pub fn insert(db: &Database, entry: &NewCredential) -> Result<i64, StoreError> {
    db.call(|conn| {
        conn.execute(
            "INSERT INTO password_entries (name, encrypted_password, master_key_salt)
             VALUES (?1, ?2, ?3)",
            params![entry.name, entry.encrypted_secret, entry.key_salt],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Get an entry by id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<CredentialEntry>, StoreError> {
    db.call(|conn| {
        conn.query_row(&format!("{SELECT_ENTRY} WHERE id = ?1"), params![id], row_to_entry)
            .optional()
    })
}

/// Get an entry by exact name.
pub fn find_by_name(db: &Database, name: &str) -> Result<Option<CredentialEntry>, StoreError> {
    db.call(|conn| {
        conn.query_row(
            &format!("{SELECT_ENTRY} WHERE name = ?1"),
            params![name],
            row_to_entry,
        )
        .optional()
    })
}

/// All entries ordered by name.
pub fn list_all(db: &Database) -> Result<Vec<CredentialEntry>, StoreError> {
    db.call(|conn| {
        let mut stmt = conn.prepare(&format!("{SELECT_ENTRY} ORDER BY name"))?;
        let rows = stmt.query_map([], row_to_entry)?;
        rows.collect()
    })
}

/// Apply the set fields of `patch`. Returns whether a row was changed.
pub fn update_partial(
    db: &Database,
    id: i64,
    patch: &CredentialPatch,
) -> Result<bool, StoreError> {
    if patch.is_empty() {
        return Ok(false);
    }

    let mut assignments = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    if let Some(name) = &patch.name {
        assignments.push("name = ?");
        values.push(name);
    }
    if let Some(secret) = &patch.encrypted_secret {
        assignments.push("encrypted_password = ?");
        values.push(secret);
    }
    if let Some(salt) = &patch.key_salt {
        assignments.push("master_key_salt = ?");
        values.push(salt);
    }
    values.push(&id);

    let sql = format!(
        "UPDATE password_entries SET {} WHERE id = ?",
        assignments.join(", ")
    );
    db.call(|conn| Ok(conn.execute(&sql, values.as_slice())? > 0))
}

/// Delete an entry by id. Returns whether a row was removed.
pub fn delete_by_id(db: &Database, id: i64) -> Result<bool, StoreError> {
    db.call(|conn| {
        let changed = conn.execute("DELETE FROM password_entries WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

/// Overwrite ciphertext and salt for each listed entry on an open transaction.
///
/// A listed id with no row is an error, so the caller's transaction rolls back.
pub(crate) fn rewrite_secrets(
    conn: &Connection,
    key_salt: &str,
    reencrypted: &[ReencryptedSecret],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "UPDATE password_entries SET encrypted_password = ?1, master_key_salt = ?2 WHERE id = ?3",
    )?;
    for secret in reencrypted {
        if stmt.execute(params![secret.encrypted_secret, key_salt, secret.id])? == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows);
        }
    }
    Ok(())
}
