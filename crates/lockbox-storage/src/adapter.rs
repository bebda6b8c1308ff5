// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the store traits.

use lockbox_core::{
    AppSetting, CredentialEntry, CredentialPatch, CredentialStore, NewCredential,
    ReencryptedSecret, SettingsStore, StoreError, VaultStorage,
};
use tracing::debug;

use crate::database::Database;
use crate::queries;

/// SQLite-backed credential and settings store.
///
/// Wraps a [`Database`] handle and delegates every operation to the typed
/// query modules.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl CredentialStore for SqliteStorage {
    fn insert(&self, entry: &NewCredential) -> Result<i64, StoreError> {
        queries::credentials::insert(&self.db, entry)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<CredentialEntry>, StoreError> {
        queries::credentials::find_by_id(&self.db, id)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<CredentialEntry>, StoreError> {
        queries::credentials::find_by_name(&self.db, name)
    }

    fn list_all(&self) -> Result<Vec<CredentialEntry>, StoreError> {
        queries::credentials::list_all(&self.db)
    }

    fn update_partial(&self, id: i64, patch: &CredentialPatch) -> Result<bool, StoreError> {
        queries::credentials::update_partial(&self.db, id, patch)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        queries::credentials::delete_by_id(&self.db, id)
    }
}

impl SettingsStore for SqliteStorage {
    fn find(&self, key: &str) -> Result<Option<AppSetting>, StoreError> {
        queries::settings::find(&self.db, key)
    }

    fn upsert(&self, key: &str, value: &str) -> Result<(), StoreError> {
        queries::settings::upsert(&self.db, key, value)
    }

    fn upsert_all(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        queries::settings::upsert_all(&self.db, pairs)
    }

    fn insert_all_new(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        queries::settings::insert_all_new(&self.db, pairs)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        queries::settings::delete(&self.db, key)
    }
}

impl VaultStorage for SqliteStorage {
    fn rotate_master_key(
        &self,
        key_salt: &str,
        reencrypted: &[ReencryptedSecret],
        settings: &[(&str, &str)],
    ) -> Result<(), StoreError> {
        self.db.transaction(|conn| {
            queries::credentials::rewrite_secrets(conn, key_salt, reencrypted)?;
            for (key, value) in settings {
                queries::settings::upsert_on(conn, key, value)?;
            }
            Ok(())
        })?;
        debug!(entries = reencrypted.len(), "master key rotated in storage");
        Ok(())
    }
}
