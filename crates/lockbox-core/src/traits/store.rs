// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contracts for credential entries and application settings.
//!
//! Every write is atomic per call. Implementations must report uniqueness
//! violations as [`StoreError::DuplicateName`] and leave state untouched.

use crate::error::StoreError;
use crate::types::{
    AppSetting, CredentialEntry, CredentialPatch, NewCredential, ReencryptedSecret,
};

/// Durable table of encrypted credential entries with a unique `name`.
pub trait CredentialStore {
    /// Insert a new entry and return its assigned id.
    fn insert(&self, entry: &NewCredential) -> Result<i64, StoreError>;

    /// Look up an entry by id.
    fn find_by_id(&self, id: i64) -> Result<Option<CredentialEntry>, StoreError>;

    /// Look up an entry by exact (case-sensitive) name.
    fn find_by_name(&self, name: &str) -> Result<Option<CredentialEntry>, StoreError>;

    /// All entries ordered by name ascending.
    fn list_all(&self) -> Result<Vec<CredentialEntry>, StoreError>;

    /// Apply the non-`None` fields of `patch` to row `id`.
    ///
    /// Returns `true` if a row was changed, `false` if no row matched or the
    /// patch is empty.
    fn update_partial(&self, id: i64, patch: &CredentialPatch) -> Result<bool, StoreError>;

    /// Delete row `id`. Returns `true` if a row was removed.
    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError>;
}

/// Durable key/value table with a unique, non-empty `key`.
pub trait SettingsStore {
    /// Full setting row for `key`, if present.
    fn find(&self, key: &str) -> Result<Option<AppSetting>, StoreError>;

    /// Insert or overwrite `key`.
    fn upsert(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Insert or overwrite several keys in one transaction.
    fn upsert_all(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Insert several keys in one transaction, none of which may exist yet.
    ///
    /// If any key is already present nothing is written and the call fails
    /// with [`StoreError::DuplicateName`].
    fn insert_all_new(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Value stored under `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.find(key)?.map(|setting| setting.value))
    }
}

/// Both stores over one backing file, plus the single multi-row operation
/// the vault needs.
pub trait VaultStorage: CredentialStore + SettingsStore {
    /// Rewrite every listed entry with its new ciphertext and `key_salt`, and
    /// upsert `settings`, all in one transaction.
    fn rotate_master_key(
        &self,
        key_salt: &str,
        reencrypted: &[ReencryptedSecret],
        settings: &[(&str, &str)],
    ) -> Result<(), StoreError>;
}
