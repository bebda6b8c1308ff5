// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared between the stores and the vault service.

use serde::{Deserialize, Serialize};

/// One encrypted credential as persisted in `password_entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    /// Surrogate id assigned by the store.
    pub id: i64,
    /// Unique, case-sensitive, non-empty name.
    pub name: String,
    /// Opaque authenticated ciphertext token.
    pub encrypted_secret: String,
    /// Hex-encoded master-key salt in effect when the secret was last encrypted.
    pub key_salt: String,
    /// Creation timestamp (`YYYY-MM-DD HH:MM:SS`, UTC), set once by the store.
    pub created_at: String,
}

impl CredentialEntry {
    /// Metadata view with no ciphertext details.
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// A row to insert. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub name: String,
    pub encrypted_secret: String,
    pub key_salt: String,
}

/// Partial update of a credential row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPatch {
    pub name: Option<String>,
    pub encrypted_secret: Option<String>,
    pub key_salt: Option<String>,
}

impl CredentialPatch {
    /// True when the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.encrypted_secret.is_none() && self.key_salt.is_none()
    }
}

/// A re-encrypted secret written during a master key rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencryptedSecret {
    pub id: i64,
    pub encrypted_secret: String,
}

/// Entry metadata handed to callers by `list_entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// A key/value application setting as persisted in `app_settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSetting {
    pub id: i64,
    pub key: String,
    pub value: String,
}

/// Lifecycle state of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultState {
    /// No master password salt exists.
    Unregistered,
    /// Registered, but no key is held.
    LoggedOut,
    /// A verified key is held for this session.
    LoggedIn,
}
