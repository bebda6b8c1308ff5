// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockbox credential vault.
//!
//! Provides the error taxonomy, the persisted record types, and the store
//! traits that persistence backends implement and the vault service consumes.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{LockboxError, StoreError};
pub use traits::{CredentialStore, SettingsStore, VaultStorage};
pub use types::{
    AppSetting, CredentialEntry, CredentialPatch, EntrySummary, NewCredential,
    ReencryptedSecret, VaultState,
};
