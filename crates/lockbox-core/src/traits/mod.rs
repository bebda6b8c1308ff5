// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store traits implemented by persistence backends.

pub mod store;

pub use store::{CredentialStore, SettingsStore, VaultStorage};
