// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential vault for Lockbox.
//!
//! The master password is stretched with PBKDF2-HMAC-SHA256 into an AES-256-GCM
//! key. Only the salt, a verifier token, and the iteration count are persisted;
//! the key itself lives in memory for the duration of a login and is zeroed
//! when the session ends.

pub mod cipher;
pub mod crypto;
pub mod kdf;
pub mod prompt;
pub mod random;
pub mod token;
pub mod vault;

pub use cipher::{CipherEngine, DerivedKeyMaterial, KeyHandle};
pub use random::{RandomSource, SystemRandomSource};
pub use vault::{MASTER_SALT_SETTING_KEY, Vault};
