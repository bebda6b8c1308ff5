// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox credential vault.

use thiserror::Error;

/// The primary error type returned by every vault operation.
///
/// Each variant is a distinct, typed reason so callers can render the right
/// message without matching on error text.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// A master password is already registered for this vault.
    #[error("a master password is already registered")]
    AlreadyRegistered,

    /// No master password has been registered yet.
    #[error("no master password is registered -- run setup first")]
    NotRegistered,

    /// The operation requires a successful login.
    #[error("vault is locked -- log in with the master password first")]
    NotAuthenticated,

    /// Wrong master password, or ciphertext that fails its integrity check.
    ///
    /// The two causes are deliberately reported the same way.
    #[error("authentication failed -- wrong master password or corrupted data")]
    AuthenticationFailed,

    /// The input is not a validly encoded ciphertext token.
    #[error("malformed ciphertext token")]
    MalformedToken,

    /// A stored salt is not valid hex (or has the wrong length).
    #[error("invalid salt encoding")]
    InvalidSaltEncoding,

    /// Entry names must contain at least one non-whitespace character.
    #[error("entry name must not be empty")]
    InvalidName,

    /// Another entry already uses this name.
    #[error("an entry with this name already exists")]
    DuplicateName,

    /// No entry matched the given id or name.
    #[error("entry not found")]
    NotFound,

    /// Underlying storage failure (disk full, file locked, permission denied).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Interactive or piped input could not be read or was rejected.
    #[error("input error: {0}")]
    Input(String),

    /// Configuration errors surfaced at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of a failed store call.
///
/// Stores distinguish a uniqueness violation from every other failure so the
/// service layer can answer "name taken" cleanly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would violate the unique `name` constraint. Nothing was written.
    #[error("unique name constraint violated")]
    DuplicateName,

    /// Any other storage failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap an arbitrary error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Storage { source: err.into() }
    }
}

impl From<StoreError> for LockboxError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName => LockboxError::DuplicateName,
            StoreError::Storage { source } => LockboxError::Storage { source },
        }
    }
}
