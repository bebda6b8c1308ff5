// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Callers supply the 96-bit nonce; it must never repeat under the same key.

use lockbox_core::LockboxError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};

/// Nonce length for AES-256-GCM.
pub const NONCE_LEN: usize = 12;

/// Authentication tag length appended to every ciphertext.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, LockboxError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| LockboxError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, binding `aad` into the tag.
///
/// Returns the ciphertext with the 16-byte tag appended.
pub fn seal(
    key: &[u8; 32],
    nonce: [u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, LockboxError> {
    let sealing_key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    sealing_key
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| LockboxError::Internal("AES-256-GCM encryption failed".to_string()))?;
    Ok(in_out)
}

/// Decrypt `ciphertext` (tag included).
///
/// A wrong key, a different `aad`, or any tampering yields
/// [`LockboxError::AuthenticationFailed`].
pub fn open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, LockboxError> {
    let opening_key = aead_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = opening_key
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| LockboxError::AuthenticationFailed)?;
    Ok(plaintext.to_vec())
}
