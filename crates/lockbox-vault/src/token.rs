// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text encoding of sealed secrets.
//!
//! A token is URL-safe base64 (with padding) over
//! `version (1 byte) || nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use lockbox_core::LockboxError;

use crate::crypto::{NONCE_LEN, TAG_LEN};

/// Current token format version. Also bound into the AEAD tag.
pub const TOKEN_VERSION: u8 = 0x01;

const HEADER_LEN: usize = 1 + NONCE_LEN;

/// A decoded token, ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Render a nonce and ciphertext as a token string.
pub fn encode(nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> String {
    let mut raw = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    raw.push(TOKEN_VERSION);
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(ciphertext);
    URL_SAFE.encode(raw)
}

/// Parse a token string.
///
/// Anything that is not valid base64, carries an unknown version, or is too
/// short to hold a nonce and tag is [`LockboxError::MalformedToken`].
pub fn decode(token: &str) -> Result<Token, LockboxError> {
    let raw = URL_SAFE
        .decode(token.trim())
        .map_err(|_| LockboxError::MalformedToken)?;
    if raw.len() < HEADER_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
        return Err(LockboxError::MalformedToken);
    }

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&raw[1..HEADER_LEN]);
    Ok(Token {
        nonce,
        ciphertext: raw[HEADER_LEN..].to_vec(),
    })
}
