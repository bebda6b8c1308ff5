// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation and secret encryption behind a single engine.
//!
//! The engine is stateless apart from its KDF cost and random source. Key
//! material only leaves it wrapped in a [`KeyHandle`].

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use lockbox_config::model::VaultConfig;
use lockbox_core::LockboxError;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN};
use crate::kdf::{self, KEY_LEN};
use crate::random::{RandomSource, SystemRandomSource};
use crate::token::{self, TOKEN_VERSION};

/// An opaque derived encryption key. Zeroed on drop, never printed.
pub struct KeyHandle {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl KeyHandle {
    fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl fmt::Debug for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyHandle([REDACTED])")
    }
}

/// Output of a registration derivation: the fresh salt and its key.
#[derive(Debug)]
pub struct DerivedKeyMaterial {
    /// Lowercase hex of the 16-byte salt, as persisted.
    pub salt_hex: String,
    pub key: KeyHandle,
}

/// PBKDF2 + AES-256-GCM engine.
#[derive(Clone)]
pub struct CipherEngine {
    iterations: NonZeroU32,
    rng: Arc<dyn RandomSource>,
}

impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherEngine")
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

impl Default for CipherEngine {
    fn default() -> Self {
        Self::new(kdf::DEFAULT_ITERATIONS, Arc::new(SystemRandomSource::new()))
    }
}

impl CipherEngine {
    pub fn new(iterations: NonZeroU32, rng: Arc<dyn RandomSource>) -> Self {
        Self { iterations, rng }
    }

    /// Build an engine from validated configuration using the system CSPRNG.
    pub fn from_config(config: &VaultConfig) -> Result<Self, LockboxError> {
        let iterations = NonZeroU32::new(config.pbkdf2_iterations).ok_or_else(|| {
            LockboxError::Config("vault.pbkdf2_iterations must be positive".to_string())
        })?;
        Ok(Self::new(iterations, Arc::new(SystemRandomSource::new())))
    }

    /// Iteration count used for new derivations.
    pub fn iterations(&self) -> NonZeroU32 {
        self.iterations
    }

    /// Derive a key under a freshly generated salt.
    pub fn derive_registration(
        &self,
        password: &SecretString,
    ) -> Result<DerivedKeyMaterial, LockboxError> {
        let salt = kdf::generate_salt(self.rng.as_ref())?;
        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, self.iterations);
        Ok(DerivedKeyMaterial {
            salt_hex: hex::encode(salt),
            key: KeyHandle { key },
        })
    }

    /// Re-derive the key for a stored hex salt at the engine's iteration count.
    pub fn derive_from_salt(
        &self,
        password: &SecretString,
        salt_hex: &str,
    ) -> Result<KeyHandle, LockboxError> {
        self.derive_from_salt_with(password, salt_hex, self.iterations)
    }

    /// Re-derive the key for a stored hex salt at an explicit iteration count.
    pub fn derive_from_salt_with(
        &self,
        password: &SecretString,
        salt_hex: &str,
        iterations: NonZeroU32,
    ) -> Result<KeyHandle, LockboxError> {
        let salt = kdf::decode_salt(salt_hex)?;
        let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt, iterations);
        Ok(KeyHandle { key })
    }

    /// Encrypt `plaintext` into a token. Every call draws a new nonce.
    pub fn encrypt(&self, key: &KeyHandle, plaintext: &str) -> Result<String, LockboxError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce)?;
        let ciphertext = crypto::seal(key.bytes(), nonce, &[TOKEN_VERSION], plaintext.as_bytes())?;
        Ok(token::encode(&nonce, &ciphertext))
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, key: &KeyHandle, token: &str) -> Result<SecretString, LockboxError> {
        let parsed = token::decode(token)?;
        let plaintext = Zeroizing::new(crypto::open(
            key.bytes(),
            &parsed.nonce,
            &[TOKEN_VERSION],
            &parsed.ciphertext,
        )?);
        let text = std::str::from_utf8(&plaintext).map_err(|_| LockboxError::MalformedToken)?;
        Ok(SecretString::from(text.to_string()))
    }
}
