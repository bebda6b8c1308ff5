// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault service: registration, login state, and credential operations.
//!
//! A vault is `Unregistered` until a master salt is stored, `LoggedOut` while
//! no key is held, and `LoggedIn` while a [`KeyHandle`] derived from the master
//! password is held in memory. The key is zeroed when the session is dropped.

use std::fmt;
use std::num::NonZeroU32;

use lockbox_core::{
    CredentialPatch, EntrySummary, LockboxError, NewCredential, ReencryptedSecret, StoreError,
    VaultState, VaultStorage,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::cipher::{CipherEngine, KeyHandle};

/// Settings key holding the hex master-key salt.
pub const MASTER_SALT_SETTING_KEY: &str = "master_password_salt";

/// Settings key holding the encrypted verification probe.
pub const MASTER_CHECK_SETTING_KEY: &str = "master_password_check";

/// Settings key holding the PBKDF2 iteration count used at registration.
pub const KDF_ITERATIONS_SETTING_KEY: &str = "master_password_kdf_iterations";

const VERIFICATION_PROBE: &str = "lockbox-master-key-check";

/// Live key material for the logged-in session.
struct Session {
    key: KeyHandle,
    salt_hex: String,
}

/// The credential vault over a pluggable store.
pub struct Vault<S> {
    store: S,
    cipher: CipherEngine,
    session: Option<Session>,
}

impl<S> fmt::Debug for Vault<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("cipher", &self.cipher)
            .field("logged_in", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: VaultStorage> Vault<S> {
    /// Create a logged-out vault over `store`.
    pub fn new(store: S, cipher: CipherEngine) -> Self {
        Self {
            store,
            cipher,
            session: None,
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a master password salt has been stored.
    pub fn is_master_password_set(&self) -> Result<bool, LockboxError> {
        Ok(self.store.get(MASTER_SALT_SETTING_KEY)?.is_some())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> Result<VaultState, LockboxError> {
        if self.session.is_some() {
            return Ok(VaultState::LoggedIn);
        }
        if self.is_master_password_set()? {
            Ok(VaultState::LoggedOut)
        } else {
            Ok(VaultState::Unregistered)
        }
    }

    /// Register the master password. Valid only while unregistered.
    ///
    /// Stores the salt, a verifier token, and the KDF iteration count in one
    /// insert-only transaction, so a concurrent registration can never
    /// overwrite an existing salt. Does not log in.
    pub fn register(&self, password: &SecretString) -> Result<(), LockboxError> {
        if self.is_master_password_set()? {
            warn!("registration refused: master password already set");
            return Err(LockboxError::AlreadyRegistered);
        }

        let material = self.cipher.derive_registration(password)?;
        let check = self.cipher.encrypt(&material.key, VERIFICATION_PROBE)?;
        let iterations = self.cipher.iterations().to_string();
        let written = self.store.insert_all_new(&[
            (MASTER_SALT_SETTING_KEY, material.salt_hex.as_str()),
            (MASTER_CHECK_SETTING_KEY, check.as_str()),
            (KDF_ITERATIONS_SETTING_KEY, iterations.as_str()),
        ]);
        match written {
            Ok(()) => {}
            Err(StoreError::DuplicateName) => {
                warn!("registration refused: master password was set concurrently");
                return Err(LockboxError::AlreadyRegistered);
            }
            Err(e) => return Err(e.into()),
        }

        info!(iterations = %iterations, "master password registered");
        Ok(())
    }

    /// Derive and verify the key for `password`, holding it on success.
    ///
    /// Any failure leaves the vault logged out, including when it was
    /// previously logged in.
    pub fn login(&mut self, password: &SecretString) -> Result<(), LockboxError> {
        self.session = None;

        let salt_hex = self
            .store
            .get(MASTER_SALT_SETTING_KEY)?
            .ok_or(LockboxError::NotRegistered)?;
        let iterations = self.kdf_iterations()?;
        let key = self.cipher.derive_from_salt_with(password, &salt_hex, iterations)?;

        if let Err(e) = self.verify_key(&key) {
            if matches!(e, LockboxError::AuthenticationFailed) {
                warn!("login failed: master password did not verify");
            }
            return Err(e);
        }

        self.session = Some(Session { key, salt_hex });
        info!("vault unlocked");
        Ok(())
    }

    /// Drop the held key. Calling this while logged out is a no-op.
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("vault locked");
        }
    }

    /// Encrypt and store a new entry, returning its id.
    pub fn save_entry(&self, name: &str, plaintext: &str) -> Result<i64, LockboxError> {
        let session = self.session()?;
        validate_name(name)?;

        let encrypted_secret = self.cipher.encrypt(&session.key, plaintext)?;
        let id = self.store.insert(&NewCredential {
            name: name.to_string(),
            encrypted_secret,
            key_salt: session.salt_hex.clone(),
        })?;

        debug!(id, name, "entry saved");
        Ok(id)
    }

    /// Decrypt the entry stored under `name`.
    pub fn retrieve_entry(&self, name: &str) -> Result<SecretString, LockboxError> {
        let session = self.session()?;
        let entry = self
            .store
            .find_by_name(name)?
            .ok_or(LockboxError::NotFound)?;

        if entry.key_salt != session.salt_hex {
            warn!(id = entry.id, "entry was written under a different master salt");
        }
        self.cipher.decrypt(&session.key, &entry.encrypted_secret)
    }

    /// Entry metadata ordered by name. Never includes secrets.
    pub fn list_entries(&self) -> Result<Vec<EntrySummary>, LockboxError> {
        self.session()?;
        Ok(self
            .store
            .list_all()?
            .iter()
            .map(|entry| entry.summary())
            .collect())
    }

    /// Rename and/or re-encrypt an entry. `None` fields are left untouched.
    pub fn update_entry(
        &self,
        id: i64,
        new_name: Option<&str>,
        new_plaintext: Option<&str>,
    ) -> Result<(), LockboxError> {
        let session = self.session()?;
        if let Some(name) = new_name {
            validate_name(name)?;
        }

        let encrypted_secret = new_plaintext
            .map(|plaintext| self.cipher.encrypt(&session.key, plaintext))
            .transpose()?;
        let patch = CredentialPatch {
            name: new_name.map(str::to_string),
            key_salt: encrypted_secret.as_ref().map(|_| session.salt_hex.clone()),
            encrypted_secret,
        };

        let found = if patch.is_empty() {
            self.store.find_by_id(id)?.is_some()
        } else {
            self.store.update_partial(id, &patch)?
        };
        if !found {
            return Err(LockboxError::NotFound);
        }

        debug!(
            id,
            renamed = new_name.is_some(),
            reencrypted = new_plaintext.is_some(),
            "entry updated"
        );
        Ok(())
    }

    /// Delete an entry by id.
    pub fn delete_entry(&self, id: i64) -> Result<(), LockboxError> {
        self.session()?;
        if !self.store.delete_by_id(id)? {
            return Err(LockboxError::NotFound);
        }
        debug!(id, "entry deleted");
        Ok(())
    }

    /// Delete an entry by exact name.
    pub fn delete_entry_by_name(&self, name: &str) -> Result<(), LockboxError> {
        self.session()?;
        let entry = self
            .store
            .find_by_name(name)?
            .ok_or(LockboxError::NotFound)?;
        if !self.store.delete_by_id(entry.id)? {
            return Err(LockboxError::NotFound);
        }
        debug!(id = entry.id, "entry deleted");
        Ok(())
    }

    /// Re-key the vault under a new master password.
    ///
    /// Every entry is decrypted under the held key and re-encrypted under a
    /// key derived from `new` with a fresh salt. Entries and settings are
    /// rewritten in a single transaction; on any failure nothing changes and
    /// the current session is kept.
    pub fn change_master_password(
        &mut self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<(), LockboxError> {
        let session = self.session()?;

        let iterations = self.kdf_iterations()?;
        let current_key =
            self.cipher
                .derive_from_salt_with(current, &session.salt_hex, iterations)?;
        match self.store.get(MASTER_CHECK_SETTING_KEY)? {
            Some(check) => self.check_probe(&current_key, &check)?,
            None => self.adopt_unverified_vault(&current_key)?,
        }

        let plaintexts = self
            .store
            .list_all()?
            .into_iter()
            .map(|entry| {
                let plaintext = self.cipher.decrypt(&session.key, &entry.encrypted_secret)?;
                Ok((entry.id, plaintext))
            })
            .collect::<Result<Vec<_>, LockboxError>>()?;

        let material = self.cipher.derive_registration(new)?;
        let reencrypted = plaintexts
            .iter()
            .map(|(id, plaintext)| {
                Ok(ReencryptedSecret {
                    id: *id,
                    encrypted_secret: self.cipher.encrypt(&material.key, plaintext.expose_secret())?,
                })
            })
            .collect::<Result<Vec<_>, LockboxError>>()?;
        let check = self.cipher.encrypt(&material.key, VERIFICATION_PROBE)?;
        let new_iterations = self.cipher.iterations().to_string();

        self.store.rotate_master_key(
            &material.salt_hex,
            &reencrypted,
            &[
                (MASTER_SALT_SETTING_KEY, material.salt_hex.as_str()),
                (MASTER_CHECK_SETTING_KEY, check.as_str()),
                (KDF_ITERATIONS_SETTING_KEY, new_iterations.as_str()),
            ],
        )?;

        self.session = Some(Session {
            key: material.key,
            salt_hex: material.salt_hex,
        });
        info!(entries = reencrypted.len(), "master password changed");
        Ok(())
    }

    fn session(&self) -> Result<&Session, LockboxError> {
        self.session.as_ref().ok_or(LockboxError::NotAuthenticated)
    }

    /// PBKDF2 iteration count this vault logs in with: the stored count, or
    /// the engine's configured count when none is stored.
    pub fn kdf_iterations(&self) -> Result<NonZeroU32, LockboxError> {
        match self.store.get(KDF_ITERATIONS_SETTING_KEY)? {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    LockboxError::Internal(format!("stored KDF iteration count `{raw}` is invalid"))
                }),
            None => Ok(self.cipher.iterations()),
        }
    }

    /// Round-trip a fresh probe, then check the stored verifier.
    fn verify_key(&self, key: &KeyHandle) -> Result<(), LockboxError> {
        let probe = self.cipher.encrypt(key, VERIFICATION_PROBE)?;
        self.check_probe(key, &probe)?;

        match self.store.get(MASTER_CHECK_SETTING_KEY)? {
            Some(check) => self.check_probe(key, &check),
            None => self.adopt_unverified_vault(key),
        }
    }

    fn check_probe(&self, key: &KeyHandle, token: &str) -> Result<(), LockboxError> {
        let plaintext = self.cipher.decrypt(key, token)?;
        if plaintext.expose_secret() != VERIFICATION_PROBE {
            return Err(LockboxError::AuthenticationFailed);
        }
        Ok(())
    }

    /// Vaults written before the verifier existed: prove the key against the
    /// first stored entry, then persist a verifier.
    fn adopt_unverified_vault(&self, key: &KeyHandle) -> Result<(), LockboxError> {
        if let Some(entry) = self.store.list_all()?.first() {
            self.cipher.decrypt(key, &entry.encrypted_secret)?;
        }
        let check = self.cipher.encrypt(key, VERIFICATION_PROBE)?;
        self.store.upsert(MASTER_CHECK_SETTING_KEY, &check)?;
        warn!("vault had no key verifier; one has been written");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), LockboxError> {
    if name.trim().is_empty() {
        return Err(LockboxError::InvalidName);
    }
    Ok(())
}
