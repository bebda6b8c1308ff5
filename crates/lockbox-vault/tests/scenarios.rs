// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault behavior over a real SQLite store.

use std::num::NonZeroU32;
use std::sync::Arc;

use lockbox_core::{CredentialStore, LockboxError, SettingsStore, VaultState};
use lockbox_storage::{Database, SqliteStorage};
use lockbox_vault::{CipherEngine, MASTER_SALT_SETTING_KEY, SystemRandomSource, Vault};
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

fn pw(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn engine() -> CipherEngine {
    CipherEngine::new(
        NonZeroU32::new(1_000).unwrap(),
        Arc::new(SystemRandomSource::new()),
    )
}

fn open_vault(dir: &TempDir) -> Vault<SqliteStorage> {
    let db = Database::open(dir.path().join("passwords.db")).unwrap();
    Vault::new(SqliteStorage::new(db), engine())
}

#[test]
fn register_login_save_retrieve() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);

    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();
    vault.save_entry("email", "s3cret").unwrap();

    assert_eq!(vault.retrieve_entry("email").unwrap().expose_secret(), "s3cret");
}

#[test]
fn wrong_password_keeps_vault_locked() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();

    assert!(matches!(
        vault.login(&pw("wrongpw")),
        Err(LockboxError::AuthenticationFailed)
    ));
    assert_eq!(vault.state().unwrap(), VaultState::LoggedOut);
    assert!(matches!(
        vault.save_entry("email", "s3cret"),
        Err(LockboxError::NotAuthenticated)
    ));

    vault.login(&pw("masterpw")).unwrap();
    vault.save_entry("email", "s3cret").unwrap();
}

#[test]
fn login_before_register_is_not_registered() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    assert!(matches!(
        vault.login(&pw("masterpw")),
        Err(LockboxError::NotRegistered)
    ));
}

#[test]
fn deleting_unknown_name_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();

    assert!(matches!(
        vault.delete_entry_by_name("ghost"),
        Err(LockboxError::NotFound)
    ));
}

#[test]
fn logout_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.logout();
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();
    vault.logout();
    vault.logout();
    assert!(!vault.is_logged_in());
}

#[test]
fn second_registration_keeps_original_salt() {
    let dir = tempfile::tempdir().unwrap();
    let vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    let salt = vault.store().get(MASTER_SALT_SETTING_KEY).unwrap();

    assert!(matches!(
        vault.register(&pw("otherpw")),
        Err(LockboxError::AlreadyRegistered)
    ));
    assert_eq!(vault.store().get(MASTER_SALT_SETTING_KEY).unwrap(), salt);
}

#[test]
fn duplicate_name_keeps_first_secret() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();

    vault.save_entry("x", "p1").unwrap();
    assert!(matches!(
        vault.save_entry("x", "p2"),
        Err(LockboxError::DuplicateName)
    ));
    assert_eq!(vault.store().list_all().unwrap().len(), 1);
    assert_eq!(vault.retrieve_entry("x").unwrap().expose_secret(), "p1");
}

#[test]
fn list_is_ordered_by_name_and_has_no_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();
    vault.save_entry("zeta", "z-secret").unwrap();
    vault.save_entry("alpha", "a-secret").unwrap();
    vault.save_entry("mid", "m-secret").unwrap();

    let listed = vault.list_entries().unwrap();
    let names: Vec<_> = listed.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);

    let rendered = format!("{listed:?}");
    assert!(!rendered.contains("secret"));
}

#[test]
fn vault_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut vault = open_vault(&dir);
        vault.register(&pw("masterpw")).unwrap();
        vault.login(&pw("masterpw")).unwrap();
        vault.save_entry("email", "s3cret").unwrap();
    }

    let mut vault = open_vault(&dir);
    assert_eq!(vault.state().unwrap(), VaultState::LoggedOut);
    vault.login(&pw("masterpw")).unwrap();
    assert_eq!(vault.retrieve_entry("email").unwrap().expose_secret(), "s3cret");
}

#[test]
fn tampered_entry_fails_authentication() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();
    let id = vault.save_entry("email", "s3cret").unwrap();

    let garbled = lockbox_core::CredentialPatch {
        encrypted_secret: Some("AQ".repeat(40)),
        ..Default::default()
    };
    assert!(vault.store().update_partial(id, &garbled).unwrap());
    assert!(matches!(
        vault.retrieve_entry("email"),
        Err(LockboxError::AuthenticationFailed)
    ));

    let truncated = lockbox_core::CredentialPatch {
        encrypted_secret: Some("AQID".to_string()),
        ..Default::default()
    };
    vault.store().update_partial(id, &truncated).unwrap();
    assert!(matches!(
        vault.retrieve_entry("email"),
        Err(LockboxError::MalformedToken)
    ));
}

#[test]
fn entries_from_a_different_salt_fail_authentication() {
    let dir = tempfile::tempdir().unwrap();
    let mut vault = open_vault(&dir);
    vault.register(&pw("masterpw")).unwrap();
    vault.login(&pw("masterpw")).unwrap();
    vault.save_entry("email", "s3cret").unwrap();

    let foreign_dir = tempfile::tempdir().unwrap();
    let mut foreign = open_vault(&foreign_dir);
    foreign.register(&pw("masterpw")).unwrap();
    foreign.login(&pw("masterpw")).unwrap();
    foreign.save_entry("stale", "old").unwrap();
    let stale = foreign.store().find_by_name("stale").unwrap().unwrap();

    vault
        .store()
        .insert(&lockbox_core::NewCredential {
            name: "stale".into(),
            encrypted_secret: stale.encrypted_secret,
            key_salt: stale.key_salt,
        })
        .unwrap();
    assert!(matches!(
        vault.retrieve_entry("stale"),
        Err(LockboxError::AuthenticationFailed)
    ));
}
