// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.
//!
//! Each command opens the vault, logs in if it needs to, performs one
//! operation, and logs out before returning.

use lockbox_config::LockboxConfig;
use lockbox_core::{EntrySummary, LockboxError, VaultState};
use lockbox_storage::{Database, SqliteStorage};
use lockbox_vault::{CipherEngine, Vault, prompt};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

/// Which entry `rm` should delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    Name(String),
    Id(i64),
}

/// Structured output for `status --json`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub state: VaultState,
    pub database_path: String,
    pub kdf_iterations: u32,
}

/// Open the configured vault, logged out.
pub fn open_vault(config: &LockboxConfig) -> Result<Vault<SqliteStorage>, LockboxError> {
    debug!(path = %config.storage.database_path, "opening vault");
    let db = Database::open_with_config(&config.storage)?;
    let cipher = CipherEngine::from_config(&config.vault)?;
    Ok(Vault::new(SqliteStorage::new(db), cipher))
}

fn unlock(config: &LockboxConfig) -> Result<Vault<SqliteStorage>, LockboxError> {
    let mut vault = open_vault(config)?;
    if !vault.is_master_password_set()? {
        return Err(LockboxError::NotRegistered);
    }
    let password = prompt::read_master_password()?;
    vault.login(&password)?;
    Ok(vault)
}

/// Iterations are the count this vault logs in with, not the configured one.
pub fn status_report(vault: &Vault<SqliteStorage>) -> Result<StatusReport, LockboxError> {
    Ok(StatusReport {
        state: vault.state()?,
        database_path: vault.store().database().path().display().to_string(),
        kdf_iterations: vault.kdf_iterations()?.get(),
    })
}

fn render_status(report: &StatusReport, json: bool) -> Result<String, LockboxError> {
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|e| LockboxError::Internal(format!("failed to serialize status: {e}")));
    }
    let state = match report.state {
        VaultState::Unregistered => "no master password set (run `lockbox init`)",
        VaultState::LoggedOut | VaultState::LoggedIn => "initialized",
    };
    Ok(format!(
        "vault: {state}\ndatabase: {}\nkdf iterations: {}",
        report.database_path, report.kdf_iterations
    ))
}

fn render_entries(entries: &[EntrySummary], json: bool) -> Result<String, LockboxError> {
    if json {
        return serde_json::to_string_pretty(entries)
            .map_err(|e| LockboxError::Internal(format!("failed to serialize entries: {e}")));
    }
    if entries.is_empty() {
        return Ok("no entries".to_string());
    }
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    Ok(entries
        .iter()
        .map(|e| format!("{:>5}  {:<width$}  {}", e.id, e.name, e.created_at))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// `lockbox status`
pub fn run_status(config: &LockboxConfig, json: bool) -> Result<(), LockboxError> {
    let vault = open_vault(config)?;
    let report = status_report(&vault)?;
    println!("{}", render_status(&report, json)?);
    Ok(())
}

/// `lockbox init`
pub fn run_init(config: &LockboxConfig) -> Result<(), LockboxError> {
    let vault = open_vault(config)?;
    if vault.is_master_password_set()? {
        return Err(LockboxError::AlreadyRegistered);
    }
    let password = prompt::read_new_master_password()?;
    vault.register(&password)?;
    eprintln!("Master password set. Vault ready at {}", config.storage.database_path);
    Ok(())
}

/// `lockbox add <name>`
pub fn run_add(config: &LockboxConfig, name: &str) -> Result<(), LockboxError> {
    let mut vault = unlock(config)?;
    let secret = prompt::read_secret("Secret")?;
    let id = vault.save_entry(name, secret.expose_secret())?;
    vault.logout();
    eprintln!("Saved '{name}' (id {id})");
    Ok(())
}

/// `lockbox get <name>`
pub fn run_get(config: &LockboxConfig, name: &str) -> Result<(), LockboxError> {
    let mut vault = unlock(config)?;
    let secret = vault.retrieve_entry(name)?;
    vault.logout();
    println!("{}", secret.expose_secret());
    Ok(())
}

/// `lockbox list`
pub fn run_list(config: &LockboxConfig, json: bool) -> Result<(), LockboxError> {
    let mut vault = unlock(config)?;
    let entries = vault.list_entries()?;
    vault.logout();
    println!("{}", render_entries(&entries, json)?);
    Ok(())
}

/// `lockbox update <id>`
pub fn run_update(
    config: &LockboxConfig,
    id: i64,
    name: Option<&str>,
    secret: bool,
) -> Result<(), LockboxError> {
    if name.is_none() && !secret {
        return Err(LockboxError::Input(
            "nothing to update: pass --name and/or --secret".to_string(),
        ));
    }
    let mut vault = unlock(config)?;
    let new_secret = if secret {
        Some(prompt::read_secret("New secret")?)
    } else {
        None
    };
    vault.update_entry(id, name, new_secret.as_ref().map(|s| s.expose_secret()))?;
    vault.logout();
    eprintln!("Updated entry {id}");
    Ok(())
}

/// `lockbox rm`
pub fn run_remove(config: &LockboxConfig, target: &RemoveTarget) -> Result<(), LockboxError> {
    let mut vault = unlock(config)?;
    match target {
        RemoveTarget::Name(name) => vault.delete_entry_by_name(name)?,
        RemoveTarget::Id(id) => vault.delete_entry(*id)?,
    }
    vault.logout();
    eprintln!("Deleted");
    Ok(())
}

/// `lockbox passwd`
pub fn run_passwd(config: &LockboxConfig) -> Result<(), LockboxError> {
    let mut vault = open_vault(config)?;
    if !vault.is_master_password_set()? {
        return Err(LockboxError::NotRegistered);
    }
    let current = prompt::read_master_password()?;
    vault.login(&current)?;
    let new = prompt::prompt_new_master_password()?;
    vault.change_master_password(&current, &new)?;
    vault.logout();
    eprintln!("Master password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_config::model::{StorageConfig, VaultConfig};
    use secrecy::SecretString;

    fn test_config(dir: &tempfile::TempDir) -> LockboxConfig {
        LockboxConfig {
            storage: StorageConfig {
                database_path: dir.path().join("passwords.db").display().to_string(),
                ..StorageConfig::default()
            },
            vault: VaultConfig {
                pbkdf2_iterations: 1_000,
            },
            ..LockboxConfig::default()
        }
    }

    fn entry(id: i64, name: &str) -> EntrySummary {
        EntrySummary {
            id,
            name: name.to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn status_reflects_registration() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let vault = open_vault(&config).unwrap();
        assert_eq!(
            status_report(&vault).unwrap().state,
            VaultState::Unregistered
        );

        vault
            .register(&SecretString::from("masterpw".to_string()))
            .unwrap();
        let report = status_report(&vault).unwrap();
        assert_eq!(report.state, VaultState::LoggedOut);
        assert!(report.database_path.ends_with("passwords.db"));
    }

    #[test]
    fn status_reports_the_vaults_own_iteration_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        open_vault(&config)
            .unwrap()
            .register(&SecretString::from("masterpw".to_string()))
            .unwrap();

        let mut raised = config.clone();
        raised.vault.pbkdf2_iterations = 2_000;
        let report = status_report(&open_vault(&raised).unwrap()).unwrap();
        assert_eq!(report.kdf_iterations, 1_000);
    }

    #[test]
    fn status_json_uses_snake_case_state() {
        let report = StatusReport {
            state: VaultState::LoggedOut,
            database_path: "/tmp/x.db".to_string(),
            kdf_iterations: 480_000,
        };
        let json = render_status(&report, true).unwrap();
        assert!(json.contains("\"logged_out\""));
    }

    #[test]
    fn entries_render_as_table_or_json() {
        let entries = vec![entry(2, "bank"), entry(1, "email")];

        let table = render_entries(&entries, false).unwrap();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("bank"));

        let json: serde_json::Value =
            serde_json::from_str(&render_entries(&entries, true).unwrap()).unwrap();
        assert_eq!(json[1]["name"], "email");
        assert!(json[0].get("encrypted_secret").is_none());
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_entries(&[], false).unwrap(), "no entries");
    }

    #[test]
    fn update_without_changes_is_rejected_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        assert!(matches!(
            run_update(&config, 1, None, false),
            Err(LockboxError::Input(_))
        ));
    }

    #[test]
    fn commands_on_unregistered_vault_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        assert!(matches!(run_get(&config, "email"), Err(LockboxError::NotRegistered)));
        assert!(matches!(run_passwd(&config), Err(LockboxError::NotRegistered)));
    }
}
