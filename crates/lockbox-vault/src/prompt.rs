// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password and secret acquisition via TTY prompt, environment variable,
//! or piped stdin.

use std::io::{BufRead, IsTerminal};

use lockbox_config::MASTER_PASSWORD_ENV_VAR;
use lockbox_core::LockboxError;
use secrecy::SecretString;

fn env_password() -> Option<SecretString> {
    match std::env::var(MASTER_PASSWORD_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(label: &str) -> Result<String, LockboxError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| LockboxError::Input(format!("failed to read {}: {e}", label.to_lowercase())))
}

fn non_empty(value: String, what: &str) -> Result<SecretString, LockboxError> {
    if value.is_empty() {
        return Err(LockboxError::Input(format!("empty {what} not allowed")));
    }
    Ok(SecretString::from(value))
}

fn no_password_source() -> LockboxError {
    LockboxError::Input(format!(
        "no master password provided. Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
    ))
}

/// Get the master password.
///
/// Priority:
/// 1. `LOCKBOX_MASTER_PASSWORD` environment variable (for scripts)
/// 2. Interactive TTY prompt via `rpassword`
pub fn read_master_password() -> Result<SecretString, LockboxError> {
    if let Some(password) = env_password() {
        return Ok(password);
    }
    if std::io::stdin().is_terminal() {
        return non_empty(read_hidden("Master password")?, "master password");
    }
    Err(no_password_source())
}

/// Get a new master password for registration.
///
/// The environment variable is accepted as-is; on a TTY the password is
/// prompted twice.
pub fn read_new_master_password() -> Result<SecretString, LockboxError> {
    if let Some(password) = env_password() {
        return Ok(password);
    }
    prompt_new_master_password()
}

/// Prompt twice for a new master password. TTY only.
pub fn prompt_new_master_password() -> Result<SecretString, LockboxError> {
    if !std::io::stdin().is_terminal() {
        return Err(LockboxError::Input(
            "a new master password can only be entered interactively".to_string(),
        ));
    }
    let first = read_hidden("New master password")?;
    let second = read_hidden("Confirm master password")?;
    if first != second {
        return Err(LockboxError::Input("passwords do not match".to_string()));
    }
    non_empty(first, "master password")
}

/// Read a secret value: hidden prompt on a TTY, otherwise one line of stdin.
pub fn read_secret(label: &str) -> Result<SecretString, LockboxError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return non_empty(read_hidden(label)?, "secret");
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .map_err(|e| LockboxError::Input(format!("failed to read secret from stdin: {e}")))?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    non_empty(trimmed, "secret")
}
