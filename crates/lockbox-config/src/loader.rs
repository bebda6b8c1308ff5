// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lockbox.toml` > `~/.config/lockbox/lockbox.toml`
//! with environment variable overrides via `LOCKBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LockboxConfig;

/// Environment variable holding the master password. It is a credential, not
/// a setting, so the config layer never reads it.
pub const MASTER_PASSWORD_ENV_VAR: &str = "LOCKBOX_MASTER_PASSWORD";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/lockbox/lockbox.toml` (user XDG config)
/// 3. `./lockbox.toml` (local directory)
/// 4. `LOCKBOX_*` environment variables
pub fn load_config() -> Result<LockboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LockboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LockboxConfig::default()))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("lockbox.toml"))
        .merge(env_provider())
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("lockbox").join("lockbox.toml"))
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// keys survive: `LOCKBOX_STORAGE_DATABASE_PATH` maps to
/// `storage.database_path`, not `storage.database.path`. Figment hands keys
/// to `map` in their original case, so they are lowercased first.
fn env_provider() -> Env {
    Env::prefixed("LOCKBOX_")
        .ignore(&["master_password"])
        .map(|key| {
            let mapped = key
                .as_str()
                .to_ascii_lowercase()
                .replacen("storage_", "storage.", 1)
                .replacen("vault_", "vault.", 1)
                .replacen("logging_", "logging.", 1);
            mapped.into()
        })
}
