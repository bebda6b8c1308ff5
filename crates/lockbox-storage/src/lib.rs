// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Lockbox credential vault.
//!
//! Provides a scoped-connection [`Database`] handle with embedded migrations,
//! typed query modules for `password_entries` and `app_settings`, and
//! [`SqliteStorage`], which implements the store traits from `lockbox-core`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
