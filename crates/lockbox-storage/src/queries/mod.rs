// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the two tables.

pub mod credentials;
pub mod settings;
