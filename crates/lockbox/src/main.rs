// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - a local, master-password protected credential vault.
//!
//! This is the binary entry point.

mod commands;

use clap::{ArgGroup, Parser, Subcommand};

use commands::RemoveTarget;
use lockbox_core::LockboxError;

/// Lockbox - a local, master-password protected credential vault.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show whether a master password is set and where the vault lives.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Set the master password for a new vault.
    Init,
    /// Store a new secret under NAME (the secret is read from the TTY or stdin).
    Add {
        name: String,
    },
    /// Print the secret stored under NAME.
    Get {
        name: String,
    },
    /// List entry names, ids, and creation times.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Rename an entry and/or replace its secret.
    Update {
        id: i64,
        /// New name for the entry.
        #[arg(long)]
        name: Option<String>,
        /// Prompt for a new secret.
        #[arg(long)]
        secret: bool,
    },
    /// Delete an entry by name or id.
    #[command(group(ArgGroup::new("target").required(true).args(["name", "id"])))]
    Rm {
        name: Option<String>,
        #[arg(long)]
        id: Option<i64>,
    },
    /// Change the master password and re-encrypt every entry.
    Passwd,
}

fn main() {
    let cli = Cli::parse();

    let config = match lockbox_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let result = match cli.command {
        Some(Commands::Status { json }) => commands::run_status(&config, json),
        Some(Commands::Init) => commands::run_init(&config),
        Some(Commands::Add { name }) => commands::run_add(&config, &name),
        Some(Commands::Get { name }) => commands::run_get(&config, &name),
        Some(Commands::List { json }) => commands::run_list(&config, json),
        Some(Commands::Update { id, name, secret }) => {
            commands::run_update(&config, id, name.as_deref(), secret)
        }
        Some(Commands::Rm { name, id }) => {
            match name.map(RemoveTarget::Name).or(id.map(RemoveTarget::Id)) {
                Some(target) => commands::run_remove(&config, &target),
                None => Err(LockboxError::Input("pass a name or --id".to_string())),
            }
        }
        Some(Commands::Passwd) => commands::run_passwd(&config),
        None => {
            println!("lockbox: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("lockbox: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so secrets printed on stdout stay pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lockbox={log_level},lockbox_vault={log_level},lockbox_storage={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rm_accepts_name_or_id_but_not_both() {
        let by_name = Cli::try_parse_from(["lockbox", "rm", "email"]).unwrap();
        assert!(matches!(
            by_name.command,
            Some(Commands::Rm { name: Some(_), id: None })
        ));

        let by_id = Cli::try_parse_from(["lockbox", "rm", "--id", "3"]).unwrap();
        assert!(matches!(
            by_id.command,
            Some(Commands::Rm { name: None, id: Some(3) })
        ));

        assert!(Cli::try_parse_from(["lockbox", "rm"]).is_err());
        assert!(Cli::try_parse_from(["lockbox", "rm", "email", "--id", "3"]).is_err());
    }

    #[test]
    fn secrets_are_never_accepted_as_arguments() {
        assert!(Cli::try_parse_from(["lockbox", "add", "email", "s3cret"]).is_err());
        let update = Cli::try_parse_from(["lockbox", "update", "1", "--secret"]).unwrap();
        assert!(matches!(
            update.command,
            Some(Commands::Update { id: 1, name: None, secret: true })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let home = jail.directory().to_path_buf();
            jail.set_env("HOME", home.display());
            jail.set_env("XDG_CONFIG_HOME", home.join(".config").display());

            let config =
                lockbox_config::load_and_validate().expect("default config should be valid");
            assert_eq!(config.vault.pbkdf2_iterations, 480_000);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }
}
