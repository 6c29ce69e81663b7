//! CLI module for the Tyk key reconciler
//!
//! Each subcommand drives one lifecycle operation against the gateway:
//! - `create`: create a key from a config document and write the state file
//! - `read`: refresh the state file from the gateway
//! - `update`: replace the key with a new config document
//! - `delete`: delete the key and remove the state file

pub mod key;

use clap::{Parser, Subcommand};

/// Manage a single Tyk gateway key from a JSON config document
#[derive(Parser)]
#[command(name = "tyk-key")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a key and record its identifiers in the state file
    Create(key::ApplyArgs),

    /// Refresh the state file from the gateway
    Read(key::StateArgs),

    /// Replace the key with the given config
    Update(key::ApplyArgs),

    /// Delete the key and remove the state file
    Delete(key::StateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "tyk-key", "create", "--config", "key.json", "--hashed", "--state", "key.state",
        ])
        .unwrap();

        match cli.command {
            Command::Create(args) => {
                assert!(args.hashed);
                assert_eq!(args.config.to_str(), Some("key.json"));
                assert_eq!(args.state.to_str(), Some("key.state"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_update_defaults_to_plain() {
        let cli = Cli::try_parse_from([
            "tyk-key", "update", "--config", "key.json", "--state", "key.state",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Update(args) if !args.hashed));
    }

    #[test]
    fn test_delete_requires_state() {
        assert!(Cli::try_parse_from(["tyk-key", "delete"]).is_err());
    }
}
