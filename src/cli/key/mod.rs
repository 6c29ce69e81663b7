//! Key commands: state file handling around the lifecycle operations

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::Command;
use crate::domain::resource::{AttributeValue, KeyResourceLifecycle, KeyResourceModel};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the key config document (JSON)
    #[arg(long)]
    pub config: PathBuf,

    /// Address the key by its hash instead of the plain value
    #[arg(long)]
    pub hashed: bool,

    /// Path to the state file
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Path to the state file
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Read,
    Updated,
    Deleted,
    /// The key no longer exists on the gateway
    Gone,
}

/// What a command did. Never carries the plain key.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub action: Action,
    pub hashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_hash: Option<String>,
}

impl Summary {
    fn new(action: Action, state: &KeyResourceModel) -> Self {
        Self {
            action,
            hashed: matches!(state.hashed, AttributeValue::Known(true)),
            key_hash: state.key_hash.known().cloned(),
        }
    }
}

/// Run a key command against the given lifecycle
pub async fn run<L>(command: Command, lifecycle: &L) -> anyhow::Result<Summary>
where
    L: KeyResourceLifecycle + ?Sized,
{
    match command {
        Command::Create(args) => {
            let desired = desired_from(&args).await?;
            let state = lifecycle.create(&desired).await?;

            write_state(&args.state, &state).await?;
            info!(state = %args.state.display(), "State written");

            Ok(Summary::new(Action::Created, &state))
        }
        Command::Read(args) => {
            let state = read_state(&args.state).await?;

            match lifecycle.read(&state).await? {
                Some(refreshed) => {
                    write_state(&args.state, &refreshed).await?;
                    Ok(Summary::new(Action::Read, &refreshed))
                }
                None => {
                    remove_state(&args.state).await?;
                    Ok(Summary::new(Action::Gone, &state))
                }
            }
        }
        Command::Update(args) => {
            let prior = read_state(&args.state).await?;
            let desired = desired_from(&args).await?;
            let state = lifecycle.update(&prior, &desired).await?;

            write_state(&args.state, &state).await?;

            Ok(Summary::new(Action::Updated, &state))
        }
        Command::Delete(args) => {
            let state = read_state(&args.state).await?;
            lifecycle.delete(&state).await?;

            remove_state(&args.state).await?;

            Ok(Summary::new(Action::Deleted, &state))
        }
    }
}

async fn desired_from(args: &ApplyArgs) -> anyhow::Result<KeyResourceModel> {
    let config = tokio::fs::read_to_string(&args.config)
        .await
        .with_context(|| format!("Failed to read config file {}", args.config.display()))?;

    Ok(KeyResourceModel::new(config, args.hashed))
}

async fn read_state(path: &Path) -> anyhow::Result<KeyResourceModel> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read state file {}", path.display()))?;

    serde_json::from_str(&text)
        .with_context(|| format!("State file {} is not valid JSON state", path.display()))
}

async fn write_state(path: &Path, state: &KeyResourceModel) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(state).context("Failed to encode state")?;

    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write state file {}", path.display()))
}

async fn remove_state(path: &Path) -> anyhow::Result<()> {
    tokio::fs::remove_file(path)
        .await
        .with_context(|| format!("Failed to remove state file {}", path.display()))
}
