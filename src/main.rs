use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tyk_key_reconciler::cli::{self, Cli};
use tyk_key_reconciler::infrastructure::gateway::GatewayKeyStore;
use tyk_key_reconciler::infrastructure::logging;
use tyk_key_reconciler::infrastructure::services::KeyResourceService;
use tyk_key_reconciler::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);
    config.validate()?;

    let store = GatewayKeyStore::from_config(&config.gateway)?;
    let service = KeyResourceService::new(Arc::new(store));

    let summary = cli::key::run(cli.command, &service).await?;
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
