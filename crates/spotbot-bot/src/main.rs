//! Spotbot - Entry Point
//!
//! Wires an in-memory gateway and trade store, seeded from the config
//! file's `[settings]` table. A live exchange connector plugs in by
//! swapping the two collaborators handed to `Application::new`.

use anyhow::Result;
use clap::Parser;
use spotbot_gateway::{DynExchangeGateway, DynTradeStore, MemoryTradeStore, MockGateway};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spotbot automated spot-trading engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SPOTBOT_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    spotbot_telemetry::init_logging()?;

    info!("Starting spotbot v{}", env!("CARGO_PKG_VERSION"));

    let config = match args.config {
        Some(path) => spotbot_bot::AppConfig::from_file(&path)?,
        None => spotbot_bot::AppConfig::load()?,
    };

    let store = Arc::new(MemoryTradeStore::new());
    for (key, value) in &config.settings {
        store.set_setting(key.clone(), value.clone());
    }
    let gateway = Arc::new(MockGateway::new());
    info!("Running against in-memory collaborators (dry run)");

    let app = spotbot_bot::Application::new(
        config,
        gateway as DynExchangeGateway,
        store as DynTradeStore,
    )?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received");
            signal_cancel.cancel();
        }
    });

    app.run(cancel).await?;

    info!("Shutdown complete");
    Ok(())
}
