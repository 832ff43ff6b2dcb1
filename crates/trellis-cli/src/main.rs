mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use std::sync::Arc;
use trellis_api::{Credentials, TrelloClient};
use trellis_core::AppConfig;
use trellis_domain::{DomainClient, MemoryCache, MemoryClient};
use trellis_tui::{App, DomainStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TRELLIS_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout and stderr belong to the terminal UI.
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    let mut config = AppConfig::load()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        })
        .with_mouse_override(cli.mouse_override());
    if let Some(interval) = cli.sync_interval {
        config.sync_interval_ms = interval;
    }

    let client: Arc<dyn DomainClient> = if cli.offline {
        tracing::info!("Starting with demo data");
        Arc::new(MemoryClient::with_demo_data())
    } else {
        let api_key = cli
            .api_key
            .context("missing Trello API key: pass --api-key or set TRELLO_API_KEY")?;
        let token = cli
            .token
            .context("missing Trello token: pass --token or set TRELLO_TOKEN")?;
        Arc::new(TrelloClient::new(Credentials { api_key, token }))
    };

    let cache = Arc::new(MemoryCache::new(client.clone()));
    let store = DomainStore::new(client, cache);

    let mut app = App::new(store, config);
    app.run().await?;

    Ok(())
}
