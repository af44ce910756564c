mod compose;
mod config;
mod extract;
mod fetch;
mod link;
mod platform;
mod relay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::extract::WeChatExtractor;
use crate::fetch::HttpFetcher;
use crate::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wxrelay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Channel: {:?}", config.telegram.channel());
    info!("  Forward to: {:?}", config.telegram.forward_to);
    info!("  Dry run: {}", config.telegram.dry_run);

    let relay = Arc::new(Relay::new(
        config.telegram.clone(),
        Box::new(HttpFetcher::new()),
        Box::new(WeChatExtractor),
    ));

    info!("Bot is starting...");
    platform::telegram::run(relay, &config.telegram).await?;

    Ok(())
}
