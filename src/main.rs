//! Tradewatch - Telegram market bot
//!
//! Replies to commands and menu buttons with market snapshots, daily
//! analysis, financial news and help.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `bot` - Dispatcher, delivery mode selection, polling/webhook runtime
//! - `plugins` - Command router and reply producers
//! - `utils` - Clock and outgoing reply helpers

mod bot;
mod config;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::{AppState, DeliveryMode};
use config::Config;
use plugins::Router;
use utils::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tradewatch=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Tradewatch bot...");

    // Nothing connects or binds until this succeeds
    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    if config.admin_ids.is_empty() {
        info!("No admin IDs configured (ADMIN_IDS is empty)");
    } else {
        info!("Bot admins: {:?}", config.admin_ids);
    }

    let mode = DeliveryMode::from_config(&config)?;
    info!("Delivery mode: {:?}", mode);

    let router = Router::new(Arc::new(SystemClock))?;
    let bot = Bot::new(&config.bot_token);
    let state = AppState::new(Arc::new(config), router);

    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    let shutdown = CancellationToken::new();
    tokio::spawn(bot::shutdown_signal(shutdown.clone()));

    bot::run(mode, dispatcher, bot, shutdown).await
}
