//! Webhook mode implementation for the bot.
//!
//! Uses teloxide's built-in axum webhook support to:
//! - Call `setWebhook` on Telegram
//! - Spawn an axum HTTP server to receive updates
//! - Call `deleteWebhook` when the listener is stopped

use std::net::SocketAddr;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::info;
use url::Url;

use super::dispatcher::BotDispatcher;

/// Register the webhook and dispatch pushed updates until the dispatcher is
/// shut down.
///
/// `url` carries the bot token in its path, so only its host is logged.
pub async fn start_webhook(
    dispatcher: &mut BotDispatcher,
    bot: Bot,
    url: Url,
    address: SocketAddr,
) -> anyhow::Result<()> {
    info!("🔗 Setting webhook on host: {}", url.host_str().unwrap_or_default());
    info!("📡 Listening on: {}", address);

    let listener = webhooks::axum(bot, Options::new(address, url))
        .await
        .context("Failed to set up webhook")?;

    info!("✅ Webhook setup complete, waiting for updates...");

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Error from update listener"),
        )
        .await;

    Ok(())
}
