//! Delivery mode selection.
//!
//! Decided once at startup from [`Config`] and never switched at runtime.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::Config;

/// How updates reach the bot.
#[derive(Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Telegram pushes updates to `url`, served on `address`.
    Webhook { url: Url, address: SocketAddr },

    /// The bot long-polls Telegram for updates.
    Polling,
}

impl DeliveryMode {
    /// Select the mode. Webhook delivery needs both the cloud flag and a
    /// public base URL; anything else polls.
    ///
    /// The webhook endpoint is `{base}/{token}`, listening on all interfaces.
    pub fn from_config(config: &Config) -> Result<Self, url::ParseError> {
        let base = match (&config.webhook_url, config.cloud) {
            (Some(base), true) => base,
            _ => return Ok(Self::Polling),
        };

        let url = Url::parse(&format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            config.bot_token
        ))?;
        let address = SocketAddr::from(([0, 0, 0, 0], config.port));

        Ok(Self::Webhook { url, address })
    }
}

// The webhook path contains the bot token, only show the host.
impl fmt::Debug for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook { url, address } => f
                .debug_struct("Webhook")
                .field("host", &url.host_str().unwrap_or_default())
                .field("address", address)
                .finish(),
            Self::Polling => f.write_str("Polling"),
        }
    }
}
