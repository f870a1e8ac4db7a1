//! Configuration module for Tradewatch.
//!
//! Loads configuration from environment variables.

use std::env;

use thiserror::Error;
use url::Url;

/// Port used by the webhook listener when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT_TOKEN must be set")]
    MissingToken,

    #[error("ADMIN_IDS contains an invalid id: {0:?}")]
    InvalidAdminId(String),

    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),

    #[error("WEBHOOK_URL is not a valid URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    /// Public base URL for webhook delivery. The bot token is appended as the
    /// final path segment when the webhook is registered.
    pub webhook_url: Option<Url>,

    /// Listen port for the webhook server.
    pub port: u16,

    /// Set when running on the cloud host (`RENDER=true`).
    pub cloud: bool,

    /// Administrator user IDs (comma-separated).
    /// Parsed and kept, no command is restricted by them yet.
    pub admin_ids: Vec<u64>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let admin_ids = parse_admin_ids(&lookup("ADMIN_IDS").unwrap_or_default())?;

        let webhook_url = match lookup("WEBHOOK_URL").map(|s| s.trim().to_string()) {
            Some(raw) if !raw.is_empty() => Some(Url::parse(&raw)?),
            _ => None,
        };

        let port = match lookup("PORT").map(|s| s.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            _ => DEFAULT_PORT,
        };

        let cloud = lookup("RENDER")
            .map(|s| s.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            bot_token,
            webhook_url,
            port,
            cloud,
            admin_ids,
        })
    }

    /// Check if a user is a configured administrator.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

// The token grants full control of the bot, keep it out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("webhook_url", &self.webhook_url.as_ref().map(Url::as_str))
            .field("port", &self.port)
            .field("cloud", &self.cloud)
            .field("admin_ids", &self.admin_ids)
            .finish()
    }
}

fn parse_admin_ids(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| ConfigError::InvalidAdminId(s.to_string()))
        })
        .collect()
}
