//! Message dispatcher setup.
//!
//! Builds the dispatcher with the command and button handlers.

use std::sync::Arc;

use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::prelude::*;
use tracing::debug;

use crate::config::Config;
use crate::plugins::{self, Router};

/// Dispatcher type used throughout the bot.
pub type BotDispatcher = Dispatcher<Bot, anyhow::Error, DefaultKey>;

/// Shared application state. Immutable once built.
#[derive(Clone)]
pub struct AppState {
    /// Configuration read at startup.
    pub config: Arc<Config>,

    /// Command and button routing table.
    pub router: Arc<Router>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: Arc<Config>, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }
}

/// Build the dispatcher with all handlers.
///
/// Handler errors (failed sends) are logged and the dispatcher keeps serving.
pub fn build_dispatcher(bot: Bot, state: AppState) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling update"))
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(plugins::command_handler())
        .branch(plugins::callback_handler())
}
