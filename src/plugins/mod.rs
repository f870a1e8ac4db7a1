//! Plugin system for command handlers.
//!
//! Add new commands by:
//! 1. Creating a new file in this directory with a `reply` function
//! 2. Adding a variant to [`Command`] and a [`router::Route`]
//! 3. Adding the identifier to the route tables in `router.rs`

pub mod analysis;
pub mod help;
pub mod market;
pub mod news;
pub mod router;
pub mod start;
pub mod status;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::utils::command::BotCommands;
use tracing::{debug, warn};

use crate::bot::dispatcher::AppState;
use router::IncomingEvent;

pub use router::Router;

/// All bot commands. Used for the command menu shown by Telegram clients.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "الأوامر المتاحة:")]
pub enum Command {
    #[command(description = "بدء البوت والقائمة")]
    Start,

    #[command(description = "حالة البوت")]
    Status,

    #[command(description = "أسعار الأسواق")]
    Market,

    #[command(description = "التحليلات اليومية")]
    Analysis,

    #[command(description = "الأخبار المالية")]
    News,

    #[command(description = "المساعدة والأوامر")]
    Help,
}

/// Register the command menu with Telegram.
///
/// Failure only costs the client-side menu, so it is logged and ignored.
pub async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => debug!("Command menu registered"),
        Err(e) => warn!("Failed to register command menu: {}", e),
    }
}

/// Build the `/command` handler for new and edited messages.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    let to_event = |msg: Message, me: Me| IncomingEvent::from_message(&msg, me.username());

    dptree::entry()
        .branch(Update::filter_message().filter_map(to_event).endpoint(route_event))
        .branch(Update::filter_edited_message().filter_map(to_event).endpoint(route_event))
}

/// Build the callback query handler for the start menu buttons.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .inspect_async(acknowledge_callback)
        .filter_map(|q: CallbackQuery| IncomingEvent::from_callback(&q))
        .endpoint(route_event)
}

/// Stop the client's loading spinner on the pressed button.
async fn acknowledge_callback(bot: Bot, q: CallbackQuery) {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query {}: {}", q.id, e);
    }
}

/// Route an event and send the reply.
async fn route_event(bot: Bot, event: IncomingEvent, state: AppState) -> anyhow::Result<()> {
    // No command is admin-only yet, the flag is only logged.
    let from_admin = event.user_id.is_some_and(|id| state.config.is_admin(id));
    debug!(
        "Event {:?} '{}' from {:?} (admin: {})",
        event.trigger, event.id, event.user_id, from_admin
    );

    state.router.dispatch(&event, &bot).await?;
    Ok(())
}
