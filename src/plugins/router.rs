//! Command router.
//!
//! Maps command names and button callback data to reply producers through a
//! lookup table. Unknown identifiers are dropped without a reply.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::bail;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use super::{Command, analysis, help, market, news, start, status};
use crate::utils::{Clock, Outbox, Reply};

/// How an event reached the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A `/command` message.
    Command,
    /// An inline keyboard button press.
    Callback,
}

/// Reply producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Start,
    Status,
    Market,
    Analysis,
    News,
    Help,
}

impl Route {
    /// Build the reply for this route.
    pub fn render(self, user_name: &str, now: DateTime<Utc>) -> Reply {
        match self {
            Route::Start => start::reply(user_name, now),
            Route::Status => status::reply(),
            Route::Market => market::reply(now),
            Route::Analysis => analysis::reply(now),
            Route::News => news::reply(),
            Route::Help => help::reply(),
        }
    }
}

const COMMAND_ROUTES: [(&str, Route); 6] = [
    ("start", Route::Start),
    ("status", Route::Status),
    ("market", Route::Market),
    ("analysis", Route::Analysis),
    ("news", Route::News),
    ("help", Route::Help),
];

const CALLBACK_ROUTES: [(&str, Route); 4] = [
    ("market", Route::Market),
    ("analysis", Route::Analysis),
    ("news", Route::News),
    ("help", Route::Help),
];

/// A command or button press, reduced to what routing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEvent {
    pub trigger: Trigger,
    pub id: String,
    pub chat_id: ChatId,
    pub user_id: Option<u64>,
    pub user_name: String,
}

impl IncomingEvent {
    /// Extract a command event from a message addressed to `bot_username`.
    pub fn from_message(msg: &Message, bot_username: &str) -> Option<Self> {
        let id = parse_command(msg.text()?, bot_username)?;
        let user = msg.from.as_ref();

        Some(Self {
            trigger: Trigger::Command,
            id,
            chat_id: msg.chat.id,
            user_id: user.map(|u| u.id.0),
            user_name: user.map(|u| u.first_name.clone()).unwrap_or_default(),
        })
    }

    /// Extract a callback event. Queries without data or without an
    /// originating message have nowhere to reply and are skipped.
    pub fn from_callback(q: &CallbackQuery) -> Option<Self> {
        let id = q.data.clone()?;
        let chat_id = q.message.as_ref()?.chat().id;

        Some(Self {
            trigger: Trigger::Callback,
            id,
            chat_id,
            user_id: Some(q.from.id.0),
            user_name: q.from.first_name.clone(),
        })
    }
}

/// Parse `/name[@bot] [args]` into a lowercase command name.
///
/// Commands addressed to another bot are rejected.
pub fn parse_command(text: &str, bot_username: &str) -> Option<String> {
    let head = text.strip_prefix('/')?.split_whitespace().next()?;

    let name = match head.split_once('@') {
        Some((name, mention)) => {
            if !mention.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            name
        }
        None => head,
    };

    if name.is_empty() {
        return None;
    }

    Some(name.to_lowercase())
}

/// Lookup table from trigger and identifier to route.
pub struct Router {
    routes: HashMap<Trigger, HashMap<&'static str, Route>>,
    clock: Arc<dyn Clock>,
}

impl Router {
    /// Build the routing table and check it covers the command menu and the
    /// start keyboard.
    pub fn new(clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let mut routes: HashMap<Trigger, HashMap<&'static str, Route>> = HashMap::new();

        for (trigger, table) in [
            (Trigger::Command, &COMMAND_ROUTES[..]),
            (Trigger::Callback, &CALLBACK_ROUTES[..]),
        ] {
            let entries = routes.entry(trigger).or_default();
            for &(id, route) in table {
                if entries.insert(id, route).is_some() {
                    bail!("Duplicate {:?} route: {}", trigger, id);
                }
            }
        }

        let router = Self { routes, clock };

        for cmd in Command::bot_commands() {
            let name = cmd.command.trim_start_matches('/');
            if router.resolve(Trigger::Command, name).is_none() {
                bail!("Command /{} has no route", name);
            }
        }

        for (_, data) in start::MENU {
            if router.resolve(Trigger::Callback, data).is_none() {
                bail!("Menu button {:?} has no route", data);
            }
        }

        Ok(router)
    }

    /// Look up the route for an identifier.
    pub fn resolve(&self, trigger: Trigger, id: &str) -> Option<Route> {
        self.routes.get(&trigger)?.get(id).copied()
    }

    /// Route an event and deliver its reply to the originating chat.
    ///
    /// Returns `false` if the identifier is unknown and nothing was sent.
    pub async fn dispatch<O>(&self, event: &IncomingEvent, outbox: &O) -> anyhow::Result<bool>
    where
        O: Outbox + Sync,
    {
        let Some(route) = self.resolve(event.trigger, &event.id) else {
            debug!("Ignoring unknown {:?} '{}' in chat {}", event.trigger, event.id, event.chat_id);
            return Ok(false);
        };

        debug!("{:?} '{}' in chat {} -> {:?}", event.trigger, event.id, event.chat_id, route);

        let reply = route.render(&event.user_name, self.clock.now());
        outbox.deliver(event.chat_id, reply).await?;

        Ok(true)
    }
}
