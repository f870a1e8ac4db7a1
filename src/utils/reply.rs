//! Outgoing replies.
//!
//! A [`Reply`] is what a command produces; an [`Outbox`] is where it goes.
//! The bot itself is the production outbox, tests record into a vector.

use std::future::Future;

use teloxide::prelude::*;
use teloxide::types::InlineKeyboardMarkup;

/// A single outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Attach an inline keyboard.
    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Delivers replies to a chat.
pub trait Outbox {
    fn deliver(&self, chat_id: ChatId, reply: Reply) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl Outbox for Bot {
    fn deliver(&self, chat_id: ChatId, reply: Reply) -> impl Future<Output = anyhow::Result<()>> + Send {
        let mut request = self.send_message(chat_id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            request = request.reply_markup(keyboard);
        }

        async move {
            request.await?;
            Ok(())
        }
    }
}
