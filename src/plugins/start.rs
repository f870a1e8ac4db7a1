//! /start command plugin.
//!
//! Greets the user and shows the main menu.

use chrono::{DateTime, Utc};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::utils::Reply;
use crate::utils::clock::riyadh_datetime;

/// Main menu buttons as `(label, callback data)`, one button per row.
pub const MENU: [(&str, &str); 4] = [
    ("📊 الأسواق العالمية", "market"),
    ("📈 التحليلات اليومية", "analysis"),
    ("📰 أخبار مالية", "news"),
    ("🆘 المساعدة", "help"),
];

/// Build the welcome message for `user_name`.
pub fn reply(user_name: &str, now: DateTime<Utc>) -> Reply {
    let text = format!(
        "🏆 **مرحباً {} في بوت التداول!**\n\
         \n\
         🤖 **البوت يعمل بنجاح على السحابة**\n\
         📊 **آخر تحديث:** {}\n\
         \n\
         **اختر من القائمة:**",
        user_name,
        riyadh_datetime(now)
    );

    Reply::text(text).with_keyboard(keyboard())
}

pub fn keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        MENU.iter()
            .map(|(label, data)| vec![InlineKeyboardButton::callback(*label, *data)]),
    )
}
