//! /help command plugin.
//!
//! The command list shown to users. Keep it in sync with [`super::Command`].

use crate::utils::Reply;

pub fn reply() -> Reply {
    Reply::text(
        "🆘 **أوامر البوت:**\n\
         \n\
         /start - بدء البوت والقائمة\n\
         /status - حالة البوت\n\
         /market - أسعار الأسواق\n\
         /analysis - التحليلات اليومية\n\
         /news - الأخبار المالية\n\
         /help - هذه الرسالة\n\
         \n\
         📞 **للتواصل مع المطور:**\n\
         @YourUsername\n\
         \n\
         ⚠️ **تذكير:** \n\
         - البوت لأغراض تعليمية\n\
         - التحليلات آراء شخصية\n\
         - لا تنسى التحليل الشخصي",
    )
}
