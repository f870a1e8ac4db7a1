//! /status command plugin.

use crate::utils::Reply;

pub fn reply() -> Reply {
    Reply::text(
        "✅ **حالة البوت:** يعمل بنجاح\n\
         \n\
         🌐 **النظام:** يعمل على السحابة (Render)\n\
         🕒 **آخر تشغيل:** الآن\n\
         📊 **المهام:** جاهزة للاستخدام\n\
         \n\
         **لبدء الاستخدام:**\n\
         /start - عرض القائمة الرئيسية\n\
         /help - المساعدة والأوامر",
    )
}
