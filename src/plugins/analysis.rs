//! /analysis command plugin.
//!
//! Daily analysis, dated in the host's local time (not Riyadh).

use chrono::{DateTime, Utc};

use crate::utils::Reply;
use crate::utils::clock::local_date;

pub fn reply(now: DateTime<Utc>) -> Reply {
    Reply::text(format!(
        "📊 **تحليلات اليوم {}**\n\
         \n\
         🔹 **الأسهم الأمريكية:**\n\
         - التكنولوجيا: اتجاه صاعد مع نتائج أرباح قوية\n\
         - المالية: مستقرة مع توقعات رفع الفائدة\n\
         \n\
         🔹 **العملات:**\n\
         - الدولار: ضعف مؤقت أمام اليورو\n\
         - الريال: مستقر مع تحسن الاقتصاد\n\
         \n\
         🔹 **التوصيات:**\n\
         1️⃣ مراقبة أسهم التكنولوجيا\n\
         2️⃣ شراء الذهب كتحوط\n\
         3️⃣ تجنب السندات طويلة الأجل\n\
         \n\
         ⚠️ **تنبيه:** هذه آراء تحليلية وليست توصيات استثمارية",
        local_date(now)
    ))
}
