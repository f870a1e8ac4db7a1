//! /market command plugin.
//!
//! Market snapshot. The figures are fixed, only the update time moves.

use chrono::{DateTime, Utc};

use crate::utils::Reply;
use crate::utils::clock::riyadh_time;

pub fn reply(now: DateTime<Utc>) -> Reply {
    Reply::text(format!(
        "📈 **أسواق الأسهم العالمية:**\n\
         🇺🇸 S&P 500: 4,800 (+0.5%)\n\
         🇺🇸 Nasdaq: 16,900 (+0.8%)\n\
         🇪🇺 Euro Stoxx 50: 4,500 (+0.3%)\n\
         \n\
         💰 **العملات:**\n\
         💵 USD/EUR: 0.92 (-0.1%)\n\
         💵 USD/GBP: 0.79 (+0.2%)\n\
         💵 USD/SAR: 3.75 (ثابت)\n\
         \n\
         🛢️ **السلع:**\n\
         ⚫ النفط: $78.50 (+1.2%)\n\
         🟡 الذهب: $1,950 (+0.5%)\n\
         \n\
         ⏰ آخر تحديث: {}",
        riyadh_time(now)
    ))
}
