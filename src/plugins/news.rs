//! /news command plugin.

use crate::utils::Reply;

pub fn reply() -> Reply {
    Reply::text(
        "📰 **آخر الأخبار المالية**\n\
         \n\
         1️⃣ **البنوك المركزية:**\n\
         - الفيدرالي الأمريكي: تأجيل خفض الفائدة\n\
         - البنك المركزي الأوروبي: تثبيت السياسة\n\
         \n\
         2️⃣ **الشركات:**\n\
         - أبل: نتائج أرباح قياسية\n\
         - تيسلا: نمو المبيعات بنسبة 15%\n\
         \n\
         3️⃣ **الاقتصاد العالمي:**\n\
         - نمو الناتج المحلي الأمريكي 3.2%\n\
         - انخفاض التضخم في أوروبا\n\
         \n\
         🔗 **مصادر موثوقة:**\n\
         - Bloomberg\n\
         - Reuters\n\
         - CNBC Arabia",
    )
}
