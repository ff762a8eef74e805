use crate::history::format_history_for_prompt;
use crate::models::chat::ConversationMessage;

pub const USER_NAME: &str = "مستخدم Nexus";
pub const ASSISTANT_NAME: &str = "Nexa AI";

/// Number of most recent history entries folded into each prompt.
pub const PROMPT_HISTORY_LEN: usize = 5;

pub const PERSONA_PREAMBLE: &str = "أنت \"Nexa\" - مساعد ذكي عربي في منصة Nexus Studio.
الدور: مساعد محتوى عربي احترافي.
اللغة: العربية فقط (الفصحى والعامية المناسبة).
الأسلوب: ودود، مفيد، احترافي، وإبداعي.
المهمة: مساعدة المستخدم في إنشاء وتحسين المحتوى العربي.

التخصصات:
1. كتابة وتحرير السيناريوهات العربية
2. توليد أفكار المحتوى الإبداعية
3. تحليل أداء المحتوى وتقديم توصيات
4. تصميم خطط المحتوى والجرافيك
5. تحضير البث المباشر والمونتاج
6. كتابة النصوص التسويقية والإعلانية

القواعد:
- أجب باللغة العربية فقط
- كن مفيداً وعملياً
- قدم أمثلة وتطبيقات عملية
- انتبه للسياق والجمهور العربي
- استخدم تنسيقاً واضحاً ومنظماً

";

/// Assembles preamble, transcript, extra context and the current question.
/// `transcript` is expected to be already cut to the recent window.
pub fn format_prompt(
    prompt: &str,
    transcript: &[ConversationMessage],
    context: Option<&str>
) -> String {
    let mut result = String::from(PERSONA_PREAMBLE);
    result.push_str(&format_history_for_prompt(transcript, USER_NAME, ASSISTANT_NAME));

    if let Some(context) = context {
        result.push_str(&format!("📌 السياق الإضافي: {}\n\n", context));
    }

    result.push_str(
        &format!(
            "💬 السؤال الحالي من {}: {}\n\n🤖 رد {}:\n",
            USER_NAME,
            prompt,
            ASSISTANT_NAME
        )
    );
    result
}
