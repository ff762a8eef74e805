use log::info;

use crate::error::AiError;

/// Ordered keyword table. The first keyword found in the prompt wins, so the
/// order here is part of the behaviour.
pub const FALLBACK_RESPONSES: &[(&str, &str)] = &[
    (
        // idea
        "فكرة",
        "💡 لدي عدة أفكار لمحتوى عربي رائع! \n\nهل تفضل:\n1. أفكار تعليمية عملية؟\n2. محتوى ترفيهي جذاب؟\n3. فيديوهات تحفيزية ملهمة؟\n\nأخبرني بمجال اهتمامك وسأعطيك أفضل الأفكار!",
    ),
    (
        // script
        "سيناريو",
        "📝 سأكتب لك سيناريو فيديو احترافي!\n\nلكن أولاً، أخبرني:\n🎯 موضوع الفيديو: \n⏱️ المدة المطلوبة: \n👥 الجمهور المستهدف: \n🎨 الأسلوب المفضل: \n\nوسأبدأ في الكتابة فوراً!",
    ),
    (
        // analysis
        "تحليل",
        "📊 لتحليل أداء المحتوى، أحتاج بعض المعلومات:\n\n1. عدد المشاهدات:\n2. نسبة التفاعل:\n3. مدة المشاهدة المتوسطة:\n4. المنصة المستخدمة:\n5. نوع المحتوى:\n\nمع هذه البيانات، سأقدم لك تحليلاً دقيقاً وتوصيات عملية للتحسين!",
    ),
    (
        // design
        "تصميم",
        "🎨 لتصميم ثامبريل جذاب، أنصحك بـ:\n\n🔸 الألوان: استخدم تبايناً واضحاً (فاتح/غامق)\n🔸 النص: عناوين قصيرة وجذابة\n🔸 الصور: صور عالية الجودة وواضحة\n🔸 التخطيط: اترك مساحات كافية\n\nهل لديك فكرة محددة للتصميم؟",
    ),
    (
        // broadcast
        "بث",
        "📹 لتحضير بث مباشر ناجح:\n\n1. اختر وقتاً مناسباً للجمهور العربي\n2. جهز نقاط الحديث الرئيسية\n3. أضف عناصر تفاعلية (مسابقات، أسئلة)\n4. روج للبث مسبقاً على وسائل التواصل\n5. جهز خطة طوارئ للتعامل مع المشاكل الفنية\n\nما موضوع البث الذي تخطط له؟",
    ),
];

pub const GENERIC_FALLBACK: &str = "🤔 أتساءل عن أفضل طريقة لمساعدتك!\n\nللحصول على أفضل نتيجة:\n1. كن محدداً في طلبك\n2. أخبرني بالتفاصيل المهمة\n3. حدد الهدف من المحتوى\n4. اختر النوع المناسب (فيديو، منشور، بث مباشر)\n\nحاول مرة أخرى مع مزيد من التفاصيل! 😊";

pub fn match_fallback(prompt: &str) -> &'static str {
    let prompt_lower = prompt.to_lowercase();
    FALLBACK_RESPONSES
        .iter()
        .find(|(keyword, _)| prompt_lower.contains(keyword))
        .map(|(_, response)| *response)
        .unwrap_or(GENERIC_FALLBACK)
}

pub fn fallback_response(prompt: &str, error: &AiError) -> String {
    info!("Using fallback response because of: {}", error);
    match_fallback(prompt).to_string()
}
