//! Templated content helpers layered over `AiClient::send_message`.

use serde::{ Deserialize, Serialize };

use super::AiClient;
use crate::config::settings::GenerationOptions;
use crate::models::response::SendResult;

const NOT_AVAILABLE: &str = "غير متوفر";
const NOT_SPECIFIED: &str = "غير محدد";

/// Performance figures for `analyze_performance`. Missing values are shown
/// to the model as unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceData {
    pub views: Option<String>,
    pub engagement: Option<String>,
    pub watch_time: Option<String>,
    pub platform: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

pub fn video_ideas_prompt(topic: &str, count: u32) -> String {
    format!(
        "توليد {count} أفكار فيديو عربية احترافية عن: {topic}

المتطلبات:
✅ كل فكرة يجب أن تحتوي على:
1. العنوان الجذاب (بالعربية)
2. الفكرة الرئيسية (جملة واحدة)
3. الجمهور المستهدف
4. المدة المقترحة
5. 3 نقاط محتوى رئيسية
6. اقتراح للثامبريل
7. الهاشتاقات المناسبة

التنسيق المطلوب:
🎯 الفكرة 1:
العنوان: ...
الفكرة: ...
الجمهور: ...
المدة: ...
النقاط: 1) ... 2) ... 3) ...
الثامبريل: ...
الهاشتاقات: #... #... #...

... وهكذا لباقي الأفكار"
    )
}

pub fn video_script_prompt(topic: &str, duration_minutes: u32, style: &str, audience: &str) -> String {
    format!(
        "كتابة سيناريو فيديو عربي كامل

الموضوع: {topic}
المدة: {duration_minutes} دقائق
الأسلوب: {style}
الجمهور: {audience}

المتطلبات:
🎬 الهيكل الكامل:
1. المقدمة (15% من الوقت)
   - جذب الانتباه
   - تقديم الموضوع
   - إثارة الفضول

2. المحتوى الرئيسي (70% من الوقت)
   - النقاط الرئيسية (3-5 نقاط)
   - الأمثلة والتطبيقات
   - الرسوم والبيانات (إن وجدت)

3. الخاتمة (15% من الوقت)
   - تلخيص سريع
   - الدعوة للعمل
   - التفاعل مع المشاهدين

📋 التنسيق المطلوب:
[الزمن] النص
(ملاحظات الإخراج)

مثال:
[0:00-0:30] السلام عليكم ورحمة الله وبركاته! 
(موسيقى هادئة، ظهور المتحدث)

... وهكذا"
    )
}

pub fn performance_prompt(data: &PerformanceData) -> String {
    let or = |value: &Option<String>, missing: &str| value.clone().unwrap_or_else(|| missing.to_string());
    format!(
        "تحليل أداء المحتوى العربي وتقديم توصيات عملية

البيانات المتوفرة:
👁️ المشاهدات: {}
❤️ التفاعل: {}%
⏱️ مدة المشاهدة: {}
📱 المنصة: {}
🎯 نوع المحتوى: {}

المطلوب:
🔍 التحليل:
1. نقاط القوة (بناءً على البيانات)
2. نقاط الضعف والفرص الضائعة
3. مقارنة بالمعدلات القياسية للمنصة

💡 التوصيات:
1. 3 توصيات عملية فورية للتحسين
2. استراتيجية للمحتوى القادم
3. تحسينات تقنية وفنية
4. نصائح للتفاعل مع الجمهور

📈 التوقعات:
- توقع الأداء بعد التطبيق
- الوقت المتوقع للتحسن
- المقاييس التي يجب تتبعها",
        or(&data.views, NOT_AVAILABLE),
        or(&data.engagement, NOT_AVAILABLE),
        or(&data.watch_time, NOT_AVAILABLE),
        or(&data.platform, NOT_SPECIFIED),
        or(&data.content_type, NOT_SPECIFIED)
    )
}

pub fn thumbnail_prompt(video_title: &str, style: &str, platform: &str) -> String {
    format!(
        "تصميم وصف تفصيلي لثامبريل فيديو {platform}

عنوان الفيديو: {video_title}
النمط المطلوب: {style}

المتطلبات:
🎨 نظام الألوان:
- الألوان الرئيسية (2-3 ألوان)
- الألوان الثانوية
- تباين الألوان المناسب

📐 التخطيط والتركيب:
- توزيع العناصر
- المساحات والفراغات
- التوازن البصري

🔤 النصوص والعناصر النصية:
- العناوين الرئيسية
- النصوص الثانوية
- الخطوط المناسبة
- أحجام النصوص

🖼️ العناصر البصرية:
- الصور/الرسومات
- الأيقونات
- التأثيرات البصرية

✨ التأثيرات الخاصة:
- الظلال والتدرجات
- التأثيرات البصرية
- الإطارات والحدود

🎯 النصائح التنفيذية:
- البرامج المناسبة للتنفيذ
- الأحجام الموصى بها
- نصائح للتصميم العربي"
    )
}

pub fn live_stream_prompt(topic: &str, duration_minutes: u32, audience: &str) -> String {
    format!(
        "تحضير خطة بث مباشر عربي احترافي

الموضوع: {topic}
المدة: {duration_minutes} دقيقة
الجمهور: {audience}

المتطلبات:
🎯 الخطة الكاملة:

1. التحضير المسبق (قبل البث):
   - التسويق والمتابعة
   - التحضير الفني
   - التحضير المحتوى

2. جدول البث (دقيقة بدقيقة):
   [0-5] الافتتاحية والترحيب
   [6-15] تقديم الموضوع والنقاط الرئيسية
   ... وهكذا

3. نقاط الحديث الرئيسية:
   - النقطة 1 (مع أمثلة)
   - النقطة 2 (مع تطبيقات)
   - النقطة 3 (مع قصص)

4. الأنشطة التفاعلية:
   - الأسئلة المباشرة
   - المسابقات السريعة
   - التصويتات
   - القراءات المباشرة

5. الدعوات للعمل:
   - الاشتراك في القناة
   - المتابعة على وسائل التواصل
   - المشاركة في التعليقات
   - زيارة الروابط

6. خطة الطوارئ:
   - مشاكل فنية متوقعة
   - التعامل مع التعليقات السلبية
   - تأخير أو انقطاع البث"
    )
}

impl AiClient {
    pub async fn generate_video_ideas(&self, topic: &str, count: u32) -> SendResult {
        let options = GenerationOptions::new().temperature(0.8).max_tokens(1500);
        self.send_message(&video_ideas_prompt(topic, count), &options).await
    }

    pub async fn write_video_script(
        &self,
        topic: &str,
        duration_minutes: u32,
        style: &str,
        audience: &str
    ) -> SendResult {
        let options = GenerationOptions::new().temperature(0.7).max_tokens(2000);
        self.send_message(&video_script_prompt(topic, duration_minutes, style, audience), &options).await
    }

    pub async fn analyze_performance(&self, data: &PerformanceData) -> SendResult {
        let options = GenerationOptions::new().temperature(0.6).max_tokens(1800);
        self.send_message(&performance_prompt(data), &options).await
    }

    pub async fn design_thumbnail(&self, video_title: &str, style: &str, platform: &str) -> SendResult {
        let options = GenerationOptions::new().temperature(0.8).max_tokens(1200);
        self.send_message(&thumbnail_prompt(video_title, style, platform), &options).await
    }

    pub async fn prepare_live_stream(
        &self,
        topic: &str,
        duration_minutes: u32,
        audience: &str
    ) -> SendResult {
        let options = GenerationOptions::new().temperature(0.7).max_tokens(2500);
        self.send_message(&live_stream_prompt(topic, duration_minutes, audience), &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AiSettings;
    use crate::llm::chat::simulated::SimulatedChatClient;
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn performance_prompt_marks_missing_fields() {
        let data = PerformanceData {
            views: Some("1200".into()),
            platform: Some("يوتيوب".into()),
            ..PerformanceData::default()
        };
        let prompt = performance_prompt(&data);
        assert!(prompt.contains("👁️ المشاهدات: 1200"));
        assert!(prompt.contains("❤️ التفاعل: غير متوفر%"));
        assert!(prompt.contains("📱 المنصة: يوتيوب"));
        assert!(prompt.contains("🎯 نوع المحتوى: غير محدد"));
    }

    #[test]
    fn ideas_prompt_carries_topic_and_count() {
        let prompt = video_ideas_prompt("التسويق", 3);
        assert!(prompt.starts_with("توليد 3 أفكار فيديو عربية احترافية عن: التسويق"));
    }

    #[test]
    fn script_prompt_includes_timed_example() {
        let prompt = video_script_prompt("الطبخ", 5, "احترافي", "عربي عام");
        assert!(prompt.contains("المدة: 5 دقائق"));
        assert!(prompt.contains("مثال:\n[0:00-0:30] السلام عليكم ورحمة الله وبركاته! \n(موسيقى هادئة، ظهور المتحدث)"));
        assert!(prompt.ends_with("... وهكذا"));
    }

    #[test]
    fn thumbnail_prompt_includes_all_design_sections() {
        let prompt = thumbnail_prompt("وصفة سريعة", "جذاب", "يوتيوب");
        assert!(prompt.starts_with("تصميم وصف تفصيلي لثامبريل فيديو يوتيوب"));
        for section in [
            "- النصوص الثانوية",
            "- أحجام النصوص",
            "🖼️ العناصر البصرية:\n- الصور/الرسومات\n- الأيقونات\n- التأثيرات البصرية",
            "✨ التأثيرات الخاصة:\n- الظلال والتدرجات\n- التأثيرات البصرية\n- الإطارات والحدود",
        ] {
            assert!(prompt.contains(section), "missing: {}", section);
        }
    }

    #[test]
    fn live_stream_prompt_includes_full_plan() {
        let prompt = live_stream_prompt("الطبخ", 60, "عام");
        assert!(prompt.contains("المدة: 60 دقيقة"));
        for section in [
            "1. التحضير المسبق (قبل البث):\n   - التسويق والمتابعة",
            "   [0-5] الافتتاحية والترحيب\n   [6-15] تقديم الموضوع والنقاط الرئيسية",
            "   - النقطة 3 (مع قصص)",
            "   - القراءات المباشرة",
            "5. الدعوات للعمل:\n   - الاشتراك في القناة",
            "   - زيارة الروابط",
        ] {
            assert!(prompt.contains(section), "missing: {}", section);
        }
    }

    #[tokio::test]
    async fn tasks_go_through_send_message() {
        let chat = Arc::new(SimulatedChatClient::with_latency(Duration::from_millis(1)));
        let client = AiClient::with_chat_client(
            AiSettings::default().with_api_key("test-key"),
            chat,
            Arc::new(MemoryStore::new())
        ).unwrap();

        let result = client.prepare_live_stream("الطبخ", 60, "عام").await;
        assert!(result.is_success());
        let result = client.design_thumbnail("وصفة سريعة", "جذاب", "يوتيوب").await;
        assert!(result.is_success());
        assert_eq!(client.get_stats().stats.total_requests, 2);
        assert_eq!(client.history().len(), 4);
    }
}
