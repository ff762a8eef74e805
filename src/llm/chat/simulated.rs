use async_trait::async_trait;
use log::debug;
use rand::seq::SliceRandom;
use std::time::Duration;

use super::{ ChatClient, CompletionResponse };
use crate::config::settings::GenerationConfig;
use crate::error::AiError;

pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

/// Keyword groups checked in order; any keyword of a group selects its reply.
const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["فكرة", "موضوع"],
        "لدي عدة أفكار لمحتوى مميز:\n1. تعليمي: كيف تبدأ في...\n2. ترفيهي: أفضل 10...\n3. تحفيزي: قصص نجاح...\nأيها تفضل؟",
    ),
    (
        &["تحليل", "أداء"],
        "بناءً على بياناتك:\n- متوسط المشاهدة: 75%\n- التفاعل: أعلى من المعدل\n- وقت المشاهدة: 4:30 دقيقة\nاقتراح: حاول إضافة عناصر تفاعلية.",
    ),
    (
        &["تحسين", "نص"],
        "لتحسين النص:\n1. ابدأ بسؤال جذاب\n2. استخدم قصصاً قصيرة\n3. أضف دعوات واضحة للعمل\n4. ختم بملخص سريع\nهل تريد تطبيق هذه التعديلات؟",
    ),
];

pub const GENERIC_REPLIES: &[&str] = &[
    "هذه فكرة رائعة! هل تريدني أن أوسع فيها؟",
    "يمكنني مساعدتك في تحسين هذا المحتوى. إليك بعض الاقتراحات...",
    "بناءً على تحليل أدائك السابق، أنصحك بـ...",
    "لاحظت أن جمهورك يستجيب جيداً لمثل هذا النوع من المحتوى.",
    "هل تريد البدء في إنشاء محتوى بناءً على هذه الفكرة الآن؟",
    "لدي اقتراحات لتحسين العنوان والوصف لزيادة التفاعل.",
    "بناءً على اتجاهات السوق الحالية، هذا التوقيت ممتاز للنشر.",
    "يمكنني مساعدتك في كتابة سيناريو محترف لهذا الفيديو.",
];

pub fn canned_reply(message: &str) -> String {
    let message = message.to_lowercase();
    for (keywords, reply) in KEYWORD_REPLIES {
        if keywords.iter().any(|k| message.contains(k)) {
            return reply.to_string();
        }
    }
    GENERIC_REPLIES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&GENERIC_REPLIES[0])
        .to_string()
}

/// Local stand-in for a model: waits a fixed latency, then answers from a
/// canned table. Never touches the network.
pub struct SimulatedChatClient {
    latency: Duration,
}

impl SimulatedChatClient {
    pub fn new() -> Self {
        Self { latency: SIMULATED_LATENCY }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for SimulatedChatClient {
    async fn complete(
        &self,
        prompt: &str,
        _config: &GenerationConfig
    ) -> Result<CompletionResponse, AiError> {
        debug!("SimulatedChatClient::complete() → latency={:?}", self.latency);
        tokio::time::sleep(self.latency).await;
        Ok(CompletionResponse { response: canned_reply(prompt), total_tokens: 0 })
    }

    fn get_model(&self) -> String {
        "nexa-simulated".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_groups_match_in_order() {
        assert!(canned_reply("عندي موضوع جديد").starts_with("لدي عدة أفكار"));
        assert!(canned_reply("كيف أداء القناة").starts_with("بناءً على بياناتك"));
        assert!(canned_reply("أريد تحسين المقدمة").starts_with("لتحسين النص"));
    }

    #[test]
    fn unmatched_message_picks_generic_reply() {
        let reply = canned_reply("hello");
        assert!(GENERIC_REPLIES.contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn complete_reports_zero_tokens() {
        let client = SimulatedChatClient::with_latency(Duration::from_millis(1));
        let config = GenerationConfig { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 10 };
        let resp = client.complete("فكرة", &config).await.unwrap();
        assert_eq!(resp.total_tokens, 0);
        assert!(resp.response.starts_with("لدي عدة أفكار"));
    }
}
