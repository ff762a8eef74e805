use chrono::{ DateTime, Utc };
use log::{ info, warn };
use serde::{ Deserialize, Serialize };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex, MutexGuard };

use crate::config::settings::{ AiSettings, GenerationConfig, GenerationOptions };
use crate::llm::chat::ChatClient;
use crate::storage::{ KeyValueStore, LogPersistenceHook, PersistenceHook, StorageOp };

pub const NEXA_STORAGE_KEY: &str = "nexa-chat-history";
pub const WELCOME_MESSAGE: &str =
    "مرحباً! أنا Nexa، مساعدك الذكي في Nexus Studio. كيف يمكنني مساعدتك اليوم؟";
pub const ERROR_REPLY: &str = "عذراً، حدث خطأ. حاول مرة أخرى.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Nexa,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NexaMessage {
    pub id: i64,
    #[serde(rename = "type")]
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

pub fn quick_action(action: &str) -> &'static str {
    match action {
        "ideas" => "ساعدني في توليد أفكار لمحتوى فيديو جديد",
        "edit" => "تحسين نص الفيديو التالي: ",
        "analyze" => "حلل أداء آخر فيديو نشرته",
        _ => "",
    }
}

struct TypingGuard<'a>(&'a AtomicBool);

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Chat widget model for the simulated assistant. Keeps the full message
/// list and rewrites it to storage after every append.
pub struct NexaAssistant {
    generator: Arc<dyn ChatClient>,
    store: Arc<dyn KeyValueStore>,
    hook: Arc<dyn PersistenceHook>,
    messages: Mutex<Vec<NexaMessage>>,
    is_typing: AtomicBool,
    config: GenerationConfig,
}

impl NexaAssistant {
    pub fn new(generator: Arc<dyn ChatClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_hook(generator, store, Arc::new(LogPersistenceHook))
    }

    pub fn with_hook(
        generator: Arc<dyn ChatClient>,
        store: Arc<dyn KeyValueStore>,
        hook: Arc<dyn PersistenceHook>
    ) -> Self {
        let assistant = Self {
            generator,
            store,
            hook,
            messages: Mutex::new(Vec::new()),
            is_typing: AtomicBool::new(false),
            config: GenerationOptions::new().resolve(&AiSettings::default()).config,
        };
        let restored = assistant.load_messages();
        *assistant.lock() = restored;
        assistant
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NexaMessage>> {
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_messages(&self) -> Vec<NexaMessage> {
        match self.store.get(NEXA_STORAGE_KEY) {
            Ok(Some(raw)) =>
                match serde_json::from_str::<Vec<NexaMessage>>(&raw) {
                    Ok(messages) => {
                        info!("Loaded {} Nexa messages", messages.len());
                        return messages;
                    }
                    Err(e) => warn!("Discarding malformed Nexa history: {}", e),
                }
            Ok(None) => {}
            Err(e) => self.hook.on_failure(StorageOp::Read, NEXA_STORAGE_KEY, &e),
        }
        vec![NexaMessage {
            id: 1,
            sender: Sender::Nexa,
            content: WELCOME_MESSAGE.to_string(),
            timestamp: Utc::now(),
        }]
    }

    fn save_messages(&self, messages: &[NexaMessage]) {
        let result = serde_json
            ::to_string(messages)
            .map_err(Into::into)
            .and_then(|json| self.store.set(NEXA_STORAGE_KEY, &json));
        if let Err(e) = result {
            self.hook.on_failure(StorageOp::Write, NEXA_STORAGE_KEY, &e);
        }
    }

    fn add_message(&self, sender: Sender, content: &str) -> NexaMessage {
        let mut messages = self.lock();
        let now = Utc::now();
        // Millisecond ids, bumped so two messages in the same millisecond stay distinct.
        let last_id = messages.last().map(|m| m.id).unwrap_or(0);
        let message = NexaMessage {
            id: now.timestamp_millis().max(last_id + 1),
            sender,
            content: content.to_string(),
            timestamp: now,
        };
        messages.push(message.clone());
        self.save_messages(&messages);
        message
    }

    pub fn messages(&self) -> Vec<NexaMessage> {
        self.lock().clone()
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing.load(Ordering::SeqCst)
    }

    /// Sends `text` and returns Nexa's reply. Blank input, or input while a
    /// reply is still being produced, is ignored and returns `None`.
    pub async fn send(&self, text: &str) -> Option<NexaMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.is_typing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        let _typing = TypingGuard(&self.is_typing);

        self.add_message(Sender::User, text);
        let reply = match self.generator.complete(text, &self.config).await {
            Ok(completion) => completion.response,
            Err(e) => {
                warn!("Nexa reply failed: {}", e);
                ERROR_REPLY.to_string()
            }
        };
        Some(self.add_message(Sender::Nexa, &reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ AiError, StorageError };
    use crate::llm::chat::simulated::SimulatedChatClient;
    use crate::llm::chat::CompletionResponse;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingClient;

    #[async_trait]
    impl ChatClient for FailingClient {
        async fn complete(
            &self,
            _prompt: &str,
            _config: &GenerationConfig
        ) -> Result<CompletionResponse, AiError> {
            Err(AiError::Transport("offline".into()))
        }

        fn get_model(&self) -> String {
            "failing".to_string()
        }
    }

    fn fast_nexa(store: Arc<dyn KeyValueStore>) -> NexaAssistant {
        NexaAssistant::new(Arc::new(SimulatedChatClient::with_latency(Duration::from_millis(20))), store)
    }

    #[test]
    fn fresh_store_seeds_welcome_message() {
        let nexa = fast_nexa(Arc::new(MemoryStore::new()));
        let messages = nexa.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Nexa);
        assert_eq!(messages[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn malformed_store_falls_back_to_welcome() {
        let store = Arc::new(MemoryStore::new());
        store.set(NEXA_STORAGE_KEY, "[{\"oops\": true}]").unwrap();
        let nexa = fast_nexa(store);
        assert_eq!(nexa.messages().len(), 1);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let nexa = fast_nexa(Arc::new(MemoryStore::new()));
        assert!(nexa.send("   ").await.is_none());
        assert_eq!(nexa.messages().len(), 1);
    }

    #[tokio::test]
    async fn send_appends_both_turns_and_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let nexa = fast_nexa(store.clone());
        let reply = nexa.send("  اقترح فكرة  ").await.unwrap();
        assert_eq!(reply.sender, Sender::Nexa);
        assert!(reply.content.starts_with("لدي عدة أفكار"));
        assert!(!nexa.is_typing());

        let messages = nexa.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "اقترح فكرة");
        assert!(messages[1].id < messages[2].id);

        let restored = fast_nexa(store);
        assert_eq!(restored.messages(), messages);
    }

    #[tokio::test]
    async fn input_while_typing_is_ignored() {
        let nexa = fast_nexa(Arc::new(MemoryStore::new()));
        let (first, second) = tokio::join!(nexa.send("الأولى"), nexa.send("الثانية"));
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(nexa.messages().len(), 3);
    }

    #[tokio::test]
    async fn generator_error_yields_apology() {
        let nexa = NexaAssistant::new(Arc::new(FailingClient), Arc::new(MemoryStore::new()));
        let reply = nexa.send("hello").await.unwrap();
        assert_eq!(reply.content, ERROR_REPLY);
        assert!(!nexa.is_typing());
    }

    #[test]
    fn quick_actions_seed_text() {
        assert_eq!(quick_action("ideas"), "ساعدني في توليد أفكار لمحتوى فيديو جديد");
        assert_eq!(quick_action("edit"), "تحسين نص الفيديو التالي: ");
        assert_eq!(quick_action("unknown"), "");
    }

    #[test]
    fn unreadable_store_reported_to_hook() {
        use std::sync::atomic::AtomicUsize;

        struct Unreadable;
        impl KeyValueStore for Unreadable {
            fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Err(StorageError::Unavailable("denied".into()))
            }
            fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Ok(())
            }
            fn remove(&self, _key: &str) -> Result<(), StorageError> {
                Ok(())
            }
        }

        #[derive(Default)]
        struct Count(AtomicUsize);
        impl PersistenceHook for Count {
            fn on_failure(&self, op: StorageOp, _key: &str, _error: &StorageError) {
                assert_eq!(op, StorageOp::Read);
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let hook = Arc::new(Count::default());
        let nexa = NexaAssistant::with_hook(
            Arc::new(SimulatedChatClient::new()),
            Arc::new(Unreadable),
            hook.clone()
        );
        assert_eq!(nexa.messages().len(), 1);
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);
    }
}
