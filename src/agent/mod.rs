pub mod tasks;

use chrono::Utc;
use log::{ error, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard };
use std::time::Instant;
use uuid::Uuid;

use crate::config::prompt::{ format_prompt, PROMPT_HISTORY_LEN };
use crate::config::settings::{ AiSettings, GenerationOptions };
use crate::error::AiError;
use crate::fallback::fallback_response;
use crate::history::{ ConversationHistory, HistoryPersistence };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::llm::LlmConfig;
use crate::models::chat::{ ConversationMessage, Role };
use crate::models::response::{
    ConnectionReport,
    ErrorDescriptor,
    FailureResponse,
    SendResult,
    SuccessResponse,
};
use crate::stats::{ RequestStats, StatsView };
use crate::storage::{ KeyValueStore, LogPersistenceHook, PersistenceHook };

const CONNECTION_CHECK_PROMPT: &str = "مرحباً! ارد بكلمة \"نجاح\" فقط.";
const LOG_PREVIEW_CHARS: usize = 50;

struct ClientState {
    history: ConversationHistory,
    stats: RequestStats,
}

fn lock_state(state: &Mutex<ClientState>) -> MutexGuard<'_, ClientState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Counts an attempt as failed unless the outcome was recorded, so a dropped
/// `send_message` future still balances the counters.
struct AttemptGuard<'a> {
    state: &'a Mutex<ClientState>,
    armed: bool,
}

impl AttemptGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock_state(self.state).stats.record_failure();
            warn!("AI request cancelled before completion; counted as failed");
        }
    }
}

/// Client for the remote generation API.
///
/// Constructed once by the embedding application and shared by reference.
/// Calls to `send_message` are serialized: an overlapping call waits for the
/// one in flight, so history order always matches call order.
pub struct AiClient {
    chat_client: Arc<dyn ChatClient>,
    settings: AiSettings,
    state: Mutex<ClientState>,
    in_flight: tokio::sync::Mutex<()>,
    persistence: HistoryPersistence,
}

impl AiClient {
    /// Builds a client talking to the Gemini endpoint described by `settings`.
    pub fn new(settings: AiSettings, store: Arc<dyn KeyValueStore>) -> Result<Self, AiError> {
        let chat_client = new_chat_client(&LlmConfig::gemini(&settings))?;
        Self::with_chat_client(settings, chat_client, store)
    }

    pub fn with_chat_client(
        settings: AiSettings,
        chat_client: Arc<dyn ChatClient>,
        store: Arc<dyn KeyValueStore>
    ) -> Result<Self, AiError> {
        let api_key = settings.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::Configuration("Gemini API Key not found in config".into()))?;

        info!(
            "AI client initialized: model={} key={}...",
            chat_client.get_model(),
            api_key.chars().take(15).collect::<String>()
        );

        Ok(Self {
            chat_client,
            state: Mutex::new(ClientState {
                history: ConversationHistory::new(settings.effective_max_history()),
                stats: RequestStats::default(),
            }),
            in_flight: tokio::sync::Mutex::new(()),
            persistence: HistoryPersistence::new(store, Arc::new(LogPersistenceHook)),
            settings,
        })
    }

    pub fn with_persistence_hook(mut self, hook: Arc<dyn PersistenceHook>) -> Self {
        self.persistence = HistoryPersistence::new(self.persistence_store(), hook);
        self
    }

    fn persistence_store(&self) -> Arc<dyn KeyValueStore> {
        self.persistence.store()
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        lock_state(&self.state)
    }

    pub async fn send_message(&self, prompt: &str, options: &GenerationOptions) -> SendResult {
        let _slot = self.in_flight.lock().await;
        let resolved = options.resolve(&self.settings);
        let user_message = ConversationMessage::new(Role::User, prompt);

        let (request_no, payload) = {
            let mut state = self.state();
            state.stats.record_attempt();

            // The pending turn is part of the transcript but is only committed
            // to history once the call succeeds.
            let transcript = if resolved.use_history {
                let mut staged = state.history.clone();
                staged.push(user_message.clone());
                staged.recent(PROMPT_HISTORY_LEN)
            } else {
                Vec::new()
            };
            (
                state.stats.total_requests,
                format_prompt(prompt, &transcript, resolved.context.as_deref()),
            )
        };
        let mut attempt = AttemptGuard { state: &self.state, armed: true };
        info!("📤 [{}] Sending: \"{}\"", request_no, preview(prompt));

        let outcome = match
            tokio::time::timeout(
                self.settings.timeout,
                self.chat_client.complete(&payload, &resolved.config)
            ).await
        {
            Ok(result) => result,
            Err(_) => Err(AiError::Timeout(self.settings.timeout)),
        };

        match outcome {
            Ok(completion) => {
                attempt.disarm();
                let (stats, snapshot) = {
                    let mut state = self.state();
                    state.stats.record_success(completion.total_tokens);
                    state.history.push(user_message);
                    state.history.add(Role::Assistant, completion.response.clone());
                    (state.stats.clone(), state.history.clone())
                };
                self.persist(&snapshot);

                info!("📥 [{}] Received: \"{}\"", request_no, preview(&completion.response));
                info!("📊 Tokens used: {}", completion.total_tokens);

                SendResult::Success(SuccessResponse {
                    success: true,
                    message: completion.response,
                    tokens: completion.total_tokens,
                    response_time: Utc::now(),
                    request_id: format!("req_{}", Uuid::new_v4().simple()),
                    stats,
                })
            }
            Err(err) => {
                attempt.disarm();
                let stats = {
                    let mut state = self.state();
                    state.stats.record_failure();
                    state.stats.clone()
                };
                error!("❌ [{}] AI request failed: {}", request_no, err);

                SendResult::Failure(FailureResponse {
                    success: false,
                    message: fallback_response(prompt, &err),
                    error: ErrorDescriptor::from(&err),
                    request_id: format!("err_{}", Uuid::new_v4().simple()),
                    stats,
                })
            }
        }
    }

    fn persist(&self, history: &ConversationHistory) {
        if self.settings.persist_history {
            self.persistence.save(history);
        }
    }

    pub fn add_to_history(&self, role: Role, content: &str) -> ConversationMessage {
        let (message, snapshot) = {
            let mut state = self.state();
            let message = state.history.add(role, content);
            (message, state.history.clone())
        };
        self.persist(&snapshot);
        message
    }

    /// Restores the most recent `max_history` saved messages, if any.
    pub fn load_history(&self) -> usize {
        match self.persistence.load() {
            Some(messages) => {
                let mut state = self.state();
                state.history.replace(messages);
                info!("📂 Restored {} messages from history", state.history.len());
                state.history.len()
            }
            None => 0,
        }
    }

    pub fn clear_history(&self) -> bool {
        self.state().history.clear();
        self.persistence.clear();
        info!("🗑️ Conversation history cleared");
        true
    }

    pub fn history(&self) -> Vec<ConversationMessage> {
        self.state().history.messages()
    }

    pub fn get_stats(&self) -> StatsView {
        let state = self.state();
        state.stats.view(state.history.len())
    }

    pub async fn test_connection(&self) -> ConnectionReport {
        info!("🔌 Testing Gemini API connection...");
        let started = Instant::now();
        let options = GenerationOptions::new().max_tokens(10).temperature(0.1).use_history(false);
        let result = self.send_message(CONNECTION_CHECK_PROMPT, &options).await;
        let connected = result.is_success();

        ConnectionReport {
            connected,
            response_time: result.response_time(),
            elapsed_ms: started.elapsed().as_millis(),
            message: (if connected { "✅ متصل بنجاح" } else { "❌ فشل الاتصال" }).to_string(),
            details: result,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > LOG_PREVIEW_CHARS {
        format!("{}...", text.chars().take(LOG_PREVIEW_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}
