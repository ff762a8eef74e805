use chrono::{ DateTime, Utc };
use log::info;
use serde::{ Serialize, Deserialize };
use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::chat::{ ConversationMessage, Role };
use crate::storage::{ KeyValueStore, PersistenceHook, StorageOp };

pub const HISTORY_STORAGE_KEY: &str = "nexus_ai_history";
const HISTORY_FORMAT_VERSION: &str = "1.0";

/// Capped, insertion-ordered conversation history. Oldest entries are
/// evicted first once `max_history` is exceeded.
#[derive(Clone, Debug)]
pub struct ConversationHistory {
    messages: VecDeque<ConversationMessage>,
    max_history: usize,
}

impl ConversationHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_history.min(64)),
            max_history,
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.max_history {
            self.messages.pop_front();
        }
    }

    pub fn add(&mut self, role: Role, content: impl Into<String>) -> ConversationMessage {
        let message = ConversationMessage::new(role, content);
        self.push(message.clone());
        message
    }

    /// Replaces the contents, keeping only the most recent `max_history`.
    pub fn replace(&mut self, messages: Vec<ConversationMessage>) {
        self.messages.clear();
        for message in messages {
            self.push(message);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> Vec<ConversationMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn recent(&self, n: usize) -> Vec<ConversationMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHistory {
    history: Vec<ConversationMessage>,
    last_updated: DateTime<Utc>,
    version: String,
}

/// Best-effort persistence of the history. Failures go to the hook and are
/// otherwise ignored.
#[derive(Clone)]
pub struct HistoryPersistence {
    store: Arc<dyn KeyValueStore>,
    hook: Arc<dyn PersistenceHook>,
    key: String,
}

impl HistoryPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>, hook: Arc<dyn PersistenceHook>) -> Self {
        Self {
            store,
            hook,
            key: HISTORY_STORAGE_KEY.to_string(),
        }
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn save(&self, history: &ConversationHistory) {
        let stored = StoredHistory {
            history: history.messages(),
            last_updated: Utc::now(),
            version: HISTORY_FORMAT_VERSION.to_string(),
        };
        let result = serde_json
            ::to_string(&stored)
            .map_err(Into::into)
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = result {
            self.hook.on_failure(StorageOp::Write, &self.key, &e);
        }
    }

    /// Returns the stored messages, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<Vec<ConversationMessage>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return None;
            }
            Err(e) => {
                self.hook.on_failure(StorageOp::Read, &self.key, &e);
                return None;
            }
        };
        match serde_json::from_str::<StoredHistory>(&raw) {
            Ok(stored) => {
                info!("Loaded {} messages from saved history", stored.history.len());
                Some(stored.history)
            }
            Err(e) => {
                info!("Discarding malformed saved history: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            self.hook.on_failure(StorageOp::Remove, &self.key, &e);
        }
    }
}

pub fn format_history_for_prompt(
    messages: &[ConversationMessage],
    user_name: &str,
    assistant_name: &str
) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let mut result = String::from("\n🔍 تاريخ المحادثة:\n");
    for msg in messages {
        let role_display = match msg.role {
            Role::User => user_name,
            Role::Assistant => assistant_name,
        };
        result.push_str(&format!("{}: {}\n", role_display, msg.content));
    }
    result.push('\n');
    result
}
