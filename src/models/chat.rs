use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub id: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        let now = Utc::now();
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
        Self {
            role,
            content: content.into(),
            timestamp: now,
            id: format!("msg_{}_{}", now.timestamp_millis(), suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = ConversationMessage::new(Role::User, "hi");
        let b = ConversationMessage::new(Role::User, "hi");
        assert!(a.id.starts_with("msg_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = ConversationMessage::new(Role::Assistant, "ok");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
