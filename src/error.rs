use std::time::Duration;
use thiserror::Error;

/// Failures of the AI request client.
///
/// `Configuration` is raised to whoever constructs the client. Every other
/// variant is recovered inside `AiClient::send_message` and turned into a
/// failure result carrying a fallback reply.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("API Error {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Invalid response structure from Gemini API: {0}")]
    Contract(String),
}

impl AiError {
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::Configuration(_) => "ConfigurationError",
            AiError::Transport(_) => "TransportError",
            AiError::Timeout(_) => "TimeoutError",
            AiError::Remote { .. } => "RemoteError",
            AiError::Contract(_) => "ContractError",
        }
    }

    pub fn code(&self) -> String {
        match self {
            AiError::Configuration(_) => "CONFIG".to_string(),
            AiError::Transport(_) => "NETWORK".to_string(),
            AiError::Timeout(_) => "TIMEOUT".to_string(),
            AiError::Remote { status, .. } => format!("HTTP_{}", status),
            AiError::Contract(_) => "INVALID_RESPONSE".to_string(),
        }
    }
}

/// Failures of the key-value persistence surface. These never affect control
/// flow; they are only reported to a `PersistenceHook`.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
