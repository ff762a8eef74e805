pub mod gemini;
pub mod simulated;

use async_trait::async_trait;
use std::sync::Arc;

use super::{ LlmConfig, LlmType };
use self::gemini::GeminiChatClient;
use self::simulated::SimulatedChatClient;
use crate::config::settings::GenerationConfig;
use crate::error::AiError;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub response: String,
    /// Reported token usage, 0 when the backend does not report it.
    pub total_tokens: u64,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<CompletionResponse, AiError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, AiError> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Simulated => Arc::new(SimulatedChatClient::new()),
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_type_builds_local_generator_without_key() {
        let config = LlmConfig { llm_type: LlmType::Simulated, ..LlmConfig::default() };
        let client = new_client(&config).unwrap();
        assert_eq!(client.get_model(), "nexa-simulated");
    }

    #[test]
    fn gemini_type_requires_key() {
        let err = new_client(&LlmConfig::default()).err().unwrap();
        assert_eq!(err.kind(), "ConfigurationError");
    }
}
