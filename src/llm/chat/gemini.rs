use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE } };
use serde::{ Deserialize, Serialize };
use std::time::Duration;

use super::{ ChatClient, CompletionResponse };
use crate::config::settings::{ GenerationConfig, DEFAULT_BASE_URL, DEFAULT_MODEL };
use crate::error::AiError;
use crate::llm::LlmConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleResponse {
    candidates: Option<Vec<GoogleCandidate>>,
    usage_metadata: Option<GoogleUsage>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[derive(Deserialize)]
struct GoogleContent {
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsage {
    total_token_count: Option<u64>,
}

fn parse_generate_response(body: &str) -> Result<CompletionResponse, AiError> {
    let parsed: GoogleResponse = serde_json
        ::from_str(body)
        .map_err(|e| AiError::Contract(format!("unparseable body: {}", e)))?;

    let text = parsed.candidates
        .as_ref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.clone())
        .ok_or_else(|| AiError::Contract("missing candidates[0].content.parts[0].text".into()))?;

    let total_tokens = parsed.usage_metadata
        .and_then(|usage| usage.total_token_count)
        .unwrap_or(0);

    Ok(CompletionResponse { response: text, total_tokens })
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration
    ) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::Configuration("Gemini API Key not found in config".into()));
        }
        let chat_model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model: chat_model,
            base_url: api_url,
            timeout,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, AiError> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| AiError::Configuration("Gemini API Key not found in config".into()))?;
        Self::new(api_key, config.completion_model.clone(), config.base_url.clone(), config.timeout)
    }

    fn transport_error(&self, err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            AiError::Timeout(self.timeout)
        } else {
            AiError::Transport(err.to_string())
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<CompletionResponse, AiError> {
        let payload = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
            generation_config: config,
        };
        info!("GeminiChatClient::complete() → model={} base_url={}", self.model, self.base_url);

        let resp = self.http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send().await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Remote { status: status.as_u16(), body });
        }
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        debug!("Gemini response body: {} bytes", body.len());
        parse_generate_response(&body)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
