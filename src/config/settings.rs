use serde::Serialize;
use std::time::Duration;

use crate::cli::Args;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_MAX_HISTORY: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-wide settings. Per-call `GenerationOptions` are layered on top.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub max_history: usize,
    pub persist_history: bool,
    pub timeout: Duration,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_history: DEFAULT_MAX_HISTORY,
            persist_history: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AiSettings {
    pub fn from_args(args: &Args) -> Self {
        let api_key = if !args.api_key.trim().is_empty() {
            Some(args.api_key.clone())
        } else {
            None
        };
        Self {
            api_key,
            model: args.model.clone(),
            base_url: args.base_url.clone(),
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            max_history: args.max_history,
            persist_history: args.persist_history,
            timeout: Duration::from_secs(args.timeout_secs),
            ..Self::default()
        }
    }

    /// A cap of 0 means "not configured" and falls back to the default.
    pub fn effective_max_history(&self) -> usize {
        if self.max_history == 0 {
            DEFAULT_MAX_HISTORY
        } else {
            self.max_history
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Per-call overrides. `None` means "use the client default".
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub use_history: Option<bool>,
    pub context: Option<String>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn use_history(mut self, use_history: bool) -> Self {
        self.use_history = Some(use_history);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn resolve(&self, settings: &AiSettings) -> ResolvedOptions {
        ResolvedOptions {
            config: GenerationConfig {
                temperature: self.temperature.unwrap_or(settings.temperature),
                top_k: self.top_k.unwrap_or(settings.top_k),
                top_p: self.top_p.unwrap_or(settings.top_p),
                max_output_tokens: self.max_tokens.unwrap_or(settings.max_tokens),
            },
            use_history: self.use_history.unwrap_or(true),
            context: self.context.clone().filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Sampling configuration as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub config: GenerationConfig,
    pub use_history: bool,
    pub context: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_take_settings_defaults() {
        let resolved = GenerationOptions::new().resolve(&AiSettings::default());
        assert_eq!(resolved.config, GenerationConfig {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        });
        assert!(resolved.use_history);
        assert!(resolved.context.is_none());
    }

    #[test]
    fn explicit_zero_temperature_is_kept() {
        let resolved = GenerationOptions::new()
            .temperature(0.0)
            .max_tokens(10)
            .use_history(false)
            .resolve(&AiSettings::default());
        assert_eq!(resolved.config.temperature, 0.0);
        assert_eq!(resolved.config.max_output_tokens, 10);
        assert!(!resolved.use_history);
    }

    #[test]
    fn zero_history_cap_uses_default() {
        let settings = AiSettings { max_history: 0, ..AiSettings::default() };
        assert_eq!(settings.effective_max_history(), DEFAULT_MAX_HISTORY);
        let settings = AiSettings { max_history: 3, ..AiSettings::default() };
        assert_eq!(settings.effective_max_history(), 3);
    }

    #[test]
    fn wire_config_uses_camel_case() {
        let json = serde_json::to_value(GenerationOptions::new().resolve(&AiSettings::default()).config).unwrap();
        assert_eq!(json["topK"], 40);
        assert_eq!(json["maxOutputTokens"], 2048);
    }
}
