use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Assistant Args ---
    /// Which assistant answers prompts (gemini, nexa)
    #[arg(long, env = "ASSISTANT", default_value = "gemini")]
    pub assistant: String,

    /// API Key for the Gemini generation endpoint. Required for the gemini assistant.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Model name for generation (e.g., gemini-pro, gemini-1.5-flash)
    #[arg(long, env = "AI_MODEL", default_value = "gemini-pro")]
    pub model: String,

    /// Base URL of the models collection; the model and method are appended.
    #[arg(
        long,
        env = "AI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta/models"
    )]
    pub base_url: String,

    /// Default sampling temperature when a call does not override it.
    #[arg(long, env = "AI_TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Default output token cap when a call does not override it.
    #[arg(long, env = "AI_MAX_TOKENS", default_value = "2048")]
    pub max_tokens: u32,

    /// Maximum number of messages kept in conversation history (0 uses the default of 10).
    #[arg(long, env = "AI_MAX_HISTORY", default_value = "10")]
    pub max_history: usize,

    /// Hard per-request timeout in seconds.
    #[arg(long, env = "AI_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    // --- Storage Args ---
    /// Key-value store type for history (file, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// Directory used by the file store.
    #[arg(long, env = "STORE_DIR", default_value = ".nexus")]
    pub store_dir: String,

    /// Save conversation history after every change.
    #[arg(long, env = "PERSIST_HISTORY", default_value_t = true, action = clap::ArgAction::Set)]
    pub persist_history: bool,

    // --- General App Args ---
    /// Check the generation endpoint once on startup.
    #[arg(long, env = "CHECK_CONNECTION", default_value = "false")]
    pub check_connection: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_client_settings() {
        let args = Args::parse_from(["nexus-assistant"]);
        assert_eq!(args.assistant, "gemini");
        assert_eq!(args.model, "gemini-pro");
        assert_eq!(args.max_history, 10);
        assert_eq!(args.timeout_secs, 30);
        assert!(args.persist_history);
    }

    #[test]
    fn persistence_can_be_switched_off() {
        let args = Args::parse_from(["nexus-assistant", "--persist-history", "false", "--check-connection"]);
        assert!(!args.persist_history);
        assert!(args.check_connection);
    }
}
