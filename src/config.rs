use std::env;
use std::path::PathBuf;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
pub const DEFAULT_TODO_FILE: &str = "bhanu_todo.json";

/// Startup configuration, resolved once and handed to the session.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_url: String,
    pub openai_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub todo_file: PathBuf,
    /// Skip both LLM backends and answer chat turns from the keyword fallback.
    pub offline: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_url: env_or("BHANU_OPENAI_URL", DEFAULT_OPENAI_URL),
            openai_model: env_or("BHANU_OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            ollama_url: env_or("BHANU_OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: env_or("BHANU_OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            todo_file: PathBuf::from(env_or("BHANU_TODO_FILE", DEFAULT_TODO_FILE)),
            offline: false,
        }
    }

    /// Configuration that never touches an LLM, whatever the environment says.
    pub fn offline(todo_file: impl Into<PathBuf>) -> Self {
        Self {
            openai_api_key: None,
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            todo_file: todo_file.into(),
            offline: true,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn use_hosted_backend(&self) -> bool {
        !self.offline && self.has_api_key()
    }

    pub fn use_local_backend(&self) -> bool {
        !self.offline
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
