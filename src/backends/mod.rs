pub mod fallback;
pub mod ollama;
pub mod openai;

use crate::{config::Config, conversation::ChatMessage};
use async_trait::async_trait;
use tracing::{debug, info};

pub use fallback::FallbackResponder;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// A responder for free-text chat turns.
///
/// `attempt` returns `None` when the backend is unavailable for any reason;
/// that is a routing signal, not an error.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;
    async fn attempt(&self, history: &[ChatMessage]) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub backend: String,
    pub text: String,
}

/// Ordered list of backends; the first non-empty answer wins and the
/// keyword fallback answers when nobody else does.
pub struct BackendChain {
    backends: Vec<Box<dyn Backend>>,
    fallback: FallbackResponder,
}

impl Default for BackendChain {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendChain {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            fallback: FallbackResponder,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = crate::http::client();
        let mut chain = Self::new();

        if config.use_hosted_backend() {
            if let Some(key) = &config.openai_api_key {
                chain.push(Box::new(OpenAiBackend::new(
                    client.clone(),
                    &config.openai_url,
                    key,
                    &config.openai_model,
                )));
            }
        }
        if config.use_local_backend() {
            chain.push(Box::new(OllamaBackend::new(
                client,
                &config.ollama_url,
                &config.ollama_model,
            )));
        }

        info!("Chat backends: {:?} + fallback", chain.names());
        chain
    }

    pub fn push(&mut self, backend: Box<dyn Backend>) {
        self.backends.push(backend);
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub async fn respond(&self, history: &[ChatMessage]) -> ChatReply {
        for backend in &self.backends {
            match backend.attempt(history).await {
                Some(text) if !text.trim().is_empty() => {
                    debug!("Answered by {}", backend.name());
                    return ChatReply {
                        backend: backend.name().to_string(),
                        text: text.trim().to_string(),
                    };
                }
                _ => debug!("Backend {} unavailable, falling through", backend.name()),
            }
        }

        ChatReply {
            backend: self.fallback.name().to_string(),
            text: self.fallback.respond(history),
        }
    }
}
