use super::Backend;
use crate::conversation::{ChatMessage, Role};
use crate::http::fetch_json;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Flatten the history into a plain transcript ending with an open
/// `Assistant:` turn. The system preamble is left out.
pub fn to_prompt(history: &[ChatMessage]) -> String {
    let mut lines: Vec<String> = history
        .iter()
        .filter_map(|m| match m.role {
            Role::User => Some(format!("User: {}", m.content)),
            Role::Assistant => Some(format!("Assistant: {}", m.content)),
            Role::System => None,
        })
        .collect();
    lines.push("Assistant:".to_string());
    lines.join("\n")
}

/// Local Ollama server, `/api/generate` without streaming.
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(client: Client, endpoint: &str, model: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn attempt(&self, history: &[ChatMessage]) -> Option<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: to_prompt(history),
            stream: false,
        };
        let request = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&body);

        match fetch_json::<GenerateResponse>(request, TIMEOUT).await {
            Ok(reply) => Some(reply.response.trim().to_string()).filter(|r| !r.is_empty()),
            Err(err) => {
                debug!("{} backend unavailable: {}", self.name(), err);
                None
            }
        }
    }
}
