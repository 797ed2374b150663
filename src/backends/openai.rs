use super::Backend;
use crate::conversation::ChatMessage;
use crate::http::fetch_json;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn first_content(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()?
        .message
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Hosted chat-completions API (OpenAI wire format).
pub struct OpenAiBackend {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(client: Client, url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn attempt(&self, history: &[ChatMessage]) -> Option<String> {
        let body = CompletionRequest {
            model: &self.model,
            messages: history,
            temperature: TEMPERATURE,
        };
        debug!("Sending {} message(s) to {}", history.len(), self.model);

        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body);

        match fetch_json::<CompletionResponse>(request, TIMEOUT).await {
            Ok(response) => first_content(response),
            Err(err) => {
                debug!("{} backend unavailable: {}", self.name(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::http::{client, test_support::UNREACHABLE};

    #[test]
    fn test_request_body_shape() {
        let history = vec![
            ChatMessage::new(Role::System, "sys"),
            ChatMessage::new(Role::User, "hi"),
        ];
        let body = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &history,
            temperature: TEMPERATURE,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_first_content() {
        let parsed: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"  Hello!  "}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(parsed), Some("Hello!".to_string()));

        let parsed: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_content(parsed), None);

        let parsed: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_content(parsed), None);
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        let backend = OpenAiBackend::new(client(), UNREACHABLE, "sk-test", "gpt-4o-mini");
        let history = vec![ChatMessage::new(Role::User, "hi")];
        assert_eq!(backend.attempt(&history).await, None);
    }
}
