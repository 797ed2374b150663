use super::{Tool, ToolError};
use crate::http::{fetch_json, log_failure, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const LIBRETRANSLATE_URL: &str = "https://libretranslate.de/translate";
const TIMEOUT: Duration = Duration::from_secs(8);
const USAGE: &str = "Usage: translate <lang> <text>";

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Split `"<lang> <text...>"`, keeping the text's internal spacing.
pub fn split_args(args: &str) -> Option<(&str, &str)> {
    let args = args.trim();
    let (lang, text) = args.split_once(char::is_whitespace)?;
    let text = text.trim();
    if lang.is_empty() || text.is_empty() {
        return None;
    }
    Some((lang, text))
}

/// Translates English text through a LibreTranslate instance.
pub struct TranslateTool {
    client: Client,
    url: String,
}

impl TranslateTool {
    pub fn new(client: Client) -> Self {
        Self::with_url(client, LIBRETRANSLATE_URL)
    }

    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Tool for TranslateTool {
    fn name(&self) -> &str {
        "translate"
    }

    fn description(&self) -> &str {
        "Translate English text into another language"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        let (lang, text) = split_args(args).ok_or_else(|| ToolError::Usage(USAGE.to_string()))?;

        let form = [
            ("q", text),
            ("source", "en"),
            ("target", lang),
            ("format", "text"),
        ];
        let request = self.client.post(&self.url).form(&form);

        match fetch_json::<Translation>(request, TIMEOUT).await {
            Ok(Translation {
                translated_text: Some(translated),
            }) if !translated.trim().is_empty() => Ok(translated),
            Ok(_) => Ok("Translation failed".to_string()),
            Err(err @ FetchError::Offline(_)) => {
                log_failure(self.name(), &err);
                Ok(format!("Translation (offline dummy): {text} in {lang}"))
            }
            Err(err) => {
                log_failure(self.name(), &err);
                Ok("Translation error.".to_string())
            }
        }
    }
}
