use super::{Tool, ToolError};
use crate::http::{fetch_json, log_failure, url_with_segment, FetchError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;

const DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

fn first_definition(entries: &[Entry]) -> Option<&str> {
    entries
        .first()?
        .meanings
        .first()?
        .definitions
        .first()
        .map(|d| d.definition.as_str())
}

pub struct DictTool {
    client: Client,
    base_url: String,
}

impl DictTool {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DICTIONARY_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn request(&self, word: &str) -> Result<RequestBuilder, FetchError> {
        Ok(self.client.get(url_with_segment(&self.base_url, word)?))
    }
}

#[async_trait]
impl Tool for DictTool {
    fn name(&self) -> &str {
        "dict"
    }

    fn description(&self) -> &str {
        "Look up the meaning of an English word"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        let word = args.trim();
        if word.is_empty() {
            return Err(ToolError::Usage("Usage: dict <word>".to_string()));
        }

        let result = match self.request(word) {
            Ok(request) => fetch_json::<Vec<Entry>>(request, TIMEOUT).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(entries) => Ok(match first_definition(&entries) {
                Some(meaning) => format!("{word}: {meaning}"),
                None => format!("No definition found for {word}."),
            }),
            Err(err @ FetchError::Offline(_)) => {
                log_failure(self.name(), &err);
                Ok(format!("{word}: meaning not found (offline)."))
            }
            Err(err) => {
                log_failure(self.name(), &err);
                Ok(format!("No definition found for {word}."))
            }
        }
    }
}
