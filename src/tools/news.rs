use super::{Tool, ToolError};
use crate::http::{fetch_json, log_failure, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const NEWSAPI_URL: &str = "https://newsapi.org/v2/top-headlines?country=us&apiKey=demo";
const TIMEOUT: Duration = Duration::from_secs(8);
const MAX_HEADLINES: usize = 5;
const OFFLINE_HEADLINE: &str = "Breaking news (offline dummy): AI agent Bhanu is getting smarter!";

#[derive(Debug, Deserialize)]
struct Headlines {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

fn join_headlines(headlines: &Headlines) -> Option<String> {
    let titles: Vec<&str> = headlines
        .articles
        .iter()
        .filter_map(|a| a.title.as_deref())
        .filter(|t| !t.trim().is_empty())
        .take(MAX_HEADLINES)
        .collect();

    if titles.is_empty() {
        None
    } else {
        Some(titles.join(" | "))
    }
}

pub struct NewsTool {
    client: Client,
    url: String,
}

impl NewsTool {
    pub fn new(client: Client) -> Self {
        Self::with_url(client, NEWSAPI_URL)
    }

    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Tool for NewsTool {
    fn name(&self) -> &str {
        "news"
    }

    fn description(&self) -> &str {
        "Top headlines"
    }

    async fn execute(&self, _args: &str) -> Result<String, ToolError> {
        match fetch_json::<Headlines>(self.client.get(&self.url), TIMEOUT).await {
            Ok(headlines) => {
                Ok(join_headlines(&headlines).unwrap_or_else(|| "No news found.".to_string()))
            }
            Err(err @ FetchError::Offline(_)) => {
                log_failure(self.name(), &err);
                Ok(OFFLINE_HEADLINE.to_string())
            }
            Err(err) => {
                log_failure(self.name(), &err);
                Ok("Headlines are unavailable right now.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{client, test_support::UNREACHABLE};

    #[test]
    fn test_join_headlines_caps_at_five() {
        let articles = (1..=7)
            .map(|i| Article {
                title: Some(format!("Story {i}")),
            })
            .collect();
        let joined = join_headlines(&Headlines { articles }).unwrap();
        assert_eq!(joined, "Story 1 | Story 2 | Story 3 | Story 4 | Story 5");
    }

    #[test]
    fn test_join_headlines_empty() {
        let parsed: Headlines = serde_json::from_str(r#"{"status":"ok","articles":[]}"#).unwrap();
        assert_eq!(join_headlines(&parsed), None);

        let parsed: Headlines = serde_json::from_str(r#"{"articles":[{"title":null}]}"#).unwrap();
        assert_eq!(join_headlines(&parsed), None);
    }

    #[tokio::test]
    async fn test_news_offline() {
        let tool = NewsTool::with_url(client(), UNREACHABLE);
        assert_eq!(tool.execute("").await.unwrap(), OFFLINE_HEADLINE);
    }
}
