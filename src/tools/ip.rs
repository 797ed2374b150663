use super::{Tool, ToolError};
use crate::http::{fetch_json, log_failure, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const IPIFY_URL: &str = "https://api.ipify.org?format=json";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IpReply {
    ip: String,
}

pub struct IpTool {
    client: Client,
    url: String,
}

impl IpTool {
    pub fn new(client: Client) -> Self {
        Self::with_url(client, IPIFY_URL)
    }

    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Tool for IpTool {
    fn name(&self) -> &str {
        "ip"
    }

    fn description(&self) -> &str {
        "Show your public IP address"
    }

    async fn execute(&self, _args: &str) -> Result<String, ToolError> {
        match fetch_json::<IpReply>(self.client.get(&self.url), TIMEOUT).await {
            Ok(reply) => Ok(format!("Your IP: {}", reply.ip)),
            Err(err @ FetchError::Offline(_)) => {
                log_failure(self.name(), &err);
                Ok("Your IP: 127.0.0.1 (dummy offline)".to_string())
            }
            Err(err) => {
                log_failure(self.name(), &err);
                Ok("Could not fetch IP.".to_string())
            }
        }
    }
}
