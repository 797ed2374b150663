use super::{Tool, ToolError};
use crate::http::{fetch_text, log_failure, url_with_segment, FetchError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

const WTTR_URL: &str = "https://wttr.in";
const TIMEOUT: Duration = Duration::from_secs(6);

/// One-line weather summary from wttr.in.
pub struct WeatherTool {
    client: Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, WTTR_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn request(&self, city: &str) -> Result<RequestBuilder, FetchError> {
        let url = url_with_segment(&self.base_url, city)?;
        Ok(self.client.get(url).query(&[("format", "3")]))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Current weather for a city"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        let city = args.trim();
        if city.is_empty() {
            return Err(ToolError::Usage(
                "Please provide a city, e.g., 'weather Hyderabad'.".to_string(),
            ));
        }

        let result = match self.request(city) {
            Ok(request) => fetch_text(request, TIMEOUT).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(body) if !body.trim().is_empty() => Ok(body.trim().to_string()),
            Ok(_) => Ok(format!("Couldn't fetch weather for '{city}'.")),
            Err(err @ FetchError::Offline(_)) => {
                log_failure(self.name(), &err);
                Ok(format!("The weather in {city} is sunny (offline dummy)."))
            }
            Err(err) => {
                log_failure(self.name(), &err);
                Ok(format!("Couldn't fetch weather for '{city}'."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{client, test_support::UNREACHABLE};

    #[tokio::test]
    async fn test_weather_requires_city() {
        let tool = WeatherTool::with_base_url(client(), UNREACHABLE);
        let err = tool.execute("   ").await.unwrap_err();
        assert!(err.to_string().contains("weather Hyderabad"));
    }

    #[test]
    fn test_city_stays_in_one_path_segment() {
        let tool = WeatherTool::new(client());
        let request = tool.request("x?format=j1").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "https://wttr.in/x%3Fformat=j1?format=3");
    }

    #[tokio::test]
    async fn test_weather_offline_dummy() {
        let tool = WeatherTool::with_base_url(client(), UNREACHABLE);
        let reply = tool.execute("Hyderabad").await.unwrap();
        assert_eq!(reply, "The weather in Hyderabad is sunny (offline dummy).");
    }
}
